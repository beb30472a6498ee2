use pathfinder_core::models::{RankedMatch, Recommendation};
use pathfinder_core::Resource;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// JSON shape of a ranked job; embeddings stay out of the output.
#[derive(Debug, Serialize)]
pub struct JobView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub score: f64,
    pub raw_score: f64,
    pub required_skills: &'a BTreeSet<String>,
    pub skills_gap: &'a [String],
}

impl<'a> From<&'a RankedMatch> for JobView<'a> {
    fn from(m: &'a RankedMatch) -> Self {
        Self {
            id: &m.item.id,
            title: &m.item.title,
            description: &m.item.description,
            score: m.score,
            raw_score: m.raw_score,
            required_skills: &m.required_skills,
            skills_gap: &m.skills_gap,
        }
    }
}

pub fn jobs_json(jobs: &[RankedMatch]) -> Value {
    serde_json::json!(jobs.iter().map(JobView::from).collect::<Vec<_>>())
}

pub fn recommendation_json(rec: &Recommendation) -> Value {
    serde_json::json!({
        "top_job_title": rec.top_job_title,
        "jobs": jobs_json(&rec.jobs),
        "roadmap": rec.roadmap,
    })
}

pub fn jobs_text(jobs: &[RankedMatch]) -> String {
    if jobs.is_empty() {
        return "no matching jobs".to_string();
    }
    let mut out = String::new();
    for (i, m) in jobs.iter().enumerate() {
        out.push_str(&format!("{:>2}. {} ({:.1}%)\n", i + 1, m.item.title, m.score));
        if !m.skills_gap.is_empty() {
            out.push_str(&format!("    missing: {}\n", m.skills_gap.join(", ")));
        }
    }
    out.trim_end().to_string()
}

pub fn roadmap_text(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "no learning resources found".to_string();
    }
    resources
        .iter()
        .map(|r| {
            let source = if r.source.is_empty() { "unknown" } else { r.source.as_str() };
            format!("- [{}] {} ({}) {}", r.kind, r.title, source, r.link)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn recommendation_text(rec: &Recommendation) -> String {
    format!(
        "Top jobs:\n{}\n\nRoadmap toward {}:\n{}",
        jobs_text(&rec.jobs),
        rec.top_job_title,
        roadmap_text(&rec.roadmap)
    )
}
