use providers::Resource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// One job posting or course together with its precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub embedding: Vec<f32>,
}

impl CorpusItem {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn skills_taught(&self) -> &str {
        self.attribute("skills_taught").unwrap_or("")
    }

    /// Title and description joined the way job profiles are embedded.
    pub fn profile_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }

    /// Course items become roadmap resources; the `link` attribute (or the id) is the identity.
    pub fn to_resource(&self) -> Resource {
        Resource {
            title: self.title.clone(),
            source: self.attribute("source").unwrap_or_default().to_string(),
            kind: self.attribute("type").unwrap_or("Course").to_string(),
            link: self
                .attribute("link")
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(self.id.as_str())
                .to_string(),
            skills_taught: self.skills_taught().to_string(),
        }
    }
}

/// A ranked job with its skill-gap analysis.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub item: Arc<CorpusItem>,
    /// Cosine similarity in [-1, 1].
    pub raw_score: f64,
    /// `raw_score` mapped onto [0, 100].
    pub score: f64,
    pub required_skills: BTreeSet<String>,
    pub skills_gap: Vec<String>,
}

/// What the dashboard shows: ranked jobs plus a roadmap toward the best one.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub top_job_title: String,
    pub jobs: Vec<RankedMatch>,
    pub roadmap: Vec<Resource>,
}

pub const FALLBACK_TARGET_TITLE: &str = "your ideal career";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub degree: Option<String>,
    pub skills: Option<String>,
    pub college: Option<String>,
}

impl UserProfile {
    /// The free-text query a profile ranks with. `None` until skills are filled in.
    pub fn to_query(&self) -> Option<String> {
        let skills = self.skills.as_deref().map(str::trim).unwrap_or("");
        if skills.is_empty() {
            return None;
        }
        Some(format!(
            "aspiring {} developer with skills in {} from {}",
            self.degree.as_deref().unwrap_or("").trim(),
            skills,
            self.college.as_deref().unwrap_or("").trim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(attrs: &[(&str, &str)]) -> CorpusItem {
        CorpusItem {
            id: "course-7".into(),
            title: "Docker Deep Dive".into(),
            description: String::new(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            embedding: vec![1.0],
        }
    }

    #[test]
    fn course_becomes_resource() {
        let item = course(&[
            ("link", "https://learn.example/docker"),
            ("source", "Example U"),
            ("type", "Specialization"),
            ("skills_taught", "docker, containers"),
        ]);
        let r = item.to_resource();
        assert_eq!(r.link, "https://learn.example/docker");
        assert_eq!(r.source, "Example U");
        assert_eq!(r.kind, "Specialization");
        assert_eq!(r.skills_taught, "docker, containers");
    }

    #[test]
    fn course_without_link_uses_id() {
        let r = course(&[]).to_resource();
        assert_eq!(r.link, "course-7");
        assert_eq!(r.kind, "Course");
        assert_eq!(r.skills_taught, "");
    }

    #[test]
    fn profile_query_requires_skills() {
        let mut p = UserProfile {
            degree: Some("B.Tech".into()),
            skills: None,
            college: Some("State College".into()),
        };
        assert!(p.to_query().is_none());
        p.skills = Some("python, sql".into());
        assert_eq!(
            p.to_query().unwrap(),
            "aspiring B.Tech developer with skills in python, sql from State College"
        );
    }
}
