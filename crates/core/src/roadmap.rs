//! Roadmap assembly: the static resolver over the course corpus and the
//! link-deduplicating aggregator that merges it with live results.

use crate::embeddings::QueryEncoder;
use crate::error::Result;
use crate::search;
use crate::vectorstore::Corpus;
use providers::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Which result stream wins when both name the same link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    LiveFirst,
    StaticFirst,
}

impl Priority {
    pub fn order(self, live: Vec<Resource>, fixed: Vec<Resource>) -> (Vec<Resource>, Vec<Resource>) {
        match self {
            Priority::LiveFirst => (live, fixed),
            Priority::StaticFirst => (fixed, live),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "live_first" | "live" => Ok(Priority::LiveFirst),
            "static_first" | "static" => Ok(Priority::StaticFirst),
            other => Err(format!("unknown roadmap priority: {other}")),
        }
    }
}

/// Concatenates `primary` then `secondary`, keeping the first resource per link.
pub fn aggregate(primary: Vec<Resource>, secondary: Vec<Resource>) -> Vec<Resource> {
    dedup_by_link(primary.into_iter().chain(secondary))
}

pub fn dedup_by_link(resources: impl IntoIterator<Item = Resource>) -> Vec<Resource> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|r| seen.insert(r.link.clone()))
        .collect()
}

/// Word tokens of a title, lower-cased: the `\w+` runs.
pub fn title_keywords(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Course recommendations from the precomputed corpus.
pub struct StaticResolver<'a> {
    pub encoder: &'a QueryEncoder,
    pub courses: &'a Corpus,
    pub top_k: usize,
    pub threshold: f64,
}

impl StaticResolver<'_> {
    /// Semantic matches above the threshold first, then keyword matches on the title,
    /// deduplicated by link.
    pub async fn resolve(&self, target_title: &str, target_profile: &str) -> Result<Vec<Resource>> {
        if !self.courses.is_available() || self.courses.size() == 0 {
            return Ok(Vec::new());
        }

        let query = self.encoder.encode(target_profile).await?;
        let semantic: Vec<Resource> = search::top_k(&query, self.courses, self.top_k)?
            .into_iter()
            .filter(|hit| hit.raw_score > self.threshold)
            .map(|hit| hit.item.to_resource())
            .collect();

        let keywords = title_keywords(target_title);
        let keyword: Vec<Resource> = self
            .courses
            .items()
            .iter()
            .filter(|course| {
                let taught = course.skills_taught().to_lowercase();
                keywords.iter().any(|k| taught.contains(k.as_str()))
            })
            .map(|course| course.to_resource())
            .collect();

        debug!(
            "static roadmap for '{}': {} semantic, {} keyword",
            target_title,
            semantic.len(),
            keyword.len()
        );
        Ok(aggregate(semantic, keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use crate::testing::{course, resource, FixedEmbedder};
    use std::sync::Arc;

    fn links(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(|r| r.link.as_str()).collect()
    }

    #[test]
    fn aggregate_keeps_first_occurrence() {
        let primary = vec![resource("https://x/1", "live"), resource("https://x/2", "live")];
        let secondary = vec![resource("https://x/3", "static"), resource("https://x/1", "static")];
        let out = aggregate(primary, secondary);
        assert_eq!(links(&out), vec!["https://x/1", "https://x/2", "https://x/3"]);
        assert_eq!(out[0].title, "live");
    }

    #[test]
    fn priority_decides_which_duplicate_survives() {
        let live = vec![resource("https://x/1", "live")];
        let fixed = vec![resource("https://x/1", "static")];

        let (p, s) = Priority::LiveFirst.order(live.clone(), fixed.clone());
        let out = aggregate(p, s);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "live");

        let (p, s) = Priority::StaticFirst.order(live, fixed);
        let out = aggregate(p, s);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "static");
    }

    #[test]
    fn duplicates_within_one_stream_collapse() {
        let out = aggregate(
            vec![resource("https://x/1", "a"), resource("https://x/1", "b")],
            vec![],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "a");
    }

    #[test]
    fn priority_parses() {
        assert_eq!("static_first".parse::<Priority>(), Ok(Priority::StaticFirst));
        assert_eq!("Live-First".parse::<Priority>(), Ok(Priority::LiveFirst));
        assert!("random".parse::<Priority>().is_err());
    }

    #[test]
    fn title_keywords_split_on_word_boundaries() {
        let k = title_keywords("Senior Data-Analyst (SQL)");
        for w in ["senior", "data", "analyst", "sql"] {
            assert!(k.contains(w));
        }
        assert_eq!(k.len(), 4);
    }

    fn fixture() -> (QueryEncoder, Corpus) {
        let encoder = QueryEncoder::new(
            Arc::new(FixedEmbedder::new(&[
                ("Data Analyst. Analyse data with SQL", vec![1.0, 0.0]),
                ("Data Analyst", vec![1.0, 0.0]),
            ])),
            "fixed",
        );
        let courses = Corpus::from_items(
            "courses",
            vec![
                // raw cosine 0.25: below the cutoff, but teaches "data"
                course("weak", "https://c/weak", "Data cleaning basics", vec![0.25, 0.968_245_8]),
                course("strong", "https://c/strong", "statistics", vec![0.9, 0.435_889_9]),
                course("unrelated", "https://c/unrelated", "figma", vec![0.0, 1.0]),
                course("dup", "https://c/strong", "sql for analysts", vec![0.0, 1.0]),
            ],
        );
        (encoder, courses)
    }

    #[tokio::test]
    async fn threshold_gates_semantic_pass_but_keywords_still_match() {
        let (encoder, courses) = fixture();
        let resolver = StaticResolver {
            encoder: &encoder,
            courses: &courses,
            top_k: 5,
            threshold: 0.3,
        };
        let out = resolver
            .resolve("Data Analyst", "Data Analyst. Analyse data with SQL")
            .await
            .unwrap();
        // "strong" via semantics; "weak" only via keyword "data"; "dup" shares strong's link.
        assert_eq!(links(&out), vec!["https://c/strong", "https://c/weak"]);
        assert_eq!(out[0].skills_taught, "statistics");
    }

    #[tokio::test]
    async fn weak_match_without_keyword_overlap_is_dropped() {
        let (encoder, courses) = fixture();
        let resolver = StaticResolver {
            encoder: &encoder,
            courses: &courses,
            top_k: 5,
            threshold: 0.3,
        };
        let out = resolver
            .resolve("Zoologist", "Data Analyst. Analyse data with SQL")
            .await
            .unwrap();
        assert_eq!(links(&out), vec!["https://c/strong"]);
    }

    #[tokio::test]
    async fn score_equal_to_threshold_is_excluded() {
        let encoder = QueryEncoder::new(
            Arc::new(FixedEmbedder::new(&[("Pilot", vec![1.0, 0.0, 0.0, 0.0])])),
            "fixed",
        );
        // 3 / |(3, 9, 3, 1)| = 3 / 10, exactly the cutoff
        let courses = Corpus::from_items(
            "courses",
            vec![
                course("edge", "https://c/edge", "aviation", vec![3.0, 9.0, 3.0, 1.0]),
                course("above", "https://c/above", "aviation", vec![4.0, 9.0, 3.0, 1.0]),
            ],
        );
        assert_eq!(
            search::cosine_similarity(&[1.0, 0.0, 0.0, 0.0], &[3.0, 9.0, 3.0, 1.0]),
            0.3
        );
        let resolver = StaticResolver {
            encoder: &encoder,
            courses: &courses,
            top_k: 5,
            threshold: 0.3,
        };
        let out = resolver.resolve("Pilot", "Pilot").await.unwrap();
        assert_eq!(links(&out), vec!["https://c/above"]);
    }

    #[tokio::test]
    async fn unavailable_courses_give_empty_roadmap() {
        let (encoder, _) = fixture();
        let courses = Corpus::unavailable("courses", "missing");
        let resolver = StaticResolver {
            encoder: &encoder,
            courses: &courses,
            top_k: 5,
            threshold: 0.3,
        };
        assert!(resolver.resolve("anything", "not encodable").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_profile_is_rejected() {
        let (encoder, courses) = fixture();
        let resolver = StaticResolver {
            encoder: &encoder,
            courses: &courses,
            top_k: 5,
            threshold: 0.3,
        };
        assert!(matches!(
            resolver.resolve("Data Analyst", " ").await,
            Err(MatchError::EmptyQuery)
        ));
    }
}
