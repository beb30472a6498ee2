//! Skill extraction against a fixed vocabulary.
//!
//! A token counts as present when it occurs anywhere in the lower-cased text,
//! including inside longer words ("java" is found in "javascript"). All tokens
//! are matched in one pass of an Aho-Corasick automaton over the text.

use crate::error::{MatchError, Result};
use aho_corasick::AhoCorasick;
use std::collections::BTreeSet;

pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "c#",
    "javascript",
    "typescript",
    "html",
    "css",
    "sql",
    "nosql",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "fastapi",
    "spring boot",
    "git",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "linux",
    "unix",
    "bash",
    "powershell",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "pandas",
    "numpy",
    "matplotlib",
    "seaborn",
    "tableau",
    "power bi",
    "excel",
    "figma",
    "sketch",
    "adobe xd",
    "jira",
    "agile",
    "scrum",
    "rest api",
    "graphql",
    "machine learning",
    "data analysis",
    "data visualization",
    "devops",
    "ci/cd",
    "automation",
    "testing",
    "selenium",
];

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    tokens: Vec<String>,
    matcher: AhoCorasick,
}

impl SkillVocabulary {
    /// Builds the matcher. Tokens are trimmed, lower-cased and deduplicated.
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if tokens.is_empty() {
            return Err(MatchError::Config("skill vocabulary is empty".into()));
        }
        let matcher = AhoCorasick::new(&tokens)
            .map_err(|e| MatchError::Config(format!("skill vocabulary: {e}")))?;
        Ok(Self { tokens, matcher })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(DEFAULT_SKILLS)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Every vocabulary token contained in `text`, case-insensitively.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let normalized = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&normalized)
            .map(|m| self.tokens[m.pattern().as_usize()].clone())
            .collect()
    }
}

/// Skills in `required` missing from `mentioned`, sorted.
pub fn gap(required: &BTreeSet<String>, mentioned: &BTreeSet<String>) -> Vec<String> {
    required.difference(mentioned).cloned().collect()
}
