//! Process-lifetime vector corpora for jobs and courses.
//!
//! A corpus is loaded once from the offline pipeline's JSON artifact and never
//! mutated afterwards, so it is shared across requests without locking. A
//! corpus that cannot be loaded is kept as `Corpus::Unavailable` and reads from
//! it yield nothing.

use crate::error::{MatchError, Result};
use crate::models::CorpusItem;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CorpusArtifact {
    #[serde(default)]
    model: Option<String>,
    items: Vec<CorpusItem>,
}

#[derive(Debug, Clone)]
pub struct VectorCorpus {
    name: String,
    dimension: usize,
    items: Vec<Arc<CorpusItem>>,
}

impl VectorCorpus {
    /// Checks that every embedding is non-empty, finite and of one shared length.
    pub fn new(name: &str, items: Vec<CorpusItem>) -> Result<Self> {
        let dimension = items.first().map(|i| i.embedding.len()).unwrap_or(0);
        for item in &items {
            if item.embedding.is_empty() {
                return Err(MatchError::CorpusUnavailable(format!(
                    "{}: item '{}' has an empty embedding",
                    name, item.id
                )));
            }
            if item.embedding.len() != dimension {
                return Err(MatchError::CorpusUnavailable(format!(
                    "{}: item '{}' has dimension {}, expected {}",
                    name,
                    item.id,
                    item.embedding.len(),
                    dimension
                )));
            }
            if item.embedding.iter().any(|v| !v.is_finite()) {
                return Err(MatchError::CorpusUnavailable(format!(
                    "{}: item '{}' contains non-finite values",
                    name, item.id
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            dimension,
            items: items.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
pub enum Corpus {
    Available(VectorCorpus),
    Unavailable { name: String, reason: String },
}

impl Corpus {
    pub fn from_items(name: &str, items: Vec<CorpusItem>) -> Self {
        match VectorCorpus::new(name, items) {
            Ok(c) => Corpus::Available(c),
            Err(e) => Corpus::unavailable(name, e.to_string()),
        }
    }

    pub fn unavailable(name: &str, reason: impl Into<String>) -> Self {
        Corpus::Unavailable {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Loads a corpus artifact. Never fails: problems are logged and reported as `Unavailable`.
    ///
    /// `expected_dimension` and `expected_model` describe the query encoder, when known.
    /// An artifact that names a different model is not comparable with its queries.
    pub fn load(
        name: &str,
        path: &Path,
        expected_dimension: Option<usize>,
        expected_model: Option<&str>,
    ) -> Self {
        let corpus = match read_artifact(name, path) {
            Ok(artifact) => match (artifact.model.as_deref(), expected_model) {
                (Some(built), Some(expected)) if built != expected => Corpus::unavailable(
                    name,
                    MatchError::ModelMismatch {
                        expected: expected.to_string(),
                        actual: built.to_string(),
                    }
                    .to_string(),
                ),
                (built, _) => {
                    if let Some(model) = built {
                        info!("{} corpus built with model {}", name, model);
                    }
                    Corpus::from_items(name, artifact.items)
                }
            },
            Err(e) => Corpus::unavailable(name, e.to_string()),
        };
        let corpus = match (corpus, expected_dimension) {
            (Corpus::Available(c), Some(expected))
                if c.size() > 0 && c.dimension() != expected =>
            {
                Corpus::unavailable(
                    name,
                    MatchError::DimensionMismatch {
                        expected,
                        actual: c.dimension(),
                    }
                    .to_string(),
                )
            }
            (corpus, _) => corpus,
        };
        match &corpus {
            Corpus::Available(c) => info!(
                "Loaded {} corpus: {} items, dimension {}",
                name,
                c.size(),
                c.dimension()
            ),
            Corpus::Unavailable { reason, .. } => {
                warn!("{} corpus unavailable ({}); results will be empty", name, reason)
            }
        }
        corpus
    }

    pub fn name(&self) -> &str {
        match self {
            Corpus::Available(c) => c.name(),
            Corpus::Unavailable { name, .. } => name.as_str(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Corpus::Available(_))
    }

    pub fn size(&self) -> usize {
        self.items().len()
    }

    pub fn dimension(&self) -> Option<usize> {
        match self {
            Corpus::Available(c) => Some(c.dimension()),
            Corpus::Unavailable { .. } => None,
        }
    }

    /// Items in insertion order; empty when unavailable.
    pub fn items(&self) -> &[Arc<CorpusItem>] {
        match self {
            Corpus::Available(c) => &c.items,
            Corpus::Unavailable { .. } => &[],
        }
    }

    pub fn vectors_and_items(&self) -> impl Iterator<Item = (&[f32], &Arc<CorpusItem>)> {
        self.items().iter().map(|i| (i.embedding.as_slice(), i))
    }
}

fn read_artifact(name: &str, path: &Path) -> Result<CorpusArtifact> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        MatchError::CorpusUnavailable(format!("{} ({}): {}", name, path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        MatchError::CorpusUnavailable(format!("{} ({}): {}", name, path.display(), e))
    })
}
