//! Exact top-k cosine ranking over an in-memory corpus.

use crate::error::{MatchError, Result};
use crate::models::CorpusItem;
use crate::vectorstore::Corpus;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub item: Arc<CorpusItem>,
    /// Cosine similarity in [-1, 1].
    pub raw_score: f64,
}

/// Returns the `min(k, corpus.size())` most similar items, best first.
///
/// Ties keep corpus insertion order. An unavailable or empty corpus yields no hits.
pub fn top_k(query: &[f32], corpus: &Corpus, k: usize) -> Result<Vec<SearchHit>> {
    let Some(dimension) = corpus.dimension() else {
        return Ok(Vec::new());
    };
    if corpus.size() == 0 || k == 0 {
        return Ok(Vec::new());
    }
    if query.len() != dimension {
        return Err(MatchError::DimensionMismatch {
            expected: dimension,
            actual: query.len(),
        });
    }

    let mut hits: Vec<SearchHit> = corpus
        .vectors_and_items()
        .map(|(vector, item)| SearchHit {
            item: Arc::clone(item),
            raw_score: cosine_similarity(query, vector),
        })
        .collect();
    // `sort_by` is stable, which is what keeps ties in insertion order.
    hits.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));
    hits.truncate(k.min(corpus.size()));
    Ok(hits)
}

/// Cosine similarity accumulated in f64; zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x64 = f64::from(x);
        let y64 = f64::from(y);
        dot += x64 * y64;
        norm_a += x64 * x64;
        norm_b += y64 * y64;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

/// Maps a raw cosine in [-1, 1] onto [0, 100], preserving order.
pub fn normalize_score(raw: f64) -> f64 {
    ((raw + 1.0) / 2.0) * 100.0
}
