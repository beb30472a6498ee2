use crate::error::{MatchError, Result};
use providers::{EmbeddingProvider, ProviderRegistry};
use std::sync::Arc;
use tracing::debug;

/// Maps text into the corpus embedding space through one shared provider.
///
/// The provider (and whatever model it holds) is built once at startup and only
/// read afterwards; cloning the encoder shares it.
#[derive(Clone)]
pub struct QueryEncoder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
}

impl QueryEncoder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_registry(
        registry: &ProviderRegistry,
        name: Option<&str>,
        model: &str,
    ) -> Result<Self> {
        let provider = registry.embedding(name)?;
        Ok(Self::new(provider, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Encodes one query. Blank text and degenerate vectors are errors, never silent zeros.
    pub async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }
        let resp = self.provider.embed(&[text.to_string()]).await?;
        let vector = resp
            .vectors
            .into_iter()
            .next()
            .ok_or_else(|| MatchError::Encoding("provider returned no vector".into()))?;
        validate(&vector)?;
        debug!("encoded {} chars into {} dims", text.len(), vector.len());
        Ok(vector)
    }
}

fn validate(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(MatchError::Encoding("provider returned an empty vector".into()));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(MatchError::Encoding("vector contains non-finite values".into()));
    }
    if vector.iter().all(|v| *v == 0.0) {
        return Err(MatchError::Encoding(
            "input produced a zero vector; nothing to compare".into(),
        ));
    }
    Ok(())
}
