use providers::ProviderError;
use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// Corpus and live-provider faults never appear here at request time: they
/// degrade to empty results. What remains are faults of the query itself or
/// of the configuration.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The query text is empty or whitespace-only.
    #[error("query text is empty or whitespace-only")]
    EmptyQuery,

    /// The encoder produced no usable vector for the input.
    #[error("failed to encode query: {0}")]
    Encoding(String),

    /// Query vector and corpus vectors live in different spaces.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The corpus was embedded with another model than the query encoder.
    #[error("embedding model mismatch: encoder uses {expected}, corpus built with {actual}")]
    ModelMismatch { expected: String, actual: String },

    /// Precomputed vectors are missing or unreadable.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("embedding provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            MatchError::EmptyQuery.to_string(),
            "query text is empty or whitespace-only"
        );
        let err = MatchError::DimensionMismatch {
            expected: 384,
            actual: 3,
        };
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn provider_errors_convert() {
        let err: MatchError = ProviderError::UnknownProvider("x".into()).into();
        assert!(matches!(err, MatchError::Provider(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchError>();
    }
}
