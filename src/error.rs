use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding generation failed: {0}")]
    EmbeddingError(String),

    #[error("Vector search failed: {0}")]
    SearchError(String),

    #[error("Completion call failed: {0}")]
    CompletionError(String),

    #[error("Filter resolution failed: {0}")]
    FilterError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
