use thiserror::Error;

/// Errors emitted by code generators.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported feature: {0}")]
    Unsupported(String),
    #[error("generation failed: {0}")]
    Failed(String),
}
