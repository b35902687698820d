use thiserror::Error;

use crate::document::ParseError;

/// Core error type shared across Schemaloom crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The document text could not be parsed.
    #[error("malformed document: {0}")]
    Parse(#[from] ParseError),
    /// The document parsed but does not describe a project.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// A foreign key names a column that does not exist.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
    /// The project violates internal invariants.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
}

/// Convenience alias for results returned by Schemaloom crates.
pub type Result<T> = std::result::Result<T, Error>;
