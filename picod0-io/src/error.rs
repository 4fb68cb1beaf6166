//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON outside of a line-oriented input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed event record on a given (1-based) input line.
    #[error("invalid event record on line {line}: {source}")]
    InvalidRecord {
        /// Line number in the input.
        line: usize,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] picod0_core::Error),
}

impl From<Error> for picod0_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::CoreError(inner) => inner,
            other => picod0_core::Error::sink(other),
        }
    }
}
