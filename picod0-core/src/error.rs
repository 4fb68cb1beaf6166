//! Error types for picod0-core.

use thiserror::Error;

/// Result type alias for picod0 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for picod0 operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid cut configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A record or diagnostics sink failed to write, flush or close.
    #[error("sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps any sink-side failure.
    pub fn sink<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Sink(Box::new(err))
    }
}

/// Why a processing cycle was skipped.
///
/// Both reasons are non-fatal: no per-event aggregate or sink state is
/// touched and the next cycle proceeds normally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No event source is attached to the maker.
    #[error("no event source attached")]
    MissingSource,

    /// A source is attached but holds no current event.
    #[error("event source has no current event")]
    MissingEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Config("min_mass >= max_mass".into());
        assert_eq!(err.to_string(), "configuration error: min_mass >= max_mass");

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = Error::sink(io);
        assert!(err.to_string().starts_with("sink error"));
        assert!(std::error::Error::source(&err).is_some());

        assert_eq!(
            SkipReason::MissingSource.to_string(),
            "no event source attached"
        );
    }
}
