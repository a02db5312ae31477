//! Crate-level error type
//!
//! Errors raised while assembling the base layer itself (loading
//! configuration, initializing observability). Request-path failures
//! use [`ApiError`](crate::api::ApiError) instead, which knows how to
//! render itself as a response envelope.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced during setup
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let figment_err = figment::Error::from("missing field".to_string());
        let err = Error::from(figment_err);
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_io_error_display() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(err.to_string().contains("no such file"));
    }
}
