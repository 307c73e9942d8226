//! Error types for the querymix host.

use querymix_engine::QueryError;

/// Top-level error type for the host application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Query engine error.
    #[error("engine error: {0}")]
    Engine(#[from] QueryError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn engine_errors_convert() {
        let err: AppError = QueryError::Config("unknown source: bing".into()).into();
        assert_eq!(
            err.to_string(),
            "engine error: config error: unknown source: bing"
        );
    }
}
