//! Error types for the querymix-engine crate.
//!
//! Transport and parse errors never leave a source adapter: the adapter
//! boundary turns them into an empty result plus a warning. They are still
//! typed so adapters can use `?` internally and tests can assert on them.

/// Errors that can occur while fetching or parsing queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Network failure, timeout, or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response had an unexpected or malformed shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid construction argument that cannot be clamped (e.g. an unknown source name).
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for querymix-engine results.
pub type Result<T> = std::result::Result<T, QueryError>;
