//! # querymix-engine
//!
//! Multi-source query diversification: produces a deduplicated, shuffled
//! batch of short search phrases drawn from several independent and
//! unreliable sources.
//!
//! ## Design
//!
//! - One adapter per source: Google Trends, Reddit, news headlines,
//!   regional hot-topic boards, random Wikipedia titles, and a curated
//!   local list
//! - Sources are fetched sequentially, never in parallel
//! - Per-source cache with a configurable freshness window
//! - Cross-source deduplication and round-robin interleaving before the
//!   final shuffle
//! - Graceful degradation: a failing source is empty for that call, and if
//!   every source is empty the curated local list is returned
//!
//! ## Testing seams
//!
//! - [`HttpTransport`] can be replaced with a scripted implementation
//! - the RNG can be replaced or seeded ([`QueryEngine::with_seed`])
//! - an optional [`LogSink`] receives every engine event

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod log;
pub mod sources;
pub mod types;

pub use aggregator::engine::{QueryEngine, MAX_BATCH};
pub use config::EngineConfig;
pub use error::{QueryError, Result};
pub use http::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
pub use log::{LogLevel, LogSink};
pub use sources::{QuerySource, SourceContext};
pub use types::{FetchReport, Query, SourceKind, SourceOutcome};

/// Fetch one batch of queries with a fresh engine.
///
/// Convenience wrapper for one-off use: the engine, and with it the cache,
/// is dropped afterwards. Long-lived callers should keep a [`QueryEngine`].
///
/// # Errors
///
/// Returns [`QueryError::Transport`] only if the HTTP client cannot be
/// built. Source failures never surface here.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> querymix_engine::Result<()> {
/// let queries = querymix_engine::fetch_queries(10, &querymix_engine::EngineConfig::default()).await?;
/// for query in &queries {
///     println!("{query}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_queries(count: usize, config: &EngineConfig) -> Result<Vec<Query>> {
    let mut engine = QueryEngine::new(config.clone())?;
    Ok(engine.fetch_queries(count).await)
}
