//! Engine configuration with sensible defaults.
//!
//! [`EngineConfig`] controls which sources are consulted, in which order,
//! how results are merged, and how long per-source results are cached.
//! Out-of-range numbers are clamped by [`EngineConfig::normalized`] rather
//! than rejected.

use serde::{Deserialize, Serialize};

use crate::types::SourceKind;

/// Bounds for `max_queries_per_source`.
pub const PER_SOURCE_RANGE: (usize, usize) = (1, 50);
/// Bounds for `cache_minutes`.
pub const CACHE_MINUTES_RANGE: (u64, u64) = (1, 1440);
/// Bounds for `timeout_ms`.
pub const TIMEOUT_MS_RANGE: (u64, u64) = (1, 120_000);
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for a [`crate::QueryEngine`].
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides. The engine stores the [`normalized`](Self::normalized)
/// form and never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sources to consult, in order. Order sets interleave priority.
    pub sources: Vec<SourceKind>,
    /// Collapse repeated queries to their first occurrence.
    pub deduplicate: bool,
    /// Interleave sources round-robin before the final shuffle.
    pub mix_strategies: bool,
    /// Cap on queries taken from each source per call.
    pub max_queries_per_source: usize,
    /// Freshness window of per-source cache entries.
    pub cache_minutes: u64,
    /// Per-request transport timeout in milliseconds.
    pub timeout_ms: u64,
    /// Custom User-Agent. `None` uses a generic desktop browser string.
    pub user_agent: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sources: SourceKind::default_set(),
            deduplicate: true,
            mix_strategies: true,
            max_queries_per_source: 10,
            cache_minutes: 30,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl EngineConfig {
    /// Returns a copy with defaults applied and numbers clamped.
    ///
    /// - empty `sources` becomes [`SourceKind::default_set`]
    /// - repeated sources are dropped, keeping the first occurrence
    /// - `max_queries_per_source` is clamped to `[1, 50]`
    /// - `cache_minutes` is clamped to `[1, 1440]`
    /// - `timeout_ms` is clamped to `[1, 120000]`
    /// - a blank `user_agent` becomes `None`
    pub fn normalized(&self) -> Self {
        let mut sources: Vec<SourceKind> = Vec::with_capacity(self.sources.len());
        for kind in &self.sources {
            if !sources.contains(kind) {
                sources.push(*kind);
            }
        }
        if sources.is_empty() {
            sources = SourceKind::default_set();
        }

        Self {
            sources,
            deduplicate: self.deduplicate,
            mix_strategies: self.mix_strategies,
            max_queries_per_source: self
                .max_queries_per_source
                .clamp(PER_SOURCE_RANGE.0, PER_SOURCE_RANGE.1),
            cache_minutes: self
                .cache_minutes
                .clamp(CACHE_MINUTES_RANGE.0, CACHE_MINUTES_RANGE.1),
            timeout_ms: self.timeout_ms.clamp(TIMEOUT_MS_RANGE.0, TIMEOUT_MS_RANGE.1),
            user_agent: self
                .user_agent
                .as_deref()
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = EngineConfig::default();
        assert!(config.deduplicate);
        assert!(config.mix_strategies);
        assert_eq!(config.max_queries_per_source, 10);
        assert_eq!(config.cache_minutes, 30);
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.user_agent.is_none());
        assert_eq!(config.sources, SourceKind::default_set());
    }

    #[test]
    fn default_config_is_already_normalized() {
        let config = EngineConfig::default();
        assert_eq!(config.normalized(), config);
    }

    #[test]
    fn empty_sources_get_defaults() {
        let config = EngineConfig {
            sources: vec![],
            ..Default::default()
        };
        assert_eq!(config.normalized().sources, SourceKind::default_set());
    }

    #[test]
    fn repeated_sources_keep_first_occurrence() {
        let config = EngineConfig {
            sources: vec![
                SourceKind::Wikipedia,
                SourceKind::Reddit,
                SourceKind::Wikipedia,
            ],
            ..Default::default()
        };
        assert_eq!(
            config.normalized().sources,
            vec![SourceKind::Wikipedia, SourceKind::Reddit]
        );
    }

    #[test]
    fn per_source_cap_is_clamped() {
        let low = EngineConfig {
            max_queries_per_source: 0,
            ..Default::default()
        };
        let high = EngineConfig {
            max_queries_per_source: 500,
            ..Default::default()
        };
        assert_eq!(low.normalized().max_queries_per_source, 1);
        assert_eq!(high.normalized().max_queries_per_source, 50);
    }

    #[test]
    fn cache_minutes_is_clamped() {
        let low = EngineConfig {
            cache_minutes: 0,
            ..Default::default()
        };
        let high = EngineConfig {
            cache_minutes: 10_000,
            ..Default::default()
        };
        assert_eq!(low.normalized().cache_minutes, 1);
        assert_eq!(high.normalized().cache_minutes, 1440);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = EngineConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.normalized().timeout_ms, 1);
    }

    #[test]
    fn blank_user_agent_becomes_none() {
        let config = EngineConfig {
            user_agent: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.normalized().user_agent.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"sources":["local-fallback"],"cache_minutes":5}"#)
                .expect("deserialize");
        assert_eq!(config.sources, vec![SourceKind::LocalFallback]);
        assert_eq!(config.cache_minutes, 5);
        assert_eq!(config.max_queries_per_source, 10);
        assert!(config.deduplicate);
    }
}
