//! The query engine: sequential per-source fetch, cache, merge, shuffle.
//!
//! Sources are consulted one at a time in configured order, each fully
//! awaited before the next. That keeps outbound traffic to third-party
//! sites sequential; cache hits make repeated calls cheap.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::time::Instant;

use super::mix::{dedupe_buckets, interleave};
use crate::cache::SourceCache;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::log::{LogSink, Reporter};
use crate::sources::local::sample_curated;
use crate::sources::{NewsSource, SharedRng, SourceContext, SourceSet};
use crate::types::{FetchReport, Query, SourceKind, SourceOutcome};

/// Largest batch a single call may request.
pub const MAX_BATCH: usize = 200;

/// Tag used for engine-level log events.
const ENGINE_TAG: &str = "engine";

/// Multi-source query engine.
///
/// Owns its cache exclusively; configuration is fixed at construction.
/// Generic over the [`HttpTransport`] so tests can script responses.
pub struct QueryEngine<T = ReqwestTransport> {
    config: EngineConfig,
    http: T,
    sources: SourceSet,
    cache: SourceCache,
    rng: Box<SharedRng>,
    reporter: Reporter,
}

impl QueryEngine<ReqwestTransport> {
    /// Engine backed by the production reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> QueryEngine<T> {
    /// Engine using `http` for every request.
    ///
    /// The configuration is normalised (defaults applied, numbers clamped).
    /// The news adapter is keyed from `NEWS_API_KEY` if set.
    pub fn with_transport(config: EngineConfig, http: T) -> Self {
        let config = config.normalized();
        let cache = SourceCache::with_minutes(config.cache_minutes);
        Self {
            config,
            http,
            sources: SourceSet {
                news: NewsSource::from_env(),
                ..SourceSet::default()
            },
            cache,
            rng: Box::new(StdRng::from_entropy()),
            reporter: Reporter::default(),
        }
    }

    /// Replace the randomness source.
    pub fn with_rng(mut self, rng: Box<SharedRng>) -> Self {
        self.rng = rng;
        self
    }

    /// Use a deterministic RNG seeded with `seed`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Forward log events to `sink` in addition to `tracing`.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.reporter = Reporter::new(Some(sink));
        self
    }

    /// Override the news API key read from the environment.
    pub fn with_news_api_key(mut self, api_key: Option<String>) -> Self {
        self.sources.news = NewsSource::new(api_key);
        self
    }

    /// The normalised configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.http
    }

    /// Produce up to `count` queries (clamped to `[1, 200]`).
    ///
    /// Never fails: unreachable sources are empty for this call, and if
    /// every source is empty the curated local list is returned instead.
    pub async fn fetch_queries(&mut self, count: usize) -> Vec<Query> {
        self.fetch_queries_with_report(count).await.0
    }

    /// Same as [`fetch_queries`](Self::fetch_queries), plus a per-source report.
    pub async fn fetch_queries_with_report(&mut self, count: usize) -> (Vec<Query>, FetchReport) {
        let count = count.clamp(1, MAX_BATCH);
        let per_source = self.config.max_queries_per_source;
        let kinds = self.config.sources.clone();

        let mut buckets: Vec<Vec<Query>> = Vec::with_capacity(kinds.len());
        let mut cache_hits: Vec<bool> = Vec::with_capacity(kinds.len());
        for kind in &kinds {
            let (mut queries, from_cache) = self.collect_source(*kind).await;
            queries.truncate(per_source);
            buckets.push(queries);
            cache_hits.push(from_cache);
        }

        if self.config.deduplicate {
            dedupe_buckets(&mut buckets);
        }

        let mut report = FetchReport {
            sources: kinds
                .iter()
                .zip(&buckets)
                .zip(&cache_hits)
                .map(|((kind, bucket), from_cache)| SourceOutcome {
                    source: *kind,
                    contributed: bucket.len(),
                    from_cache: *from_cache,
                })
                .collect(),
            ..FetchReport::default()
        };

        let mut selected = if self.config.mix_strategies && kinds.len() > 1 {
            interleave(buckets, count)
        } else {
            buckets.concat()
        };
        selected.shuffle(&mut *self.rng);
        selected.truncate(count);

        if selected.is_empty() {
            self.reporter.warn(
                ENGINE_TAG,
                "every source came back empty, using the local fallback list",
            );
            selected = sample_curated(&mut *self.rng, count);
            report.used_fallback = true;
        }

        report.returned = selected.len();
        self.reporter.info(
            ENGINE_TAG,
            &format!(
                "returning {} queries from {} sources",
                selected.len(),
                kinds.len()
            ),
        );
        (selected, report)
    }

    /// Drop every cached source result now.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        tracing::debug!("query cache cleared");
    }

    /// Sources whose cached result is still fresh.
    pub fn cached_sources(&self) -> Vec<SourceKind> {
        self.cache.fresh_sources(Instant::now())
    }

    /// Serve `kind` from the cache or its adapter. Returns the queries and
    /// whether they came from the cache.
    async fn collect_source(&mut self, kind: SourceKind) -> (Vec<Query>, bool) {
        let now = Instant::now();
        let purged = self.cache.purge_expired(now);
        if purged > 0 {
            tracing::debug!(purged, "expired cache entries evicted");
        }

        if let Some(cached) = self.cache.get(kind, now) {
            tracing::debug!(source = %kind, count = cached.len(), "cache hit");
            return (cached.to_vec(), true);
        }

        let ctx = SourceContext {
            http: &self.http,
            rng: &mut *self.rng,
            limit: self.config.max_queries_per_source,
            timeout: Duration::from_millis(self.config.timeout_ms),
            user_agent: self.config.user_agent.as_deref(),
        };
        let queries = self
            .sources
            .fetch_or_empty(kind, ctx, &self.reporter)
            .await;

        if !queries.is_empty() {
            self.cache.insert(kind, queries.clone(), Instant::now());
        }
        (queries, false)
    }
}

impl<T> std::fmt::Debug for QueryEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("config", &self.config)
            .field("sources", &self.sources)
            .field("cache", &self.cache)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}
