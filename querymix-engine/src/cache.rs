//! Per-source, time-bounded query cache.
//!
//! Keyed by [`SourceKind`]. Entries are never read at or after their
//! expiry instant, and [`SourceCache::purge_expired`] evicts them lazily;
//! the engine calls it before every source lookup. Time is
//! [`tokio::time::Instant`] so tests can drive expiry with a paused clock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{Query, SourceKind};

/// A cached source result and the instant it stops being fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub queries: Vec<Query>,
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Time-bounded store of per-source results, owned by the engine.
#[derive(Debug)]
pub struct SourceCache {
    ttl: Duration,
    entries: HashMap<SourceKind, CacheEntry>,
}

impl SourceCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Create an empty cache from a freshness window in minutes.
    pub fn with_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// The configured freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh queries for `source`, or `None` on a miss or an expired entry.
    pub fn get(&self, source: SourceKind, now: Instant) -> Option<&[Query]> {
        self.entries
            .get(&source)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.queries.as_slice())
    }

    /// Store `queries` for `source`, fresh until `now + ttl`.
    pub fn insert(&mut self, source: SourceKind, queries: Vec<Query>, now: Instant) {
        let expires_at = now + self.ttl;
        self.entries.insert(
            source,
            CacheEntry {
                queries,
                expires_at,
            },
        );
    }

    /// Evict every entry that is no longer fresh at `now`. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before - self.entries.len()
    }

    /// Drop every entry immediately.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sources holding an entry that is fresh at `now`.
    pub fn fresh_sources(&self, now: Instant) -> Vec<SourceKind> {
        let mut sources: Vec<SourceKind> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_fresh(now))
            .map(|(source, _)| *source)
            .collect();
        sources.sort_by_key(|source| source.name());
        sources
    }

    /// Number of stored entries, fresh or not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
