//! Core types: source identification, queries, and per-call reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// A short, non-empty text phrase suitable for use as a search query.
pub type Query = String;

/// Supported query sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Google Trends daily trending searches.
    GoogleTrends,
    /// Reddit "hot" listing of a randomly chosen subreddit.
    Reddit,
    /// News headlines (API when keyed, homepage scrape otherwise).
    News,
    /// Regional hot-topic boards (Baidu realtime board).
    HotTopics,
    /// Random Wikipedia article titles.
    Wikipedia,
    /// Built-in curated list. Never fails.
    LocalFallback,
}

impl SourceKind {
    /// Returns the stable, kebab-case name used in config files and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleTrends => "google-trends",
            Self::Reddit => "reddit",
            Self::News => "news",
            Self::HotTopics => "hot-topics",
            Self::Wikipedia => "wikipedia",
            Self::LocalFallback => "local-fallback",
        }
    }

    /// Returns all available source variants.
    pub fn all() -> &'static [SourceKind] {
        &[
            Self::GoogleTrends,
            Self::Reddit,
            Self::News,
            Self::HotTopics,
            Self::Wikipedia,
            Self::LocalFallback,
        ]
    }

    /// Sources used when a configuration names none.
    pub fn default_set() -> Vec<SourceKind> {
        Self::all().to_vec()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| QueryError::Config(format!("unknown source `{}`", s.trim())))
    }
}

/// What a single source contributed to one `fetch_queries` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    /// The source this outcome describes.
    pub source: SourceKind,
    /// Number of queries contributed after the per-source cap.
    pub contributed: usize,
    /// Whether the queries were served from the cache.
    pub from_cache: bool,
}

/// Summary of one `fetch_queries_with_report` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    /// One entry per configured source, in configured order.
    pub sources: Vec<SourceOutcome>,
    /// Number of queries returned to the caller.
    pub returned: usize,
    /// Whether every source came back empty and the local list was substituted.
    pub used_fallback: bool,
}

impl FetchReport {
    /// Sources that contributed nothing during this call.
    pub fn empty_sources(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .filter(|outcome| outcome.contributed == 0)
            .map(|outcome| outcome.source)
            .collect()
    }
}
