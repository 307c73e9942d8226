//! Aggregator: sequential per-source fetch, cache, dedup, interleave, shuffle.
//!
//! [`engine::QueryEngine`] drives the sources in configured order and owns
//! the per-source cache; [`mix`] holds the pure merge steps.

pub mod engine;
pub mod mix;
