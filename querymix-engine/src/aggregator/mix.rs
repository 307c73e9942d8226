//! Merging per-source results: cross-source deduplication and round-robin
//! interleaving.
//!
//! Both work on per-source buckets in configured order, so the concatenation
//! of the buckets is always the "merged list" and source membership is
//! never lost.

use std::collections::HashSet;

use crate::types::Query;

/// Drop every query already seen in an earlier position, across all buckets.
///
/// After this, concatenating the buckets gives a list with no repeated
/// values, in order of first appearance.
pub fn dedupe_buckets(buckets: &mut [Vec<Query>]) {
    let mut seen: HashSet<Query> = HashSet::new();
    for bucket in buckets.iter_mut() {
        bucket.retain(|query| seen.insert(query.clone()));
    }
}

/// Round-robin over the buckets, one query per bucket per round, until
/// `target` queries are selected or every bucket is exhausted.
///
/// Exhausted buckets are skipped, so a short source never causes a later
/// source to be passed over.
pub fn interleave(buckets: Vec<Vec<Query>>, target: usize) -> Vec<Query> {
    let mut queues: Vec<std::vec::IntoIter<Query>> =
        buckets.into_iter().map(Vec::into_iter).collect();
    let mut selected = Vec::with_capacity(target);

    loop {
        let mut progressed = false;
        for queue in &mut queues {
            if selected.len() >= target {
                return selected;
            }
            if let Some(query) = queue.next() {
                selected.push(query);
                progressed = true;
            }
        }
        if !progressed {
            return selected;
        }
    }
}
