//! Curated local query list.
//!
//! Used as a regular source and as the last-resort substitute when every
//! configured source comes back empty. Cannot fail.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{QuerySource, SourceContext};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// Everyday, topic-neutral search phrases.
pub const CURATED_QUERIES: &[&str] = &[
    "weather forecast this weekend",
    "easy dinner recipes",
    "how to make sourdough bread",
    "best hiking trails nearby",
    "latest technology news",
    "how does photosynthesis work",
    "tips for better sleep",
    "history of the roman empire",
    "beginner guitar chords",
    "how to start running",
    "healthy breakfast ideas",
    "top rated science fiction books",
    "how to grow tomatoes",
    "learn a new language online",
    "what causes northern lights",
    "home workout without equipment",
    "how to brew pour over coffee",
    "famous paintings in museums",
    "budget travel destinations",
    "how volcanoes form",
    "simple meditation techniques",
    "best board games for families",
    "how to fix a leaky faucet",
    "solar system facts",
    "vegetarian meal prep ideas",
    "how to write a cover letter",
    "classic movies to watch",
    "how do vaccines work",
    "indoor plants that are easy to care for",
    "basic car maintenance tips",
    "history of the internet",
    "how to save money on groceries",
    "national parks to visit",
    "how to improve handwriting",
    "ocean animals facts",
    "stretching routine for back pain",
    "how to take better photos with a phone",
    "origin of the olympic games",
    "quick lunch ideas for work",
    "how rainbows form",
    "beginner chess openings",
    "how to clean a cast iron pan",
    "interesting podcasts to listen to",
    "how bees make honey",
    "tips for working from home",
    "world cup history",
    "how to draw a portrait",
    "bread baking for beginners",
    "why is the sky blue",
    "local farmers market",
];

/// Shuffled slice of up to `count` curated queries.
pub fn sample_curated<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Query> {
    let mut pool: Vec<&str> = CURATED_QUERIES.to_vec();
    pool.shuffle(rng);
    pool.into_iter().take(count).map(str::to_owned).collect()
}

/// Local fallback adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallbackSource;

impl QuerySource for LocalFallbackSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        Ok(sample_curated(ctx.rng, ctx.limit))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LocalFallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{ctx, rng, ScriptedTransport};
    use std::collections::HashSet;

    #[test]
    fn curated_list_is_distinct_and_well_formed() {
        let distinct: HashSet<&str> = CURATED_QUERIES.iter().copied().collect();
        assert_eq!(distinct.len(), CURATED_QUERIES.len());
        for query in CURATED_QUERIES {
            assert_eq!(query.trim(), *query);
            assert!(query.len() >= 3 && query.len() <= 100, "{query}");
        }
    }

    #[test]
    fn sample_returns_distinct_members() {
        let mut rng = rng();
        let sample = sample_curated(&mut rng, 5);
        assert_eq!(sample.len(), 5);
        let distinct: HashSet<&String> = sample.iter().collect();
        assert_eq!(distinct.len(), 5);
        assert!(sample.iter().all(|q| CURATED_QUERIES.contains(&q.as_str())));
    }

    #[test]
    fn sample_is_bounded_by_list_length() {
        let mut rng = rng();
        assert_eq!(
            sample_curated(&mut rng, 10_000).len(),
            CURATED_QUERIES.len()
        );
        assert!(sample_curated(&mut rng, 0).is_empty());
    }

    #[test]
    fn same_seed_same_sample() {
        let a = sample_curated(&mut rng(), 8);
        let b = sample_curated(&mut rng(), 8);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn fetch_never_touches_transport() {
        let http = ScriptedTransport::new();
        let mut rng = rng();
        let queries = LocalFallbackSource
            .fetch(ctx(&http, &mut rng, 3))
            .await
            .expect("local source cannot fail");
        assert_eq!(queries.len(), 3);
        assert!(http.urls().is_empty());
    }
}
