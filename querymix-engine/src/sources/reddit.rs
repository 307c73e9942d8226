//! Reddit "hot" listing of one randomly chosen subreddit.

use rand::seq::SliceRandom;
use serde_json::Value;

use super::{char_len, clean, parse_json, QuerySource, SourceContext};
use crate::error::{QueryError, Result};
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// Subreddits with mostly self-explanatory, search-friendly titles.
pub const SUBREDDITS: &[&str] = &[
    "news",
    "worldnews",
    "technology",
    "science",
    "todayilearned",
    "explainlikeimfive",
    "askscience",
    "futurology",
];

/// Titles must be strictly longer than this many characters.
const MIN_TITLE_EXCLUSIVE: usize = 10;
/// Titles must be strictly shorter than this many characters.
const MAX_TITLE_EXCLUSIVE: usize = 100;

/// Reddit adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedditSource;

impl RedditSource {
    /// Listing URL for `subreddit`.
    pub fn listing_url(subreddit: &str) -> String {
        format!("https://www.reddit.com/r/{subreddit}/hot.json?limit=25")
    }
}

impl QuerySource for RedditSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        let subreddit = SUBREDDITS
            .choose(&mut *ctx.rng)
            .copied()
            .ok_or_else(|| QueryError::Config("no subreddits configured".into()))?;
        tracing::trace!(subreddit, "reddit listing");

        let body = ctx.get_text(&Self::listing_url(subreddit)).await?;
        parse_listing(&body)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Reddit
    }
}

/// Extract `data.children[].data.title`, keeping titles strictly between
/// 10 and 100 characters.
pub(crate) fn parse_listing(body: &str) -> Result<Vec<Query>> {
    let value = parse_json(SourceKind::Reddit, body)?;
    let children = value
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Parse("reddit listing has no data.children".into()))?;

    Ok(children
        .iter()
        .filter_map(|child| child.pointer("/data/title").and_then(Value::as_str))
        .map(clean)
        .filter(|title| {
            let len = char_len(title);
            len > MIN_TITLE_EXCLUSIVE && len < MAX_TITLE_EXCLUSIVE
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{ctx, rng, ScriptedTransport};

    fn listing(titles: &[&str]) -> String {
        let children: Vec<String> = titles
            .iter()
            .map(|t| serde_json::json!({"kind": "t3", "data": {"title": t}}).to_string())
            .collect();
        format!(
            r#"{{"kind":"Listing","data":{{"children":[{}]}}}}"#,
            children.join(",")
        )
    }

    #[test]
    fn keeps_titles_strictly_between_bounds() {
        let exactly_ten = "a".repeat(10);
        let eleven = "b".repeat(11);
        let ninety_nine = "c".repeat(99);
        let exactly_hundred = "d".repeat(100);
        let body = listing(&[
            "short",
            &exactly_ten,
            &eleven,
            &ninety_nine,
            &exactly_hundred,
        ]);

        let titles = parse_listing(&body).expect("parse");
        assert_eq!(titles, vec![eleven, ninety_nine]);
        for title in &titles {
            let len = char_len(title);
            assert!(len > 10 && len < 100, "title out of bounds: {title}");
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 11 characters, 33 bytes.
        let title = "新闻新闻新闻新闻新闻新";
        let titles = parse_listing(&listing(&[title])).expect("parse");
        assert_eq!(titles, vec![title.to_owned()]);
    }

    #[test]
    fn missing_children_is_parse_error() {
        let err = parse_listing(r#"{"message":"Too Many Requests","error":429}"#).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[test]
    fn children_without_titles_are_skipped() {
        let body = r#"{"data":{"children":[{"data":{}},{"data":{"title":"Scientists map the ocean floor"}}]}}"#;
        assert_eq!(
            parse_listing(body).expect("parse"),
            vec!["Scientists map the ocean floor"]
        );
    }

    #[tokio::test]
    async fn fetch_picks_a_listed_subreddit() {
        let body = listing(&["A perfectly reasonable headline"]);
        let http = ScriptedTransport::new().ok("reddit.com/r/", &body);
        let mut rng = rng();
        let titles = RedditSource
            .fetch(ctx(&http, &mut rng, 10))
            .await
            .expect("fetch");
        assert_eq!(titles.len(), 1);

        let urls = http.urls();
        assert_eq!(urls.len(), 1);
        assert!(SUBREDDITS
            .iter()
            .any(|sub| urls[0] == RedditSource::listing_url(sub)));
    }

    #[test]
    fn kind_is_reddit() {
        assert_eq!(RedditSource.kind(), SourceKind::Reddit);
    }
}
