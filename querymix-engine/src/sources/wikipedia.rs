//! Random Wikipedia article titles.

use serde_json::Value;
use url::Url;

use super::{char_len, clean, parse_json, QuerySource, SourceContext};
use crate::error::{QueryError, Result};
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// MediaWiki action API.
pub const API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Titles must be strictly longer than this many characters.
const MIN_TITLE_EXCLUSIVE: usize = 3;
/// The random list API refuses more than this for anonymous clients.
const MAX_RANDOM: usize = 50;

/// Wikipedia adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikipediaSource;

impl WikipediaSource {
    /// Random-page request URL for `count` main-namespace titles.
    pub fn random_url(count: usize) -> Result<String> {
        let limit = count.clamp(1, MAX_RANDOM).to_string();
        let url = Url::parse_with_params(
            API_URL,
            &[
                ("action", "query"),
                ("format", "json"),
                ("list", "random"),
                ("rnnamespace", "0"),
                ("rnlimit", limit.as_str()),
            ],
        )
        .map_err(|e| QueryError::Config(format!("invalid Wikipedia URL: {e}")))?;
        Ok(url.into())
    }
}

impl QuerySource for WikipediaSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        let url = Self::random_url(ctx.limit)?;
        let body = ctx.get_text(&url).await?;
        parse_random_titles(&body)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wikipedia
    }
}

/// Extract `query.random[].title`, keeping titles longer than 3 characters.
pub(crate) fn parse_random_titles(body: &str) -> Result<Vec<Query>> {
    let value = parse_json(SourceKind::Wikipedia, body)?;
    let pages = value
        .pointer("/query/random")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Parse("random-page response has no query.random".into()))?;

    Ok(pages
        .iter()
        .filter_map(|page| page.get("title").and_then(Value::as_str))
        .map(clean)
        .filter(|title| char_len(title) > MIN_TITLE_EXCLUSIVE)
        .collect())
}
