//! News headlines.
//!
//! With an API key the top-headlines API is used. Without one, or when the
//! API path fails or comes back empty, the adapter scrapes the `h2`/`h3`
//! headings of a fixed news homepage instead.

use std::collections::HashSet;
use std::fmt;

use scraper::{Html, Selector};
use serde_json::Value;

use super::{char_len, clean, parse_json, QuerySource, SourceContext};
use crate::error::{QueryError, Result};
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// Environment variable holding the headlines API key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
/// Top-headlines API endpoint.
pub const HEADLINES_API_URL: &str = "https://newsapi.org/v2/top-headlines?country=us&pageSize=20";
/// Homepage scraped when no key is configured.
pub const HOMEPAGE_URL: &str = "https://www.bbc.com/news";

/// Maximum number of headlines taken per fetch.
pub const MAX_HEADLINES: usize = 10;
const MIN_HEADLINE: usize = 10;
const MAX_HEADLINE: usize = 100;

/// News adapter. The API key never appears in logs or `Debug` output.
#[derive(Clone, Default)]
pub struct NewsSource {
    api_key: Option<String>,
}

impl NewsSource {
    /// Adapter using `api_key`; blank keys count as absent.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty()),
        }
    }

    /// Adapter keyed from the `NEWS_API_KEY` environment variable.
    pub fn from_env() -> Self {
        Self::new(std::env::var(NEWS_API_KEY_ENV).ok())
    }

    /// Whether the API path will be attempted.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_api<T: HttpTransport>(
        &self,
        ctx: &SourceContext<'_, T>,
        key: &str,
    ) -> Result<Vec<Query>> {
        let request = ctx.request(HEADLINES_API_URL).header("X-Api-Key", key);
        let body = ctx.send(&request).await?;
        parse_api_headlines(&body)
    }
}

impl fmt::Debug for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsSource")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl QuerySource for NewsSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        if let Some(ref key) = self.api_key {
            match self.fetch_api(&ctx, key).await {
                Ok(headlines) if !headlines.is_empty() => return Ok(headlines),
                Ok(_) => tracing::debug!("headlines API returned nothing, scraping homepage"),
                Err(err) => {
                    tracing::debug!(error = %err, "headlines API failed, scraping homepage")
                }
            }
        }

        let html = ctx.get_text(HOMEPAGE_URL).await?;
        tracing::trace!(bytes = html.len(), "news homepage received");
        parse_homepage_headings(&html)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::News
    }
}

fn headline_fits(headline: &str) -> bool {
    (MIN_HEADLINE..=MAX_HEADLINE).contains(&char_len(headline))
}

/// Extract `articles[].title` from a headlines API response.
pub(crate) fn parse_api_headlines(body: &str) -> Result<Vec<Query>> {
    let value = parse_json(SourceKind::News, body)?;
    if value.get("status").and_then(Value::as_str) == Some("error") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(QueryError::Parse(format!("headlines API error: {message}")));
    }
    let articles = value
        .get("articles")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Parse("headlines response has no articles".into()))?;

    Ok(articles
        .iter()
        .filter_map(|article| article.get("title").and_then(Value::as_str))
        .map(clean)
        .filter(|title| headline_fits(title))
        .take(MAX_HEADLINES)
        .collect())
}

/// Extract distinct `h2`/`h3` heading text from a news homepage.
pub(crate) fn parse_homepage_headings(html: &str) -> Result<Vec<Query>> {
    let document = Html::parse_document(html);
    let heading_sel = Selector::parse("h2, h3")
        .map_err(|e| QueryError::Parse(format!("invalid heading selector: {e:?}")))?;

    let mut seen = HashSet::new();
    let mut headlines = Vec::new();
    for element in document.select(&heading_sel) {
        let text = clean(&element.text().collect::<String>());
        if !headline_fits(&text) || !seen.insert(text.clone()) {
            continue;
        }
        headlines.push(text);
        if headlines.len() >= MAX_HEADLINES {
            break;
        }
    }

    tracing::debug!(count = headlines.len(), "news headings parsed");
    Ok(headlines)
}
