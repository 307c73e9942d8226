//! Google Trends daily trending searches.
//!
//! The endpoint answers with JSON behind an anti-hijacking prefix
//! (`)]}',`) that has to be stripped before parsing.

use serde_json::Value;

use super::{char_len, clean, parse_json, QuerySource, SourceContext};
use crate::error::{QueryError, Result};
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// Daily trends endpoint (US, English).
pub const DAILY_TRENDS_URL: &str =
    "https://trends.google.com/trends/api/dailytrends?hl=en-US&tz=-480&geo=US&ns=15";

/// Maximum number of trending searches taken per fetch.
pub const MAX_TRENDS: usize = 20;

const MIN_QUERY: usize = 3;
const MAX_QUERY: usize = 100;

const XSSI_PREFIX: &str = ")]}'";

/// Google Trends adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendsSource;

impl QuerySource for TrendsSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        let body = ctx.get_text(DAILY_TRENDS_URL).await?;
        tracing::trace!(bytes = body.len(), "trends response received");
        parse_daily_trends(&body)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::GoogleTrends
    }
}

/// Remove the `)]}'` prefix and the comma that usually follows it.
pub(crate) fn strip_xssi_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    match trimmed.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.trim_start().trim_start_matches(','),
        None => trimmed,
    }
}

/// Walk `default.trendingSearchesDays[].trendingSearches[].title.query`,
/// keeping queries of 3 to 100 characters.
pub(crate) fn parse_daily_trends(body: &str) -> Result<Vec<Query>> {
    let value = parse_json(SourceKind::GoogleTrends, strip_xssi_prefix(body))?;
    let days = value
        .pointer("/default/trendingSearchesDays")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Parse("trends payload has no trendingSearchesDays".into()))?;

    let queries = days
        .iter()
        .filter_map(|day| day.get("trendingSearches").and_then(Value::as_array))
        .flatten()
        .filter_map(|search| search.pointer("/title/query").and_then(Value::as_str))
        .map(clean)
        .filter(|query| (MIN_QUERY..=MAX_QUERY).contains(&char_len(query)))
        .take(MAX_TRENDS)
        .collect();
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{ctx, rng, ScriptedTransport};

    const FIXTURE: &str = r#")]}',
{"default":{"trendingSearchesDays":[
  {"date":"20261019","trendingSearches":[
    {"title":{"query":"world series"},"formattedTraffic":"500K+"},
    {"title":{"query":"  hurricane   update "}},
    {"title":{"exploreLink":"/trends/explore"}},
    {"title":{"query":""}}
  ]},
  {"date":"20261018","trendingSearches":[
    {"title":{"query":"election results"}}
  ]}
]}}"#;

    #[test]
    fn strips_prefix_and_comma() {
        assert_eq!(strip_xssi_prefix(")]}',\n{\"a\":1}"), "\n{\"a\":1}");
        assert_eq!(strip_xssi_prefix("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn parses_queries_across_days() {
        let queries = parse_daily_trends(FIXTURE).expect("fixture should parse");
        assert_eq!(
            queries,
            vec!["world series", "hurricane update", "election results"]
        );
    }

    #[test]
    fn parses_without_prefix() {
        let body = r#"{"default":{"trendingSearchesDays":[{"trendingSearches":[{"title":{"query":"rust"}}]}]}}"#;
        assert_eq!(parse_daily_trends(body).expect("parse"), vec!["rust"]);
    }

    #[test]
    fn caps_at_twenty() {
        let searches: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"title":{{"query":"trend {i}"}}}}"#))
            .collect();
        let body = format!(
            r#"{{"default":{{"trendingSearchesDays":[{{"trendingSearches":[{}]}}]}}}}"#,
            searches.join(",")
        );
        let queries = parse_daily_trends(&body).expect("parse");
        assert_eq!(queries.len(), MAX_TRENDS);
        assert_eq!(queries[0], "trend 0");
    }

    #[test]
    fn out_of_range_queries_are_dropped() {
        let long = "a".repeat(101);
        let body = format!(
            r#"{{"default":{{"trendingSearchesDays":[{{"trendingSearches":[
                {{"title":{{"query":"ai"}}}},
                {{"title":{{"query":"{long}"}}}},
                {{"title":{{"query":"nba"}}}},
                {{"title":{{"query":"{edge}"}}}}
            ]}}]}}}}"#,
            edge = "b".repeat(100)
        );
        let queries = parse_daily_trends(&body).expect("parse");
        assert_eq!(queries, vec!["nba".to_owned(), "b".repeat(100)]);
    }

    #[test]
    fn missing_days_is_parse_error() {
        let err = parse_daily_trends(r#"{"default":{}}"#).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[test]
    fn html_body_is_parse_error() {
        let err = parse_daily_trends("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_requests_daily_trends() {
        let http = ScriptedTransport::new().ok("trends.google.com", FIXTURE);
        let mut rng = rng();
        let queries = TrendsSource
            .fetch(ctx(&http, &mut rng, 10))
            .await
            .expect("fetch");
        assert_eq!(queries.len(), 3);
        assert_eq!(http.urls(), vec![DAILY_TRENDS_URL.to_owned()]);
    }

    #[test]
    fn kind_is_google_trends() {
        assert_eq!(TrendsSource.kind(), SourceKind::GoogleTrends);
    }
}
