//! Source adapters.
//!
//! Each module provides a struct implementing [`QuerySource`] that builds
//! one source's request(s) and flattens the response into a list of
//! queries. Parsing lives in plain functions so it can be tested against
//! fixture payloads without a transport.
//!
//! The aggregator never calls an adapter directly; it goes through
//! [`SourceSet::fetch_or_empty`], which turns every error into an empty
//! list plus a log event.

use std::future::Future;
use std::time::Duration;

use rand::RngCore;
use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::http::{HttpRequest, HttpTransport};
use crate::log::{LogLevel, Reporter};
use crate::types::{Query, SourceKind};

pub mod hot_topics;
pub mod local;
pub mod news;
pub mod reddit;
pub mod trends;
pub mod wikipedia;

pub use hot_topics::HotTopicsSource;
pub use local::LocalFallbackSource;
pub use news::NewsSource;
pub use reddit::RedditSource;
pub use trends::TrendsSource;
pub use wikipedia::WikipediaSource;

/// Randomness handed to adapters and the aggregator.
///
/// `Sync` because adapters hold `&SourceContext` across awaits and the
/// resulting futures must stay `Send`.
pub type SharedRng = dyn RngCore + Send + Sync;

/// Everything an adapter may use during one fetch.
pub struct SourceContext<'a, T> {
    /// Transport used for every request.
    pub http: &'a T,
    /// Randomness for adapters that pick or shuffle.
    pub rng: &'a mut SharedRng,
    /// How many queries the caller will keep from this source.
    pub limit: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent override; `None` keeps the transport default.
    pub user_agent: Option<&'a str>,
}

impl<T: HttpTransport> SourceContext<'_, T> {
    /// A GET request to `url` with this context's timeout and User-Agent.
    pub fn request(&self, url: &str) -> HttpRequest {
        let request = HttpRequest::get(url).timeout(self.timeout);
        match self.user_agent {
            Some(ua) => request.header("User-Agent", ua),
            None => request,
        }
    }

    /// Execute `request` through the context's transport.
    pub async fn send(&self, request: &HttpRequest) -> Result<String> {
        self.http.execute(request).await
    }

    /// Shorthand for a plain GET of `url`.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.send(&self.request(url)).await
    }
}

/// A pluggable query source.
///
/// Implementors handle their own URL construction, request headers, and
/// response parsing. Errors are returned, not swallowed; swallowing is the
/// job of [`SourceSet::fetch_or_empty`].
pub trait QuerySource: Send + Sync {
    /// Fetch and parse this source's current queries.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] when the source is unreachable and
    /// [`QueryError::Parse`] when its response has an unexpected shape.
    fn fetch<T: HttpTransport>(
        &self,
        ctx: SourceContext<'_, T>,
    ) -> impl Future<Output = Result<Vec<Query>>> + Send;

    /// Which [`SourceKind`] this implementation represents.
    fn kind(&self) -> SourceKind;
}

/// One instance of every adapter, dispatched by [`SourceKind`].
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub trends: TrendsSource,
    pub reddit: RedditSource,
    pub news: NewsSource,
    pub hot_topics: HotTopicsSource,
    pub wikipedia: WikipediaSource,
    pub local: LocalFallbackSource,
}

impl SourceSet {
    /// Fetch `kind` through its adapter, propagating errors.
    ///
    /// # Errors
    ///
    /// Whatever the adapter returns.
    pub async fn fetch<T: HttpTransport>(
        &self,
        kind: SourceKind,
        ctx: SourceContext<'_, T>,
    ) -> Result<Vec<Query>> {
        match kind {
            SourceKind::GoogleTrends => run(&self.trends, ctx).await,
            SourceKind::Reddit => run(&self.reddit, ctx).await,
            SourceKind::News => run(&self.news, ctx).await,
            SourceKind::HotTopics => run(&self.hot_topics, ctx).await,
            SourceKind::Wikipedia => run(&self.wikipedia, ctx).await,
            SourceKind::LocalFallback => run(&self.local, ctx).await,
        }
    }

    /// Fetch `kind`, converting any failure into an empty list plus a log
    /// event at [`failure_level`].
    pub(crate) async fn fetch_or_empty<T: HttpTransport>(
        &self,
        kind: SourceKind,
        ctx: SourceContext<'_, T>,
        reporter: &Reporter,
    ) -> Vec<Query> {
        match self.fetch(kind, ctx).await {
            Ok(queries) => queries,
            Err(err) => {
                let message = format!("fetch failed: {err}");
                reporter.emit(failure_level(&err), kind.name(), &message);
                Vec::new()
            }
        }
    }
}

async fn run<S: QuerySource, T: HttpTransport>(
    source: &S,
    ctx: SourceContext<'_, T>,
) -> Result<Vec<Query>> {
    let kind = source.kind();
    let queries = source.fetch(ctx).await?;
    tracing::debug!(source = %kind, count = queries.len(), "source fetched");
    Ok(queries)
}

/// Unreachable or malformed sources are expected and only warn; a `Config`
/// error means the adapter itself is misbuilt.
pub(crate) fn failure_level(err: &QueryError) -> LogLevel {
    match err {
        QueryError::Transport(_) | QueryError::Parse(_) => LogLevel::Warn,
        QueryError::Config(_) => LogLevel::Error,
    }
}

/// Trim and collapse internal whitespace.
pub(crate) fn clean(raw: &str) -> Query {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length of `text` in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Parse a response body as untyped JSON.
pub(crate) fn parse_json(source: SourceKind, body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| QueryError::Parse(format!("{source} returned invalid JSON: {e}")))
}


#[cfg(test)]
mod tests {
    use super::test_support::{ctx, rng, ScriptedTransport};
    use super::*;

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean("  breaking\n\t news  today "), "breaking news today");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn char_len_counts_characters() {
        assert_eq!(char_len("示例"), 2);
        assert_eq!(char_len("abc"), 3);
    }

    #[test]
    fn parse_json_reports_source() {
        let err = parse_json(SourceKind::Reddit, "<html>").unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
        assert!(err.to_string().contains("reddit"));
    }

    #[test]
    fn context_request_applies_timeout_and_user_agent() {
        let http = ScriptedTransport::new();
        let mut rng = rng();
        let mut context = ctx(&http, &mut rng, 5);
        context.user_agent = Some("TestBot/1.0");
        let request = context.request("https://example.com");
        assert_eq!(request.timeout, Duration::from_secs(1));
        assert_eq!(request.header_value("user-agent"), Some("TestBot/1.0"));
    }

    #[tokio::test]
    async fn fetch_or_empty_swallows_errors() {
        let http = ScriptedTransport::new().fail("reddit.com");
        let mut rng = rng();
        let sources = SourceSet::default();
        let queries = sources
            .fetch_or_empty(SourceKind::Reddit, ctx(&http, &mut rng, 10), &Reporter::default())
            .await;
        assert!(queries.is_empty());
        assert_eq!(http.urls().len(), 1);
    }

    #[test]
    fn only_config_failures_are_errors() {
        assert_eq!(
            failure_level(&QueryError::Transport("HTTP error: 503".into())),
            LogLevel::Warn
        );
        assert_eq!(
            failure_level(&QueryError::Parse("no data.children".into())),
            LogLevel::Warn
        );
        assert_eq!(
            failure_level(&QueryError::Config("no subreddits configured".into())),
            LogLevel::Error
        );
    }

    #[tokio::test]
    async fn failed_fetch_reaches_sink_as_warning() {
        use std::sync::{Arc, Mutex};

        let events: Arc<Mutex<Vec<(String, LogLevel)>>> = Arc::default();
        let captured = Arc::clone(&events);
        let sink: Arc<dyn crate::log::LogSink> =
            Arc::new(move |source: &str, _message: &str, level: LogLevel| {
                if let Ok(mut events) = captured.lock() {
                    events.push((source.to_owned(), level));
                }
            });
        let reporter = Reporter::new(Some(sink));

        let http = ScriptedTransport::new().fail("trends.google.com");
        let mut rng = rng();
        let queries = SourceSet::default()
            .fetch_or_empty(SourceKind::GoogleTrends, ctx(&http, &mut rng, 10), &reporter)
            .await;
        assert!(queries.is_empty());
        assert_eq!(
            events.lock().expect("lock").as_slice(),
            &[("google-trends".to_owned(), LogLevel::Warn)]
        );
    }

    #[test]
    fn every_adapter_reports_its_kind() {
        let sources = SourceSet::default();
        assert_eq!(sources.trends.kind(), SourceKind::GoogleTrends);
        assert_eq!(sources.reddit.kind(), SourceKind::Reddit);
        assert_eq!(sources.news.kind(), SourceKind::News);
        assert_eq!(sources.hot_topics.kind(), SourceKind::HotTopics);
        assert_eq!(sources.wikipedia.kind(), SourceKind::Wikipedia);
        assert_eq!(sources.local.kind(), SourceKind::LocalFallback);
    }

    #[tokio::test]
    async fn fetch_propagates_errors() {
        let http = ScriptedTransport::new();
        let mut rng = rng();
        let sources = SourceSet::default();
        let result = sources
            .fetch(SourceKind::Wikipedia, ctx(&http, &mut rng, 10))
            .await;
        assert!(matches!(result, Err(QueryError::Transport(_))));
    }

    #[tokio::test]
    async fn local_source_needs_no_transport() {
        let http = ScriptedTransport::new();
        let mut rng = rng();
        let sources = SourceSet::default();
        let queries = sources
            .fetch_or_empty(
                SourceKind::LocalFallback,
                ctx(&http, &mut rng, 4),
                &Reporter::default(),
            )
            .await;
        assert_eq!(queries.len(), 4);
        assert!(http.urls().is_empty());
    }
}
