//! HTTP transport: request description, the pluggable [`HttpTransport`]
//! trait, and the production [`ReqwestTransport`].
//!
//! Adapters describe what they want with an [`HttpRequest`] and get raw
//! response text back. Network failures never reach parsing code as
//! anything but a [`QueryError::Transport`]. There are no retries here;
//! a failed request is simply an empty source for that call.

use std::future::Future;
use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::{QueryError, Result};

/// Generic desktop browser User-Agent sent when nothing else is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Logged error messages are cut to this many characters.
const LOG_MESSAGE_LIMIT: usize = 200;

/// HTTP method of an [`HttpRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// A transport-agnostic HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// A GET request with the default User-Agent and a 10 s timeout.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: vec![("User-Agent".to_owned(), DEFAULT_USER_AGENT.to_owned())],
            body: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// A POST request carrying `body`, otherwise identical to [`HttpRequest::get`].
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body.into()),
            ..Self::get(url)
        }
    }

    /// Set a header, replacing any existing header with the same name
    /// (compared case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Something that can execute an [`HttpRequest`] and return the body as text.
///
/// The engine is generic over this trait so tests can substitute a
/// scripted implementation. Implementations must not retry.
pub trait HttpTransport: Send + Sync {
    /// Perform `request` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] on network failure, timeout, or a
    /// non-success status.
    fn execute(&self, request: &HttpRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with cookie support, gzip/brotli decoding and a
    /// bounded redirect policy. Timeouts are applied per request.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] if the client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| QueryError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn send(&self, request: &HttpRequest) -> Result<String> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, request.url.as_str())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| QueryError::Transport(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| QueryError::Transport(format!("HTTP error: {e}")))?;

        let text = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(format!("response read failed: {e}")))?;

        tracing::trace!(url = %request.url, bytes = text.len(), "response received");
        Ok(text)
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<String> {
        let result = self.send(request).await;
        if let Err(ref err) = result {
            tracing::warn!(
                url = %request.url,
                error = %truncate_message(&err.to_string(), LOG_MESSAGE_LIMIT),
                "HTTP request failed"
            );
        }
        result
    }
}

/// Cut `message` to at most `limit` characters, marking the cut with `…`.
pub(crate) fn truncate_message(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        return message.to_owned();
    }
    let mut cut: String = message.chars().take(limit).collect();
    cut.push('…');
    cut
}
