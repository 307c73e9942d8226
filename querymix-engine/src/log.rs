//! Optional per-engine log sink.
//!
//! Every engine event goes to `tracing`. Callers that want the events as
//! well (a dashboard, a test) install a [`LogSink`]; without one the sink
//! side is a no-op.

use std::fmt;
use std::sync::Arc;

/// Severity passed to a [`LogSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Receives `(source_tag, message, level)` events from the engine.
///
/// Implemented for any `Fn(&str, &str, LogLevel) + Send + Sync` closure.
pub trait LogSink: Send + Sync {
    fn log(&self, source: &str, message: &str, level: LogLevel);
}

impl<F> LogSink for F
where
    F: Fn(&str, &str, LogLevel) + Send + Sync,
{
    fn log(&self, source: &str, message: &str, level: LogLevel) {
        self(source, message, level);
    }
}

/// Fans an event out to `tracing` and, if installed, the caller's sink.
#[derive(Clone, Default)]
pub(crate) struct Reporter {
    sink: Option<Arc<dyn LogSink>>,
}

impl Reporter {
    pub(crate) fn new(sink: Option<Arc<dyn LogSink>>) -> Self {
        Self { sink }
    }

    pub(crate) fn info(&self, source: &str, message: &str) {
        tracing::info!(source, "{message}");
        self.forward(source, message, LogLevel::Info);
    }

    pub(crate) fn warn(&self, source: &str, message: &str) {
        tracing::warn!(source, "{message}");
        self.forward(source, message, LogLevel::Warn);
    }

    pub(crate) fn error(&self, source: &str, message: &str) {
        tracing::error!(source, "{message}");
        self.forward(source, message, LogLevel::Error);
    }

    /// Emit at `level`.
    pub(crate) fn emit(&self, level: LogLevel, source: &str, message: &str) {
        match level {
            LogLevel::Info => self.info(source, message),
            LogLevel::Warn => self.warn(source, message),
            LogLevel::Error => self.error(source, message),
        }
    }

    fn forward(&self, source: &str, message: &str, level: LogLevel) {
        if let Some(ref sink) = self.sink {
            sink.log(source, message, level);
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
