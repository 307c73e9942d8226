//! Rendering a batch for stdout.

use querymix_engine::{FetchReport, Query};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::{AppError, Result};

#[derive(Serialize)]
struct JsonBatch<'a> {
    queries: &'a [Query],
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a FetchReport>,
}

/// Render `queries` (and optionally the per-source report) in `format`.
///
/// Plain output is one query per line; the report, when requested, follows
/// as `#`-prefixed summary lines so the query lines stay machine-readable.
///
/// # Errors
///
/// Returns [`AppError::Config`] if JSON serialization fails.
pub fn render(queries: &[Query], report: Option<&FetchReport>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&JsonBatch { queries, report })
            .map_err(|e| AppError::Config(format!("cannot encode batch: {e}"))),
        OutputFormat::Plain => {
            let mut out = String::new();
            for query in queries {
                out.push_str(query);
                out.push('\n');
            }
            if let Some(report) = report {
                for outcome in &report.sources {
                    out.push_str(&format!(
                        "# {}: {}{}\n",
                        outcome.source,
                        outcome.contributed,
                        if outcome.from_cache { " (cached)" } else { "" }
                    ));
                }
                if report.used_fallback {
                    out.push_str("# every source was empty, local fallback used\n");
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querymix_engine::{SourceKind, SourceOutcome};

    fn batch() -> Vec<Query> {
        vec!["world series".to_owned(), "easy dinner recipes".to_owned()]
    }

    fn report() -> FetchReport {
        FetchReport {
            sources: vec![
                SourceOutcome {
                    source: SourceKind::GoogleTrends,
                    contributed: 1,
                    from_cache: true,
                },
                SourceOutcome {
                    source: SourceKind::LocalFallback,
                    contributed: 1,
                    from_cache: false,
                },
            ],
            returned: 2,
            used_fallback: false,
        }
    }

    #[test]
    fn plain_is_one_query_per_line() {
        let out = render(&batch(), None, OutputFormat::Plain).expect("render");
        assert_eq!(out, "world series\neasy dinner recipes\n");
    }

    #[test]
    fn plain_report_lines_are_commented() {
        let out = render(&batch(), Some(&report()), OutputFormat::Plain).expect("render");
        assert!(out.contains("# google-trends: 1 (cached)\n"));
        assert!(out.contains("# local-fallback: 1\n"));
    }

    #[test]
    fn json_contains_queries_and_optional_report() {
        let out = render(&batch(), None, OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["queries"][0], "world series");
        assert!(value.get("report").is_none());

        let out = render(&batch(), Some(&report()), OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["report"]["returned"], 2);
        assert_eq!(value["report"]["sources"][0]["source"], "google-trends");
    }
}
