//! Regional hot-topic boards (Baidu realtime board).
//!
//! Two JSON endpoints are tried in order. Their payloads nest cards inside
//! `content`/`items`/`list`/`data` containers to an arbitrary depth and
//! name the title field inconsistently, so extraction works on untyped
//! [`serde_json::Value`]s: flatten the containers, then probe a
//! prioritised list of title keys on each card (and one level below it).
//! If neither endpoint yields anything, the HTML board page is scanned
//! with two regex patterns. The patterns are brittle and track the page
//! markup; they live behind this adapter only.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use super::{char_len, clean, parse_json, QuerySource, SourceContext};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::types::{Query, SourceKind};

/// JSON board endpoints, tried in order.
pub const BOARD_API_URLS: [&str; 2] = [
    "https://top.baidu.com/api/board?platform=wise&tab=realtime",
    "https://top.baidu.com/api/board?tab=realtime",
];
/// HTML board page used when both JSON endpoints come back empty.
pub const BOARD_PAGE_URL: &str = "https://top.baidu.com/board?tab=realtime";

/// Maximum number of topics taken per fetch.
pub const MAX_TOPICS: usize = 50;

/// Fields that wrap nested cards rather than carrying a title.
const CONTAINER_KEYS: [&str; 4] = ["content", "items", "list", "data"];

/// Title-bearing fields, most specific first.
const TITLE_KEYS: [&str; 12] = [
    "query",
    "word",
    "keyword",
    "title",
    "name",
    "raw_title",
    "display_name",
    "show",
    "topic",
    "hotWord",
    "hotWordShort",
    "desc",
];

const MIN_TOPIC: usize = 2;
const MAX_TOPIC: usize = 100;

/// Guard against pathological nesting.
const MAX_DEPTH: usize = 32;

const BOARD_PATTERNS: [&str; 2] = [
    r#"<div class="c-single-text-ellipsis">\s*([^<]+?)\s*</div>"#,
    r#""word"\s*:\s*"([^"]+)""#,
];

/// Regional hot-topics adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotTopicsSource;

impl QuerySource for HotTopicsSource {
    async fn fetch<T: HttpTransport>(&self, ctx: SourceContext<'_, T>) -> Result<Vec<Query>> {
        for endpoint in BOARD_API_URLS {
            let request = ctx
                .request(endpoint)
                .header("Referer", "https://top.baidu.com/")
                .header("Accept-Language", "zh-CN,zh;q=0.9");
            match ctx.send(&request).await.and_then(|body| parse_board_json(&body)) {
                Ok(topics) if !topics.is_empty() => return Ok(topics),
                Ok(_) => tracing::debug!(endpoint, "board endpoint returned no topics"),
                Err(err) => tracing::debug!(endpoint, error = %err, "board endpoint failed"),
            }
        }

        let html = ctx.get_text(BOARD_PAGE_URL).await?;
        Ok(parse_board_html(&html))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HotTopics
    }
}

/// Extract topic titles from a JSON board payload.
///
/// Starts at `data.cards` when present, otherwise at the root.
pub(crate) fn parse_board_json(body: &str) -> Result<Vec<Query>> {
    let value = parse_json(SourceKind::HotTopics, body)?;
    let root = value.pointer("/data/cards").unwrap_or(&value);

    let mut cards = Vec::new();
    flatten_cards(root, &mut cards, 0);

    let mut seen = HashSet::new();
    let topics = cards
        .into_iter()
        .filter_map(card_title)
        .filter(|title| seen.insert(title.clone()))
        .take(MAX_TOPICS)
        .collect();
    Ok(topics)
}

/// Collect cards: objects that carry a title field, plus objects whose
/// containers yield no cards of their own.
fn flatten_cards<'a>(value: &'a Value, out: &mut Vec<&'a Value>, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_cards(item, out, depth + 1);
            }
        }
        Value::Object(map) => {
            let before = out.len();
            let titled = TITLE_KEYS
                .iter()
                .any(|key| map.get(*key).is_some_and(Value::is_string));
            if titled {
                out.push(value);
            }
            for key in CONTAINER_KEYS {
                if let Some(inner) = map.get(key).filter(|v| v.is_array() || v.is_object()) {
                    flatten_cards(inner, out, depth + 1);
                }
            }
            if out.len() == before {
                out.push(value);
            }
        }
        _ => {}
    }
}

/// First acceptable title on the card, else on any object directly below it.
fn card_title(card: &Value) -> Option<Query> {
    probe_title_keys(card).or_else(|| {
        card.as_object()?
            .values()
            .filter(|inner| inner.is_object())
            .find_map(probe_title_keys)
    })
}

fn probe_title_keys(value: &Value) -> Option<Query> {
    TITLE_KEYS.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(clean)
            .filter(|title| accept_topic(title))
    })
}

/// Length within bounds and not a link.
pub(crate) fn accept_topic(topic: &str) -> bool {
    (MIN_TOPIC..=MAX_TOPIC).contains(&char_len(topic)) && !looks_like_url(topic)
}

fn looks_like_url(text: &str) -> bool {
    if text.starts_with("//") || text.starts_with("www.") {
        return true;
    }
    Url::parse(text)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn board_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        BOARD_PATTERNS
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::error!(pattern, error = %err, "invalid board pattern");
                    None
                }
            })
            .collect()
    })
}

/// Scan the HTML board page with both patterns, deduplicating via a set.
pub(crate) fn parse_board_html(html: &str) -> Vec<Query> {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();
    for pattern in board_patterns() {
        for captures in pattern.captures_iter(html) {
            let Some(raw) = captures.get(1) else {
                continue;
            };
            let topic = clean(raw.as_str());
            if accept_topic(&topic) && seen.insert(topic.clone()) {
                topics.push(topic);
                if topics.len() >= MAX_TOPICS {
                    return topics;
                }
            }
        }
    }
    topics
}
