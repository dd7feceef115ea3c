//! Raw input normalization.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Query, QueryMode};

/// Post-2007 identifiers: `2401.07215`, `arXiv:0704.0001v2`
fn modern_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:arxiv:)?(\d{4}\.\d{4,5})(?:v\d+)?$").expect("valid arXiv id regex")
    })
}

/// Pre-2007 identifiers: `hep-th/9901001`, `math.GT/0309136v1`
fn legacy_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:arxiv:)?([a-z-]+(?:\.[a-z]{2})?/\d{2}(?:0[1-9]|1[012])\d{3})(?:v\d+)?$")
            .expect("valid legacy arXiv id regex")
    })
}

/// Extract the bare arXiv identifier when `text` is exactly one identifier
///
/// The `arXiv:` prefix and any version suffix are stripped.
///
/// ```
/// use arxiv_search_client::query::canonical_arxiv_id;
///
/// assert_eq!(canonical_arxiv_id("arXiv:2401.07215v3").as_deref(), Some("2401.07215"));
/// assert_eq!(canonical_arxiv_id("hep-th/9901001").as_deref(), Some("hep-th/9901001"));
/// assert_eq!(canonical_arxiv_id("attention is all you need"), None);
/// ```
pub fn canonical_arxiv_id(text: &str) -> Option<String> {
    let text = text.trim();
    modern_id_pattern()
        .captures(text)
        .or_else(|| legacy_id_pattern().captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Normalize raw user input into a query
///
/// Returns `None` when the trimmed text is empty: no request should be
/// issued and nothing should be shown. Any other text is accepted as-is,
/// semantic validation is left to the backend. The filter selection is
/// passed through unchanged.
pub fn normalize(raw_text: &str, raw_filter: Option<&str>) -> Option<Query> {
    let value = raw_text.trim();
    if value.is_empty() {
        return None;
    }

    let mode = if canonical_arxiv_id(value).is_some() {
        QueryMode::Id
    } else {
        QueryMode::Text
    };

    Some(Query {
        mode,
        value: value.to_string(),
        filter: raw_filter.unwrap_or_default().to_string(),
        limit: None,
    })
}
