//! Display fragments: the markup that replaces the results region.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::models::ResultRecord;
use crate::query::similar_link;
use crate::utils::truncate_chars;

/// Appended to every abstract preview, even when nothing was cut
pub const ELLIPSIS: &str = "...";

/// One rendered result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub authors: String,
    /// "Jan 2024"
    pub date: String,
    /// Truncated abstract, always ending in [`ELLIPSIS`]
    pub abstract_preview: String,
    pub categories: Vec<String>,
    /// PDF link, if the record has one
    pub pdf: Option<String>,
    /// Distance to the query, three decimals
    pub similarity: Option<String>,
    /// Deep-link query string for "search similar"
    pub similar_link: String,
}

impl ResultCard {
    /// Build a card from a record
    ///
    /// `filter` is carried into the "search similar" link so the follow-up
    /// search keeps the active year filter.
    pub fn from_record(record: &ResultRecord, filter: &str, abstract_chars: usize) -> Self {
        let preview = truncate_chars(record.abstract_text.trim(), abstract_chars);

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            url: record.url.clone(),
            authors: record.author_line(),
            date: record.date_label(),
            abstract_preview: format!("{}{}", preview, ELLIPSIS),
            categories: record.categories.clone(),
            pdf: record.pdf.clone().filter(|pdf| !pdf.trim().is_empty()),
            similarity: record.distance.map(|d| format!("{:.3}", d)),
            similar_link: similar_link(&record.id, filter),
        }
    }

    pub fn to_html(&self) -> String {
        let tags: String = self
            .categories
            .iter()
            .map(|c| format!(r#"<span class="tag">{}</span>"#, encode_text(c)))
            .collect();
        let pdf = self
            .pdf
            .as_deref()
            .map(|pdf| {
                format!(
                    r#"<a class="pdf" href="{}" target="_blank" rel="noopener">PDF</a>"#,
                    encode_double_quoted_attribute(safe_href(pdf))
                )
            })
            .unwrap_or_default();
        let similarity = self
            .similarity
            .as_deref()
            .map(|s| format!(r#"<p class="similarity">Similarity: {}</p>"#, encode_text(s)))
            .unwrap_or_default();

        format!(
            concat!(
                r#"<article class="result">"#,
                r#"<h3 class="title"><a href="{href}" target="_blank" rel="noopener">{title}</a></h3>"#,
                r#"<p class="arxiv-id">{id}</p>"#,
                r#"<p class="authors">{authors}</p>"#,
                r#"<p class="date">{date}</p>"#,
                r#"<p class="abstract">{abstract_preview}</p>"#,
                r#"<div class="categories">{tags}</div>"#,
                "{similarity}",
                "{pdf}",
                r#"<a class="similar" href="{similar}">Search similar</a>"#,
                "</article>"
            ),
            href = encode_double_quoted_attribute(safe_href(&self.url)),
            title = encode_text(&self.title),
            id = encode_text(&self.id),
            authors = encode_text(&self.authors),
            date = encode_text(&self.date),
            abstract_preview = encode_text(&self.abstract_preview),
            tags = tags,
            similarity = similarity,
            pdf = pdf,
            similar = encode_double_quoted_attribute(&self.similar_link),
        )
    }
}

/// Only http(s) links are emitted; anything else becomes an inert `#`
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url
    } else {
        "#"
    }
}

/// Content of the results region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum DisplayFragment {
    /// Loading placeholder
    Loading,
    /// Plain-text error message
    Error(String),
    /// One card per record, in rank order (may be empty)
    Results(Vec<ResultCard>),
}

impl DisplayFragment {
    /// Cards of a results fragment, empty otherwise
    pub fn cards(&self) -> &[ResultCard] {
        match self {
            DisplayFragment::Results(cards) => cards,
            _ => &[],
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            DisplayFragment::Loading => {
                r#"<div class="loading" role="status">Searching...</div>"#.to_string()
            }
            DisplayFragment::Error(message) => {
                format!(r#"<p class="error">{}</p>"#, encode_text(message))
            }
            DisplayFragment::Results(cards) if cards.is_empty() => {
                r#"<p class="no-results">No results found.</p>"#.to_string()
            }
            DisplayFragment::Results(cards) => cards.iter().map(ResultCard::to_html).collect(),
        }
    }
}
