//! Query model: one normalized search intent.

use serde::{Deserialize, Serialize};

/// How the query value should be interpreted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Free-form text (an abstract or a paper description)
    Text,
    /// An arXiv identifier
    Id,
}

impl QueryMode {
    /// Returns the wire/display name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Text => "text",
            QueryMode::Id => "id",
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized search query
///
/// `value` is trimmed and non-empty; construct queries through
/// [`crate::query::normalize`] or [`crate::query::resolve_from_location`]
/// rather than by hand when the input is user-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Interpretation of `value`
    pub mode: QueryMode,

    /// Search text or arXiv identifier
    pub value: String,

    /// Opaque filter expression, empty for no filter
    pub filter: String,

    /// Maximum number of results, backend or configured default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Query {
    /// Create a free-text query with no filter
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Text,
            value: value.into(),
            filter: String::new(),
            limit: None,
        }
    }

    /// Create an identifier query with no filter
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Id,
            value: value.into(),
            filter: String::new(),
            limit: None,
        }
    }

    /// Set the filter expression
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a filter expression is set
    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }
}

/// One entry of the filter selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Human-readable label ("All years", "This year", ...)
    pub label: String,

    /// Backend filter expression, passed through verbatim
    pub expression: String,
}

impl FilterOption {
    /// Create a new filter option
    pub fn new(label: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expression: expression.into(),
        }
    }
}
