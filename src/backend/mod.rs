//! Search backend strategies behind one trait.
//!
//! The controller only sees [`SearchBackend`]. Which endpoint shape is used
//! is a configuration choice ([`BackendStrategy`]):
//!
//! - `unified` (default): `POST /search` with `{text, filter}`; the backend
//!   decides whether the text is an arXiv identifier
//! - `reranked`: `POST /reranked_search`, same shapes, reranked results
//! - `by_id`: legacy `GET /search_by_id/{id}`, identifiers only, no filter
//!   (requires the `legacy-by-id` feature, enabled by default)
//!
//! [`MockBackend`] returns scripted responses for tests.

#[cfg(feature = "legacy-by-id")]
mod by_id;
pub mod mock;
mod request;
mod unified;

#[cfg(feature = "legacy-by-id")]
pub use by_id::ByIdBackend;
pub use mock::MockBackend;
pub use request::{
    RequestBuilder, SearchBody, SearchRequest, RERANKED_SEARCH_PATH, SEARCH_BY_ID_PATH,
    SEARCH_LIMIT_PARAM, SEARCH_PATH,
};
pub use unified::UnifiedBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::models::{Query, QueryMode, ResultRecord};
use crate::utils::HttpClient;

/// A search service the controller can dispatch queries to
#[async_trait]
pub trait SearchBackend: Send + Sync + std::fmt::Debug {
    /// Short identifier (used in logs and configuration)
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Whether this backend can serve queries of `mode`
    fn supports(&self, _mode: QueryMode) -> bool {
        true
    }

    /// Run the query and return records in backend rank order
    async fn search(&self, query: &Query) -> Result<Vec<ResultRecord>, SearchError>;
}

/// Errors that can occur while running a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Network unreachable, DNS failure, connection reset
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("Search failed with HTTP status {status}")]
    Backend { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No response within the configured timeout
    #[error("Search timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The query cannot be expressed for this backend
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::MalformedResponse(error_chain(&err))
        } else {
            SearchError::Transport(error_chain(&err))
        }
    }
}

/// Join an error and its sources into one message
///
/// reqwest's own message only names the URL; the cause (connection
/// refused, DNS failure, TLS error) lives further down the chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::MalformedResponse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for SearchError {
    fn from(err: url::ParseError) -> Self {
        SearchError::InvalidRequest(format!("URL: {}", err))
    }
}

/// Which endpoint shape to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStrategy {
    #[default]
    Unified,
    Reranked,
    ById,
}

impl BackendStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendStrategy::Unified => "unified",
            BackendStrategy::Reranked => "reranked",
            BackendStrategy::ById => "by_id",
        }
    }
}

impl std::str::FromStr for BackendStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unified" => Ok(BackendStrategy::Unified),
            "reranked" => Ok(BackendStrategy::Reranked),
            "by_id" => Ok(BackendStrategy::ById),
            other => Err(SearchError::InvalidRequest(format!(
                "Unknown backend strategy: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BackendStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create the backend selected by `config`
pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn SearchBackend>, SearchError> {
    let client = Arc::new(HttpClient::with_timeout(config.timeout())?);
    let requests = RequestBuilder::new(&config.base_url)?.search_limit(config.search_limit);

    tracing::debug!(
        "Using {} backend at {}",
        config.strategy,
        requests.base_url()
    );

    match config.strategy {
        BackendStrategy::Unified => Ok(Arc::new(UnifiedBackend::new(client, requests))),
        BackendStrategy::Reranked => Ok(Arc::new(UnifiedBackend::reranked(client, requests))),
        #[cfg(feature = "legacy-by-id")]
        BackendStrategy::ById => Ok(Arc::new(ByIdBackend::new(client, requests))),
        #[cfg(not(feature = "legacy-by-id"))]
        BackendStrategy::ById => Err(SearchError::InvalidRequest(
            "by_id strategy requires the legacy-by-id feature".to_string(),
        )),
    }
}
