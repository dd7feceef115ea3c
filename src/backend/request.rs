//! Request construction for the search backend endpoints.

use http::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::SearchError;
use crate::models::{decode_hits, Query, QueryMode, ResultRecord};
use crate::query::normalize;
use crate::utils::HttpClient;

/// Unified search endpoint: text or identifier, backend disambiguates
pub const SEARCH_PATH: &str = "search";
/// Unified search followed by a rerank pass
pub const RERANKED_SEARCH_PATH: &str = "reranked_search";
/// Legacy identifier lookup, identifier appended as a path segment
pub const SEARCH_BY_ID_PATH: &str = "search_by_id";

/// Query-string parameter carrying the result limit on GET requests
pub const SEARCH_LIMIT_PARAM: &str = "search_limit";

fn with_optional_limit(query: Query, limit: Option<usize>) -> Query {
    match limit {
        Some(limit) => query.with_limit(limit),
        None => query,
    }
}

/// JSON body of the POST endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBody {
    pub text: String,

    #[serde(default)]
    pub filter: String,

    /// Backend default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_limit: Option<usize>,
}

/// A fully built backend request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<SearchBody>,
}

impl SearchRequest {
    /// Serialized JSON body, if the request has one
    pub fn body_json(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::to_string(body).ok())
    }

    /// Recover the query this request was built from
    ///
    /// POST requests read `text`, `filter` and `search_limit` from the
    /// body; identifier requests decode the last path segment and the
    /// `search_limit` parameter, and carry no filter.
    pub fn parse_query(&self) -> Result<Query, SearchError> {
        match &self.body {
            Some(body) => {
                let query = normalize(&body.text, Some(&body.filter))
                    .ok_or_else(|| SearchError::InvalidRequest("Empty search text".to_string()))?;
                Ok(with_optional_limit(query, body.search_limit))
            }
            None => {
                let segment = self
                    .url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| SearchError::InvalidRequest("Missing identifier".to_string()))?;
                let id = urlencoding::decode(segment)
                    .map_err(|e| SearchError::InvalidRequest(e.to_string()))?;
                let limit = self
                    .url
                    .query_pairs()
                    .find(|(key, _)| *key == SEARCH_LIMIT_PARAM)
                    .map(|(_, value)| value.parse::<usize>())
                    .transpose()
                    .map_err(|e| SearchError::InvalidRequest(format!("search_limit: {}", e)))?;
                Ok(with_optional_limit(Query::id(id.into_owned()), limit))
            }
        }
    }

    /// Send the request and decode the ranked records
    pub async fn send(self, client: &HttpClient) -> Result<Vec<ResultRecord>, SearchError> {
        let mut builder = client.client().request(self.method, self.url);
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(decode_hits(&bytes)?)
    }
}

/// Builds requests against one backend base URL
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    search_limit: Option<usize>,
}

impl RequestBuilder {
    /// Create a builder for `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::InvalidRequest(format!(
                "Base URL cannot carry a path: {}",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            search_limit: None,
        })
    }

    /// Default result limit, used when a query sets none
    pub fn search_limit(mut self, limit: Option<usize>) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /search` with `{text, filter}`
    pub fn unified(&self, query: &Query) -> Result<SearchRequest, SearchError> {
        self.post(SEARCH_PATH, query)
    }

    /// `POST /reranked_search` with `{text, filter}`
    pub fn reranked(&self, query: &Query) -> Result<SearchRequest, SearchError> {
        self.post(RERANKED_SEARCH_PATH, query)
    }

    /// `GET /search_by_id/{id}`
    ///
    /// The identifier is percent-encoded as one path segment, so `/`, `?`
    /// and `#` in user input cannot change the route. `.` and `..` would be
    /// resolved as dot segments and are rejected. Filters are not supported
    /// by this endpoint.
    pub fn by_id(&self, query: &Query) -> Result<SearchRequest, SearchError> {
        if query.mode != QueryMode::Id {
            return Err(SearchError::InvalidRequest(format!(
                "Identifier lookup needs an arXiv ID, got text: {}",
                query.value
            )));
        }
        if matches!(query.value.as_str(), "." | "..") {
            return Err(SearchError::InvalidRequest(format!(
                "Not an arXiv ID: {}",
                query.value
            )));
        }
        let mut url = self.endpoint(&[SEARCH_BY_ID_PATH, &query.value])?;
        if let Some(limit) = self.limit_for(query) {
            url.query_pairs_mut()
                .append_pair(SEARCH_LIMIT_PARAM, &limit.to_string());
        }
        Ok(SearchRequest {
            method: Method::GET,
            url,
            body: None,
        })
    }

    fn post(&self, path: &str, query: &Query) -> Result<SearchRequest, SearchError> {
        Ok(SearchRequest {
            method: Method::POST,
            url: self.endpoint(&[path])?,
            body: Some(SearchBody {
                text: query.value.clone(),
                filter: query.filter.clone(),
                search_limit: self.limit_for(query),
            }),
        })
    }

    fn limit_for(&self, query: &Query) -> Option<usize> {
        query.limit.or(self.search_limit)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| SearchError::InvalidRequest("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
