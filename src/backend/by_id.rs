//! Legacy identifier backend: `GET /search_by_id/{id}`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::backend::{RequestBuilder, SearchBackend, SearchError};
use crate::models::{Query, QueryMode, ResultRecord};
use crate::utils::HttpClient;

/// Looks up papers similar to a known arXiv identifier
///
/// Only identifier queries are served and filters are dropped, the
/// endpoint has no way to carry them.
#[derive(Debug, Clone)]
pub struct ByIdBackend {
    client: Arc<HttpClient>,
    requests: RequestBuilder,
}

impl ByIdBackend {
    pub fn new(client: Arc<HttpClient>, requests: RequestBuilder) -> Self {
        Self { client, requests }
    }
}

#[async_trait]
impl SearchBackend for ByIdBackend {
    fn id(&self) -> &str {
        "by_id"
    }

    fn name(&self) -> &str {
        "Search by arXiv ID"
    }

    fn supports(&self, mode: QueryMode) -> bool {
        mode == QueryMode::Id
    }

    async fn search(&self, query: &Query) -> Result<Vec<ResultRecord>, SearchError> {
        let request = self.requests.by_id(query)?;
        if query.is_filtered() {
            tracing::debug!("Dropping filter '{}' for identifier lookup", query.filter);
        }

        tracing::debug!("GET {}", request.url);
        request.send(&self.client).await
    }
}
