//! Unified search backend: `POST /search` (or `/reranked_search`).

use async_trait::async_trait;
use std::sync::Arc;

use crate::backend::{RequestBuilder, SearchBackend, SearchError};
use crate::models::{Query, ResultRecord};
use crate::utils::HttpClient;

/// Sends text and identifier queries alike as `{text, filter}`
#[derive(Debug, Clone)]
pub struct UnifiedBackend {
    client: Arc<HttpClient>,
    requests: RequestBuilder,
    reranked: bool,
}

impl UnifiedBackend {
    /// Backend for `POST /search`
    pub fn new(client: Arc<HttpClient>, requests: RequestBuilder) -> Self {
        Self {
            client,
            requests,
            reranked: false,
        }
    }

    /// Backend for `POST /reranked_search`
    pub fn reranked(client: Arc<HttpClient>, requests: RequestBuilder) -> Self {
        Self {
            client,
            requests,
            reranked: true,
        }
    }
}

#[async_trait]
impl SearchBackend for UnifiedBackend {
    fn id(&self) -> &str {
        if self.reranked {
            "reranked"
        } else {
            "unified"
        }
    }

    fn name(&self) -> &str {
        if self.reranked {
            "Reranked semantic search"
        } else {
            "Semantic search"
        }
    }

    async fn search(&self, query: &Query) -> Result<Vec<ResultRecord>, SearchError> {
        let request = if self.reranked {
            self.requests.reranked(query)?
        } else {
            self.requests.unified(query)?
        };

        tracing::debug!("POST {} ({} query)", request.url, query.mode);
        request.send(&self.client).await
    }
}
