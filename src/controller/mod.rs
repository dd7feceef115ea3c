//! Search controller: the request lifecycle state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──▶ Success | Failure
//!                   │  ▲                  │
//!                   └──┘ submit           └──submit──▶ Loading
//! ```
//!
//! Every submit takes the next number from a monotonically increasing
//! sequence. A resolution is applied only when its number is still the
//! latest issued; older resolutions are dropped without touching state or
//! view, whatever order responses arrive in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::backend::{build_backend, SearchBackend, SearchError};
use crate::config::Config;
use crate::models::{Query, SearchOutcome};
use crate::query::{normalize, resolve_from_location, similar_link};
use crate::render::{MathTypesetter, ResultRenderer, ResultsView};
use crate::utils::DEFAULT_TIMEOUT;

/// What happened to one submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Nothing was issued (empty input, no deep link, deep link already used)
    Ignored,
    /// A newer submission was issued before this one resolved
    Superseded,
    /// This submission's outcome is now current
    Applied(SearchOutcome),
}

impl Submission {
    /// The applied outcome, if any
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            Submission::Applied(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Current {
    /// Sequence number of the latest issued request, 0 before the first
    issued: u64,
    /// `None` while idle
    outcome: Option<SearchOutcome>,
    /// Filter of the latest issued query
    filter: String,
}

/// Owns the backend and the results region, and drives searches
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    view: Arc<dyn ResultsView>,
    renderer: ResultRenderer,
    timeout: Duration,
    current: Mutex<Current>,
    deep_link_used: AtomicBool,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("backend", &self.backend.id())
            .field("timeout", &self.timeout)
            .field("current", &self.lock())
            .finish()
    }
}

impl SearchController {
    /// Create a controller rendering into `view`
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        view: Arc<dyn ResultsView>,
        renderer: ResultRenderer,
    ) -> Self {
        Self {
            backend,
            view,
            renderer,
            timeout: DEFAULT_TIMEOUT,
            current: Mutex::new(Current::default()),
            deep_link_used: AtomicBool::new(false),
        }
    }

    /// Create a controller with the backend and renderer described by `config`
    pub fn from_config(
        config: &Config,
        view: Arc<dyn ResultsView>,
        typesetter: Arc<dyn MathTypesetter>,
    ) -> Result<Self, SearchError> {
        let backend = build_backend(&config.backend)?;
        let renderer = ResultRenderer::with_config(typesetter, &config.render);
        Ok(Self::new(backend, view, renderer).with_timeout(config.backend.timeout()))
    }

    /// Bound each request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    /// Current outcome, `None` while idle
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.lock().outcome.clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().outcome, Some(SearchOutcome::Pending))
    }

    /// Sequence number of the latest issued request
    pub fn latest_sequence(&self) -> u64 {
        self.lock().issued
    }

    /// Normalize raw input and submit it
    ///
    /// Blank input is a silent no-op: nothing is issued and the results
    /// region is left as it is.
    pub async fn submit_input(&self, raw_text: &str, raw_filter: Option<&str>) -> Submission {
        match normalize(raw_text, raw_filter) {
            Some(query) => self.submit(query).await,
            None => {
                tracing::debug!("Ignoring empty search input");
                Submission::Ignored
            }
        }
    }

    /// Run the deep-link search for this page load
    ///
    /// Only the first call resolves the location; later calls are ignored.
    pub async fn load_deep_link(&self, query_string: &str) -> Submission {
        if self.deep_link_used.swap(true, Ordering::SeqCst) {
            tracing::debug!("Deep link already resolved for this controller");
            return Submission::Ignored;
        }

        match resolve_from_location(query_string) {
            Some(query) => {
                tracing::info!("Deep link search for {}", query.value);
                self.submit(query).await
            }
            None => Submission::Ignored,
        }
    }

    /// "Search similar" for a rendered record
    ///
    /// Goes through the deep-link resolution so the follow-up search is the
    /// same one a shared link would run.
    pub async fn search_similar(&self, id: &str, filter: &str) -> Submission {
        match resolve_from_location(&similar_link(id, filter)) {
            Some(query) => self.submit(query).await,
            None => Submission::Ignored,
        }
    }

    /// Issue a search for `query`
    ///
    /// Shows the loading placeholder at once, then the result or the error,
    /// unless a newer submission was issued in the meantime.
    pub async fn submit(&self, query: Query) -> Submission {
        let seq = {
            let mut current = self.lock();
            current.issued += 1;
            current.outcome = Some(SearchOutcome::Pending);
            current.filter = query.filter.clone();
            self.renderer
                .render_into(&SearchOutcome::Pending, &current.filter, self.view.as_ref());
            current.issued
        };

        let outcome = if self.backend.supports(query.mode) {
            self.dispatch(seq, &query).await
        } else {
            let e = SearchError::InvalidRequest(format!(
                "{} does not serve {} queries",
                self.backend.name(),
                query.mode
            ));
            tracing::warn!("Search #{} rejected: {}", seq, e);
            SearchOutcome::Failure(e.to_string())
        };

        self.apply(seq, outcome)
    }

    async fn dispatch(&self, seq: u64, query: &Query) -> SearchOutcome {
        tracing::debug!(
            "Search #{} via {}: {} '{}' filter='{}'",
            seq,
            self.backend.name(),
            query.mode,
            query.value,
            query.filter
        );

        match tokio::time::timeout(self.timeout, self.backend.search(query)).await {
            Ok(Ok(records)) => {
                tracing::debug!("Search #{} returned {} records", seq, records.len());
                SearchOutcome::Success(records)
            }
            Ok(Err(e)) => {
                tracing::warn!("Search #{} failed: {}", seq, e);
                SearchOutcome::Failure(e.to_string())
            }
            Err(_) => {
                let e = SearchError::Timeout(self.timeout);
                tracing::warn!("Search #{} failed: {}", seq, e);
                SearchOutcome::Failure(e.to_string())
            }
        }
    }

    fn apply(&self, seq: u64, outcome: SearchOutcome) -> Submission {
        let mut current = self.lock();
        if current.issued != seq {
            tracing::debug!(
                "Discarding stale response #{} (latest is #{})",
                seq,
                current.issued
            );
            return Submission::Superseded;
        }

        current.outcome = Some(outcome.clone());
        self.renderer
            .render_into(&outcome, &current.filter, self.view.as_ref());
        Submission::Applied(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::make_record;
    use crate::backend::MockBackend;
    use crate::models::QueryMode;
    use crate::render::{DelimiterTypesetter, DisplayFragment, MemoryView};

    fn controller() -> (Arc<SearchController>, Arc<MockBackend>, Arc<MemoryView>) {
        let backend = Arc::new(MockBackend::new());
        let view = Arc::new(MemoryView::new());
        let renderer = ResultRenderer::new(Arc::new(DelimiterTypesetter::new()));
        let controller = Arc::new(SearchController::new(backend.clone(), view.clone(), renderer));
        (controller, backend, view)
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (controller, backend, view) = controller();
        assert_eq!(controller.outcome(), None);
        assert!(!controller.is_loading());
        assert_eq!(controller.latest_sequence(), 0);
        assert!(backend.calls().is_empty());
        assert_eq!(view.replacements(), 0);
    }

    #[tokio::test]
    async fn test_success_flow() {
        let (controller, backend, view) = controller();
        backend.push_ok(vec![make_record("1", "One"), make_record("2", "Two")]);

        let result = controller.submit_input("  graph transformers ", None).await;

        let records = result.outcome().and_then(|o| o.records()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(controller.outcome().unwrap().records().unwrap()[1].title, "Two");
        // loading placeholder, then results
        assert_eq!(view.replacements(), 2);
        assert_eq!(view.fragment().unwrap().cards().len(), 2);
    }

    #[tokio::test]
    async fn test_loading_shown_while_pending() {
        let (controller, backend, view) = controller();
        let gate = backend.push_gated(Ok(vec![make_record("1", "One")]));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(Query::text("q")).await })
        };

        while backend.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(controller.is_loading());
        assert_eq!(view.fragment(), Some(DisplayFragment::Loading));

        gate.send(()).unwrap();
        assert!(matches!(task.await.unwrap(), Submission::Applied(_)));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let (controller, backend, view) = controller();
        backend.push_ok(vec![make_record("1", "One")]);
        controller.submit_input("first", None).await;
        let before = view.markup();

        assert_eq!(controller.submit_input("   ", Some("year == 2024")).await, Submission::Ignored);

        assert_eq!(backend.calls().len(), 1);
        assert_eq!(view.markup(), before);
        assert_eq!(controller.latest_sequence(), 1);
    }

    #[tokio::test]
    async fn test_failure_replaces_results() {
        let (controller, backend, view) = controller();
        backend.push_ok(vec![make_record("1", "Old result")]);
        backend.push_err(SearchError::Backend {
            status: 500,
            body: String::new(),
        });

        controller.submit_input("first", None).await;
        assert!(view.markup().contains("Old result"));

        let result = controller.submit_input("second", None).await;
        let message = result.outcome().and_then(|o| o.failure()).unwrap().to_string();
        assert!(message.contains("500"));
        assert!(!view.markup().contains("Old result"));
        assert!(view.markup().contains("500"));
    }

    #[tokio::test]
    async fn test_later_submit_wins_when_earlier_resolves_last() {
        let (controller, backend, view) = controller();
        let first_gate = backend.push_gated(Ok(vec![make_record("1", "Stale")]));
        let second_gate = backend.push_gated(Ok(vec![make_record("2", "Fresh")]));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(Query::text("first")).await })
        };
        while backend.calls().len() < 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(Query::text("second")).await })
        };
        while backend.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        second_gate.send(()).unwrap();
        assert!(matches!(second.await.unwrap(), Submission::Applied(_)));
        first_gate.send(()).unwrap();
        assert_eq!(first.await.unwrap(), Submission::Superseded);

        let records = controller.outcome().unwrap().records().unwrap().to_vec();
        assert_eq!(records[0].title, "Fresh");
        assert!(!view.markup().contains("Stale"));
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let (controller, backend, view) = controller();
        let first_gate = backend.push_gated(Err(SearchError::Transport("reset".to_string())));
        let second_gate = backend.push_gated(Ok(vec![make_record("2", "Fresh")]));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(Query::text("first")).await })
        };
        while backend.calls().len() < 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(Query::text("second")).await })
        };
        while backend.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        // earlier request fails first, while the later one is still pending
        first_gate.send(()).unwrap();
        assert_eq!(first.await.unwrap(), Submission::Superseded);
        assert!(controller.is_loading());
        assert_eq!(view.fragment(), Some(DisplayFragment::Loading));

        second_gate.send(()).unwrap();
        second.await.unwrap();
        assert_eq!(controller.outcome().unwrap().records().unwrap()[0].title, "Fresh");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_failure() {
        let (controller, backend, _view) = controller();
        let controller = Arc::try_unwrap(controller)
            .unwrap()
            .with_timeout(Duration::from_millis(20));
        backend.push_hang();

        let result = controller.submit(Query::text("slow")).await;
        let message = result.outcome().and_then(|o| o.failure()).unwrap().to_string();
        assert!(message.contains("timed out"));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_unsupported_mode_fails_without_dispatch() {
        let backend = Arc::new(MockBackend::only(QueryMode::Id));
        let view = Arc::new(MemoryView::new());
        let controller = SearchController::new(
            backend.clone(),
            view.clone(),
            ResultRenderer::new(Arc::new(DelimiterTypesetter::new())),
        );

        let result = controller.submit_input("free text", None).await;
        let message = result.outcome().and_then(|o| o.failure()).unwrap().to_string();
        assert!(message.contains("Mock Backend does not serve text queries"));
        assert!(backend.calls().is_empty());
        assert!(view.markup().contains("does not serve"));

        controller.submit_input("2401.07215", None).await;
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_cause() {
        let mut config = Config::default();
        config.backend.base_url = "http://127.0.0.1:9".to_string();
        let controller = SearchController::from_config(
            &config,
            Arc::new(MemoryView::new()),
            Arc::new(DelimiterTypesetter::new()),
        )
        .unwrap();

        let result = controller.submit_input("anything", None).await;
        let message = result.outcome().and_then(|o| o.failure()).unwrap().to_lowercase();
        assert!(message.starts_with("network error"));
        assert!(message.contains("connection refused"), "{}", message);
    }

    #[tokio::test]
    async fn test_deep_link_runs_once() {
        let (controller, backend, _view) = controller();

        let result = controller.load_deep_link("?arxiv_id=2401.07215").await;
        assert!(matches!(result, Submission::Applied(_)));
        assert_eq!(
            controller.load_deep_link("?arxiv_id=2401.07215").await,
            Submission::Ignored
        );

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mode, QueryMode::Id);
        assert_eq!(calls[0].value, "2401.07215");
        assert_eq!(calls[0].filter, "");
    }

    #[tokio::test]
    async fn test_deep_link_without_id() {
        let (controller, backend, view) = controller();
        assert_eq!(controller.load_deep_link("?filter=year%3D%3D2025").await, Submission::Ignored);
        assert!(backend.calls().is_empty());
        assert_eq!(view.replacements(), 0);
    }

    #[tokio::test]
    async fn test_search_similar_uses_deep_link_path() {
        let (controller, backend, _view) = controller();
        controller.search_similar("hep-th/9901001", "year >= 2020").await;

        let calls = backend.calls();
        assert_eq!(calls[0], Query::id("hep-th/9901001").with_filter("year >= 2020"));
    }

    #[tokio::test]
    async fn test_filter_carried_into_similar_links() {
        let (controller, backend, view) = controller();
        backend.push_ok(vec![make_record("2401.00001", "One")]);

        controller.submit_input("query", Some("year == 2025")).await;

        let cards = view.fragment().unwrap().cards().to_vec();
        assert_eq!(cards[0].similar_link, "?arxiv_id=2401.00001&filter=year+%3D%3D+2025");
    }
}
