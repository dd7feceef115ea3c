//! Mock backend for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::backend::{SearchBackend, SearchError};
use crate::models::{Query, QueryMode, ResultRecord};

#[derive(Debug)]
enum Scripted {
    Ready(Result<Vec<ResultRecord>, SearchError>),
    Gated(Result<Vec<ResultRecord>, SearchError>, oneshot::Receiver<()>),
    Hang,
}

/// A backend that answers from a script of responses, in call order.
///
/// Gated responses are held until the returned sender fires (or is
/// dropped), which lets tests choose the order in which concurrent
/// requests resolve. Calls beyond the script return an empty result list.
#[derive(Debug, Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Query>>,
    only: Option<QueryMode>,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend that serves only `mode` queries.
    pub fn only(mode: QueryMode) -> Self {
        Self {
            only: Some(mode),
            ..Self::default()
        }
    }

    /// Answer the next call immediately with `records`.
    pub fn push_ok(&self, records: Vec<ResultRecord>) {
        self.push(Scripted::Ready(Ok(records)));
    }

    /// Answer the next call immediately with `err`.
    pub fn push_err(&self, err: SearchError) {
        self.push(Scripted::Ready(Err(err)));
    }

    /// Answer the next call with `result` once the returned sender fires.
    pub fn push_gated(
        &self,
        result: Result<Vec<ResultRecord>, SearchError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(result, rx));
        tx
    }

    /// Never answer the next call.
    pub fn push_hang(&self) {
        self.push(Scripted::Hang);
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, scripted: Scripted) {
        self.script.lock().unwrap().push_back(scripted);
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Backend"
    }

    fn supports(&self, mode: QueryMode) -> bool {
        self.only.map_or(true, |only| only == mode)
    }

    async fn search(&self, query: &Query) -> Result<Vec<ResultRecord>, SearchError> {
        self.calls.lock().unwrap().push(query.clone());
        let next = self.script.lock().unwrap().pop_front();

        match next {
            None => Ok(Vec::new()),
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(result, gate)) => {
                let _ = gate.await;
                result
            }
            Some(Scripted::Hang) => std::future::pending().await,
        }
    }
}

/// Helper function to create a record for testing.
pub fn make_record(id: &str, title: &str) -> ResultRecord {
    ResultRecord::new(id, title, format!("https://arxiv.org/abs/{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_order_and_calls() {
        let backend = MockBackend::new();
        backend.push_ok(vec![make_record("1", "One")]);
        backend.push_err(SearchError::Transport("down".to_string()));

        let first = backend.search(&Query::text("a")).await.unwrap();
        assert_eq!(first[0].title, "One");
        assert!(backend.search(&Query::text("b")).await.is_err());
        assert!(backend.search(&Query::text("c")).await.unwrap().is_empty());

        let values: Vec<String> = backend.calls().into_iter().map(|q| q.value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_gated_response_waits() {
        use tokio_test::{assert_pending, assert_ready_ok, task};

        let backend = MockBackend::new();
        let gate = backend.push_gated(Ok(vec![make_record("1", "Late")]));
        let query = Query::text("q");

        let mut search = task::spawn(backend.search(&query));
        assert_pending!(search.poll());

        gate.send(()).unwrap();
        assert!(search.is_woken());
        let records = assert_ready_ok!(search.poll());
        assert_eq!(records[0].title, "Late");
    }
}
