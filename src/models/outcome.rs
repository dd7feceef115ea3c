//! Search outcome: the controller's externally observable state.

use serde::{Deserialize, Serialize};

use crate::models::ResultRecord;

/// Result of the most recent search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// A request is in flight
    Pending,
    /// Records in backend rank order
    Success(Vec<ResultRecord>),
    /// Human-readable failure description
    Failure(String),
}

impl SearchOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, SearchOutcome::Pending)
    }

    /// Records if the outcome is a success
    pub fn records(&self) -> Option<&[ResultRecord]> {
        match self {
            SearchOutcome::Success(records) => Some(records),
            _ => None,
        }
    }

    /// Failure message if the outcome is a failure
    pub fn failure(&self) -> Option<&str> {
        match self {
            SearchOutcome::Failure(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert!(SearchOutcome::Pending.is_pending());
        assert_eq!(SearchOutcome::Pending.records(), None);

        let failure = SearchOutcome::Failure("HTTP 500".to_string());
        assert_eq!(failure.failure(), Some("HTTP 500"));
        assert!(failure.records().is_none());

        let success = SearchOutcome::Success(vec![ResultRecord::new("1", "T", "http://u")]);
        assert_eq!(success.records().map(|r| r.len()), Some(1));
    }
}
