//! Core data models for queries, result records and search outcomes.

mod outcome;
mod query;
mod record;

pub use outcome::SearchOutcome;
pub use query::{FilterOption, Query, QueryMode};
pub use record::{decode_hits, Month, RecordBuilder, ResultRecord, SearchHit};
