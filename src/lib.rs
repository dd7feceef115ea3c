//! # arXiv Search Client
//!
//! Client for a semantic arXiv search service. It turns user input (free
//! text or an arXiv identifier, plus an optional year filter) into requests
//! against the search backend and renders the ranked results, math
//! included, into a results region.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Query, ResultRecord, SearchOutcome)
//! - [`query`]: Input normalization, deep links and filter options
//! - [`backend`]: Search backend strategies behind the [`SearchBackend`] trait
//! - [`controller`]: Request lifecycle, loading/error states, stale-response discarding
//! - [`render`]: Outcome to display fragment mapping and the math pass
//! - [`ui`]: Keyboard submit, text area sizing and the terminal view
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client and text helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use arxiv_search_client::config::Config;
//! use arxiv_search_client::controller::SearchController;
//! use arxiv_search_client::render::{DelimiterTypesetter, MemoryView, ResultsView};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let view = Arc::new(MemoryView::new());
//! let controller = SearchController::from_config(
//!     &Config::default(),
//!     view.clone(),
//!     Arc::new(DelimiterTypesetter::new()),
//! )?;
//!
//! controller.submit_input("diffusion models for protein design", Some("year == 2025")).await;
//! println!("{}", view.markup());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod controller;
pub mod models;
pub mod query;
pub mod render;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use backend::{SearchBackend, SearchError};
pub use controller::{SearchController, Submission};
pub use models::{Query, QueryMode, ResultRecord, SearchOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
