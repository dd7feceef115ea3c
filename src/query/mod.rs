//! Turning user input and page locations into queries.
//!
//! - [`normalize`]: trim raw text and resolve the filter selection
//! - [`resolve_from_location`]: parse a deep-link query string
//! - [`similar_link`]: build the deep link for "search similar"
//! - [`filter_options`]: year filter choices for the selector

mod deeplink;
mod filters;
mod normalize;

pub use deeplink::{resolve_from_location, similar_link, FILTER_PARAM, ID_PARAM};
pub use filters::{current_filter_options, filter_options};
pub use normalize::{canonical_arxiv_id, normalize};
