//! Utility modules supporting the search client.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a crate user agent
//! - [`truncate_chars`]: char-boundary-safe truncation used for abstract previews

mod http;
mod text;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use text::truncate_chars;
