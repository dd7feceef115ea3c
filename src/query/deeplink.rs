//! Deep links: shareable query strings that run a search on load.
//!
//! A deep link carries `arxiv_id` and an optional `filter`:
//!
//! ```text
//! ?arxiv_id=2401.07215&filter=year%3D%3D2025
//! ```

use url::{form_urlencoded, Url};

use crate::models::Query;

/// Query-string parameter carrying the identifier
pub const ID_PARAM: &str = "arxiv_id";
/// Query-string parameter carrying the filter expression
pub const FILTER_PARAM: &str = "filter";

/// Resolve the initial query from a location's query string
///
/// Accepts the raw query string with or without the leading `?`, or a full
/// URL with a host, whose query component is used. Returns `None` when no
/// usable `arxiv_id` is present. A missing `filter` yields an unfiltered
/// query. The first occurrence of each parameter wins.
pub fn resolve_from_location(location: &str) -> Option<Query> {
    let location = location.trim();
    let parsed = Url::parse(location).ok().filter(Url::has_host);
    let query_string = match &parsed {
        Some(url) => url.query().unwrap_or_default(),
        None => {
            let bare = location.strip_prefix('?').unwrap_or(location);
            bare.split('#').next().unwrap_or_default()
        }
    };

    let mut id = None;
    let mut filter = None;
    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        match key.as_ref() {
            ID_PARAM if id.is_none() => id = Some(value.into_owned()),
            FILTER_PARAM if filter.is_none() => filter = Some(value.into_owned()),
            _ => {}
        }
    }

    let id = id?;
    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    Some(Query::id(id).with_filter(filter.unwrap_or_default()))
}

/// Build the query string (with leading `?`) that deep-links to a search
/// for papers similar to `id`
///
/// The filter parameter is omitted when `filter` is empty.
pub fn similar_link(id: &str, filter: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair(ID_PARAM, id);
    if !filter.is_empty() {
        serializer.append_pair(FILTER_PARAM, filter);
    }
    format!("?{}", serializer.finish())
}
