//! Text helpers.

/// Return the first `max_chars` characters of `text`
///
/// Cuts on a char boundary, never inside a multi-byte character.
///
/// ```
/// use arxiv_search_client::utils::truncate_chars;
///
/// assert_eq!(truncate_chars("Hello World", 5), "Hello");
/// assert_eq!(truncate_chars("Hi", 5), "Hi");
/// assert_eq!(truncate_chars("αβγδ", 2), "αβ");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
