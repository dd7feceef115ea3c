//! Search input behaviour: keyboard submit and auto-growing text area.

use crate::controller::{SearchController, Submission};

/// What a key press in the search box should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Run the same path as the search button
    Submit,
    /// Insert a literal newline
    InsertNewline,
    /// Default handling
    Ignore,
}

/// Map a key press to its action
///
/// Enter submits; Shift+Enter is reserved for a newline.
pub fn key_action(key: &str, shift: bool) -> KeyAction {
    match (key, shift) {
        ("Enter", false) => KeyAction::Submit,
        ("Enter", true) => KeyAction::InsertNewline,
        _ => KeyAction::Ignore,
    }
}

/// Handle a key press in the search box
///
/// Returns `None` when the key does not submit; otherwise the submission
/// made with the box's current text and filter selection.
pub async fn handle_key(
    controller: &SearchController,
    key: &str,
    shift: bool,
    text: &str,
    filter: Option<&str>,
) -> Option<Submission> {
    match key_action(key, shift) {
        KeyAction::Submit => Some(controller.submit_input(text, filter).await),
        KeyAction::InsertNewline | KeyAction::Ignore => None,
    }
}

/// A resizable multi-line input
pub trait TextSurface {
    /// Height needed to show all content, in pixels
    fn scroll_height(&self) -> u32;

    /// Set the CSS height (`"auto"` or `"<n>px"`)
    fn set_height(&mut self, height: &str);
}

/// Grow or shrink the surface to fit its content
///
/// The height is reset first so the content height is measured without
/// the previous size, then set to that height.
pub fn auto_resize(surface: &mut dyn TextSurface) {
    surface.set_height("auto");
    let height = surface.scroll_height();
    surface.set_height(&format!("{}px", height));
}
