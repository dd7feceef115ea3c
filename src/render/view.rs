//! The results region the controller renders into.

use std::sync::{Mutex, PoisonError};

use crate::render::DisplayFragment;

/// Output surface owned by the controller
///
/// A page, a terminal or a test buffer. Every `replace` swaps out the whole
/// region; there are no incremental updates.
pub trait ResultsView: Send + Sync {
    /// Replace the entire region with `fragment`
    fn replace(&self, fragment: &DisplayFragment);

    /// Current markup of the region
    fn markup(&self) -> String;

    /// Overwrite the region's markup (used by the math pass)
    fn set_markup(&self, markup: String);
}

#[derive(Debug, Default)]
struct MemoryViewState {
    fragment: Option<DisplayFragment>,
    markup: String,
    replacements: usize,
}

/// In-memory results region holding HTML markup
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<MemoryViewState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment most recently rendered, if any
    pub fn fragment(&self) -> Option<DisplayFragment> {
        self.lock().fragment.clone()
    }

    /// Number of whole-region replacements so far
    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultsView for MemoryView {
    fn replace(&self, fragment: &DisplayFragment) {
        let mut state = self.lock();
        state.markup = fragment.to_html();
        state.fragment = Some(fragment.clone());
        state.replacements += 1;
    }

    fn markup(&self) -> String {
        self.lock().markup.clone()
    }

    fn set_markup(&self, markup: String) {
        self.lock().markup = markup;
    }
}
