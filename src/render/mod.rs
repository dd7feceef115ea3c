//! Turning search outcomes into the results region.
//!
//! [`ResultRenderer`] maps a [`SearchOutcome`] to a [`DisplayFragment`],
//! replaces the whole [`ResultsView`] region with it and then runs the math
//! pass over the region.

mod fragment;
mod math;
mod view;

pub use fragment::{DisplayFragment, ResultCard, ELLIPSIS};
pub use math::{DelimiterTypesetter, MathDelimiter, MathTypesetter, TypesetError, TypesetOptions};
pub use view::{MemoryView, ResultsView};

use std::sync::Arc;

use crate::config::RenderConfig;
use crate::models::SearchOutcome;

/// Renders outcomes into a results region
#[derive(Debug, Clone)]
pub struct ResultRenderer {
    typesetter: Arc<dyn MathTypesetter>,
    options: TypesetOptions,
    abstract_chars: usize,
}

impl ResultRenderer {
    /// Renderer with the default delimiters and abstract length
    pub fn new(typesetter: Arc<dyn MathTypesetter>) -> Self {
        Self::with_config(typesetter, &RenderConfig::default())
    }

    pub fn with_config(typesetter: Arc<dyn MathTypesetter>, config: &RenderConfig) -> Self {
        Self {
            typesetter,
            options: TypesetOptions::default(),
            abstract_chars: config.abstract_chars,
        }
    }

    /// Map an outcome to its fragment
    ///
    /// `filter` is the filter of the search that produced the outcome; it is
    /// carried into each card's "search similar" link.
    pub fn render(&self, outcome: &SearchOutcome, filter: &str) -> DisplayFragment {
        match outcome {
            SearchOutcome::Pending => DisplayFragment::Loading,
            SearchOutcome::Failure(message) => DisplayFragment::Error(message.clone()),
            SearchOutcome::Success(records) => DisplayFragment::Results(
                records
                    .iter()
                    .map(|record| ResultCard::from_record(record, filter, self.abstract_chars))
                    .collect(),
            ),
        }
    }

    /// Render `outcome` into `view`, replacing its whole content
    ///
    /// Result lists then get a math pass. Typesetting errors are logged and
    /// leave the plain rendering in place.
    pub fn render_into(&self, outcome: &SearchOutcome, filter: &str, view: &dyn ResultsView) {
        let fragment = self.render(outcome, filter);
        view.replace(&fragment);

        if fragment.cards().is_empty() {
            return;
        }

        if let Err(e) = self.typesetter.typeset(view, &self.options) {
            tracing::warn!("Math typesetting failed: {}", e);
        }
    }
}
