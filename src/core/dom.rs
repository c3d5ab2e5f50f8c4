use crate::dom::Candidate;
use crate::errors::Result;
use crate::types::ComputedStyle;
use scraper::Html;

/// Source of rendering signals for the visibility filter.
///
/// The markup alone does not say whether a node was laid out. Implementations
/// either derive an approximation from the tree (`StaticLayout`) or replay
/// measurements taken in a live browser (`CapturedLayout`). A probe may fail to
/// compute style for a single node; callers contain that failure to the node.
pub trait LayoutProbe {
    /// Whether the node produced a non-empty box when the page was rendered.
    fn has_rendered_box(&self, candidate: &Candidate<'_>) -> bool;

    /// Computed display/visibility for the node.
    fn computed_style(&self, candidate: &Candidate<'_>) -> Result<ComputedStyle>;

    /// Called once per run with the parsed document, before any node is probed.
    fn check_alignment(&self, _document: &Html) {}
}

impl<P: LayoutProbe + ?Sized> LayoutProbe for &P {
    fn has_rendered_box(&self, candidate: &Candidate<'_>) -> bool {
        (**self).has_rendered_box(candidate)
    }

    fn computed_style(&self, candidate: &Candidate<'_>) -> Result<ComputedStyle> {
        (**self).computed_style(candidate)
    }

    fn check_alignment(&self, document: &Html) {
        (**self).check_alignment(document)
    }
}
