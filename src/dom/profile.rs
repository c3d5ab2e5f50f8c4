use crate::dom::label::{LabelSource, LABEL_SOURCES};
use crate::dom::selector::{SelectorRule, SELECTOR_PRIORITY};

/// Everything that varies between extraction profiles.
///
/// Both built-in profiles share the same selector and label priority lists;
/// they differ in what gets collected, what counts as actionable, whether
/// metadata-only nodes are admitted, and which descriptor fields are emitted.
#[derive(Debug)]
pub struct ExtractionProfile {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    /// Count onclick handlers, links, tabindex and widget roles as actionable.
    pub extended_actionable: bool,
    /// Keep nodes with neither capability when they carry identifying metadata.
    pub admit_metadata_only: bool,
    /// Emit type/href/contenteditable/role/className/id on each descriptor.
    pub extended_fields: bool,
    pub selector_rules: &'static [SelectorRule],
    pub label_sources: &'static [LabelSource],
}

/// Attributes that admit a node on their own under `admit_metadata_only`.
pub const METADATA_ATTRIBUTES: &[&str] = &["data-testid", "name", "href", "aria-label", "id", "role"];

pub static MINIMAL: ExtractionProfile = ExtractionProfile {
    name: "minimal",
    patterns: &["button", "input", "textarea", "[role=\"button\"]"],
    extended_actionable: false,
    admit_metadata_only: false,
    extended_fields: false,
    selector_rules: &SELECTOR_PRIORITY,
    label_sources: &LABEL_SOURCES,
};

pub static EXTENDED: ExtractionProfile = ExtractionProfile {
    name: "extended",
    patterns: &[
        "button",
        "input",
        "textarea",
        "[role=\"button\"]",
        "select",
        "a[href]",
        "[contenteditable]",
        "[onclick]",
        "[data-testid]",
        "[role=\"link\"]",
        "[role=\"textbox\"]",
        "[role=\"checkbox\"]",
        "[role=\"menuitem\"]",
        "[role=\"tab\"]",
    ],
    extended_actionable: true,
    admit_metadata_only: true,
    extended_fields: true,
    selector_rules: &SELECTOR_PRIORITY,
    label_sources: &LABEL_SOURCES,
};
