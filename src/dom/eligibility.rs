use crate::core::LayoutProbe;
use crate::dom::profile::{ExtractionProfile, METADATA_ATTRIBUTES};
use crate::dom::Candidate;
use tracing::warn;

/// Element kinds for which the `disabled` attribute means anything.
const DISABLEABLE_TAGS: &[&str] = &[
    "button", "input", "select", "textarea", "option", "optgroup", "fieldset",
];

const ACTIONABLE_ROLES: &[&str] = &[
    "button", "link", "menuitem", "tab", "checkbox", "radio", "switch", "option",
];

/// Per-node signals the classifier works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub visible: bool,
    pub enabled: bool,
    pub editable: bool,
    pub actionable: bool,
    pub has_metadata: bool,
    /// Style could not be computed and visibility fell back to the box check.
    pub style_degraded: bool,
}

/// Evaluates one candidate. Probe failures only degrade the result.
pub fn evaluate(
    candidate: &Candidate<'_>,
    probe: &dyn LayoutProbe,
    profile: &ExtractionProfile,
) -> Signals {
    let (visible, style_degraded) = visibility(candidate, probe);
    let enabled = is_enabled(candidate);
    let usable = visible && enabled;

    Signals {
        visible,
        enabled,
        editable: usable && is_editable_kind(candidate),
        actionable: usable && is_actionable_kind(candidate, profile),
        has_metadata: METADATA_ATTRIBUTES
            .iter()
            .any(|attribute| candidate.attr(attribute).is_some()),
        style_degraded,
    }
}

fn visibility(candidate: &Candidate<'_>, probe: &dyn LayoutProbe) -> (bool, bool) {
    if !probe.has_rendered_box(candidate) {
        return (false, false);
    }

    match probe.computed_style(candidate) {
        Ok(style) => (!style.hides(), false),
        Err(e) => {
            warn!(
                ordinal = candidate.ordinal,
                tag = candidate.tag(),
                error = %e,
                "style unavailable, judging visibility by rendered box only"
            );
            (true, true)
        }
    }
}

fn is_enabled(candidate: &Candidate<'_>) -> bool {
    !(DISABLEABLE_TAGS.contains(&candidate.tag()) && candidate.has_attr("disabled"))
}

pub fn is_content_editable(candidate: &Candidate<'_>) -> bool {
    candidate
        .raw_attr("contenteditable")
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            matches!(value.as_str(), "" | "true" | "plaintext-only")
        })
        .unwrap_or(false)
}

fn is_editable_kind(candidate: &Candidate<'_>) -> bool {
    let text_control =
        matches!(candidate.tag(), "input" | "textarea") && !candidate.has_attr("readonly");
    text_control || is_content_editable(candidate)
}

fn is_actionable_kind(candidate: &Candidate<'_>, profile: &ExtractionProfile) -> bool {
    let role = candidate.attr("role").map(str::trim);

    if matches!(candidate.tag(), "button" | "input") || role == Some("button") {
        return true;
    }
    if !profile.extended_actionable {
        return false;
    }

    candidate.has_attr("onclick")
        || (candidate.tag() == "a" && candidate.has_attr("href"))
        || matches!(candidate.tag(), "select" | "summary")
        || candidate
            .attr("tabindex")
            .and_then(|value| value.trim().parse::<i32>().ok())
            .map_or(false, |index| index >= 0)
        || role.map_or(false, |role| ACTIONABLE_ROLES.contains(&role))
}
