use crate::core::LayoutProbe;
use crate::dom::collector::document_elements;
use crate::dom::Candidate;
use crate::errors::{ExtractError, Result};
use crate::types::{ComputedStyle, ElementRect};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Elements that never produce a box of their own or for their subtree.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "title", "meta", "link",
];

/// Layout approximation for markup with no layout engine behind it.
///
/// A node is considered boxed unless it or an ancestor is a non-rendered
/// element, carries `hidden`, is an `input[type=hidden]`, or declares an
/// inline `display: none`. Style comes from inline declarations only, with
/// `visibility` inherited from the nearest ancestor that sets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLayout;

impl LayoutProbe for StaticLayout {
    fn has_rendered_box(&self, candidate: &Candidate<'_>) -> bool {
        !self_and_ancestors(candidate.element).any(suppresses_box)
    }

    fn computed_style(&self, candidate: &Candidate<'_>) -> Result<ComputedStyle> {
        let defaults = ComputedStyle::default();
        let display = inline_declaration(candidate.element, "display").unwrap_or(defaults.display);
        let visibility = self_and_ancestors(candidate.element)
            .find_map(|element| inline_declaration(element, "visibility"))
            .unwrap_or(defaults.visibility);

        Ok(ComputedStyle {
            display,
            visibility,
        })
    }
}

fn self_and_ancestors(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    std::iter::once(element).chain(element.ancestors().filter_map(ElementRef::wrap))
}

fn suppresses_box(element: ElementRef<'_>) -> bool {
    let value = element.value();
    NON_RENDERED_TAGS.contains(&value.name())
        || value.attr("hidden").is_some()
        || (value.name() == "input"
            && value
                .attr("type")
                .map_or(false, |t| t.trim().eq_ignore_ascii_case("hidden")))
        || inline_declaration(element, "display").as_deref() == Some("none")
}

/// Last inline declaration of `property`, lowercased, `!important` dropped.
fn inline_declaration(element: ElementRef<'_>, property: &str) -> Option<String> {
    element
        .value()
        .attr("style")?
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| {
            value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase()
        })
        .last()
}

/// Measurements for one element, taken in a live browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSample {
    /// `localName` of the element the sample was taken from.
    pub tag: Option<String>,
    pub rect: Option<ElementRect>,
    pub display: Option<String>,
    pub visibility: Option<String>,
    /// Set when the browser failed to compute style for the element.
    pub error: Option<String>,
}

impl LayoutSample {
    /// Untagged samples are trusted as-is.
    pub fn describes(&self, tag: &str) -> bool {
        self.tag
            .as_deref()
            .map_or(true, |sampled| sampled.eq_ignore_ascii_case(tag))
    }
}

/// Where the sampled element sequence and the parsed tree first disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    pub ordinal: usize,
    pub parsed: Option<String>,
    pub sampled: Option<String>,
}

/// Samples indexed by element ordinal, replayed against the parsed markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapturedLayout {
    samples: Vec<LayoutSample>,
}

impl CapturedLayout {
    pub fn new(samples: Vec<LayoutSample>) -> Self {
        Self { samples }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample(&self, ordinal: usize) -> Option<&LayoutSample> {
        self.samples.get(ordinal)
    }

    /// First ordinal at which the samples stop lining up with `document`.
    /// Markup that does not survive a serialize/parse round trip shifts every
    /// later element.
    pub fn first_mismatch(&self, document: &Html) -> Option<Misalignment> {
        let mut elements = document_elements(document);
        let mut samples = self.samples.iter();
        let mut ordinal = 0;

        loop {
            match (elements.next(), samples.next()) {
                (None, None) => return None,
                (Some(element), Some(sample)) if sample.describes(element.value().name()) => {}
                (element, sample) => {
                    return Some(Misalignment {
                        ordinal,
                        parsed: element.map(|e| e.value().name().to_string()),
                        sampled: sample.and_then(|s| s.tag.clone()),
                    })
                }
            }
            ordinal += 1;
        }
    }

    /// The candidate's sample, provided it was taken from the same kind of element.
    fn aligned_sample(&self, candidate: &Candidate<'_>) -> Result<&LayoutSample> {
        let sample = self.sample(candidate.ordinal).ok_or_else(|| {
            ExtractError::StyleUnavailable(format!(
                "no layout sample for element {}",
                candidate.ordinal
            ))
        })?;

        if !sample.describes(candidate.tag()) {
            return Err(ExtractError::StyleUnavailable(format!(
                "layout sample {} is for <{}>, not <{}>",
                candidate.ordinal,
                sample.tag.as_deref().unwrap_or_default(),
                candidate.tag()
            )));
        }
        Ok(sample)
    }
}

impl LayoutProbe for CapturedLayout {
    fn has_rendered_box(&self, candidate: &Candidate<'_>) -> bool {
        self.aligned_sample(candidate)
            .ok()
            .and_then(|sample| sample.rect)
            .map_or(false, |rect| rect.has_area())
    }

    fn computed_style(&self, candidate: &Candidate<'_>) -> Result<ComputedStyle> {
        let sample = self.aligned_sample(candidate)?;

        if let Some(error) = &sample.error {
            return Err(ExtractError::StyleUnavailable(error.clone()));
        }

        let defaults = ComputedStyle::default();
        Ok(ComputedStyle {
            display: sample.display.clone().unwrap_or(defaults.display),
            visibility: sample.visibility.clone().unwrap_or(defaults.visibility),
        })
    }

    fn check_alignment(&self, document: &Html) {
        if let Some(mismatch) = self.first_mismatch(document) {
            warn!(
                ordinal = mismatch.ordinal,
                parsed = ?mismatch.parsed,
                sampled = ?mismatch.sampled,
                samples = self.samples.len(),
                "layout samples diverge from the parsed markup, nodes past this point read no layout"
            );
        }
    }
}
