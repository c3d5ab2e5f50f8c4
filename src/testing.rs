use crate::core::config::{ExtractConfig, ProfileKind};
use crate::core::LayoutProbe;
use crate::dom::layout::StaticLayout;
use crate::dom::{Candidate, DomProcessor, ElementDescriptor, Snapshot};
use crate::errors::{ExtractError, Result};
use crate::types::{ComputedStyle, PageIdentity};
use scraper::{Html, Selector};

pub struct TestHelper;

impl TestHelper {
    /// Processor with timestamps off so snapshots compare equal across runs.
    pub fn processor(profile: ProfileKind) -> DomProcessor {
        DomProcessor::new(ExtractConfig {
            include_timestamp: false,
            ..ExtractConfig::with_profile(profile)
        })
    }

    pub fn snapshot(html: &str) -> Snapshot {
        Self::snapshot_with_profile(html, ProfileKind::default())
    }

    pub fn snapshot_with_profile(html: &str, profile: ProfileKind) -> Snapshot {
        Self::processor(profile).extract_html("https://example.test/", html)
    }

    pub fn snapshot_with_probe(
        html: &str,
        profile: ProfileKind,
        probe: &dyn LayoutProbe,
    ) -> Snapshot {
        Self::processor(profile).extract(PageIdentity::new("https://example.test/", "Test"), html, probe)
    }

    pub fn count_elements_by_tag(snapshot: &Snapshot, tag: &str) -> usize {
        snapshot.elements.iter().filter(|e| e.tag == tag).count()
    }

    pub fn selectors(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.elements.iter().map(|e| e.selector.as_str()).collect()
    }

    pub fn labels(snapshot: &Snapshot) -> Vec<Option<&str>> {
        snapshot.elements.iter().map(|e| e.text.as_deref()).collect()
    }

    /// Number of nodes in `html` that `selector` matches; zero if it does not parse.
    pub fn resolve_selector(html: &str, selector: &str) -> usize {
        let document = Html::parse_document(html);
        Selector::parse(selector)
            .map(|selector| document.select(&selector).count())
            .unwrap_or(0)
    }

    pub fn find_by_label<'a>(snapshot: &'a Snapshot, label: &str) -> Option<&'a ElementDescriptor> {
        snapshot
            .elements
            .iter()
            .find(|e| e.text.as_deref() == Some(label))
    }
}

/// Probe driven by a `data-probe` attribute on each node, layered over
/// [`StaticLayout`]: `nobox` drops the box, `hidden` reports
/// `visibility: hidden`, `fail` makes style computation error out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedLayout;

impl LayoutProbe for ScriptedLayout {
    fn has_rendered_box(&self, candidate: &Candidate<'_>) -> bool {
        candidate.attr("data-probe") != Some("nobox") && StaticLayout.has_rendered_box(candidate)
    }

    fn computed_style(&self, candidate: &Candidate<'_>) -> Result<ComputedStyle> {
        match candidate.attr("data-probe") {
            Some("fail") => Err(ExtractError::StyleUnavailable(format!(
                "scripted failure on <{}>",
                candidate.tag()
            ))),
            Some("hidden") => Ok(ComputedStyle {
                visibility: "hidden".to_string(),
                ..ComputedStyle::default()
            }),
            _ => StaticLayout.computed_style(candidate),
        }
    }
}
