use crate::core::config::ExtractConfig;
use crate::core::{BrowserTrait, LayoutProbe};
use crate::dom::classifier::{classify, Classification};
use crate::dom::collector::{document_elements, NodeCollector};
use crate::dom::dedup::{retain_first, SeenKeys};
use crate::dom::eligibility::evaluate;
use crate::dom::label::extract_label;
use crate::dom::layout::StaticLayout;
use crate::dom::selector::synthesize;
use crate::dom::text::inner_text;
use crate::dom::{ElementDescriptor, Snapshot};
use crate::errors::Result;
use crate::types::PageIdentity;
use scraper::Html;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, trace};
use url::Url;

/// Runs the extraction pipeline over one rendered page.
///
/// Collect, filter, classify, synthesize selectors, label, de-duplicate and
/// assemble. Every entry point returns a [`Snapshot`]; failures show up in its
/// `error` field instead of propagating.
pub struct DomProcessor {
    config: ExtractConfig,
}

struct Extraction {
    elements: Vec<ElementDescriptor>,
    document_title: Option<String>,
}

impl DomProcessor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts from rendered markup, judging visibility with `probe`.
    /// An empty `identity.title` is filled from the document's `<title>`.
    pub fn extract(&self, identity: PageIdentity, html: &str, probe: &dyn LayoutProbe) -> Snapshot {
        let timestamp = self.timestamp();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(&identity, html, probe)));

        match outcome {
            Ok(Ok(extraction)) => {
                let mut identity = identity;
                if identity.title.is_empty() {
                    identity.title = extraction.document_title.unwrap_or_default();
                }
                info!(
                    url = %identity.url,
                    elements = extraction.elements.len(),
                    "snapshot assembled"
                );
                Snapshot::new(identity, timestamp).with_elements(extraction.elements)
            }
            Ok(Err(e)) => {
                error!(url = %identity.url, error = %e, "extraction failed");
                Snapshot::failed(identity, timestamp, e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(url = %identity.url, error = %message, "extraction aborted");
                Snapshot::failed(identity, timestamp, format!("extraction aborted: {}", message))
            }
        }
    }

    /// Extracts from markup alone, approximating layout from the tree.
    pub fn extract_html(&self, url: &str, html: &str) -> Snapshot {
        self.extract(PageIdentity::new(url, ""), html, &StaticLayout)
    }

    /// Captures the page open in `tab` and extracts from it.
    pub async fn capture<B: BrowserTrait>(&self, browser: &B, tab: &B::TabHandle) -> Snapshot {
        match crate::browser::capture_page(browser, tab).await {
            Ok(page) => {
                let identity = page.identity();
                self.extract(identity, &page.html, &page.layout)
            }
            Err(e) => {
                error!(error = %e, "page capture failed");
                let url = browser.get_url(tab).await.unwrap_or_default();
                let title = browser.get_title(tab).await.unwrap_or_default();
                Snapshot::failed(PageIdentity::new(url, title), self.timestamp(), e.to_string())
            }
        }
    }

    fn run_pipeline(
        &self,
        identity: &PageIdentity,
        html: &str,
        probe: &dyn LayoutProbe,
    ) -> Result<Extraction> {
        let profile = self.config.profile();
        let collector = NodeCollector::new(
            profile
                .patterns
                .iter()
                .copied()
                .chain(self.config.extra_patterns.iter().map(String::as_str)),
        )?;

        let document = Html::parse_document(html);
        probe.check_alignment(&document);
        let candidates = collector.collect(&document);

        let classified: Vec<_> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let signals = evaluate(&candidate, probe, profile);
                let class = classify(&signals, profile);
                trace!(
                    ordinal = candidate.ordinal,
                    tag = candidate.tag(),
                    ?signals,
                    ?class,
                    "classified candidate"
                );
                class.map(|class| (candidate, class))
            })
            .collect();

        debug!(
            profile = profile.name,
            kept = classified.len(),
            editable = classified.iter().filter(|(_, c)| c.is_editable()).count(),
            actionable = classified.iter().filter(|(_, c)| c.is_actionable()).count(),
            metadata_only = classified
                .iter()
                .filter(|(_, c)| *c == Classification::MetadataOnly)
                .count(),
            "classification done"
        );

        let base_url = Url::parse(&identity.url).ok();
        let described: Vec<_> = classified
            .iter()
            .map(|(candidate, _)| {
                let selector = synthesize(candidate, profile.selector_rules);
                let label =
                    extract_label(candidate, profile.label_sources, self.config.max_text_length);
                ElementDescriptor::describe(candidate, selector, label, profile, base_url.as_ref())
            })
            .collect();

        let before = described.len();
        let (elements, seen) = retain_first(described, SeenKeys::new(), ElementDescriptor::dedup_key);
        debug!(
            before,
            after = elements.len(),
            distinct = seen.len(),
            "de-duplicated by tag and label"
        );

        Ok(Extraction {
            elements,
            document_title: document_title(&document),
        })
    }

    fn timestamp(&self) -> Option<i64> {
        self.config
            .include_timestamp
            .then(|| chrono::Utc::now().timestamp_millis())
    }
}

impl Default for DomProcessor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

fn document_title(document: &Html) -> Option<String> {
    document_elements(document)
        .find(|element| element.value().name() == "title")
        .map(inner_text)
        .filter(|title| !title.is_empty())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ProfileKind;

    fn processor(profile: ProfileKind) -> DomProcessor {
        DomProcessor::new(ExtractConfig {
            include_timestamp: false,
            ..ExtractConfig::with_profile(profile)
        })
    }

    #[test]
    fn title_falls_back_to_document_title() {
        let html = "<title> Checkout </title><button>Pay</button>";
        let snapshot = processor(ProfileKind::Minimal).extract_html("https://shop.test/cart", html);
        assert_eq!(snapshot.title, "Checkout");
        assert_eq!(snapshot.url, "https://shop.test/cart");

        let snapshot = processor(ProfileKind::Minimal).extract(
            PageIdentity::new("https://shop.test/cart", "Given"),
            html,
            &StaticLayout,
        );
        assert_eq!(snapshot.title, "Given");
    }

    #[test]
    fn invalid_extra_pattern_yields_error_snapshot() {
        let processor = DomProcessor::new(ExtractConfig {
            extra_patterns: vec!["div[".to_string()],
            ..ExtractConfig::default()
        });
        let snapshot = processor.extract(
            PageIdentity::new("https://example.com", "Example"),
            "<button>Go</button>",
            &StaticLayout,
        );
        assert!(snapshot.elements.is_empty());
        assert_eq!(snapshot.title, "Example");
        assert!(snapshot.timestamp.is_some());
        assert!(snapshot.error.unwrap().starts_with("Invalid match pattern"));
    }

    #[test]
    fn extra_patterns_extend_collection() {
        let html = r#"<div class="card" data-id="7">Open</div>"#;
        let plain = processor(ProfileKind::Extended).extract_html("", html);
        assert!(plain.elements.is_empty());

        let processor = DomProcessor::new(ExtractConfig {
            extra_patterns: vec!["[data-id]".to_string()],
            include_timestamp: false,
            ..ExtractConfig::default()
        });
        // collected, but neither capable nor carrying admitting metadata
        assert!(processor.extract_html("", html).elements.is_empty());

        let html = r#"<div class="card" data-id="7" role="row">Open</div>"#;
        let snapshot = processor.extract_html("", html);
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.elements[0].selector, "div.card");
    }

    struct PanickingLayout;

    impl LayoutProbe for PanickingLayout {
        fn has_rendered_box(&self, _candidate: &crate::dom::Candidate<'_>) -> bool {
            panic!("layout engine gone")
        }

        fn computed_style(
            &self,
            _candidate: &crate::dom::Candidate<'_>,
        ) -> Result<crate::types::ComputedStyle> {
            Ok(Default::default())
        }
    }

    #[test]
    fn panicking_probe_yields_error_snapshot() {
        let snapshot = processor(ProfileKind::Extended).extract(
            PageIdentity::new("https://example.com/", "Example"),
            "<button>Go</button>",
            &PanickingLayout,
        );
        assert!(snapshot.elements.is_empty());
        assert_eq!(snapshot.url, "https://example.com/");
        let error = snapshot.error.unwrap();
        assert!(error.starts_with("extraction aborted"), "{}", error);
        assert!(error.contains("layout engine gone"));
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("probe exploded");
        assert_eq!(panic_message(payload.as_ref()), "probe exploded");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
    }
}
