use crate::dom::ElementDescriptor;
use crate::types::PageIdentity;
use serde::{Deserialize, Serialize};

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub url: String,
    pub title: String,
    /// Capture time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub elements: Vec<ElementDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    pub fn new(identity: PageIdentity, timestamp: Option<i64>) -> Self {
        Self {
            url: identity.url,
            title: identity.title,
            timestamp,
            elements: Vec::new(),
            error: None,
        }
    }

    /// A well-formed snapshot with no elements, carrying the failure.
    pub fn failed(identity: PageIdentity, timestamp: Option<i64>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(identity, timestamp)
        }
    }

    pub fn with_elements(mut self, elements: Vec<ElementDescriptor>) -> Self {
        self.elements = elements;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn find_elements_by_tag(&self, tag: &str) -> Vec<&ElementDescriptor> {
        self.elements.iter().filter(|e| e.tag == tag).collect()
    }

    pub fn find_elements_by_text(&self, text: &str) -> Vec<&ElementDescriptor> {
        let needle = text.to_lowercase();
        self.elements
            .iter()
            .filter(|e| {
                e.text
                    .as_ref()
                    .map(|t| t.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn find_by_selector(&self, selector: &str) -> Option<&ElementDescriptor> {
        self.elements.iter().find(|e| e.selector == selector)
    }

    pub fn to_json_pretty(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_snapshot_serializes_error_and_empty_elements() {
        let snapshot = Snapshot::failed(
            PageIdentity::new("https://example.com", "Example"),
            None,
            "Invalid match pattern: [[",
        );
        assert!(!snapshot.is_ok());
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "url": "https://example.com",
                "title": "Example",
                "elements": [],
                "error": "Invalid match pattern: [[",
            })
        );
    }

    #[test]
    fn lookups() {
        let snapshot = Snapshot::new(PageIdentity::default(), Some(1_700_000_000_000)).with_elements(vec![
            ElementDescriptor::new("button", "#save").with_text("Save Draft"),
            ElementDescriptor::new("a", "a.nav.link").with_text("Docs"),
        ]);
        assert_eq!(snapshot.element_count(), 2);
        assert_eq!(snapshot.find_elements_by_tag("a").len(), 1);
        assert_eq!(snapshot.find_elements_by_text("draft")[0].selector, "#save");
        assert!(snapshot.find_by_selector("a.nav.link").is_some());
        assert!(snapshot.to_json_pretty().unwrap().contains("\"timestamp\": 1700000000000"));
    }
}
