use crate::dom::profile::ExtractionProfile;
use crate::dom::dedup::DedupKey;
use crate::dom::Candidate;
use serde::{Deserialize, Serialize};
use url::Url;

/// One extracted element, as handed to downstream automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    pub selector: String,
    pub text: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    #[serde(rename = "data-testid")]
    pub data_testid: Option<String>,
    #[serde(rename = "aria-label")]
    pub aria_label: Option<String>,
    #[serde(flatten)]
    pub extended: Option<ExtendedFields>,
}

/// Fields emitted only under the extended profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFields {
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub href: Option<String>,
    pub contenteditable: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "className")]
    pub class_name: Option<String>,
    pub id: Option<String>,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            selector: selector.into(),
            text: None,
            name: None,
            placeholder: None,
            data_testid: None,
            aria_label: None,
            extended: None,
        }
    }

    /// Builds the descriptor for a classified candidate. `base_url` resolves
    /// relative `href` values the way the DOM `href` property does.
    pub fn describe(
        candidate: &Candidate<'_>,
        selector: String,
        label: Option<String>,
        profile: &ExtractionProfile,
        base_url: Option<&Url>,
    ) -> Self {
        let attr = |name: &str| candidate.raw_attr(name).map(str::to_string);

        let extended = profile.extended_fields.then(|| ExtendedFields {
            input_type: attr("type"),
            href: candidate
                .raw_attr("href")
                .map(|href| resolve_href(href, base_url)),
            contenteditable: attr("contenteditable"),
            role: attr("role"),
            class_name: attr("class"),
            id: attr("id"),
        });

        Self {
            tag: candidate.tag().to_ascii_lowercase(),
            selector,
            text: label,
            name: attr("name"),
            placeholder: attr("placeholder"),
            data_testid: attr("data-testid"),
            aria_label: attr("aria-label"),
            extended,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        (self.tag.clone(), self.text.clone())
    }

    pub fn href(&self) -> Option<&str> {
        self.extended.as_ref()?.href.as_deref()
    }
}

fn resolve_href(href: &str, base_url: Option<&Url>) -> String {
    base_url
        .and_then(|base| base.join(href.trim()).ok())
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|| href.to_string())
}
