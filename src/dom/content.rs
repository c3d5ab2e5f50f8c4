//! Readable main-content text, with navigational chrome left out.

use crate::dom::collector::document_elements;
use crate::dom::text::append_text;
use crate::errors::{ExtractError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

const CHROME_PATTERNS: &[&str] = &[
    "header",
    "footer",
    "nav",
    "aside",
    "script",
    "style",
    "noscript",
    "iframe",
    "form",
    "[role=\"navigation\"]",
    "[role=\"banner\"]",
    "[role=\"complementary\"]",
    "[role=\"contentinfo\"]",
    ".header",
    ".footer",
    "#header",
    "#footer",
];

/// Tried in order; the first match outside chrome is the content region.
const REGION_PATTERNS: &[&str] = &["article", "main", ".post", "#content", "#main", ".main", "body"];

pub struct ContentExtractor {
    chrome: Selector,
    regions: Vec<Selector>,
    horizontal_space: Regex,
}

impl ContentExtractor {
    pub fn new() -> Result<Self> {
        let parse = |pattern: &str| {
            Selector::parse(pattern)
                .map_err(|e| ExtractError::InvalidPattern(format!("{}: {:?}", pattern, e)))
        };

        Ok(Self {
            chrome: parse(&CHROME_PATTERNS.join(", "))?,
            regions: REGION_PATTERNS
                .iter()
                .map(|pattern| parse(pattern))
                .collect::<Result<_>>()?,
            horizontal_space: Regex::new(r"[^\S\n]+")
                .map_err(|e| ExtractError::ConfigurationError(e.to_string()))?,
        })
    }

    pub fn extract(&self, document: &Html) -> String {
        let Some(region) = self.region(document) else {
            return String::new();
        };

        let mut raw = String::new();
        append_text(region, &mut raw, &|element| self.chrome.matches(&element));

        let collapsed = self.horizontal_space.replace_all(&raw, " ");
        collapsed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn region<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.regions
            .iter()
            .find_map(|selector| document.select(selector).find(|el| !self.in_chrome(*el)))
            .or_else(|| document_elements(document).next())
    }

    fn in_chrome(&self, element: ElementRef<'_>) -> bool {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .any(|el| self.chrome.matches(&el))
    }
}

/// Main-content text of `document`, or an empty string.
pub fn extract_main_text(document: &Html) -> String {
    match ContentExtractor::new() {
        Ok(extractor) => extractor.extract(document),
        Err(e) => {
            warn!(error = %e, "content extractor unavailable");
            String::new()
        }
    }
}
