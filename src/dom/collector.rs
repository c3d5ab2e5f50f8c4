use crate::errors::{ExtractError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A node matched by the collector, borrowed from the parsed document.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub element: ElementRef<'a>,
    /// Position among all elements of the document, in document order.
    pub ordinal: usize,
}

impl<'a> Candidate<'a> {
    pub fn new(element: ElementRef<'a>, ordinal: usize) -> Self {
        Self { element, ordinal }
    }

    pub fn tag(&self) -> &'a str {
        self.element.value().name()
    }

    /// Attribute value, treating blank values as absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element
            .value()
            .attr(name)
            .filter(|value| !value.trim().is_empty())
    }

    /// Raw attribute value, blank values included.
    pub fn raw_attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.element.value().attr(name).is_some()
    }
}

/// Every element of the document in document order, the same sequence
/// `document.querySelectorAll('*')` walks in a browser. Template contents
/// live in a separate fragment there, so they are left out here too.
pub fn document_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| !inside_template(*element))
}

fn inside_template(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "template")
}

pub struct NodeCollector {
    patterns: Vec<Selector>,
}

impl NodeCollector {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Selector::parse(pattern)
                    .map_err(|e| ExtractError::InvalidPattern(format!("{}: {:?}", pattern, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Elements matching any pattern, in document order, each at most once.
    pub fn collect<'a>(&self, document: &'a Html) -> Vec<Candidate<'a>> {
        let candidates: Vec<_> = document_elements(document)
            .enumerate()
            .filter(|(_, element)| self.patterns.iter().any(|p| p.matches(element)))
            .map(|(ordinal, element)| Candidate::new(element, ordinal))
            .collect();

        debug!(
            patterns = self.patterns.len(),
            candidates = candidates.len(),
            "collected candidate nodes"
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_document_order_without_duplicates() {
        let document = Html::parse_document(
            r#"<div><button id="a" role="button">A</button><input name="b"><span role="button">C</span></div>"#,
        );
        let collector = NodeCollector::new(["input", "button", "[role=\"button\"]"]).unwrap();
        let candidates = collector.collect(&document);

        let tags: Vec<_> = candidates.iter().map(|c| c.tag()).collect();
        assert_eq!(tags, vec!["button", "input", "span"]);
    }

    #[test]
    fn ordinals_count_every_element() {
        let document = Html::parse_document("<p>x</p><button>go</button>");
        let collector = NodeCollector::new(["button"]).unwrap();
        let candidates = collector.collect(&document);

        // html, head, body, p, button
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ordinal, 4);
        let by_walk: Vec<_> = document_elements(&document)
            .map(|e| e.value().name().to_string())
            .collect();
        assert_eq!(by_walk, vec!["html", "head", "body", "p", "button"]);
    }

    #[test]
    fn template_contents_are_not_walked() {
        let document = Html::parse_document(
            "<template><div><button>t</button></div></template><button>real</button>",
        );
        let by_walk: Vec<_> = document_elements(&document)
            .map(|e| e.value().name().to_string())
            .collect();
        assert_eq!(by_walk, vec!["html", "head", "template", "body", "button"]);

        let collector = NodeCollector::new(["button"]).unwrap();
        let candidates = collector.collect(&document);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ordinal, 4);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = NodeCollector::new(["button", "[[nope"]).err().unwrap();
        assert!(matches!(err, ExtractError::InvalidPattern(ref msg) if msg.contains("[[nope")));
    }

    #[test]
    fn blank_attributes_count_as_absent() {
        let document = Html::parse_document(r#"<button id="  " name="go">x</button>"#);
        let collector = NodeCollector::new(["button"]).unwrap();
        let candidate = collector.collect(&document)[0];
        assert_eq!(candidate.attr("id"), None);
        assert_eq!(candidate.raw_attr("id"), Some("  "));
        assert_eq!(candidate.attr("name"), Some("go"));
    }
}
