//! Locator synthesis.
//!
//! Each candidate gets exactly one CSS selector, chosen by walking an ordered
//! rule list and taking the first rule that applies. Earlier rules key on
//! identifying attributes; the last one is positional and always applies, so
//! it breaks when siblings are reordered.

use crate::dom::Candidate;

pub const SELECTOR_RULES_VERSION: u32 = 1;

pub type RulePredicate = for<'a, 'b> fn(&'b Candidate<'a>) -> bool;
pub type RuleBuilder = for<'a, 'b> fn(&'b Candidate<'a>) -> String;

pub struct SelectorRule {
    pub name: &'static str,
    pub applies: RulePredicate,
    pub build: RuleBuilder,
}

impl std::fmt::Debug for SelectorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorRule").field("name", &self.name).finish()
    }
}

pub static SELECTOR_PRIORITY: [SelectorRule; 6] = [
    SelectorRule {
        name: "data-testid",
        applies: |c| c.attr("data-testid").is_some(),
        build: |c| attribute_selector("", "data-testid", c.attr("data-testid").unwrap_or_default()),
    },
    SelectorRule {
        name: "id",
        applies: |c| c.attr("id").is_some(),
        build: |c| format!("#{}", css_escape(c.attr("id").unwrap_or_default())),
    },
    SelectorRule {
        name: "name",
        applies: |c| c.attr("name").is_some(),
        build: |c| attribute_selector(c.tag(), "name", c.attr("name").unwrap_or_default()),
    },
    SelectorRule {
        name: "class",
        applies: |c| first_classes(c).next().is_some(),
        build: |c| {
            let classes: Vec<String> = first_classes(c).map(css_escape).collect();
            format!("{}.{}", c.tag(), classes.join("."))
        },
    },
    SelectorRule {
        name: "aria-label",
        applies: |c| c.attr("aria-label").is_some(),
        build: |c| attribute_selector(c.tag(), "aria-label", c.attr("aria-label").unwrap_or_default()),
    },
    SelectorRule {
        name: "nth-child",
        applies: |_| true,
        build: |c| format!("{}:nth-child({})", c.tag(), sibling_position(c)),
    },
];

/// First applicable rule's selector. Falls back to the bare tag if the list
/// has no catch-all rule.
pub fn synthesize(candidate: &Candidate<'_>, rules: &[SelectorRule]) -> String {
    rules
        .iter()
        .find(|rule| (rule.applies)(candidate))
        .map(|rule| (rule.build)(candidate))
        .unwrap_or_else(|| candidate.tag().to_string())
}

/// 1-based position among the parent's element children.
pub fn sibling_position(candidate: &Candidate<'_>) -> usize {
    candidate
        .element
        .prev_siblings()
        .filter(|node| node.value().is_element())
        .count()
        + 1
}

fn first_classes<'a>(candidate: &Candidate<'a>) -> impl Iterator<Item = &'a str> {
    candidate
        .raw_attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .take(2)
}

fn attribute_selector(tag: &str, attribute: &str, value: &str) -> String {
    format!("{}[{}=\"{}\"]", tag, attribute, escape_attribute_value(value))
}

fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Identifier escaping with the same rules as `CSS.escape`.
pub fn css_escape(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut escaped = String::with_capacity(ident.len());

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\0' => escaped.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => escaped.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if i == 0 || (i == 1 && chars[0] == '-') => {
                escaped.push_str(&format!("\\{:x} ", c as u32))
            }
            '-' if i == 0 && chars.len() == 1 => escaped.push_str("\\-"),
            c if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                escaped.push(c)
            }
            _ => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }
    escaped
}
