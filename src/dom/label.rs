//! Human-readable labels for candidates.

use crate::dom::text::inner_text;
use crate::dom::Candidate;

pub const LABEL_SOURCES_VERSION: u32 = 1;

pub type LabelExtractor = for<'a, 'b> fn(&'b Candidate<'a>) -> Option<String>;

pub struct LabelSource {
    pub name: &'static str,
    pub extract: LabelExtractor,
}

impl std::fmt::Debug for LabelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelSource").field("name", &self.name).finish()
    }
}

pub static LABEL_SOURCES: [LabelSource; 5] = [
    LabelSource {
        name: "inner-text",
        extract: |c| Some(inner_text(c.element)),
    },
    LabelSource {
        name: "aria-label",
        extract: |c| c.raw_attr("aria-label").map(str::to_string),
    },
    LabelSource {
        name: "title",
        extract: |c| c.raw_attr("title").map(str::to_string),
    },
    LabelSource {
        name: "placeholder",
        extract: |c| c.raw_attr("placeholder").map(str::to_string),
    },
    LabelSource {
        name: "value",
        extract: |c| c.raw_attr("value").map(str::to_string),
    },
];

/// First non-empty trimmed value among `sources`, cut to `max_chars`.
pub fn extract_label(
    candidate: &Candidate<'_>,
    sources: &[LabelSource],
    max_chars: usize,
) -> Option<String> {
    sources
        .iter()
        .filter_map(|source| (source.extract)(candidate))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(|value| truncate_chars(value, max_chars))
        .filter(|value| !value.is_empty())
}

fn truncate_chars(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => value[..end].trim_end().to_string(),
        None => value,
    }
}
