use scraper::ElementRef;

/// Subtrees that never contribute rendered text.
pub const NON_TEXT_TAGS: &[&str] = &["script", "style", "template", "noscript"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr",
    "ul",
];

const CELL_TAGS: &[&str] = &["td", "th"];

/// Appends the text under `element`, breaking lines around block elements.
/// Children for which `skip` returns true are left out with their subtrees.
pub fn append_text<F>(element: ElementRef<'_>, out: &mut String, skip: &F)
where
    F: Fn(ElementRef<'_>) -> bool,
{
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let tag = child.value().name();
        if NON_TEXT_TAGS.contains(&tag) || skip(child) {
            continue;
        }
        if tag == "br" {
            out.push('\n');
            continue;
        }

        let separator = if BLOCK_TAGS.contains(&tag) {
            Some('\n')
        } else if CELL_TAGS.contains(&tag) {
            Some(' ')
        } else {
            None
        };

        out.extend(separator);
        append_text(child, out, skip);
        out.extend(separator);
    }
}

/// Rendered text of an element on a single line, whitespace runs collapsed.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    append_text(element, &mut raw, &|_| false);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn inline_text_is_joined_and_collapsed() {
        let document = Html::parse_document(
            "<button>\n  Save <b>all</b>\n  chan<i>ges</i>  <script>track()</script></button>",
        );
        assert_eq!(inner_text(first(&document, "button")), "Save all changes");
    }

    #[test]
    fn blocks_break_lines() {
        let document = Html::parse_document("<div><p>one</p><p>two</p>three<br>four</div>");
        let mut out = String::new();
        append_text(first(&document, "div"), &mut out, &|_| false);
        let lines: Vec<_> = out.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn skipped_children_are_left_out() {
        let document = Html::parse_document("<div>keep<nav>drop</nav><span>also</span></div>");
        let mut out = String::new();
        append_text(first(&document, "div"), &mut out, &|el| el.value().name() == "nav");
        assert_eq!(out, "keepalso");
    }
}
