//! Small scraper helpers shared by page and listing extractors.
//!
//! ### Text rules
//! - Element text is the concatenation of every descendant text node, trimmed.
//! - Rich text blocks keep `<br>` as `\n`; every other tag is dropped.
//! - Missing elements and attributes read as `None`, never as errors.

pub mod normalize;

pub use normalize::{normalize_date, published_year};

use scraper::{ElementRef, Node, Selector};

/// Parse a CSS selector known at compile time.
///
/// Panics on an invalid selector, so only call it with literals.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First descendant of `scope` matching `selector`.
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Trimmed text of the first match, or `None` when nothing matches.
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    select_first(scope, selector).map(element_text)
}

/// Trimmed text of every match, skipping empty ones.
pub fn all_texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope.select(selector).map(element_text).filter(|t| !t.is_empty()).collect()
}

/// Attribute value of an element, ignoring blank values.
pub fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// Text of a rich-text block with `<br>` turned into newlines and tags stripped.
pub fn text_with_breaks(element: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name().eq_ignore_ascii_case("br") => out.push('\n'),
            _ => {}
        }
    }

    out.trim().to_string()
}
