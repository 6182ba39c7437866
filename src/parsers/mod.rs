pub mod detail;
pub mod listing;
pub mod source;

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// Every anchor in a document
pub(crate) static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));

/// Non-empty `href` of an anchor
pub(crate) fn href<'a>(anchor: &ElementRef<'a>) -> Option<&'a str> {
    anchor.value().attr("href").filter(|href| !href.is_empty())
}

/// Concatenated text of an element and its descendants
pub(crate) fn text_content(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
