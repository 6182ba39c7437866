use crate::parsers::{ANCHOR_SELECTOR, href, text_content};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Label of the box holding the link to the source document
pub const SOURCE_LABEL: &str = "Sumber Putusan";

static SOURCE_BOX_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.card.bg-success.mb-3").expect("static selector"));

/// Finds the source-document link on a detail page.
///
/// Looks at boxes styled `card bg-success mb-3` whose text contains
/// "Sumber Putusan" and returns the `href` of the first anchor inside them.
/// A first anchor without an `href` means there is no link.
pub fn source_link(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    doc.select(&SOURCE_BOX_SELECTOR)
        .filter(|card| text_content(card).contains(SOURCE_LABEL))
        .flat_map(|card| card.select(&ANCHOR_SELECTOR))
        .next()
        .and_then(|anchor| href(&anchor).map(|href| href.to_string()))
}
