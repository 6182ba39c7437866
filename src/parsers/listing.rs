use crate::filter::LinkFilter;
use crate::parsers::{ANCHOR_SELECTOR, href};
use scraper::Html;

/// Extracts detail-page URLs from a listing page.
///
/// An anchor qualifies when its `href` is non-empty, it is a content link per
/// the filter's rule, and the `href` has the detail-page shape. Order follows
/// the document and duplicates are kept.
pub fn extract_detail_links(html: &str, filter: &LinkFilter) -> Vec<String> {
    let doc = Html::parse_document(html);

    let links = doc
        .select(&ANCHOR_SELECTOR)
        .filter(|anchor| filter.is_content_link(anchor.value()))
        .filter_map(|anchor| href(&anchor))
        .filter(|href| filter.is_detail_url(href))
        .map(|href| href.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("Listing parser found {} detail links", links.len());
    links
}
