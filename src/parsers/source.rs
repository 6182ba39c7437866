use crate::filter::LinkFilter;
use crate::parsers::{ANCHOR_SELECTOR, href, text_content};
use crate::results::PdfReference;
use crate::utils::display_name;
use scraper::Html;

/// Extracts PDF download links from a source page, named after their anchor text
pub fn extract_pdf_references(html: &str, filter: &LinkFilter) -> Vec<PdfReference> {
    let doc = Html::parse_document(html);

    let references = doc
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| {
            let url = href(&anchor)?;
            if !filter.is_pdf_url(url) {
                return None;
            }
            Some(PdfReference {
                url: url.to_string(),
                display_name: display_name(&text_content(&anchor)),
            })
        })
        .collect::<Vec<PdfReference>>();

    ::log::debug!("Source parser found {} PDF links", references.len());
    references
}
