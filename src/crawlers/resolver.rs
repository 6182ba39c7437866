use crate::crawlers::fetcher::HttpFetcher;
use crate::error::CrawlError;
use crate::filter::LinkFilter;
use crate::parsers::{detail, source};
use crate::results::DetailResolution;
use url::Url;

/// Resolves a detail page to the PDF references on its source page.
///
/// A detail page without a "Sumber Putusan" link resolves to no references.
/// Fetch failures of either page are returned to the caller.
pub async fn resolve(
    fetcher: &HttpFetcher,
    filter: &LinkFilter,
    detail_url: &str,
) -> Result<DetailResolution, CrawlError> {
    let detail_page = fetcher.fetch_page(detail_url).await?;

    let Some(href) = detail::source_link(&detail_page.html) else {
        ::log::info!("No pdf link found");
        ::log::debug!("No source box on {}", detail_url);
        return Ok(DetailResolution {
            detail_url: detail_url.to_string(),
            ..DetailResolution::default()
        });
    };

    let source_url = Url::parse(detail_url)
        .and_then(|base| base.join(&href))
        .map_err(|e| CrawlError::invalid_url(&href, e))?
        .to_string();
    ::log::debug!("Source page for {}: {}", detail_url, source_url);

    let source_page = fetcher.fetch_page(&source_url).await?;
    let references = source::extract_pdf_references(&source_page.html, filter);
    ::log::info!("Found {} PDF links in {}", references.len(), source_url);

    Ok(DetailResolution {
        detail_url: detail_url.to_string(),
        source_url: Some(source_url),
        references,
    })
}
