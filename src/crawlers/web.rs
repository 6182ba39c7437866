use crate::config::CrawlerConfig;
use crate::crawlers::fetcher::HttpFetcher;
use crate::crawlers::resolver;
use crate::downloader::{DownloadOptions, DownloadPool};
use crate::error::CrawlError;
use crate::filter::LinkFilter;
use crate::parsers::listing;
use crate::results::CrawlSummary;
use std::sync::Arc;
use std::time::Duration;

/// Crawls the configured listing pages and downloads every PDF found.
///
/// Listing and detail pages are fetched one at a time, in order. Downloads run
/// on a bounded pool and are all awaited before this returns. Only an invalid
/// configuration or an unusable output directory aborts the run; every other
/// failure is logged and counted in the summary.
pub async fn run(config: &CrawlerConfig) -> Result<CrawlSummary, CrawlError> {
    config.validate()?;
    let base = config.base()?;

    let filter = LinkFilter::with_rule(&config.base_url, config.content_link_rule.build())?;
    let fetcher = Arc::new(HttpFetcher::new(
        &config.tls,
        base.host_str(),
        config.request_timeout_secs.map(Duration::from_secs),
    )?);

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| CrawlError::io(&config.output_dir, e))?;
    ::log::info!("Saving PDFs to {}", config.output_dir.display());

    let pool = DownloadPool::spawn(
        Arc::clone(&fetcher),
        DownloadOptions {
            output_dir: config.output_dir.clone(),
            max_downloads: config.max_downloads,
            queue_capacity: config.queue_capacity,
            verify_pdf: config.verify_pdf,
        },
    );

    let mut summary = CrawlSummary::default();
    crawl_listing(config, &fetcher, &filter, &pool, &mut summary).await;

    ::log::info!("Waiting for queued downloads to finish");
    let outcomes = pool.finish().await;
    summary.record_downloads(&outcomes);

    ::log::info!(
        "Crawl complete - {} pages ({} failed), {} details ({} without source, {} failed), {} PDFs saved, {} failed",
        summary.pages_crawled,
        summary.pages_failed,
        summary.details_resolved,
        summary.details_without_source,
        summary.details_failed,
        summary.downloads_saved,
        summary.downloads_failed
    );
    Ok(summary)
}

async fn crawl_listing(
    config: &CrawlerConfig,
    fetcher: &HttpFetcher,
    filter: &LinkFilter,
    pool: &DownloadPool,
    summary: &mut CrawlSummary,
) {
    for page in config.start_page..=config.end_page() {
        let url = filter.listing_url(page);
        ::log::info!("URL : {}", url);

        let listing_page = match fetcher.fetch_page(&url).await {
            Ok(listing_page) => listing_page,
            Err(e) => {
                ::log::error!("Error fetching listing page {}: {}", page, e);
                summary.pages_failed += 1;
                continue;
            }
        };
        summary.pages_crawled += 1;

        let detail_urls = listing::extract_detail_links(&listing_page.html, filter);
        ::log::info!("Found {} detail links on page {}", detail_urls.len(), page);

        if detail_urls.is_empty() {
            summary.pages_empty += 1;
            if config.stop_on_empty_page {
                ::log::info!("Page {} has no detail links, stopping", page);
                break;
            }
            continue;
        }

        for detail_url in &detail_urls {
            if !crawl_detail(fetcher, filter, pool, detail_url, summary).await {
                // Queue closed: workers are gone, nothing more can be downloaded
                return;
            }
        }
    }
}

/// Returns false once the download queue stops accepting work
async fn crawl_detail(
    fetcher: &HttpFetcher,
    filter: &LinkFilter,
    pool: &DownloadPool,
    detail_url: &str,
    summary: &mut CrawlSummary,
) -> bool {
    let resolution = match resolver::resolve(fetcher, filter, detail_url).await {
        Ok(resolution) => resolution,
        Err(e) => {
            ::log::error!("Error: {} ({})", e, detail_url);
            summary.details_failed += 1;
            return true;
        }
    };

    if resolution.source_url.is_none() {
        summary.details_without_source += 1;
        return true;
    }
    summary.details_resolved += 1;

    for reference in resolution.references {
        if let Err(e) = pool.submit(reference).await {
            ::log::error!("Failed to queue download from {}: {}", detail_url, e);
            return false;
        }
    }
    true
}
