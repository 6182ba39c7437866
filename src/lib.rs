pub mod config;
pub mod crawlers;
pub mod downloader;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod utils;

#[cfg(test)]
mod test_logger;

// Re-export commonly used types for convenience
pub use config::CrawlerConfig;
pub use error::CrawlError;
pub use results::{CrawlSummary, PdfReference};

use std::path::{Path, PathBuf};

/// Builder for a crawl of the yurisprudensi listing
pub struct Crawl {
    config: CrawlerConfig,
}

impl Crawl {
    /// Create a crawl of `base_url` with default settings
    pub fn new(base_url: &str) -> Self {
        Self {
            config: CrawlerConfig::new(base_url),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        Ok(Self::with_config(CrawlerConfig::from_file(path)?))
    }

    /// Use an existing configuration
    pub fn with_config(config: CrawlerConfig) -> Self {
        Self { config }
    }

    /// Point the crawl at another host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the first listing page index
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.config.start_page = page;
        self
    }

    /// Set the number of listing pages to crawl
    pub fn with_total_pages(mut self, pages: u32) -> Self {
        self.config.total_pages = pages;
        self
    }

    /// Set the directory PDFs are written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the number of concurrent downloads
    pub fn with_max_downloads(mut self, max_downloads: usize) -> Self {
        self.config.max_downloads = max_downloads;
        self
    }

    /// Reject downloads that are not PDF documents
    pub fn with_verify_pdf(mut self, verify: bool) -> Self {
        self.config.verify_pdf = verify;
        self
    }

    /// Stop at the first listing page without detail links
    pub fn with_stop_on_empty_page(mut self, stop: bool) -> Self {
        self.config.stop_on_empty_page = stop;
        self
    }

    /// Set a per-request timeout
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Enable or disable certificate validation bypass for the base host
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.tls.accept_invalid_certs = accept;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Run the crawl to completion, including all downloads
    pub async fn run(self) -> Result<CrawlSummary, CrawlError> {
        crawlers::web::run(&self.config).await
    }
}
