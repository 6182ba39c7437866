use clap::Parser;
use std::path::PathBuf;
use yurisprudensi::{Crawl, CrawlError};

#[derive(Parser, Debug)]
#[command(name = "yurisprudensi")]
#[command(about = "Downloads jurisprudence decision PDFs from the Mahkamah Agung directory")]
#[command(version)]
pub struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the site
    #[arg(long)]
    pub base_url: Option<String>,

    /// Number of listing pages to crawl
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// First listing page index
    #[arg(long)]
    pub start_page: Option<u32>,

    /// Directory PDFs are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of concurrent downloads
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Reject downloads that do not start with a PDF header
    #[arg(long)]
    pub verify_pdf: bool,

    /// Stop at the first listing page without detail links
    #[arg(long)]
    pub stop_on_empty: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Validate certificates for every host, including the base host
    #[arg(long)]
    pub strict_tls: bool,
}

impl Args {
    /// Build the crawl from the config file (if any) and the flag overrides
    pub fn into_crawl(self) -> Result<Crawl, CrawlError> {
        let mut crawl = match &self.config {
            Some(path) => Crawl::from_config_file(path)?,
            None => Crawl::new(yurisprudensi::config::DEFAULT_BASE_URL),
        };

        if let Some(base_url) = &self.base_url {
            crawl = crawl.with_base_url(base_url);
        }
        if let Some(pages) = self.pages {
            crawl = crawl.with_total_pages(pages);
        }
        if let Some(start_page) = self.start_page {
            crawl = crawl.with_start_page(start_page);
        }
        if let Some(output_dir) = self.output_dir {
            crawl = crawl.with_output_dir(output_dir);
        }
        if let Some(concurrency) = self.concurrency {
            crawl = crawl.with_max_downloads(concurrency);
        }
        if let Some(timeout) = self.timeout {
            crawl = crawl.with_request_timeout(timeout);
        }
        if self.verify_pdf {
            crawl = crawl.with_verify_pdf(true);
        }
        if self.stop_on_empty {
            crawl = crawl.with_stop_on_empty_page(true);
        }
        if self.strict_tls {
            crawl = crawl.with_accept_invalid_certs(false);
        }

        Ok(crawl)
    }
}
