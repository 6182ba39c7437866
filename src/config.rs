use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

/// Default site crawled when no base URL is given
pub const DEFAULT_BASE_URL: &str = "https://putusan3.mahkamahagung.go.id";

/// Configuration for the yurisprudensi crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme and host of the site, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// First listing page index to fetch
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Number of listing pages to fetch
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Directory the PDFs are written to (created if missing)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Number of concurrent download workers
    #[serde(default = "default_max_downloads")]
    pub max_downloads: usize,

    /// Pending downloads held before discovery waits
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Reject bodies that do not start with a PDF header
    #[serde(default)]
    pub verify_pdf: bool,

    /// Stop paginating at the first listing page without detail links
    #[serde(default)]
    pub stop_on_empty_page: bool,

    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Rule deciding which listing anchors are content links
    #[serde(default)]
    pub content_link_rule: ContentLinkRuleConfig,

    /// Certificate validation policy
    #[serde(default)]
    pub tls: TlsPolicy,
}

/// Which anchors on a listing page count as content links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentLinkRuleConfig {
    /// Anchors without any `class` attribute
    #[default]
    NoClass,

    /// Anchors carrying none of the listed classes
    ClassDenylist { classes: Vec<String> },
}

/// Trust relaxation for servers with unverifiable certificates.
///
/// When `accept_invalid_certs` is set, certificate validation is skipped for
/// the base host and every host in `insecure_hosts`, or for all hosts when
/// `trust_all_hosts` is also set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsPolicy {
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    #[serde(default)]
    pub trust_all_hosts: bool,

    #[serde(default)]
    pub insecure_hosts: Vec<String>,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        Self {
            accept_invalid_certs: default_accept_invalid_certs(),
            trust_all_hosts: false,
            insecure_hosts: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_total_pages() -> u32 {
    1
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("yurisprudensi")
}

fn default_max_downloads() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    64
}

/// The target host serves certificates that do not verify
fn default_accept_invalid_certs() -> bool {
    true
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CrawlerConfig {
    /// Create a new configuration with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            start_page: default_start_page(),
            total_pages: default_total_pages(),
            output_dir: default_output_dir(),
            max_downloads: default_max_downloads(),
            queue_capacity: default_queue_capacity(),
            verify_pdf: false,
            stop_on_empty_page: false,
            request_timeout_secs: None,
            content_link_rule: ContentLinkRuleConfig::default(),
            tls: TlsPolicy::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| CrawlError::io(path, e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CrawlError::io(path, e))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Parsed base URL
    pub fn base(&self) -> Result<Url, CrawlError> {
        Url::parse(&self.base_url).map_err(|e| CrawlError::invalid_url(&self.base_url, e))
    }

    /// Last listing page index, inclusive
    pub fn end_page(&self) -> u32 {
        self.start_page
            .saturating_add(self.total_pages.saturating_sub(1))
    }

    /// Reject values the crawler cannot run with
    pub fn validate(&self) -> Result<(), CrawlError> {
        let base = self.base()?;
        if base.host_str().is_none() {
            return Err(CrawlError::Config(format!(
                "base URL {} has no host",
                self.base_url
            )));
        }
        if self.start_page == 0 {
            return Err(CrawlError::Config("start_page must be at least 1".into()));
        }
        if self.total_pages == 0 {
            return Err(CrawlError::Config("total_pages must be at least 1".into()));
        }
        if self.start_page.checked_add(self.total_pages - 1).is_none() {
            return Err(CrawlError::Config(format!(
                "{} pages starting at page {} exceed the largest page index",
                self.total_pages, self.start_page
            )));
        }
        if self.max_downloads == 0 {
            return Err(CrawlError::Config(
                "max_downloads must be at least 1".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(CrawlError::Config(
                "queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
