use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw HTML of a fetched page together with the URL it came from
#[derive(Debug, Clone)]
pub struct Page {
    /// URL of the page
    pub url: String,

    /// Response body decoded as text
    pub html: String,
}

impl Page {
    /// Create a new page instance
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// A PDF download link found on a source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfReference {
    /// Absolute download URL, matching the download pattern
    pub url: String,

    /// Anchor text with every `/` replaced by `_`
    pub display_name: String,
}

/// Outcome of resolving one detail page
#[derive(Debug, Clone, Default)]
pub struct DetailResolution {
    pub detail_url: String,

    /// URL found in the "Sumber Putusan" box, if any
    pub source_url: Option<String>,

    pub references: Vec<PdfReference>,
}

/// A PDF written to the output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Result of a single queued download
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Saved(DownloadedFile),
    Failed {
        url: String,
        file_name: String,
        error: String,
    },
}

impl DownloadOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DownloadOutcome::Saved(_))
    }
}

/// Counters reported at the end of a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub pages_crawled: usize,
    pub pages_failed: usize,
    pub pages_empty: usize,
    pub details_resolved: usize,
    pub details_without_source: usize,
    pub details_failed: usize,
    pub downloads_saved: usize,
    pub downloads_failed: usize,
}

impl CrawlSummary {
    /// Fold download outcomes into the counters
    pub fn record_downloads(&mut self, outcomes: &[DownloadOutcome]) {
        for outcome in outcomes {
            if outcome.is_saved() {
                self.downloads_saved += 1;
            } else {
                self.downloads_failed += 1;
            }
        }
    }
}
