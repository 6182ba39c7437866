use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the crawler and its download pool
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Request failed, or the server answered with a non-2xx status
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Building the HTTP client failed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Filesystem error while creating the output directory or writing a file
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A URL could not be parsed or joined
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A link pattern failed to compile
    #[error("invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The downloaded body does not start with a PDF header
    #[error("{url} did not return a PDF document")]
    NotPdf { url: String },

    /// The download queue was closed before a reference could be submitted
    #[error("download queue is closed")]
    QueueClosed,
}

impl CrawlError {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_url(url: &str, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            source,
        }
    }
}
