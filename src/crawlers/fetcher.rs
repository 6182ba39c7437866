use crate::config::TlsPolicy;
use crate::error::CrawlError;
use crate::results::Page;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for listing, detail, source and PDF requests.
///
/// Holds a strict client and, when the TLS policy allows it, a relaxed client
/// that skips certificate validation for the trusted hosts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    strict: Client,
    relaxed: Option<Client>,
    trust_all_hosts: bool,
    insecure_hosts: Vec<String>,
}

impl HttpFetcher {
    /// Create a fetcher for `base_host` under `policy`
    pub fn new(
        policy: &TlsPolicy,
        base_host: Option<&str>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, CrawlError> {
        let strict = build_client(false, request_timeout)?;

        let relaxed = if policy.accept_invalid_certs {
            ::log::warn!(
                "Certificate validation disabled for {}",
                if policy.trust_all_hosts {
                    "all hosts".to_string()
                } else {
                    base_host
                        .into_iter()
                        .chain(policy.insecure_hosts.iter().map(String::as_str))
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            );
            Some(build_client(true, request_timeout)?)
        } else {
            None
        };

        let mut insecure_hosts = policy.insecure_hosts.clone();
        if let Some(host) = base_host {
            insecure_hosts.push(host.to_string());
        }

        Ok(Self {
            strict,
            relaxed,
            trust_all_hosts: policy.trust_all_hosts,
            insecure_hosts,
        })
    }

    /// Fetch a page and return its body as text
    pub async fn fetch_page(&self, url: &str) -> Result<Page, CrawlError> {
        let response = self.get(url).await?;
        let html = response
            .text()
            .await
            .map_err(|e| CrawlError::http(url, e))?;

        ::log::debug!("Fetched {} ({} bytes)", url, html.len());
        Ok(Page::new(url, html))
    }

    /// Start a GET and return the response with its body unread
    pub async fn fetch_stream(&self, url: &str) -> Result<Response, CrawlError> {
        self.get(url).await
    }

    async fn get(&self, url: &str) -> Result<Response, CrawlError> {
        let parsed = Url::parse(url).map_err(|e| CrawlError::invalid_url(url, e))?;

        self.client_for(&parsed)
            .get(parsed)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| CrawlError::http(url, e))
    }

    /// Whether certificate validation is skipped for `url`
    pub fn skips_validation(&self, url: &Url) -> bool {
        if self.relaxed.is_none() {
            return false;
        }
        if self.trust_all_hosts {
            return true;
        }
        url.host_str()
            .is_some_and(|host| self.insecure_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)))
    }

    fn client_for(&self, url: &Url) -> &Client {
        match &self.relaxed {
            Some(relaxed) if self.skips_validation(url) => relaxed,
            _ => &self.strict,
        }
    }
}

fn build_client(accept_invalid_certs: bool, timeout: Option<Duration>) -> Result<Client, CrawlError> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(accept_invalid_certs);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(CrawlError::Client)
}
