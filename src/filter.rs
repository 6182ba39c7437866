use crate::config::ContentLinkRuleConfig;
use regex::Regex;
use scraper::node::Element;
use std::fmt::Debug;

/// Decides whether a listing anchor is a content link rather than navigation
pub trait ContentLinkRule: Debug + Send + Sync {
    fn is_content_link(&self, anchor: &Element) -> bool;
}

/// Content links carry no `class` attribute at all.
///
/// Navigation, pagination and buttons on the listing page are all styled, so
/// this is tied to the site's current markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassAttribute;

impl ContentLinkRule for NoClassAttribute {
    fn is_content_link(&self, anchor: &Element) -> bool {
        anchor.attr("class").is_none()
    }
}

/// Content links carry none of the denied classes
#[derive(Debug, Clone)]
pub struct ClassDenylist {
    classes: Vec<String>,
}

impl ClassDenylist {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }
}

impl ContentLinkRule for ClassDenylist {
    fn is_content_link(&self, anchor: &Element) -> bool {
        !anchor
            .classes()
            .any(|class| self.classes.iter().any(|denied| denied == class))
    }
}

impl ContentLinkRuleConfig {
    /// Build the rule this configuration names
    pub fn build(&self) -> Box<dyn ContentLinkRule> {
        match self {
            ContentLinkRuleConfig::NoClass => Box::new(NoClassAttribute),
            ContentLinkRuleConfig::ClassDenylist { classes } => {
                Box::new(ClassDenylist::new(classes.clone()))
            }
        }
    }
}

/// URL patterns for one site, plus the rule for listing anchors
#[derive(Debug)]
pub struct LinkFilter {
    base_url: String,
    detail_regex: Regex,
    pdf_regex: Regex,
    content_rule: Box<dyn ContentLinkRule>,
}

impl LinkFilter {
    /// Create a filter for `base_url` with the default content-link rule
    pub fn new(base_url: &str) -> Result<Self, regex::Error> {
        Self::with_rule(base_url, Box::new(NoClassAttribute))
    }

    /// Create a filter for `base_url` with a custom content-link rule
    pub fn with_rule(
        base_url: &str,
        content_rule: Box<dyn ContentLinkRule>,
    ) -> Result<Self, regex::Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = regex::escape(&base_url);

        let detail_regex = Regex::new(&format!(r"^{base}/yurisprudensi/detail/.*\.html$"))?;
        let pdf_regex = Regex::new(&format!(r"^{base}/direktori/download_file/[^/]+/pdf/[^/]+$"))?;

        Ok(Self {
            base_url,
            detail_regex,
            pdf_regex,
            content_rule,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of listing page `page`
    pub fn listing_url(&self, page: u32) -> String {
        format!("{}/yurisprudensi/index/page/{}.html", self.base_url, page)
    }

    /// Whether `href` has the shape of a detail page URL
    pub fn is_detail_url(&self, href: &str) -> bool {
        self.detail_regex.is_match(href)
    }

    /// Whether `href` has the shape of a PDF download URL
    pub fn is_pdf_url(&self, href: &str) -> bool {
        self.pdf_regex.is_match(href)
    }

    /// Whether a listing anchor is a content link per the configured rule
    pub fn is_content_link(&self, anchor: &Element) -> bool {
        self.content_rule.is_content_link(anchor)
    }
}
