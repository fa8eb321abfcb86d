//! Parsing context for HTML extraction

use url::Url;

use super::{ParsingError, ParsingResult};

/// Context information for listing page parsing
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Listing page number being parsed (1-based)
    pub page_id: u32,

    /// URL the page was fetched from; relative product links resolve against it
    pub base_url: String,
}

impl ParseContext {
    pub fn new(page_id: u32, base_url: impl Into<String>) -> Self {
        Self {
            page_id,
            base_url: base_url.into(),
        }
    }

    /// Resolve a card link into an absolute URL
    pub fn resolve_url(&self, href: &str) -> ParsingResult<String> {
        let href = href.trim();
        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute.to_string());
        }

        let base = Url::parse(&self.base_url)
            .map_err(|e| ParsingError::url_resolution_failed(&self.base_url, format!("Invalid base URL: {e}"), None))?;

        base.join(href)
            .map(|url| url.to_string())
            .map_err(|e| ParsingError::url_resolution_failed(href, e, Some(&self.base_url)))
    }
}

/// Context for a product detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Detail page URL
    pub url: String,

    /// Position of the record in the collected list, for log messages
    pub index: usize,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>, index: usize) -> Self {
        Self {
            url: url.into(),
            index,
        }
    }
}
