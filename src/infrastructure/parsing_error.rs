//! Parsing error types
//!
//! Extraction itself never fails: a selector that matches nothing simply leaves
//! the field empty. These errors cover the configuration side, i.e. selector
//! strings that do not compile and links that cannot be turned into absolute URLs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("No selectors configured for {field}")]
    NoSelectors { field: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(field: &str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a URL resolution error
    pub fn url_resolution_failed(url: &str, reason: impl ToString, base_url: Option<&str>) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: base_url.map(str::to_string),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
