//! HTML parsing infrastructure
//!
//! Trait-based extraction of listing cards and detail page fields. Selector
//! strings come from [`ParsingConfig`]; the parsers compile them once and never
//! fail on page content.

pub mod config;
pub mod context;
pub mod error;
pub mod product_detail_parser;
pub mod product_list_parser;

pub use config::{ParsingConfig, ProductDetailSelectors, ProductListSelectors};
pub use context::{DetailParseContext, ParseContext};
pub use error::{ParsingError, ParsingResult};
pub use product_detail_parser::ProductDetailParser;
pub use product_list_parser::ProductListParser;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

/// Parser that needs page-level context next to the document
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse an already loaded document. Missing markup yields empty output, not an error.
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}

/// Compile a list of fallback selectors for one field
pub(crate) fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    if selector_strings.is_empty() {
        return Err(ParsingError::NoSelectors {
            field: field.to_string(),
        });
    }

    selector_strings
        .iter()
        .map(|selector_str| {
            Selector::parse(selector_str).map_err(|e| {
                warn!("Failed to compile selector '{}' for {}: {}", selector_str, field, e);
                ParsingError::invalid_selector(field, selector_str, e)
            })
        })
        .collect()
}

/// First element matched by any selector, trying them in order
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// All elements matched by the first selector that matches anything
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| scope.select(selector).collect::<Vec<_>>())
        .find(|elements| !elements.is_empty())
        .unwrap_or_default()
}

/// Element text with every text node trimmed and the pieces glued together
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Element text with every text node trimmed, empty pieces dropped, joined by `separator`
pub(crate) fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Text of an element whose content is one string, possibly wrapped in single-child tags.
/// Mixed content yields `None`.
pub(crate) fn single_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }

    match only.value() {
        Node::Text(text) => Some(text.trim().to_string()),
        Node::Element(_) => ElementRef::wrap(only).and_then(single_string),
        _ => None,
    }
}
