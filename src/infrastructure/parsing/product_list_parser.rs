//! Product list parser
//!
//! Extracts one [`ProductRecord`] per product card on a search result page.
//! Every field is looked up independently, so a card missing its price still
//! yields a record with the other fields set. A page without cards yields an
//! empty list, which the crawler reads as "no more pages".

use super::{
    compile_selectors, select_first, stripped_text, ContextualParser, ParseContext, ParsingResult,
    ProductListSelectors,
};
use crate::domain::product::{split_price, ProductRecord};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parser for extracting product summaries from listing pages
pub struct ProductListParser {
    product_container_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    supplier_name_selectors: Vec<Selector>,
    supplier_location_selectors: Vec<Selector>,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProductListSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ProductListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            product_container_selectors: compile_selectors("product_container", &selectors.product_container)?,
            link_selectors: compile_selectors("product_link", &selectors.product_link)?,
            price_selectors: compile_selectors("price", &selectors.price)?,
            supplier_name_selectors: compile_selectors("supplier_name", &selectors.supplier_name)?,
            supplier_location_selectors: compile_selectors("supplier_location", &selectors.supplier_location)?,
        })
    }

    /// Parse a raw listing page body
    pub fn parse_page(&self, body: &str, context: &ParseContext) -> Vec<ProductRecord> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }
}

impl ContextualParser for ProductListParser {
    type Output = Vec<ProductRecord>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let cards = super::select_all(html.root_element(), &self.product_container_selectors);

        if cards.is_empty() {
            debug!("No product cards found on page {}", context.page_id);
            return Vec::new();
        }

        debug!("Found {} product cards on page {}", cards.len(), context.page_id);

        cards
            .into_iter()
            .map(|card| self.extract_product_from_card(card, context))
            .collect()
    }
}

impl ProductListParser {
    fn extract_product_from_card(&self, card: ElementRef<'_>, context: &ParseContext) -> ProductRecord {
        let mut record = ProductRecord::default();

        if let Some(link) = select_first(card, &self.link_selectors) {
            record.product_name = Some(stripped_text(link));
            record.product_url = link
                .value()
                .attr("href")
                .map(str::trim)
                .filter(|href| is_detail_link(href))
                .and_then(|href| {
                    context
                        .resolve_url(href)
                        .map_err(|e| warn!("Dropping product link on page {}: {}", context.page_id, e))
                        .ok()
                });
        }

        if let Some(price) = select_first(card, &self.price_selectors) {
            let (amount, unit) = split_price(&stripped_text(price));
            record.product_price = Some(amount);
            record.product_unit = Some(unit);
        }

        record.supplier_name = select_first(card, &self.supplier_name_selectors).map(stripped_text);
        record.supplier_location = select_first(card, &self.supplier_location_selectors).map(stripped_text);

        record
    }
}

/// Empty and fragment-only hrefs point back at the listing page itself
fn is_detail_link(href: &str) -> bool {
    !href.is_empty() && !href.starts_with('#')
}
