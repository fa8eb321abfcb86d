//! Product detail parser
//!
//! Reads the specification table, description and supplier reputation block of
//! a product detail page into a [`ProductDetail`]. Each block is independent;
//! a block missing from the page leaves its fields as `None`.

use super::{
    compile_selectors, joined_text, select_all, select_first, single_string, stripped_text, ContextualParser,
    DetailParseContext, ParsingResult, ProductDetailSelectors,
};
use crate::domain::product::{normalize_spec_key, ProductDetail, ProductRecord};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for extracting detailed product information from product detail pages
pub struct ProductDetailParser {
    spec_table_selectors: Vec<Selector>,
    spec_row_selectors: Vec<Selector>,
    spec_key_selectors: Vec<Selector>,
    spec_value_selectors: Vec<Selector>,
    description_selectors: Vec<Selector>,
    member_since_selectors: Vec<Selector>,
    member_since_marker: String,
    rating_container_selectors: Vec<Selector>,
    rating_value_selectors: Vec<Selector>,
    reviews_count_selectors: Vec<Selector>,
}

impl ProductDetailParser {
    /// Create a new product detail parser with default configuration
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProductDetailSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ProductDetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            spec_table_selectors: compile_selectors("spec_table", &selectors.spec_table)?,
            spec_row_selectors: compile_selectors("spec_row", &selectors.spec_row)?,
            spec_key_selectors: compile_selectors("spec_key", &selectors.spec_key)?,
            spec_value_selectors: compile_selectors("spec_value", &selectors.spec_value)?,
            description_selectors: compile_selectors("description", &selectors.description)?,
            member_since_selectors: compile_selectors("member_since", &selectors.member_since)?,
            member_since_marker: selectors.member_since_marker.clone(),
            rating_container_selectors: compile_selectors("rating_container", &selectors.rating_container)?,
            rating_value_selectors: compile_selectors("rating_value", &selectors.rating_value)?,
            reviews_count_selectors: compile_selectors("reviews_count", &selectors.reviews_count)?,
        })
    }

    /// Parse a detail page body and fold the result into `record`.
    ///
    /// Only fields found on the page are written, so running this twice with the
    /// same body leaves the record unchanged after the first run.
    pub fn parse_into<'r>(
        &self,
        body: &str,
        context: &DetailParseContext,
        record: &'r mut ProductRecord,
    ) -> &'r mut ProductRecord {
        let html = Html::parse_document(body);
        let detail = self.parse_with_context(&html, context);
        record.apply_detail(detail);
        record
    }
}

impl ContextualParser for ProductDetailParser {
    type Output = ProductDetail;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let root = html.root_element();
        let mut detail = ProductDetail::default();

        self.extract_specifications(root, &mut detail);

        if let Some(description) = select_first(root, &self.description_selectors) {
            detail.description = Some(joined_text(description, " "));
        }

        detail.supplier_member_since = self.extract_member_since(root);

        if let Some(container) = select_first(root, &self.rating_container_selectors) {
            detail.supplier_rating = select_first(container, &self.rating_value_selectors).map(stripped_text);
            detail.supplier_reviews_count =
                select_first(container, &self.reviews_count_selectors).map(stripped_text);
        }

        debug!(
            "Parsed detail page #{} ({}): {}",
            context.index,
            context.url,
            if detail.is_empty() { "no fields found" } else { "ok" }
        );
        detail
    }
}

impl ProductDetailParser {
    /// Copy recognised rows of the key/value specification table
    fn extract_specifications(&self, root: ElementRef<'_>, detail: &mut ProductDetail) {
        let Some(table) = select_first(root, &self.spec_table_selectors) else {
            return;
        };

        for row in select_all(table, &self.spec_row_selectors) {
            let (Some(key_cell), Some(value_cell)) = (
                select_first(row, &self.spec_key_selectors),
                select_first(row, &self.spec_value_selectors),
            ) else {
                continue;
            };

            let key = normalize_spec_key(&stripped_text(key_cell));
            let value = stripped_text(value_cell);

            if !detail.set_spec_field(&key, value) {
                debug!("Ignoring unrecognised specification '{}'", key);
            }
        }
    }

    /// Supplier tenure, e.g. `Member: 5 yrs` becomes `5 yrs`.
    /// Only spans holding a single string are considered.
    fn extract_member_since(&self, root: ElementRef<'_>) -> Option<String> {
        let prefix = format!("{} ", self.member_since_marker);

        self.member_since_selectors.iter().find_map(|selector| {
            root.select(selector)
                .filter_map(single_string)
                .find(|text| text.contains(&self.member_since_marker))
                .map(|text| text.replace(&prefix, ""))
        })
    }
}
