//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors. Each field takes an ordered list of selectors; the
//! first one that matches wins. When the directory site changes its markup these
//! strings are the only thing that has to follow.

use serde::{Deserialize, Serialize};

fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Main parsing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Listing (search result) page selectors
    pub product_list_selectors: ProductListSelectors,

    /// Product detail page selectors
    pub product_detail_selectors: ProductDetailSelectors,
}

/// CSS selectors for listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListSelectors {
    /// One match per product card
    pub product_container: Vec<String>,

    /// Anchor holding the product title and its detail page link (relative to the card)
    pub product_link: Vec<String>,

    /// Price text such as `₹120/Piece`
    pub price: Vec<String>,

    /// Supplier display name
    pub supplier_name: Vec<String>,

    /// Supplier city / locality
    pub supplier_location: Vec<String>,
}

impl Default for ProductListSelectors {
    fn default() -> Self {
        Self {
            product_container: selectors(&["div.listingCardContainer div.card"]),
            product_link: selectors(&["div.producttitle a.cardlinks"]),
            price: selectors(&["p.price"]),
            supplier_name: selectors(&["div.companyname a.cardlinks"]),
            supplier_location: selectors(&["div.newLocationUi span:first-child"]),
        }
    }
}

/// CSS selectors for product detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetailSelectors {
    /// Key/value specification table
    pub spec_table: Vec<String>,
    pub spec_row: Vec<String>,
    /// Label cell, relative to a row
    pub spec_key: Vec<String>,
    /// Value cell, relative to a row
    pub spec_value: Vec<String>,

    /// Free-text description block
    pub description: Vec<String>,

    /// Candidates for the supplier tenure span; the first containing `member_since_marker` wins
    pub member_since: Vec<String>,
    pub member_since_marker: String,

    /// Supplier rating container and its children
    pub rating_container: Vec<String>,
    pub rating_value: Vec<String>,
    pub reviews_count: Vec<String>,
}

impl Default for ProductDetailSelectors {
    fn default() -> Self {
        Self {
            spec_table: selectors(&["div.isq-container table"]),
            spec_row: selectors(&["tr"]),
            spec_key: selectors(&["td.tdwdt"]),
            spec_value: selectors(&["td.tdwdt1 span.datatooltip"]),
            description: selectors(&["div#descp2 div.pro-descN"]),
            member_since: selectors(&["span.fs10"]),
            member_since_marker: "Member:".to_string(),
            rating_container: selectors(&["div#slr_rtng"]),
            rating_value: selectors(&["span.bo.color"]),
            reviews_count: selectors(&["span.tcund"]),
        }
    }
}
