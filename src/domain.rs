//! Domain module - product records and their field rules

pub mod product;

pub use product::{ProductDetail, ProductRecord, FIELD_NAMES};
