use serde::{Deserialize, Serialize};

/// Export column order. The header row of the CSV file is exactly this list.
pub const FIELD_NAMES: [&str; 18] = [
    "product_name",
    "product_url",
    "product_price",
    "product_unit",
    "supplier_name",
    "supplier_location",
    "pdp_wattage",
    "pdp_brand",
    "pdp_body_material",
    "pdp_ip_rating",
    "pdp_usage/application",
    "pdp_lighting_color",
    "pdp_color_temperature",
    "pdp_country_of_origin",
    "pdp_description",
    "pdp_supplier_member_since",
    "pdp_supplier_rating",
    "pdp_supplier_reviews_count",
];

/// Product summary from a listing card, plus the detail fields filled in later
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: Option<String>,
    pub product_url: Option<String>,
    pub product_price: Option<String>,
    pub product_unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    #[serde(flatten)]
    pub detail: ProductDetail,
}

/// Fields only available on a product detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(rename = "pdp_wattage")]
    pub wattage: Option<String>,
    #[serde(rename = "pdp_brand")]
    pub brand: Option<String>,
    #[serde(rename = "pdp_body_material")]
    pub body_material: Option<String>,
    #[serde(rename = "pdp_ip_rating")]
    pub ip_rating: Option<String>,
    #[serde(rename = "pdp_usage/application")]
    pub usage_application: Option<String>,
    #[serde(rename = "pdp_lighting_color")]
    pub lighting_color: Option<String>,
    #[serde(rename = "pdp_color_temperature")]
    pub color_temperature: Option<String>,
    #[serde(rename = "pdp_country_of_origin")]
    pub country_of_origin: Option<String>,
    #[serde(rename = "pdp_description")]
    pub description: Option<String>,
    #[serde(rename = "pdp_supplier_member_since")]
    pub supplier_member_since: Option<String>,
    #[serde(rename = "pdp_supplier_rating")]
    pub supplier_rating: Option<String>,
    #[serde(rename = "pdp_supplier_reviews_count")]
    pub supplier_reviews_count: Option<String>,
}

impl ProductRecord {
    /// Project the record onto [`FIELD_NAMES`], `None` becoming an empty cell
    pub fn to_csv_row(&self) -> Vec<&str> {
        let d = &self.detail;
        [
            &self.product_name,
            &self.product_url,
            &self.product_price,
            &self.product_unit,
            &self.supplier_name,
            &self.supplier_location,
            &d.wattage,
            &d.brand,
            &d.body_material,
            &d.ip_rating,
            &d.usage_application,
            &d.lighting_color,
            &d.color_temperature,
            &d.country_of_origin,
            &d.description,
            &d.supplier_member_since,
            &d.supplier_rating,
            &d.supplier_reviews_count,
        ]
        .into_iter()
        .map(|field| field.as_deref().unwrap_or(""))
        .collect()
    }

    /// Overwrite detail fields with every value present in `detail`
    pub fn apply_detail(&mut self, detail: ProductDetail) {
        let ProductDetail {
            wattage,
            brand,
            body_material,
            ip_rating,
            usage_application,
            lighting_color,
            color_temperature,
            country_of_origin,
            description,
            supplier_member_since,
            supplier_rating,
            supplier_reviews_count,
        } = detail;

        let target = &mut self.detail;
        for (slot, value) in [
            (&mut target.wattage, wattage),
            (&mut target.brand, brand),
            (&mut target.body_material, body_material),
            (&mut target.ip_rating, ip_rating),
            (&mut target.usage_application, usage_application),
            (&mut target.lighting_color, lighting_color),
            (&mut target.color_temperature, color_temperature),
            (&mut target.country_of_origin, country_of_origin),
            (&mut target.description, description),
            (&mut target.supplier_member_since, supplier_member_since),
            (&mut target.supplier_rating, supplier_rating),
            (&mut target.supplier_reviews_count, supplier_reviews_count),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    /// Human readable label for progress messages
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or("<unnamed>")
    }
}

impl ProductDetail {
    /// Store a specification-table value under its normalized key.
    ///
    /// `key` must already be normalized (see [`normalize_spec_key`]). Only keys that
    /// name an existing `pdp_` field are stored; returns `false` for anything else.
    /// `usage_application` is mapped back to `pdp_usage/application`.
    pub fn set_spec_field(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "usage_application" => &mut self.usage_application,
            "wattage" => &mut self.wattage,
            "brand" => &mut self.brand,
            "body_material" => &mut self.body_material,
            "ip_rating" => &mut self.ip_rating,
            "lighting_color" => &mut self.lighting_color,
            "color_temperature" => &mut self.color_temperature,
            "country_of_origin" => &mut self.country_of_origin,
            "description" => &mut self.description,
            "supplier_member_since" => &mut self.supplier_member_since,
            "supplier_rating" => &mut self.supplier_rating,
            "supplier_reviews_count" => &mut self.supplier_reviews_count,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalize a specification-table label: spaces and slashes become `_`, then lowercase
pub fn normalize_spec_key(raw: &str) -> String {
    raw.replace(&[' ', '/'][..], "_").to_lowercase()
}

/// Split a listing price such as `₹120/Piece` into `("₹120", "/Piece")`.
///
/// Without a `/` the whole text is the price and the unit is empty. Only the
/// segment between the first and second `/` is kept as unit.
pub fn split_price(text: &str) -> (String, String) {
    let mut parts = text.split('/');
    match (parts.next(), parts.next()) {
        (Some(price), Some(unit)) => (price.trim().to_string(), format!("/{}", unit.trim())),
        _ => (text.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("₹120/Piece", "₹120", "/Piece")]
    #[case("₹120", "₹120", "")]
    #[case("₹ 1,450 / Box", "₹ 1,450", "/Box")]
    #[case("₹99/Piece/extra", "₹99", "/Piece")]
    fn test_split_price(#[case] input: &str, #[case] price: &str, #[case] unit: &str) {
        assert_eq!(split_price(input), (price.to_string(), unit.to_string()));
    }

    #[rstest]
    #[case("Usage/Application", "usage_application")]
    #[case("IP Rating", "ip_rating")]
    #[case("Country of Origin", "country_of_origin")]
    #[case("Wattage", "wattage")]
    fn test_normalize_spec_key(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_spec_key(raw), expected);
    }

    #[test]
    fn test_usage_application_maps_to_slash_field() {
        let mut detail = ProductDetail::default();
        assert!(detail.set_spec_field("usage_application", "Indoor".to_string()));
        assert_eq!(detail.usage_application.as_deref(), Some("Indoor"));
    }

    #[test]
    fn test_unknown_spec_key_is_dropped() {
        let mut detail = ProductDetail::default();
        assert!(!detail.set_spec_field("shape", "Round".to_string()));
        assert!(!detail.set_spec_field("usage/application", "Indoor".to_string()));
        assert!(detail.is_empty());
    }

    #[test]
    fn test_csv_row_has_all_columns() {
        let record = ProductRecord {
            product_name: Some("LED Bulb".to_string()),
            detail: ProductDetail {
                supplier_reviews_count: Some("(42)".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let row = record.to_csv_row();
        assert_eq!(row.len(), FIELD_NAMES.len());
        assert_eq!(row[0], "LED Bulb");
        assert_eq!(row[1], "");
        assert_eq!(row[17], "(42)");
    }

    #[test]
    fn test_serialized_keys_match_export_columns() {
        let value = serde_json::to_value(ProductRecord::default()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = FIELD_NAMES.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
