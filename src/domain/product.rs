//! Product master data.

use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::{bool_field, first_row, text_field};

/// Body sent to the product create and update endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPayload {
    #[validate(length(
        min = 2,
        max = 255,
        message = "Product Name must be at least 2 characters."
    ))]
    pub product_name: String,
    #[serde(rename = "HSNCode")]
    #[validate(length(max = 20, message = "HSN Code cannot exceed 20 characters"))]
    pub hsn_code: String,
    pub product_description: String,
    #[validate(range(exclusive_min = 0.0, message = "Unit Price must be positive"))]
    pub unit_price: f64,
    #[validate(range(exclusive_min = 0.0, message = "Opening Units must be positive"))]
    pub opening_units: f64,
    #[validate(range(exclusive_min = 0.0, message = "Opening Balance must be positive"))]
    pub opening_balance: f64,
    pub is_active: bool,
}

/// Selectable HSN classification code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HsnOption {
    pub label: String,
    pub value: String,
}

/// Product as returned by the backend detail endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductDetails {
    pub hsn_options: Vec<HsnOption>,
    /// `None` when the backend has no product row (e.g. for `pid=0`).
    pub product: Option<ProductPayload>,
}

fn number_field(object: &Value, key: &str) -> f64 {
    match object.get(key) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or_default(),
        Some(Value::String(text)) => text.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

impl ProductDetails {
    /// `table` carries HSN options as `{c1: label, c2: value}` and `table1`
    /// the product row.
    pub fn from_api(details: &Value) -> Self {
        let hsn_options = details
            .get("table")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| HsnOption {
                        label: text_field(row, "c1"),
                        value: text_field(row, "c2"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let product = first_row(details, "table1").map(|row| ProductPayload {
            product_name: text_field(row, "productName"),
            hsn_code: text_field(row, "hsnCode"),
            product_description: text_field(row, "productDescription"),
            unit_price: number_field(row, "unitPrice"),
            opening_units: number_field(row, "openingUnits"),
            opening_balance: number_field(row, "openingBalance"),
            is_active: bool_field(row, "isActive"),
        });

        Self {
            hsn_options,
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn incense() -> ProductPayload {
        ProductPayload {
            product_name: "Aggarbatti".to_string(),
            hsn_code: "3307".to_string(),
            product_description: "Incense sticks".to_string(),
            unit_price: 100.0,
            opening_units: 10.0,
            opening_balance: 1000.0,
            is_active: true,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(incense().validate().is_ok());
    }

    #[test]
    fn amounts_must_be_strictly_positive() {
        let mut product = incense();
        product.unit_price = 0.0;
        product.opening_units = -1.0;
        let errors = product.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("unit_price"));
        assert!(fields.contains_key("opening_units"));
        assert!(!fields.contains_key("opening_balance"));
    }

    #[test]
    fn name_and_hsn_lengths_are_checked() {
        let mut product = incense();
        product.product_name = "A".to_string();
        product.hsn_code = "1".repeat(21);
        let errors = product.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("product_name"));
        assert!(errors.field_errors().contains_key("hsn_code"));
    }

    #[test]
    fn payload_uses_backend_key_names() {
        let value = serde_json::to_value(incense()).unwrap();
        assert_eq!(value["ProductName"], "Aggarbatti");
        assert_eq!(value["HSNCode"], "3307");
        assert_eq!(value["IsActive"], true);
        assert_eq!(value["UnitPrice"], 100.0);
    }

    #[test]
    fn maps_detail_response() {
        let details = ProductDetails::from_api(&json!({
            "table": [{"c1": "3307 - Perfumery", "c2": "3307"}],
            "table1": [{"productName": "Sambrani Cup", "unitPrice": "200", "openingUnits": 5, "isActive": 1}]
        }));

        assert_eq!(details.hsn_options[0].value, "3307");
        let product = details.product.unwrap();
        assert_eq!(product.product_name, "Sambrani Cup");
        assert_eq!(product.unit_price, 200.0);
        assert_eq!(product.opening_units, 5.0);
        assert!(product.is_active);
    }

    #[test]
    fn missing_product_row_maps_to_none() {
        let details = ProductDetails::from_api(&json!({"table": [], "table1": []}));
        assert!(details.hsn_options.is_empty());
        assert!(details.product.is_none());
    }
}
