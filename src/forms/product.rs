use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::product::ProductPayload;
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Serialize)]
/// Product form as posted by `masters/product.html`.
pub struct ProductForm {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub hsn_code: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub opening_units: String,
    #[serde(default)]
    pub opening_balance: String,
    /// Checkbox; present only when ticked.
    #[serde(default)]
    pub is_active: Option<String>,
}

fn parse_number(value: &str, field: &'static str) -> Result<f64, FormError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or(FormError::InvalidNumber(field))
}

impl ProductForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
    }
}

impl From<&ProductPayload> for ProductForm {
    /// Prefills the form from a stored product.
    fn from(product: &ProductPayload) -> Self {
        Self {
            product_name: product.product_name.clone(),
            hsn_code: product.hsn_code.clone(),
            product_description: product.product_description.clone(),
            unit_price: product.unit_price.to_string(),
            opening_units: product.opening_units.to_string(),
            opening_balance: product.opening_balance.to_string(),
            is_active: product.is_active.then(|| "on".to_string()),
        }
    }
}

impl TryFrom<&ProductForm> for ProductPayload {
    type Error = FormError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        let payload = ProductPayload {
            product_name: form.product_name.trim().to_string(),
            hsn_code: form.hsn_code.trim().to_string(),
            product_description: form.product_description.trim().to_string(),
            unit_price: parse_number(&form.unit_price, "Unit Price")?,
            opening_units: parse_number(&form.opening_units, "Opening Units")?,
            opening_balance: parse_number(&form.opening_balance, "Opening Balance")?,
            is_active: form.is_active.is_some(),
        };
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_product() {
        let form = ProductForm::from_bytes(
            b"product_name=Sambrani+Cup&hsn_code=3307&product_description=&unit_price=200\
              &opening_units=5&opening_balance=1000&is_active=on",
        )
        .unwrap();
        let payload = ProductPayload::try_from(&form).unwrap();

        assert_eq!(payload.product_name, "Sambrani Cup");
        assert_eq!(payload.unit_price, 200.0);
        assert!(payload.is_active);
    }

    #[test]
    fn unticked_checkbox_means_inactive() {
        let form = ProductForm::from_bytes(
            b"product_name=Cup&unit_price=1&opening_units=1&opening_balance=1",
        )
        .unwrap();
        assert!(!ProductPayload::try_from(&form).unwrap().is_active);
    }

    #[test]
    fn rejects_non_numeric_and_non_positive_amounts() {
        let form = ProductForm {
            product_name: "Cup".to_string(),
            unit_price: "abc".to_string(),
            ..ProductForm::default()
        };
        assert!(matches!(
            ProductPayload::try_from(&form),
            Err(FormError::InvalidNumber("Unit Price"))
        ));

        let form = ProductForm {
            product_name: "Cup".to_string(),
            unit_price: "0".to_string(),
            opening_units: "1".to_string(),
            opening_balance: "1".to_string(),
            ..ProductForm::default()
        };
        let err = ProductPayload::try_from(&form).unwrap_err();
        assert!(err.to_string().contains("Unit Price must be positive"));
    }
}
