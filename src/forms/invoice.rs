use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::invoice::{InvoiceDetails, InvoiceHeader, InvoiceLine};
use crate::domain::types::{Money, Rate, TypeConstraintError};
use crate::forms::{FormError, column_value, validation_messages};

/// Invoice form as posted by `transaction/invoice.html`.
///
/// Item rows arrive as repeated fields.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InvoiceForm {
    #[serde(default)]
    pub party_name: String,
    #[serde(default)]
    pub invoice_no: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub party_state_code: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub quantity: Vec<String>,
    #[serde(default)]
    pub unit_price: Vec<String>,
    #[serde(default)]
    pub gst_rate: Vec<String>,
    #[serde(default)]
    pub discount: Vec<String>,
    /// `preview` recomputes totals without saving.
    #[serde(default)]
    pub intent: Option<String>,
}

/// One item row exactly as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub gst_rate: String,
    pub discount: String,
}

impl InvoiceRow {
    fn is_blank(&self) -> bool {
        [
            &self.description,
            &self.quantity,
            &self.unit_price,
            &self.gst_rate,
            &self.discount,
        ]
        .iter()
        .all(|value| value.is_empty())
    }

    fn to_line(&self, number: usize) -> Result<InvoiceLine, FormError> {
        let item_error = |message: String| FormError::InvalidItem(number, message);

        let quantity = self
            .quantity
            .parse::<u32>()
            .map_err(|_| item_error("Quantity must be a whole number".to_string()))?;
        let unit_price =
            Money::parse(&self.unit_price).map_err(|err| item_error(err.to_string()))?;
        let gst_rate = optional_rate(&self.gst_rate).map_err(|err| item_error(err.to_string()))?;
        let discount = optional_rate(&self.discount).map_err(|err| item_error(err.to_string()))?;

        let line = InvoiceLine {
            description: self.description.clone(),
            quantity,
            unit_price,
            gst_rate,
            discount,
        };
        line.validate()
            .map_err(|errors| item_error(validation_messages(&errors)))?;
        Ok(line)
    }
}

fn optional_rate(value: &str) -> Result<Rate, TypeConstraintError> {
    if value.is_empty() {
        Ok(Rate::ZERO)
    } else {
        Rate::parse_percent(value)
    }
}

impl InvoiceForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
    }

    pub fn is_preview(&self) -> bool {
        self.intent.as_deref() == Some("preview")
    }

    /// Submitted item rows, blank ones included.
    pub fn rows(&self) -> Vec<InvoiceRow> {
        let count = [
            self.description.len(),
            self.quantity.len(),
            self.unit_price.len(),
            self.gst_rate.len(),
            self.discount.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();

        (0..count)
            .map(|index| InvoiceRow {
                description: column_value(&self.description, index),
                quantity: column_value(&self.quantity, index),
                unit_price: column_value(&self.unit_price, index),
                gst_rate: column_value(&self.gst_rate, index),
                discount: column_value(&self.discount, index),
            })
            .collect()
    }

    /// Validated header and item lines. Blank rows are skipped.
    pub fn parse(&self, today: NaiveDate) -> Result<(InvoiceHeader, Vec<InvoiceLine>), FormError> {
        let invoice_date = NaiveDate::parse_from_str(self.invoice_date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate)?;

        let header = InvoiceHeader {
            party_name: self.party_name.trim().to_string(),
            invoice_no: self.invoice_no.trim().to_string(),
            invoice_date,
            party_state_code: self.party_state_code.trim().to_string(),
        };
        header.validate()?;
        header
            .check_date(today)
            .map_err(|_| FormError::InvalidDate)?;

        let lines = self
            .rows()
            .iter()
            .filter(|row| !row.is_blank())
            .enumerate()
            .map(|(index, row)| row.to_line(index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if lines.is_empty() {
            return Err(FormError::NoItems);
        }
        Ok((header, lines))
    }
}

impl From<&InvoiceDetails> for InvoiceForm {
    /// Prefills the form from a stored invoice.
    fn from(details: &InvoiceDetails) -> Self {
        let column = |index: usize| -> Vec<String> {
            details.items.iter().map(|item| item[index].clone()).collect()
        };

        Self {
            party_name: details.party_name.clone(),
            invoice_no: details.invoice_no.clone(),
            invoice_date: details.invoice_date.clone(),
            party_state_code: details.party_state_code.clone(),
            description: column(0),
            quantity: column(1),
            unit_price: column(2),
            gst_rate: column(3),
            discount: column(4),
            intent: None,
        }
    }
}
