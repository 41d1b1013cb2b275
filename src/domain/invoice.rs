//! Sales invoice and proforma computation.
//!
//! Amounts are decimals kept to the paisa, and every step is checked, so a
//! total that leaves the supported range is an error rather than a wrap.
//! GST on an intra-state supply splits evenly into CGST and SGST (the odd
//! paisa goes to SGST); an inter-state supply is charged IGST in full.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::text_field;
use crate::domain::types::{Money, Rate};

/// Place of supply relative to the seller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    IntraState,
    InterState,
}

impl SupplyKind {
    /// Compares state codes ignoring case and surrounding whitespace.
    pub fn between(company_state: &str, party_state: &str) -> Self {
        if company_state.trim().eq_ignore_ascii_case(party_state.trim()) {
            SupplyKind::IntraState
        } else {
            SupplyKind::InterState
        }
    }
}

/// One item line as entered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceLine {
    #[validate(length(min = 1, message = "Item description is required"))]
    pub description: String,
    #[validate(range(
        min = 1,
        max = 1_000_000,
        message = "Quantity must be between 1 and 1000000"
    ))]
    pub quantity: u32,
    #[validate(custom(function = "validate_positive_money"))]
    pub unit_price: Money,
    pub gst_rate: Rate,
    pub discount: Rate,
}

fn validate_positive_money(value: &Money) -> Result<(), ValidationError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::new("unit_price")
            .with_message(Cow::Borrowed("Unit price must be positive")))
    }
}

/// Computed amounts of one line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineAmounts {
    pub gross: Money,
    #[serde(rename = "DiscountAmount")]
    pub discount: Money,
    pub taxable: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub total: Money,
}

/// An invoice amount left the range `Money` can hold.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Invoice amounts are too large")]
pub struct AmountOverflow;

impl InvoiceLine {
    pub fn amounts(&self, supply: SupplyKind) -> Result<LineAmounts, AmountOverflow> {
        let gross = self
            .unit_price
            .checked_times(self.quantity)
            .ok_or(AmountOverflow)?;
        let discount = gross.checked_apply_rate(self.discount).ok_or(AmountOverflow)?;
        let taxable = gross.checked_sub(discount).ok_or(AmountOverflow)?;
        let tax = taxable.checked_apply_rate(self.gst_rate).ok_or(AmountOverflow)?;

        let (cgst, sgst, igst) = match supply {
            SupplyKind::IntraState => {
                let (cgst, sgst) = tax.halves();
                (cgst, sgst, Money::ZERO)
            }
            SupplyKind::InterState => (Money::ZERO, Money::ZERO, tax),
        };

        Ok(LineAmounts {
            gross,
            discount,
            taxable,
            cgst,
            sgst,
            igst,
            total: taxable.checked_add(tax).ok_or(AmountOverflow)?,
        })
    }
}

/// Line totals summed over the invoice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceTotals {
    pub gross: Money,
    pub discount: Money,
    pub taxable: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub grand_total: Money,
}

/// Every line with its amounts plus the totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub supply: SupplyKind,
    pub lines: Vec<(InvoiceLine, LineAmounts)>,
    pub totals: InvoiceTotals,
}

impl InvoiceTotals {
    fn add(&self, amounts: &LineAmounts) -> Result<Self, AmountOverflow> {
        let sum = |a: Money, b: Money| a.checked_add(b).ok_or(AmountOverflow);
        Ok(Self {
            gross: sum(self.gross, amounts.gross)?,
            discount: sum(self.discount, amounts.discount)?,
            taxable: sum(self.taxable, amounts.taxable)?,
            cgst: sum(self.cgst, amounts.cgst)?,
            sgst: sum(self.sgst, amounts.sgst)?,
            igst: sum(self.igst, amounts.igst)?,
            grand_total: sum(self.grand_total, amounts.total)?,
        })
    }
}

pub fn compute_invoice(
    lines: &[InvoiceLine],
    supply: SupplyKind,
) -> Result<InvoiceSummary, AmountOverflow> {
    let lines = lines
        .iter()
        .map(|line| Ok((line.clone(), line.amounts(supply)?)))
        .collect::<Result<Vec<_>, AmountOverflow>>()?;

    let totals = lines
        .iter()
        .try_fold(InvoiceTotals::default(), |totals, (_, amounts)| {
            totals.add(amounts)
        })?;

    Ok(InvoiceSummary {
        supply,
        lines,
        totals,
    })
}

/// Invoice header fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceHeader {
    #[validate(length(min = 1, max = 100, message = "Party name is required (max 100 characters)"))]
    pub party_name: String,
    #[validate(length(min = 1, max = 20, message = "Invoice number is required (max 20 characters)"))]
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    #[validate(length(min = 1, message = "Party state is required"))]
    pub party_state_code: String,
}

/// Earliest invoice date accepted.
pub const EARLIEST_INVOICE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => panic!("1900-01-01 is a valid date"),
};

impl InvoiceHeader {
    /// Invoice dates may not lie in the future nor before 1900-01-01.
    pub fn check_date(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.invoice_date > today || self.invoice_date < EARLIEST_INVOICE_DATE {
            return Err(ValidationError::new("invoice_date")
                .with_message(Cow::Borrowed("Invoice date is out of range")));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PayloadLine {
    #[serde(flatten)]
    pub line: InvoiceLine,
    #[serde(flatten)]
    pub amounts: LineAmounts,
}

/// Body sent to the invoice create and update endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoicePayload {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    pub supply: SupplyKind,
    pub items: Vec<PayloadLine>,
    pub totals: InvoiceTotals,
}

impl InvoicePayload {
    pub fn new(header: InvoiceHeader, summary: InvoiceSummary) -> Self {
        Self {
            header,
            supply: summary.supply,
            items: summary
                .lines
                .into_iter()
                .map(|(line, amounts)| PayloadLine { line, amounts })
                .collect(),
            totals: summary.totals,
        }
    }
}

/// Prefill values read from the backend invoice detail endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvoiceDetails {
    pub party_name: String,
    pub invoice_no: String,
    pub invoice_date: String,
    pub party_state_code: String,
    /// Raw item rows: description, quantity, unit price, GST rate, discount.
    pub items: Vec<[String; 5]>,
}

impl InvoiceDetails {
    pub fn from_api(details: &Value) -> Self {
        let items = details
            .get("items")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        [
                            text_field(row, "description"),
                            text_field(row, "quantity"),
                            text_field(row, "unitPrice"),
                            text_field(row, "gstRate"),
                            text_field(row, "discount"),
                        ]
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            party_name: text_field(details, "partyName"),
            invoice_no: text_field(details, "invoiceNo"),
            invoice_date: text_field(details, "invoiceDate"),
            party_state_code: text_field(details, "partyStateCode"),
            items,
        }
    }
}
