//! Form definitions backing the master and invoice pages.

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::invoice::AmountOverflow;

pub mod base_master;
pub mod invoice;
pub mod ledger;
pub mod product;
pub mod session;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("{}", validation_messages(.0))]
    Validation(#[from] ValidationErrors),

    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("Sub Head is required")]
    InvalidSubHead,

    #[error("{0} must be a number")]
    InvalidNumber(&'static str),

    #[error("Invalid invoice date")]
    InvalidDate,

    #[error("Item {0}: {1}")]
    InvalidItem(usize, String),

    #[error("Add at least one item")]
    NoItems,

    #[error(transparent)]
    AmountOverflow(#[from] AmountOverflow),
}

/// Collects the human readable messages of `errors`, nested ones included.
pub fn validation_messages(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn collect_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                messages.extend(errors.iter().map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
            ValidationErrorsKind::List(rows) => {
                for nested in rows.values() {
                    collect_messages(nested, messages);
                }
            }
        }
    }
}

/// Trimmed value at `index` of a repeated form field.
pub(crate) fn column_value(values: &[String], index: usize) -> String {
    values
        .get(index)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
