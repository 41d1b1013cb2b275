use serde::Serialize;

use crate::domain::invoice::InvoiceSummary;
use crate::forms::invoice::{InvoiceForm, InvoiceRow};

/// Data required to render `transaction/invoice.html`.
#[derive(Debug, Serialize)]
pub struct InvoicePageData {
    pub action: &'static str,
    pub read_only: bool,
    pub form_url: String,
    pub list_url: String,
    pub invoice: InvoiceForm,
    /// Item rows of `invoice`, plus one blank row for entry.
    pub rows: Vec<InvoiceRow>,
    /// Computed amounts, once the items parse.
    pub summary: Option<InvoiceSummary>,
}
