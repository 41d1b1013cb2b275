//! Services behind the invoice / proforma page.

use chrono::NaiveDate;

use crate::domain::invoice::{
    InvoiceDetails, InvoiceHeader, InvoicePayload, InvoiceSummary, SupplyKind, compute_invoice,
};
use crate::domain::module::PageTarget;
use crate::dto::invoice::InvoicePageData;
use crate::forms::FormError;
use crate::forms::invoice::{InvoiceForm, InvoiceRow};
use crate::repository::{RecordReader, RecordWriter};
use crate::services::{SaveTarget, ServiceResult};

pub const INVOICE_ROUTE: &str = "/transaction/invoice-proforma";
pub const INVOICE_LIST_URL: &str = "/base/basemaster?mod=SalesInvoice";

/// Renders `invoice` with one extra blank row for entry.
pub fn invoice_page(
    target: &PageTarget,
    invoice: InvoiceForm,
    summary: Option<InvoiceSummary>,
) -> InvoicePageData {
    let mut rows = invoice.rows();
    if !target.is_read_only() {
        rows.push(InvoiceRow::default());
    }

    InvoicePageData {
        action: target.action.as_str(),
        read_only: target.is_read_only(),
        form_url: target.url(INVOICE_ROUTE),
        list_url: INVOICE_LIST_URL.to_string(),
        invoice,
        rows,
        summary,
    }
}

/// Parses `form` and computes its amounts for a seller in `company_state`.
pub fn compute(
    form: &InvoiceForm,
    company_state: &str,
    today: NaiveDate,
) -> ServiceResult<(InvoiceHeader, InvoiceSummary)> {
    let (header, lines) = form.parse(today)?;
    let supply = SupplyKind::between(company_state, &header.party_state_code);
    let summary = compute_invoice(&lines, supply).map_err(FormError::from)?;
    Ok((header, summary))
}

/// Stored invoice for edit and view; a dated blank invoice for add.
pub async fn load_invoice<R>(
    repo: &R,
    target: &PageTarget,
    company_state: &str,
    today: NaiveDate,
) -> InvoicePageData
where
    R: RecordReader + ?Sized,
{
    let mut invoice = match &target.pid {
        Some(pid) => repo
            .fetch_details(&format!("api/invoice/sales/fetch/{}", pid.path_segment()))
            .await
            .map(|details| InvoiceForm::from(&InvoiceDetails::from_api(&details)))
            .unwrap_or_default(),
        None => InvoiceForm::default(),
    };
    if invoice.invoice_date.is_empty() {
        invoice.invoice_date = today.format("%Y-%m-%d").to_string();
    }

    let summary = compute(&invoice, company_state, today)
        .ok()
        .map(|(_, summary)| summary);
    invoice_page(target, invoice, summary)
}

/// Validates `form`, computes the totals and creates or updates the invoice.
pub async fn save_invoice<R>(
    repo: &R,
    target: &PageTarget,
    form: &InvoiceForm,
    company_state: &str,
    today: NaiveDate,
) -> ServiceResult<&'static str>
where
    R: RecordWriter + ?Sized,
{
    let save = SaveTarget::for_page(
        target,
        "api/invoice/sales/create",
        "api/invoice/sales/update/",
    )?;
    let (header, summary) = compute(form, company_state, today)?;
    let body = serde_json::to_value(InvoicePayload::new(header, summary))?;

    repo.submit(save.method, &save.endpoint, &body)
        .await
        .map_err(|err| {
            log::error!("Failed to save invoice via {}: {err}", save.endpoint);
            err
        })?;

    Ok(save.success_message)
}
