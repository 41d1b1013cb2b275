//! Services behind the ledger master page.

use crate::domain::ledger::{LedgerDetails, LedgerPayload};
use crate::domain::module::PageTarget;
use crate::dto::ledger::LedgerPageData;
use crate::forms::ledger::LedgerForm;
use crate::repository::{RecordReader, RecordWriter};
use crate::services::{SaveTarget, ServiceResult};

pub const LEDGER_ROUTE: &str = "/masters/ledger";
pub const LEDGER_LIST_URL: &str = "/base/basemaster?mod=LedgerMast";

fn page(target: &PageTarget, ledger: LedgerDetails) -> LedgerPageData {
    LedgerPageData {
        action: target.action.as_str(),
        read_only: target.is_read_only(),
        form_url: target.url(LEDGER_ROUTE),
        list_url: LEDGER_LIST_URL.to_string(),
        ledger,
    }
}

/// Sub-head options and, for edit and view, the stored ledger.
///
/// A failed fetch yields an empty form.
pub async fn load_ledger<R>(repo: &R, target: &PageTarget) -> LedgerPageData
where
    R: RecordReader + ?Sized,
{
    let endpoint = format!("api/ledger/fetch/{}", target.detail_key());
    let ledger = repo
        .fetch_details(&endpoint)
        .await
        .map(|details| LedgerDetails::from_api(&details))
        .unwrap_or_default();

    page(target, ledger)
}

/// Page showing `form` again after it was rejected, with fresh sub-head
/// options.
pub async fn rejected_ledger<R>(repo: &R, target: &PageTarget, form: &LedgerForm) -> LedgerPageData
where
    R: RecordReader + ?Sized,
{
    let mut data = load_ledger(repo, target).await;
    let options = std::mem::take(&mut data.ledger.sub_head_options);
    data.ledger = form.to_details(options);
    data
}

/// Validates `form` and creates or updates the ledger.
///
/// Returns the success message to flash.
pub async fn save_ledger<R>(
    repo: &R,
    target: &PageTarget,
    form: &LedgerForm,
) -> ServiceResult<&'static str>
where
    R: RecordWriter + ?Sized,
{
    let save = SaveTarget::for_page(target, "api/ledger/create", "api/ledger/update/")?;
    let payload = LedgerPayload::try_from(form)?;
    let body = serde_json::to_value(&payload)?;

    repo.submit(save.method, &save.endpoint, &body)
        .await
        .map_err(|err| {
            log::error!("Failed to save ledger via {}: {err}", save.endpoint);
            err
        })?;

    Ok(save.success_message)
}
