use serde::Serialize;

use crate::domain::ledger::LedgerDetails;

/// Data required to render `masters/ledger.html`.
#[derive(Debug, Serialize)]
pub struct LedgerPageData {
    /// `add`, `edit` or `view`.
    pub action: &'static str,
    pub read_only: bool,
    /// URL the form posts to.
    pub form_url: String,
    pub list_url: String,
    pub ledger: LedgerDetails,
}
