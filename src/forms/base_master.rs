use serde::Deserialize;

#[derive(Deserialize)]
/// Row selected for deletion on the list page.
pub struct DeleteRecordForm {
    pub pid: String,
}
