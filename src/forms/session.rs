use serde::Deserialize;

#[derive(Deserialize)]
/// Bearer token entered on the dashboard.
pub struct TokenForm {
    pub token: String,
}
