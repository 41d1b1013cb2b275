use serde::Serialize;

use crate::domain::product::HsnOption;
use crate::forms::product::ProductForm;

/// Data required to render `masters/product.html`.
#[derive(Debug, Serialize)]
pub struct ProductPageData {
    pub action: &'static str,
    pub read_only: bool,
    pub form_url: String,
    pub list_url: String,
    pub hsn_options: Vec<HsnOption>,
    pub product: ProductForm,
}
