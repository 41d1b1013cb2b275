//! Services behind the product master page.

use crate::domain::module::PageTarget;
use crate::domain::product::{ProductDetails, ProductPayload};
use crate::dto::product::ProductPageData;
use crate::forms::product::ProductForm;
use crate::repository::{RecordReader, RecordWriter};
use crate::services::{SaveTarget, ServiceResult};

pub const PRODUCT_ROUTE: &str = "/masters/product";
pub const PRODUCT_LIST_URL: &str = "/base/basemaster?mod=ProdMast";

async fn details<R>(repo: &R, target: &PageTarget) -> ProductDetails
where
    R: RecordReader + ?Sized,
{
    let endpoint = format!("api/product/fetch/{}", target.detail_key());
    repo.fetch_details(&endpoint)
        .await
        .map(|details| ProductDetails::from_api(&details))
        .unwrap_or_default()
}

fn page(target: &PageTarget, details: ProductDetails, product: ProductForm) -> ProductPageData {
    ProductPageData {
        action: target.action.as_str(),
        read_only: target.is_read_only(),
        form_url: target.url(PRODUCT_ROUTE),
        list_url: PRODUCT_LIST_URL.to_string(),
        hsn_options: details.hsn_options,
        product,
    }
}

/// HSN options and, for edit and view, the stored product.
pub async fn load_product<R>(repo: &R, target: &PageTarget) -> ProductPageData
where
    R: RecordReader + ?Sized,
{
    let details = details(repo, target).await;
    let product = details
        .product
        .as_ref()
        .map(ProductForm::from)
        .unwrap_or_else(|| ProductForm {
            is_active: Some("on".to_string()),
            ..ProductForm::default()
        });
    page(target, details, product)
}

/// Page showing `form` again after it was rejected.
pub async fn rejected_product<R>(repo: &R, target: &PageTarget, form: ProductForm) -> ProductPageData
where
    R: RecordReader + ?Sized,
{
    let details = details(repo, target).await;
    page(target, details, form)
}

/// Validates `form` and creates or updates the product.
pub async fn save_product<R>(
    repo: &R,
    target: &PageTarget,
    form: &ProductForm,
) -> ServiceResult<&'static str>
where
    R: RecordWriter + ?Sized,
{
    let save = SaveTarget::for_page(target, "api/product/create", "api/product/update/")?;
    let payload = ProductPayload::try_from(form)?;
    let body = serde_json::to_value(&payload)?;

    repo.submit(save.method, &save.endpoint, &body)
        .await
        .map_err(|err| {
            log::error!("Failed to save product via {}: {err}", save.endpoint);
            err
        })?;

    Ok(save.success_message)
}
