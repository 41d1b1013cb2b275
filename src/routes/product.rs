use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::product::ProductPageData;
use crate::forms::product::ProductForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_template, session_repository, submit_error_message,
};
use crate::services::ServiceError;
use crate::services::product::{self as product_service, PRODUCT_LIST_URL, PRODUCT_ROUTE};

fn render_product(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    data: &ProductPageData,
    form_error: Option<&str>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "product", server_config);
    context.insert("page", data);
    context.insert("form_error", &form_error);
    render_template(tera, "masters/product.html", &context)
}

#[get("/masters/product")]
pub async fn show_product(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = session_repository(&session, &repo);
    let data = product_service::load_product(&repo, &query.target()).await;
    render_product(&tera, &flash_messages, &server_config, &data, None)
}

#[post("/masters/product")]
pub async fn save_product(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let target = query.target();
    let form = match ProductForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected product form: {err}");
            FlashMessage::error(err.to_string()).send();
            return redirect(&target.url(PRODUCT_ROUTE));
        }
    };
    let repo = session_repository(&session, &repo);

    match product_service::save_product(&repo, &target, &form).await {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(PRODUCT_LIST_URL)
        }
        Err(ServiceError::ReadOnly) => {
            FlashMessage::error("This record is read only.").send();
            redirect(&target.url(PRODUCT_ROUTE))
        }
        Err(err @ (ServiceError::Form(_) | ServiceError::Repository(_))) => {
            let message = submit_error_message(&err);
            let data = product_service::rejected_product(&repo, &target, form).await;
            render_product(&tera, &flash_messages, &server_config, &data, Some(&message))
        }
        Err(err) => {
            log::error!("Failed to save product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
