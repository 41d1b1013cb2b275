use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Local, NaiveDate};
use tera::Tera;

use crate::dto::invoice::InvoicePageData;
use crate::forms::invoice::InvoiceForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_template, session_repository, submit_error_message,
};
use crate::services::ServiceError;
use crate::services::invoice::{self as invoice_service, INVOICE_LIST_URL, INVOICE_ROUTE};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_invoice(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    data: &InvoicePageData,
    form_error: Option<&str>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "invoice", server_config);
    context.insert("page", data);
    context.insert("seller", &server_config.company);
    context.insert("form_error", &form_error);
    render_template(tera, "transaction/invoice.html", &context)
}

#[get("/transaction/invoice-proforma")]
pub async fn show_invoice(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = session_repository(&session, &repo);
    let data = invoice_service::load_invoice(
        &repo,
        &query.target(),
        &server_config.company.state_code,
        today(),
    )
    .await;
    render_invoice(&tera, &flash_messages, &server_config, &data, None)
}

#[post("/transaction/invoice-proforma")]
pub async fn save_invoice(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let target = query.target();
    let form = match InvoiceForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected invoice form: {err}");
            FlashMessage::error(err.to_string()).send();
            return redirect(&target.url(INVOICE_ROUTE));
        }
    };
    let company_state = &server_config.company.state_code;

    if form.is_preview() {
        return match invoice_service::compute(&form, company_state, today()) {
            Ok((_, summary)) => {
                let data = invoice_service::invoice_page(&target, form, Some(summary));
                render_invoice(&tera, &flash_messages, &server_config, &data, None)
            }
            Err(err) => {
                let message = err.to_string();
                let data = invoice_service::invoice_page(&target, form, None);
                render_invoice(&tera, &flash_messages, &server_config, &data, Some(&message))
            }
        };
    }

    let repo = session_repository(&session, &repo);
    match invoice_service::save_invoice(&repo, &target, &form, company_state, today()).await {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(INVOICE_LIST_URL)
        }
        Err(ServiceError::ReadOnly) => {
            FlashMessage::error("This record is read only.").send();
            redirect(&target.url(INVOICE_ROUTE))
        }
        Err(err @ (ServiceError::Form(_) | ServiceError::Repository(_))) => {
            let message = submit_error_message(&err);
            let data = invoice_service::invoice_page(&target, form, None);
            render_invoice(&tera, &flash_messages, &server_config, &data, Some(&message))
        }
        Err(err) => {
            log::error!("Failed to save invoice: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
