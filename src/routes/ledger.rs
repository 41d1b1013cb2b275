use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::ledger::LedgerPageData;
use crate::forms::ledger::LedgerForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_template, session_repository, submit_error_message,
};
use crate::services::ledger::{self as ledger_service, LEDGER_LIST_URL, LEDGER_ROUTE};
use crate::services::ServiceError;

fn render_ledger(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    data: &LedgerPageData,
    form_error: Option<&str>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "ledger", server_config);
    context.insert("page", data);
    context.insert("form_error", &form_error);
    render_template(tera, "masters/ledger.html", &context)
}

#[get("/masters/ledger")]
pub async fn show_ledger(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = session_repository(&session, &repo);
    let data = ledger_service::load_ledger(&repo, &query.target()).await;
    render_ledger(&tera, &flash_messages, &server_config, &data, None)
}

#[post("/masters/ledger")]
pub async fn save_ledger(
    query: web::Query<PageQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let target = query.target();
    let form = match LedgerForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected ledger form: {err}");
            FlashMessage::error(err.to_string()).send();
            return redirect(&target.url(LEDGER_ROUTE));
        }
    };
    let repo = session_repository(&session, &repo);

    match ledger_service::save_ledger(&repo, &target, &form).await {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(LEDGER_LIST_URL)
        }
        Err(ServiceError::ReadOnly) => {
            FlashMessage::error("This record is read only.").send();
            redirect(&target.url(LEDGER_ROUTE))
        }
        Err(err @ (ServiceError::Form(_) | ServiceError::Repository(_))) => {
            let data = ledger_service::rejected_ledger(&repo, &target, &form).await;
            let message = submit_error_message(&err);
            render_ledger(&tera, &flash_messages, &server_config, &data, Some(&message))
        }
        Err(err) => {
            log::error!("Failed to save ledger: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
