use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::module::ModuleRegistry;
use crate::dto::base_master::ListPageData;
use crate::forms::base_master::DeleteRecordForm;
use crate::models::config::ServerConfig;
use crate::models::list_views::ListViewStore;
use crate::repository::HttpRepository;
use crate::repository::errors::RepositoryError;
use crate::routes::{base_context, redirect, render_template, session_repository, view_id};
use crate::services::{ServiceError, base_master as base_master_service};

const CURRENT_LIST_URL: &str = "/base/basemaster/current";

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "mod")]
    pub module: Option<String>,
}

fn render_list(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    data: &ListPageData,
) -> actix_web::HttpResponse {
    let mut context = base_context(flash_messages, "records", server_config);
    context.insert("breadcrumb", &data.title);
    context.insert("list", data);
    render_template(tera, "base/master.html", &context)
}

#[get("/base/basemaster")]
#[allow(clippy::too_many_arguments)]
pub async fn show_records(
    query: web::Query<ListQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    registry: web::Data<ModuleRegistry>,
    views: web::Data<ListViewStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = session_repository(&session, &repo);
    let data = base_master_service::load_list(
        &repo,
        &registry,
        &views,
        view_id(&session),
        query.module.as_deref(),
        &server_config.identifier_field,
    )
    .await;

    render_list(&tera, &flash_messages, &server_config, &data)
}

#[get("/base/basemaster/current")]
pub async fn current_records(
    session: Session,
    views: web::Data<ListViewStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = base_master_service::current_list(&views, view_id(&session));
    render_list(&tera, &flash_messages, &server_config, &data)
}

#[post("/base/basemaster/delete")]
pub async fn request_delete(
    session: Session,
    views: web::Data<ListViewStore>,
    web::Form(form): web::Form<DeleteRecordForm>,
) -> impl Responder {
    if let Err(err) = base_master_service::request_delete(&views, view_id(&session), &form.pid) {
        log::warn!("Cannot delete record {}: {err}", form.pid);
        FlashMessage::error(err.to_string()).send();
    }
    redirect(CURRENT_LIST_URL)
}

#[post("/base/basemaster/delete/cancel")]
pub async fn cancel_delete(session: Session, views: web::Data<ListViewStore>) -> impl Responder {
    base_master_service::cancel_delete(&views, view_id(&session));
    redirect(CURRENT_LIST_URL)
}

#[post("/base/basemaster/delete/confirm")]
pub async fn confirm_delete(
    session: Session,
    repo: web::Data<HttpRepository>,
    views: web::Data<ListViewStore>,
) -> impl Responder {
    let repo = session_repository(&session, &repo);

    match base_master_service::confirm_delete(&repo, &views, view_id(&session)).await {
        Ok(id) => {
            FlashMessage::success(format!("Record {id} deleted.")).send();
        }
        Err(ServiceError::Repository(RepositoryError::Status { status, message })) => {
            FlashMessage::error(format!("Delete failed ({status}): {message}")).send();
        }
        Err(err) => {
            FlashMessage::error(format!("Delete failed: {err}")).send();
        }
    }
    redirect(CURRENT_LIST_URL)
}
