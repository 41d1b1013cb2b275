//! HTTP routes and the rendering helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::domain::module::{PageTarget, list_url};
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

pub mod base_master;
pub mod invoice;
pub mod ledger;
pub mod main;
pub mod product;

/// Session key of the bearer token forwarded to the backend.
pub const TOKEN_SESSION_KEY: &str = "api_token";
/// Session key of the list view id.
pub const VIEW_SESSION_KEY: &str = "list_view";

/// Maps a flash message level to the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Breadcrumb label of a page.
pub fn breadcrumb(current_page: &str) -> &'static str {
    match current_page {
        "ledger" => "Ledger Master",
        "product" => "Product Master",
        "invoice" => "Invoice Proforma",
        "records" => "Records",
        _ => "Dashboard",
    }
}

#[derive(Serialize)]
struct NavItem<'a> {
    title: &'a str,
    url: String,
}

/// Context every page template expects.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let modules = server_config
        .modules
        .iter()
        .map(|module| NavItem {
            title: &module.title,
            url: list_url(&module.module_code),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("breadcrumb", breadcrumb(current_page));
    context.insert("company", &server_config.company.name);
    context.insert("modules", &modules);
    context
}

/// Text shown when saving a form failed.
pub fn submit_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Repository(RepositoryError::Status { message, .. }) if !message.is_empty() => {
            message.clone()
        }
        ServiceError::Repository(_) => "The server could not save the record.".to_string(),
        other => other.to_string(),
    }
}

/// `action` and `pid` query parameters of the detail pages.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub action: Option<String>,
    pub pid: Option<String>,
}

impl PageQuery {
    pub fn target(&self) -> PageTarget {
        PageTarget::from_query(self.action.as_deref(), self.pid.as_deref())
    }
}

/// Backend repository bound to the session's token, if one was stored.
pub fn session_repository(session: &Session, repo: &HttpRepository) -> HttpRepository {
    match session.get::<String>(TOKEN_SESSION_KEY) {
        Ok(Some(token)) => repo.with_token(&token),
        Ok(None) => repo.clone(),
        Err(err) => {
            log::warn!("Ignoring unreadable session token: {err}");
            repo.clone()
        }
    }
}

/// List view id of the session, assigning a fresh one on first use.
pub fn view_id(session: &Session) -> Uuid {
    if let Ok(Some(id)) = session.get::<Uuid>(VIEW_SESSION_KEY) {
        return id;
    }

    let id = Uuid::new_v4();
    if let Err(err) = session.insert(VIEW_SESSION_KEY, id) {
        log::error!("Failed to store list view id in session: {err}");
    }
    id
}
