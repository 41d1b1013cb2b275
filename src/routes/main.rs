use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::session::TokenForm;
use crate::models::config::ServerConfig;
use crate::routes::{TOKEN_SESSION_KEY, base_context, redirect, render_template};

#[get("/")]
pub async fn show_index(
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let has_token = matches!(session.get::<String>(TOKEN_SESSION_KEY), Ok(Some(_)));

    let mut context = base_context(&flash_messages, "index", &server_config);
    context.insert("has_token", &has_token);
    context.insert("seller", &server_config.company);
    render_template(&tera, "main/index.html", &context)
}

#[post("/session/token")]
pub async fn store_token(session: Session, web::Form(form): web::Form<TokenForm>) -> impl Responder {
    let token = form.token.trim();
    if token.is_empty() {
        FlashMessage::error("Token must not be empty.").send();
        return redirect("/");
    }

    match session.insert(TOKEN_SESSION_KEY, token) {
        Ok(()) => FlashMessage::success("Token saved for this session.").send(),
        Err(err) => {
            log::error!("Failed to store token in session: {err}");
            FlashMessage::error("Could not store the token.").send();
        }
    }
    redirect("/")
}

#[post("/session/clear")]
pub async fn clear_token(session: Session) -> impl Responder {
    session.remove(TOKEN_SESSION_KEY);
    FlashMessage::info("Token cleared.").send();
    redirect("/")
}
