#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::domain::module::ModuleRegistry;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::models::list_views::ListViewStore;
#[cfg(feature = "server")]
use crate::repository::HttpRepository;

pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Registers every HTML route of the application.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    use crate::routes::base_master::{
        cancel_delete, confirm_delete, current_records, request_delete, show_records,
    };
    use crate::routes::invoice::{save_invoice, show_invoice};
    use crate::routes::ledger::{save_ledger, show_ledger};
    use crate::routes::main::{clear_token, show_index, store_token};
    use crate::routes::product::{save_product, show_product};

    cfg.service(show_index)
        .service(store_token)
        .service(clear_token)
        .service(show_records)
        .service(current_records)
        .service(request_delete)
        .service(cancel_delete)
        .service(confirm_delete)
        .service(show_ledger)
        .service(save_ledger)
        .service(show_product)
        .service(save_product)
        .service(show_invoice)
        .service(save_invoice);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo = HttpRepository::new(
        &server_config.api_url,
        &server_config.api_token,
        server_config.identifier_field.clone(),
        server_config.request_timeout_secs.map(Duration::from_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    let registry = web::Data::new(ModuleRegistry::new(server_config.modules.clone()));
    let views = web::Data::new(ListViewStore::new(server_config.max_list_views));

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Serving on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(registry.clone())
            .app_data(views.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
