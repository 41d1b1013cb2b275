use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::{FlashMessagesFramework, Level};
use ledgerdesk::domain::module::{ModuleDescriptor, ModuleRegistry};
use ledgerdesk::models::config::ServerConfig;
use ledgerdesk::models::list_views::ListViewStore;
use ledgerdesk::routes::alert_level_to_str;
use serde_json::json;
use tera::Tera;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

fn server_config(api_url: &str) -> ServerConfig {
    serde_json::from_value(json!({
        "address": "127.0.0.1",
        "port": 8080,
        "templates_dir": "templates/**/*",
        "secret": "unused",
        "api_url": api_url,
        "api_token": common::TEST_TOKEN,
        "company": {"name": "Test Traders", "state_code": "27"},
        "modules": [{
            "module_code": "LedgerMast",
            "title": "Ledger Master",
            "list_route": "/masters/ledger",
            "fetch_endpoint": "api/ledger/fetch/Basedata",
            "delete_endpoint_prefix": "api/ledger/del/"
        }]
    }))
    .expect("server config")
}

fn registry() -> ModuleRegistry {
    ModuleRegistry::new(vec![
        ModuleDescriptor::new(
            "LedgerMast",
            "Ledger Master",
            "/masters/ledger",
            "api/ledger/fetch/Basedata",
            "api/ledger/del/",
        )
        .unwrap(),
    ])
}

/// Application wired like `run`, against the mock backend.
macro_rules! test_app {
    ($backend:expr) => {{
        let config = server_config(&$backend.url());
        let key = Key::generate();
        let tera = Tera::new(&config.templates_dir).expect("templates");

        test::init_service(
            App::new()
                .wrap(
                    FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build())
                        .build(),
                )
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .configure(ledgerdesk::configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new($backend.repository()))
                .app_data(web::Data::new(registry()))
                .app_data(web::Data::new(ListViewStore::new(16)))
                .app_data(web::Data::new(config)),
        )
        .await
    }};
}

/// Cookies carried from one request to the next.
#[derive(Default)]
struct CookieJar(Vec<Cookie<'static>>);

impl CookieJar {
    fn remember<B>(&mut self, resp: &ServiceResponse<B>) {
        for cookie in resp.response().cookies() {
            let cookie = cookie.into_owned();
            self.0.retain(|kept| kept.name() != cookie.name());
            if !cookie.value().is_empty() {
                self.0.push(cookie);
            }
        }
    }

    fn attach(&self, mut req: test::TestRequest) -> test::TestRequest {
        for cookie in &self.0 {
            req = req.cookie(cookie.clone());
        }
        req
    }
}

async fn mount_ledger_list(backend: &common::TestBackend) {
    Mock::given(method("GET"))
        .and(path("/api/ledger/fetch/Basedata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"pid": 1, "name": "Alpha Traders"},
            {"pid": 2, "name": "Beta Stores"}
        ])))
        .mount(&backend.server)
        .await;
}

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn list_page_renders_fetched_records() {
    let backend = common::TestBackend::start().await;
    mount_ledger_list(&backend).await;
    let app = test_app!(backend);

    let req = test::TestRequest::get()
        .uri("/base/basemaster?mod=LedgerMast")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Alpha Traders"));
    assert!(body.contains("Beta Stores"));
    assert!(body.contains(r#"name="pid" value="2""#));
}

#[actix_web::test]
async fn unknown_module_renders_empty_list_without_backend_call() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    let req = test::TestRequest::get()
        .uri("/base/basemaster?mod=Nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("No records."));
}

#[actix_web::test]
async fn confirmed_delete_removes_only_that_record() {
    let backend = common::TestBackend::start().await;
    mount_ledger_list(&backend).await;
    Mock::given(method("DELETE"))
        .and(path("/api/ledger/del/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);
    let mut jar = CookieJar::default();

    let req = test::TestRequest::get()
        .uri("/base/basemaster?mod=LedgerMast")
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::post().uri("/base/basemaster/delete"))
        .set_form([("pid", "2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/base/basemaster/current");
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::get().uri("/base/basemaster/current"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Delete record 2?"));

    let req = jar
        .attach(test::TestRequest::post().uri("/base/basemaster/delete/confirm"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::get().uri("/base/basemaster/current"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Record 2 deleted."));
    assert!(body.contains("Alpha Traders"));
    assert!(!body.contains("Beta Stores"));
    assert!(!body.contains("Delete record 2?"));
}

#[actix_web::test]
async fn failed_delete_keeps_list_and_flashes_error() {
    let backend = common::TestBackend::start().await;
    mount_ledger_list(&backend).await;
    Mock::given(method("DELETE"))
        .and(path("/api/ledger/del/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("ledger in use"))
        .expect(1)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);
    let mut jar = CookieJar::default();

    let req = test::TestRequest::get()
        .uri("/base/basemaster?mod=LedgerMast")
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::post().uri("/base/basemaster/delete"))
        .set_form([("pid", "1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::post().uri("/base/basemaster/delete/confirm"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::get().uri("/base/basemaster/current"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Delete failed (500): ledger in use"));
    assert!(body.contains("Alpha Traders"));
    assert!(body.contains("Beta Stores"));
}

#[actix_web::test]
async fn cancelled_delete_sends_nothing() {
    let backend = common::TestBackend::start().await;
    mount_ledger_list(&backend).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);
    let mut jar = CookieJar::default();

    let req = test::TestRequest::get()
        .uri("/base/basemaster?mod=LedgerMast")
        .to_request();
    let resp = test::call_service(&app, req).await;
    jar.remember(&resp);

    for uri in ["/base/basemaster/delete", "/base/basemaster/delete/cancel"] {
        let req = jar
            .attach(test::TestRequest::post().uri(uri))
            .set_form([("pid", "1")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        jar.remember(&resp);
    }

    let req = jar
        .attach(test::TestRequest::get().uri("/base/basemaster/current"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(!body.contains("Delete record 1?"));
    assert!(body.contains("Alpha Traders"));
}

#[actix_web::test]
async fn session_token_replaces_configured_token() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ledger/fetch/Basedata"))
        .and(header_eq("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);
    let mut jar = CookieJar::default();

    let req = test::TestRequest::post()
        .uri("/session/token")
        .set_form([("token", "session-token")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    jar.remember(&resp);

    let req = jar
        .attach(test::TestRequest::get().uri("/base/basemaster?mod=LedgerMast"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn dashboard_lists_configured_modules() {
    let backend = common::TestBackend::start().await;
    let app = test_app!(backend);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Ledger Master"));
    assert!(body.contains("Test Traders"));
}

#[actix_web::test]
async fn view_page_renders_ledger_read_only_and_rejects_post() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ledger/fetch/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "table": [{"pid": 1, "accountTypeName": "Debtors"}],
            "table3": [{"ledgerName": "Gamma Agencies", "accountTypeName": "Debtors"}],
            "table4": []
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    let req = test::TestRequest::get()
        .uri("/masters/ledger?action=view&pid=5")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Gamma Agencies"));
    assert!(body.contains("<fieldset disabled>"));

    let req = test::TestRequest::post()
        .uri("/masters/ledger?action=view&pid=5")
        .set_form([("company_name", "Changed")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/masters/ledger?action=view&pid=5");
}

#[actix_web::test]
async fn valid_product_is_created_and_redirects_to_list() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/product/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pid": 11})))
        .expect(1)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    let req = test::TestRequest::post()
        .uri("/masters/product?action=add")
        .set_form([
            ("product_name", "Sambrani Cup"),
            ("hsn_code", "3307"),
            ("product_description", ""),
            ("unit_price", "200"),
            ("opening_units", "5"),
            ("opening_balance", "1000"),
            ("is_active", "on"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/base/basemaster?mod=ProdMast");
}

#[actix_web::test]
async fn invalid_product_is_rendered_again_with_error() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    let req = test::TestRequest::post()
        .uri("/masters/product?action=add")
        .set_form([
            ("product_name", "X"),
            ("unit_price", "abc"),
            ("opening_units", "5"),
            ("opening_balance", "1000"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("alert-danger"));
    assert!(body.contains(r#"value="abc""#));
}

#[actix_web::test]
async fn invoice_preview_shows_split_tax_without_saving() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    let req = test::TestRequest::post()
        .uri("/transaction/invoice-proforma?action=add")
        .set_form([
            ("party_name", "Delta Mart"),
            ("invoice_no", "INV-1"),
            ("invoice_date", "2024-04-01"),
            ("party_state_code", "27"),
            ("description", "Cup"),
            ("quantity", "2"),
            ("unit_price", "100"),
            ("gst_rate", "18"),
            ("discount", "0"),
            ("intent", "preview"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("CGST"));
    assert!(!body.contains("IGST"));
    assert!(body.contains("236"));
}

#[actix_web::test]
async fn oversized_invoice_amounts_are_reported_on_the_form() {
    let backend = common::TestBackend::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let app = test_app!(backend);

    for (quantity, unit_price, intent) in [
        ("1", "1000000000000.01", "preview"),
        ("1000001", "100", "preview"),
        ("99999999999", "100", "save"),
    ] {
        let req = test::TestRequest::post()
            .uri("/transaction/invoice-proforma?action=add")
            .set_form([
                ("party_name", "Delta Mart"),
                ("invoice_no", "INV-1"),
                ("invoice_date", "2024-04-01"),
                ("party_state_code", "27"),
                ("description", "Cup"),
                ("quantity", quantity),
                ("unit_price", unit_price),
                ("gst_rate", "18"),
                ("discount", "0"),
                ("intent", intent),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{quantity} x {unit_price}");
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("alert-danger"), "{quantity} x {unit_price}");
        assert!(body.contains("Item 1"), "{quantity} x {unit_price}");
    }
}
