//! Configuration model loaded from external sources.

use serde::{Deserialize, Serialize};

use crate::domain::module::ModuleDescriptor;
use crate::domain::types::{IdentifierField, ModuleCode};

/// Seller details printed on invoices and used for the place of supply.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CompanyConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub state_code: String,
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the backend API.
    pub api_url: String,
    /// Bearer token used when the session carries none.
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub identifier_field: IdentifierField,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_max_list_views")]
    pub max_list_views: usize,
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleDescriptor>,
}

fn default_max_list_views() -> usize {
    1024
}

fn module(
    code: &'static str,
    title: &str,
    list_route: &str,
    fetch_endpoint: &str,
    delete_endpoint_prefix: &str,
) -> ModuleDescriptor {
    ModuleDescriptor {
        module_code: ModuleCode::from_static(code),
        title: title.to_string(),
        list_route: list_route.to_string(),
        fetch_endpoint: fetch_endpoint.to_string(),
        delete_endpoint_prefix: delete_endpoint_prefix.to_string(),
    }
}

/// Modules served when the configuration lists none.
pub fn default_modules() -> Vec<ModuleDescriptor> {
    vec![
        module(
            "LedgerMast",
            "Ledger Master",
            "/masters/ledger",
            "api/ledger/fetch/Basedata",
            "api/ledger/del/",
        ),
        module(
            "ProdMast",
            "Product Master",
            "/masters/product",
            "api/product/fetch/Basedata",
            "api/product/del/",
        ),
        module(
            "SalesInvoice",
            "Sales Invoice",
            "/transaction/invoice-proforma",
            "api/invoice/sales/fetch/Basedata",
            "api/invoice/sales/del/",
        ),
    ]
}
