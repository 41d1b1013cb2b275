//! Helpers shared by the integration tests.
#![allow(dead_code)]

use ledgerdesk::domain::types::IdentifierField;
use ledgerdesk::repository::HttpRepository;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// Mock backend plus a repository pointed at it.
pub struct TestBackend {
    pub server: MockServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn repository(&self) -> HttpRepository {
        HttpRepository::new(&self.url(), TEST_TOKEN, IdentifierField::default(), None)
            .expect("repository")
    }
}
