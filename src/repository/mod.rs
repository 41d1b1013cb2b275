use async_trait::async_trait;
use serde_json::Value;

use crate::domain::record::Record;
use crate::domain::types::RecordId;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpRepository;

/// HTTP verb used when saving a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitMethod {
    /// Create a new record.
    Post,
    /// Update an existing record.
    Put,
}

#[async_trait]
pub trait RecordReader: Send + Sync {
    /// Every record behind `endpoint`; any failure yields an empty list.
    async fn fetch_all(&self, endpoint: &str) -> Vec<Record>;
    /// Raw detail document behind `endpoint`; any failure yields `None`.
    async fn fetch_details(&self, endpoint: &str) -> Option<Value>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn delete_one(&self, prefix: &str, id: &RecordId) -> RepositoryResult<()>;
    async fn submit(
        &self,
        method: SubmitMethod,
        endpoint: &str,
        payload: &Value,
    ) -> RepositoryResult<Value>;
}
