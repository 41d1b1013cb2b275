//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::domain::record::Record;
use crate::domain::types::RecordId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{RecordReader, RecordWriter, SubmitMethod};

mock! {
    pub Repository {}

    #[async_trait]
    impl RecordReader for Repository {
        async fn fetch_all(&self, endpoint: &str) -> Vec<Record>;
        async fn fetch_details(&self, endpoint: &str) -> Option<Value>;
    }

    #[async_trait]
    impl RecordWriter for Repository {
        async fn delete_one(&self, prefix: &str, id: &RecordId) -> RepositoryResult<()>;
        async fn submit(
            &self,
            method: SubmitMethod,
            endpoint: &str,
            payload: &Value,
        ) -> RepositoryResult<Value>;
    }
}
