//! Backend access over HTTP.
//!
//! Every request carries `Authorization: Bearer {token}` and a JSON content
//! type. Reads fail closed; writes report the backend's error text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

use crate::domain::record::{Record, RecordError};
use crate::domain::types::{IdentifierField, RecordId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{RecordReader, RecordWriter, SubmitMethod};

#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    token: String,
    identifier: IdentifierField,
}

impl HttpRepository {
    /// Builds a repository for `base_url`. Without a timeout a hung backend
    /// hangs the calling request.
    pub fn new(
        base_url: &str,
        token: &str,
        identifier: IdentifierField,
        timeout: Option<Duration>,
    ) -> RepositoryResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.to_string(),
            token: token.to_string(),
            identifier,
        })
    }

    /// Same backend, different bearer token. The connection pool is shared.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..self.clone()
        }
    }

    pub fn identifier(&self) -> &IdentifierField {
        &self.identifier
    }

    /// Joins the base URL and `endpoint` with exactly one slash.
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(endpoint))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
    }

    async fn get_json(&self, endpoint: &str) -> RepositoryResult<Value> {
        let response = self.request(Method::GET, endpoint).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn try_fetch_all(&self, endpoint: &str) -> RepositoryResult<Vec<Record>> {
        let Value::Array(items) = self.get_json(endpoint).await? else {
            return Err(RepositoryError::Decode(
                "expected a JSON array of records".to_string(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match Record::from_json(item, &self.identifier) {
                Ok(record) => records.push(record),
                Err(RecordError::NotAnObject) => {
                    return Err(RepositoryError::Decode(
                        "record list contains a non-object element".to_string(),
                    ));
                }
                Err(err @ RecordError::MissingIdentifier(_)) => {
                    log::warn!("Dropping record from {endpoint}: {err}");
                }
            }
        }
        Ok(records)
    }
}

/// Passes 2xx responses through and turns the rest into
/// [`RepositoryError::Status`].
async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let text = response.text().await.unwrap_or_default();

    let message = if is_json {
        serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| {
                body.get("message").map(|message| match message {
                    Value::String(message) => message.clone(),
                    other => other.to_string(),
                })
            })
            .unwrap_or(text)
    } else {
        text
    };

    Err(RepositoryError::Status { status, message })
}

#[async_trait]
impl RecordReader for HttpRepository {
    async fn fetch_all(&self, endpoint: &str) -> Vec<Record> {
        self.try_fetch_all(endpoint).await.unwrap_or_else(|err| {
            log::error!("Failed to fetch records from {endpoint}: {err}");
            Vec::new()
        })
    }

    async fn fetch_details(&self, endpoint: &str) -> Option<Value> {
        self.get_json(endpoint)
            .await
            .map_err(|err| {
                log::error!("Failed to fetch details from {endpoint}: {err}");
                err
            })
            .ok()
    }
}

#[async_trait]
impl RecordWriter for HttpRepository {
    async fn delete_one(&self, prefix: &str, id: &RecordId) -> RepositoryResult<()> {
        let endpoint = format!("{prefix}{}", id.path_segment());
        let response = self.request(Method::DELETE, &endpoint).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn submit(
        &self,
        method: SubmitMethod,
        endpoint: &str,
        payload: &Value,
    ) -> RepositoryResult<Value> {
        let method = match method {
            SubmitMethod::Post => Method::POST,
            SubmitMethod::Put => Method::PUT,
        };
        let response = self
            .request(method, endpoint)
            .body(serde_json::to_vec(payload)?)
            .send()
            .await?;
        let text = ensure_success(response).await?.text().await?;

        if text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(base_url: &str) -> HttpRepository {
        HttpRepository::new(base_url, "token", IdentifierField::default(), None).unwrap()
    }

    #[test]
    fn url_joins_with_exactly_one_slash() {
        for base in ["http://api.local", "http://api.local/"] {
            let repo = repository(base);
            assert_eq!(
                repo.url("api/ledger/del/7"),
                "http://api.local/api/ledger/del/7"
            );
            assert_eq!(
                repo.url("/api/ledger/del/7"),
                "http://api.local/api/ledger/del/7"
            );
        }
    }

    #[test]
    fn with_token_keeps_the_backend() {
        let repo = repository("http://api.local/").with_token("other");
        assert_eq!(repo.token, "other");
        assert_eq!(repo.url("x"), "http://api.local/x");
    }
}
