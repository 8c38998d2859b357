//! REST adapter for the whiteboard backend.
//!
//! Endpoints (all JSON):
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/api/whiteboards` | array of documents |
//! | GET | `/api/whiteboards/{id}` | document |
//! | POST | `/api/whiteboards` | 201 + document |
//! | PUT | `/api/whiteboards/{id}` | document |
//! | DELETE | `/api/whiteboards/{id}` | `{"success": true}` |
//!
//! Failures carry `{"error": "..."}`. 404 maps to [`StoreError::NotFound`],
//! 409 to [`StoreError::Conflict`], 401/403 to [`StoreError::Unauthorized`].

use std::time::Duration;

use canvas::document::{Document, SavePayload};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::store::{PersistenceAdapter, StoreError};
use crate::config::ClientConfig;

const COLLECTION: &str = "/api/whiteboards";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "api request");
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, id: Option<&str>) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }
        Err(status_error(status.as_u16(), &body, id))
    }
}

fn status_error(status: u16, body: &str, id: Option<&str>) -> StoreError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_owned(), |b| b.error);
    match (status, id) {
        (401 | 403, _) => StoreError::Unauthorized,
        (404, Some(id)) => StoreError::NotFound(id.to_owned()),
        (409, _) => StoreError::Conflict(message),
        _ => StoreError::Status { status, message },
    }
}

fn item_path(id: &str) -> String {
    format!("{COLLECTION}/{id}")
}

#[async_trait::async_trait]
impl PersistenceAdapter for RemoteStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        self.send(self.request(Method::GET, COLLECTION), None).await
    }

    async fn load(&self, id: &str) -> Result<Document, StoreError> {
        self.send(self.request(Method::GET, &item_path(id)), Some(id)).await
    }

    async fn create(&self, payload: &SavePayload) -> Result<Document, StoreError> {
        self.send(self.request(Method::POST, COLLECTION).json(payload), None).await
    }

    async fn save(&self, id: &str, payload: &SavePayload) -> Result<Document, StoreError> {
        self.send(self.request(Method::PUT, &item_path(id)).json(payload), Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _ack: serde_json::Value = self.send(self.request(Method::DELETE, &item_path(id)), Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;
