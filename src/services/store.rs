//! Persistence adapter seam between the engine and a document backend.
//!
//! The engine never performs I/O. A host drives saves through
//! [`PersistenceAdapter`], whose implementations talk to the REST backend
//! ([`super::remote::RemoteStore`]) or keep documents in memory
//! ([`super::memory::MemoryStore`]).

use canvas::document::{Document, DocumentId, SavePayload};
use canvas::error::BoardError;

/// Errors from a persistence adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    /// The "may persist" gate is closed.
    #[error("persistence disabled")]
    Disabled,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Disabled => "E_DISABLED",
            Self::Http(_) => "E_HTTP",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
        }
    }

    /// Transport failures and 5xx responses are worth retrying.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<StoreError> for BoardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("document {id}")),
            StoreError::Decode(e) => Self::Parse(e),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Document CRUD against a backend.
#[async_trait::async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// All documents, newest first.
    async fn list(&self) -> Result<Vec<Document>, StoreError>;

    async fn load(&self, id: &str) -> Result<Document, StoreError>;

    async fn create(&self, payload: &SavePayload) -> Result<Document, StoreError>;

    /// Overwrite name and blob of an existing document.
    async fn save(&self, id: &str, payload: &SavePayload) -> Result<Document, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Change only the name, keeping the stored blob.
    async fn rename(&self, id: &str, name: &str) -> Result<Document, StoreError> {
        let current = self.load(id).await?;
        let payload = SavePayload { name: name.to_owned(), data: current.data };
        self.save(id, &payload).await
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
