//! Error taxonomy for operations that cross the persistence boundary.
//!
//! Store mutations and geometry never produce these: unknown ids are no-ops
//! and numeric input is clamped. Only load/save/parse return `BoardError`.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::element::ElementId;

/// Errors surfaced to the host at the load/save/parse boundary.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A referenced element or document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input was structurally invalid and could not be clamped into shape.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The storage backend failed; local state is untouched and still dirty.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// A serialized document could not be decoded.
    #[error("document parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BoardError {
    /// Shorthand for a missing element.
    #[must_use]
    pub fn element_not_found(id: ElementId) -> Self {
        Self::NotFound(format!("element {id}"))
    }

    /// Stable machine-readable code for the host UI.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Persistence(_) => "E_PERSISTENCE",
            Self::Parse(_) => "E_PARSE",
        }
    }

    /// Whether retrying the same operation later can succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
