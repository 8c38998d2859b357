//! Persisted document record and the element blob codec.
//!
//! A document travels as `{id, name, data, createdAt, updatedAt}` where
//! `data` is the element array serialized to a JSON string. Decoding is
//! all-or-nothing: a blob that fails to parse or validate yields an error
//! and no elements, so a corrupt load can never half-populate a board.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::element::Element;
use crate::error::BoardError;

/// Backend-assigned document identifier. Numeric ids are kept as their
/// decimal string.
pub type DocumentId = String;

/// A whiteboard as stored by the persistence backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "string_or_number")]
    pub id: DocumentId,
    pub name: String,
    /// Serialized element array.
    #[serde(default = "empty_blob")]
    pub data: String,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Document {
    /// Decode the element blob.
    ///
    /// # Errors
    ///
    /// See [`decode_elements`].
    pub fn elements(&self) -> Result<Vec<Element>, BoardError> {
        decode_elements(&self.data)
    }
}

/// Request body for create and save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub name: String,
    pub data: String,
}

impl SavePayload {
    /// Payload for `name` carrying `elements` as the blob.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Parse`] if serialization fails.
    pub fn new(name: &str, elements: &[Element]) -> Result<Self, BoardError> {
        Ok(Self { name: name.to_owned(), data: encode_elements(elements)? })
    }

    /// Payload for a brand-new, empty document.
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self { name: name.to_owned(), data: empty_blob() }
    }
}

fn empty_blob() -> String {
    "[]".to_owned()
}

fn string_or_number<'de, D>(de: D) -> Result<DocumentId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }

    Ok(match RawId::deserialize(de)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

/// Serialize elements to the opaque blob.
///
/// # Errors
///
/// Returns [`BoardError::Parse`] if serialization fails.
pub fn encode_elements(elements: &[Element]) -> Result<String, BoardError> {
    Ok(serde_json::to_string(elements)?)
}

/// Parse and validate an element blob. An empty or blank blob is an empty
/// board.
///
/// # Errors
///
/// Returns [`BoardError::Parse`] for malformed JSON or unknown element types,
/// and [`BoardError::Validation`] if two elements share an id.
pub fn decode_elements(blob: &str) -> Result<Vec<Element>, BoardError> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    let elements: Vec<Element> = serde_json::from_str(blob).map_err(|e| {
        warn!(error = %e, "document blob failed to parse");
        BoardError::from(e)
    })?;

    let mut seen = HashSet::with_capacity(elements.len());
    for element in &elements {
        if !seen.insert(element.id) {
            return Err(BoardError::Validation(format!("duplicate element id {}", element.id)));
        }
    }
    Ok(elements)
}
