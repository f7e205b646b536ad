//! Document persistence layer.
//!
//! Handlers only see the [`Collection`] API: filtered find, find-by-id,
//! insert, replace-by-id and delete-by-id. The backing store enforces one
//! unique-field constraint per collection, which is the authoritative guard
//! behind the handlers' optimistic duplicate pre-check.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;

pub use memory::Collection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {field}: {value}")]
    UniqueViolation { field: &'static str, value: String },

    #[error("document {0} not found")]
    Missing(Uuid),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A record type persisted in its own collection.
pub trait Document: Clone + Send + Sync + Serialize + 'static {
    /// Collection name, used for logging and diagnostics.
    const COLLECTION: &'static str;

    /// Field whose value must be unique across the collection.
    const UNIQUE_FIELD: &'static str;

    fn id(&self) -> Uuid;

    /// Current value of the unique field.
    fn unique_value(&self) -> String;
}

/// Equality filter over document fields. An empty filter matches every
/// document in the collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    terms: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.terms.push((field.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Match against the JSON projection of a document. Every term must
    /// equal the corresponding field exactly.
    pub fn matches(&self, doc: &Value) -> bool {
        self.terms
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}
