//! # Core Type Definitions
//!
//! This module contains the shared types for the ldforest JSON-LD engine:
//! - Subject representation (`Subject`, `SubjectExt`)
//! - Error types (`LdError`)
//!
//! ## Representation
//!
//! Compacted JSON-LD is plain JSON, so subjects are kept as
//! `serde_json::Map` values rather than a bespoke node type. The workspace
//! enables `preserve_order`, which makes key order part of the data: a
//! resolved subject lists its predicates in the order the producer wrote them.

use crate::primitives::{ID, LIST};
use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// SUBJECT
// =============================================================================

/// A node of the linked-data graph: predicate name to value.
pub type Subject = Map<String, Value>;

/// Read helpers for JSON-LD shaped values.
pub trait SubjectExt {
    /// The `@id` of this value, if it is an object carrying a string `@id`.
    fn ld_id(&self) -> Option<&str>;

    /// The elements of a `{"@list": [...]}` wrapper.
    fn ld_list(&self) -> Option<&Vec<Value>>;

    /// `true` if this value is an object with an `@id` key of any type.
    fn has_ld_id(&self) -> bool;
}

impl SubjectExt for Value {
    fn ld_id(&self) -> Option<&str> {
        self.get(ID).and_then(Value::as_str)
    }

    fn ld_list(&self) -> Option<&Vec<Value>> {
        self.get(LIST).and_then(Value::as_array)
    }

    fn has_ld_id(&self) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(ID))
    }
}

impl SubjectExt for Subject {
    fn ld_id(&self) -> Option<&str> {
        self.get(ID).and_then(Value::as_str)
    }

    fn ld_list(&self) -> Option<&Vec<Value>> {
        self.get(LIST).and_then(Value::as_array)
    }

    fn has_ld_id(&self) -> bool {
        self.contains_key(ID)
    }
}

/// Build a bare `{"@id": id}` reference.
#[must_use]
pub fn reference(id: impl Into<String>) -> Value {
    let mut obj = Subject::new();
    obj.insert(ID.to_string(), Value::String(id.into()));
    Value::Object(obj)
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in ldforest.
///
/// - Growing a forest is infallible; building trees is bounded by limits
/// - Document-shape contracts fail with their own variants
/// - The CORE should never panic; all errors are recoverable
#[derive(Debug, Error)]
pub enum LdError {
    /// A single-entity document did not contain exactly one top-level subject.
    #[error("Malformed document: expected exactly one top-level subject, found {found}")]
    MalformedDocument { found: usize },

    /// A document that must carry `@graph` has none.
    #[error("Malformed document: no @graph key")]
    MissingGraph,

    /// A nested tree would hold more than `limit` subjects on one path.
    #[error("Nesting too deep: subject {id} is more than {limit} subjects down")]
    DepthLimitExceeded { id: String, limit: usize },

    /// Building would inline more than `limit` subjects.
    #[error("Result too large: more than {limit} subjects inlined")]
    NodeLimitExceeded { limit: usize },

    /// The graph has no `OrderedCollection` subject.
    #[error("No subject of type {class} in graph")]
    MissingOrderedCollection { class: String },

    /// A document or subject was expected to be a JSON object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LdError {
    /// Describe the JSON kind of `value` for [`LdError::NotAnObject`].
    #[must_use]
    pub fn not_an_object(value: &Value) -> Self {
        Self::NotAnObject(match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        })
    }
}

impl From<serde_json::Error> for LdError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
