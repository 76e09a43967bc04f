//! # Document Parsers
//!
//! Thin layer between incoming JSON-LD documents and the resolver.
//!
//! - `parse_entity`: one resolved top-level subject, or `MalformedDocument`
//! - `Collection`: raw subjects plus the document context
//! - `NestedCollection`: resolved subjects, optionally filtered by `@type`
//! - `OrderedCollection`: the ordered items of an ActivityStreams collection
//!
//! A document without `@graph` is accepted as a single compacted subject. This
//! keeps lenient producers working; a warning is logged each time.

use crate::primitives::{AS_PREFIX, CONTEXT, GRAPH, LIST, TYPE, VALUE};
use crate::resolver::{Forest, enforest};
use crate::types::{LdError, Subject};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

// =============================================================================
// GRAPH EXTRACTION
// =============================================================================

/// The subjects of a document.
///
/// - `{"@graph": [...]}`: the array (a non-array `@graph` is one subject)
/// - `[...]`: the array itself
/// - anything else: the document as a one-element graph
pub fn graph_of(document: &Value) -> Cow<'_, [Value]> {
    match document {
        Value::Array(items) => Cow::Borrowed(items.as_slice()),
        Value::Object(obj) => match obj.get(GRAPH) {
            Some(Value::Array(items)) => Cow::Borrowed(items.as_slice()),
            Some(single) => Cow::Owned(vec![single.clone()]),
            None => {
                tracing::warn!("document has no @graph key; assuming it is a single compacted subject");
                Cow::Owned(vec![document.clone()])
            }
        },
        _ => {
            tracing::warn!("document has no @graph key; assuming it is a single compacted subject");
            Cow::Owned(vec![document.clone()])
        }
    }
}

/// Check whether `document` is a fragment of an already parsed payload.
///
/// Fragments are objects carrying neither `@context` nor `@graph`.
#[must_use]
pub fn is_fragment(document: &Value) -> bool {
    document
        .as_object()
        .is_some_and(|obj| !obj.contains_key(CONTEXT) && !obj.contains_key(GRAPH))
}

// =============================================================================
// SINGLE ENTITY
// =============================================================================

/// Parse a document that describes exactly one entity.
///
/// Fragments (see [`is_fragment`]) are returned unchanged. Otherwise the graph
/// is resolved and must contain exactly one top-level subject.
///
/// # Errors
/// - `LdError::MalformedDocument` if zero or several top-level subjects are found
/// - `LdError::DepthLimitExceeded` / `LdError::NodeLimitExceeded` if the entity
///   is too deep or too large to build
pub fn parse_entity(document: &Value) -> Result<Value, LdError> {
    if is_fragment(document) {
        return Ok(document.clone());
    }

    let subjects = graph_of(document);
    let top = enforest(&subjects, true)?;
    let [entity]: [Value; 1] = top
        .try_into()
        .map_err(|rest: Vec<Value>| LdError::MalformedDocument { found: rest.len() })?;
    Ok(entity)
}

/// Add `context` to an outgoing entity.
///
/// Non-object entities are returned unchanged.
#[must_use]
pub fn with_context(entity: &Value, context: Option<&Value>) -> Value {
    match (entity, context) {
        (Value::Object(obj), Some(ctx)) => {
            let mut out = obj.clone();
            out.insert(CONTEXT.to_string(), ctx.clone());
            Value::Object(out)
        }
        _ => entity.clone(),
    }
}

// =============================================================================
// COLLECTION
// =============================================================================

/// Raw subjects of a document, left unresolved.
///
/// List views consume the rows themselves, so nesting is deferred to whoever
/// parses the individual entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    /// The document's `@context`, kept for serialization.
    pub context: Option<Value>,
    /// Subjects in document order.
    pub subjects: Vec<Value>,
}

impl Collection {
    /// Parse a collection document.
    #[must_use]
    pub fn parse(document: &Value) -> Self {
        Self {
            context: document.get(CONTEXT).cloned(),
            subjects: graph_of(document).into_owned(),
        }
    }

    /// Serialize back to a document.
    ///
    /// Without a context this is a plain array; with one it is
    /// `{"@graph": [...], "@context": ...}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let graph = Value::Array(self.subjects.clone());
        match &self.context {
            None => graph,
            Some(ctx) => {
                let mut doc = Map::new();
                doc.insert(GRAPH.to_string(), graph);
                doc.insert(CONTEXT.to_string(), ctx.clone());
                Value::Object(doc)
            }
        }
    }

    /// Serialize one member entity, adding the collection context if any.
    #[must_use]
    pub fn entity_to_json(&self, entity: &Value) -> Value {
        with_context(entity, self.context.as_ref())
    }

    /// Number of subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Check if the collection has no subjects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

// =============================================================================
// NESTED COLLECTION
// =============================================================================

/// Parser for collections whose members are resolved subjects.
///
/// Without a target class, all top-level subjects are returned and internal
/// ones are dropped. With a target class, every resolved subject whose
/// `@type` equals the class is returned, internal or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedCollection {
    target_class: Option<String>,
}

impl NestedCollection {
    /// Parser with no class filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser keeping only subjects of the given RDF class.
    #[must_use]
    pub fn with_target_class(class: impl Into<String>) -> Self {
        Self {
            target_class: Some(class.into()),
        }
    }

    /// The configured class filter.
    #[must_use]
    pub fn target_class(&self) -> Option<&str> {
        self.target_class.as_deref()
    }

    /// Parse and resolve a collection document.
    ///
    /// With a target class only the matching subjects are built.
    ///
    /// # Errors
    /// Returns `LdError::DepthLimitExceeded` or `LdError::NodeLimitExceeded`
    /// when the result is too deep or too large to build.
    pub fn parse(&self, document: &Value) -> Result<Vec<Value>, LdError> {
        let subjects = graph_of(document);
        match &self.target_class {
            None => enforest(&subjects, true),
            Some(class) => {
                let forest = Forest::grow(&subjects);
                forest.build_matching(|s| has_type(s, class))
            }
        }
    }
}

// =============================================================================
// ORDERED COLLECTION
// =============================================================================

/// Members of an ActivityStreams `OrderedCollection`, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderedCollection {
    /// `totalItems`, when the collection states it.
    pub total_items: Option<u64>,
    /// Resolved `orderedItems`.
    pub items: Vec<Value>,
}

impl OrderedCollection {
    /// Parse with the default `as:` prefix.
    pub fn parse(document: &Value) -> Result<Self, LdError> {
        Self::parse_with_prefix(document, AS_PREFIX)
    }

    /// Parse a graph that contains exactly one `OrderedCollection` subject.
    ///
    /// `prefix` is the compacted prefix of the ActivityStreams namespace.
    ///
    /// # Errors
    /// - `LdError::MissingGraph` if the document has no `@graph` array
    /// - `LdError::MissingOrderedCollection` if no subject has the class
    /// - `LdError::DepthLimitExceeded` / `LdError::NodeLimitExceeded` if the
    ///   collection is too deep or too large to build
    pub fn parse_with_prefix(document: &Value, prefix: &str) -> Result<Self, LdError> {
        let Some(subjects) = document.get(GRAPH).and_then(Value::as_array) else {
            return Err(LdError::MissingGraph);
        };

        let class = format!("{prefix}OrderedCollection");
        let collection = Forest::grow(subjects)
            .find(|s| has_type(s, &class))?
            .ok_or(LdError::MissingOrderedCollection { class })?;

        let total_items = collection
            .get(format!("{prefix}totalItems").as_str())
            .and_then(count_of);
        let items = collection
            .get(format!("{prefix}orderedItems").as_str())
            .and_then(|v| v.get(LIST))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(Self { total_items, items })
    }
}

fn has_type(subject: &Subject, class: &str) -> bool {
    subject.get(TYPE).and_then(Value::as_str) == Some(class)
}

/// Read a count from a number, a numeric string or a typed literal.
fn count_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(obj) => obj.get(VALUE).and_then(count_of),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
