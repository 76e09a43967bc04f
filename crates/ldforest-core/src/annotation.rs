//! # Annotation Mapper
//!
//! Web Annotations are deeply nested in JSON-LD, which is awkward to edit. The
//! nested values of interest are mirrored onto top-level keys when an
//! annotation is parsed, and folded back into the nested shape before it is
//! serialized. Editing code reads and writes the flat keys only:
//!
//! ```text
//! motivation             oa:motivatedBy/@id
//! tagURL                 oa:hasBody/@id            (only if the body is a reference)
//! oa:hasSource           oa:hasTarget/oa:hasSource/@id
//! edpopcol:field         oa:hasTarget/oa:hasSelector/edpopcol:field/@id
//! edpopcol:originalText  oa:hasTarget/oa:hasSelector/edpopcol:originalText
//! ```
//!
//! `lower_flat_attributes(lift_flat_attributes(doc)) == doc` holds for every
//! document in the canonical nested shape, and no flat key survives lowering.

use crate::document::parse_entity;
use crate::literal::{get_date_time_literal, get_string_literal};
use crate::lookup::Lookup;
use crate::primitives::{
    AS_PUBLISHED, AS_UPDATED, DCTERMS_CREATOR, EDPOPCOL_FIELD, EDPOPCOL_ORIGINAL_TEXT,
    FLAT_FIELDS, FLAT_MOTIVATION, FLAT_TAG_URL, ID, OA_COMMENTING, OA_HAS_BODY, OA_HAS_SELECTOR,
    OA_HAS_SOURCE, OA_HAS_TARGET, OA_MOTIVATED_BY, OA_TAGGING,
};
use crate::types::{LdError, Subject, SubjectExt, reference};
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

/// Characters left alone when a target IRI is placed in a URL path segment.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// JSON truthiness: `null`, `false`, `0` and `""` count as unset.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

/// `{"@id": value}` for an arbitrary flat value.
fn wrap_id(value: &Value) -> Value {
    match value {
        Value::String(id) => reference(id.as_str()),
        other => {
            let mut obj = Subject::new();
            obj.insert(ID.to_string(), other.clone());
            Value::Object(obj)
        }
    }
}

// =============================================================================
// FLAT / DEEP MAPPING
// =============================================================================

/// Add the flat convenience keys to a nested annotation.
///
/// The result holds the flat keys followed by every original key. Where an
/// original key has the same name as a flat key, the original value wins.
#[must_use]
pub fn lift_flat_attributes(nested: &Subject) -> Subject {
    let mut flat = Subject::new();

    if let Some(id) = nested.get(OA_MOTIVATED_BY).and_then(Value::ld_id) {
        flat.insert(FLAT_MOTIVATION.to_string(), Value::from(id));
    }
    if let Some(id) = nested.get(OA_HAS_BODY).and_then(Value::ld_id) {
        flat.insert(FLAT_TAG_URL.to_string(), Value::from(id));
    }
    if let Some(target) = nested.get(OA_HAS_TARGET) {
        if let Some(id) = target.get(OA_HAS_SOURCE).and_then(Value::ld_id) {
            flat.insert(OA_HAS_SOURCE.to_string(), Value::from(id));
        }
        if let Some(selector) = target.get(OA_HAS_SELECTOR) {
            if let Some(id) = selector.get(EDPOPCOL_FIELD).and_then(Value::ld_id) {
                flat.insert(EDPOPCOL_FIELD.to_string(), Value::from(id));
            }
            if let Some(text) = selector.get(EDPOPCOL_ORIGINAL_TEXT).filter(|v| is_set(v)) {
                flat.insert(EDPOPCOL_ORIGINAL_TEXT.to_string(), text.clone());
            }
        }
    }

    for (key, value) in nested {
        flat.insert(key.clone(), value.clone());
    }
    flat
}

/// Fold the flat convenience keys back into the nested shape.
///
/// Existing nested target and selector objects are updated in place; they are
/// only created when a flat key needs them. All flat keys are removed.
#[must_use]
pub fn lower_flat_attributes(flat: &Subject) -> Subject {
    let mut out = flat.clone();

    let source = flat.get(OA_HAS_SOURCE).filter(|v| is_set(v));
    let field = flat.get(EDPOPCOL_FIELD).filter(|v| is_set(v));
    let text = flat.get(EDPOPCOL_ORIGINAL_TEXT).filter(|v| is_set(v));
    let tag_url = flat.get(FLAT_TAG_URL).filter(|v| is_set(v));
    let motivation = flat.get(FLAT_MOTIVATION).filter(|v| is_set(v));

    let mut target = flat
        .get(OA_HAS_TARGET)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let mut selector = target
        .get(OA_HAS_SELECTOR)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(field) = field {
        selector.insert(EDPOPCOL_FIELD.to_string(), wrap_id(field));
    }
    if let Some(text) = text {
        selector.insert(EDPOPCOL_ORIGINAL_TEXT.to_string(), text.clone());
    }
    let has_selector = field.is_some() || text.is_some();

    if let Some(source) = source {
        target.insert(OA_HAS_SOURCE.to_string(), wrap_id(source));
    }
    if has_selector {
        target.insert(OA_HAS_SELECTOR.to_string(), Value::Object(selector));
    }
    if source.is_some() || has_selector {
        out.insert(OA_HAS_TARGET.to_string(), Value::Object(target));
    }
    if let Some(tag_url) = tag_url {
        out.insert(OA_HAS_BODY.to_string(), wrap_id(tag_url));
    }
    if let Some(motivation) = motivation {
        out.insert(OA_MOTIVATED_BY.to_string(), wrap_id(motivation));
    }

    for key in FLAT_FIELDS {
        out.shift_remove(key);
    }
    out
}

// =============================================================================
// MOTIVATION
// =============================================================================

/// Why an annotation was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motivation {
    /// `oa:commenting`: the body is free text.
    Commenting,
    /// `oa:tagging`: the body refers to a glossary term.
    Tagging,
    /// Any other motivation id.
    Other(String),
}

impl Motivation {
    /// Classify a motivation id.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            OA_COMMENTING => Self::Commenting,
            OA_TAGGING => Self::Tagging,
            other => Self::Other(other.to_string()),
        }
    }

    /// The compacted motivation id.
    #[must_use]
    pub fn as_id(&self) -> &str {
        match self {
            Self::Commenting => OA_COMMENTING,
            Self::Tagging => OA_TAGGING,
            Self::Other(id) => id,
        }
    }
}

// =============================================================================
// ANNOTATION ENTITY
// =============================================================================

/// An annotation held in flat form.
///
/// Both views coexist in `attributes` after parsing; only the flat keys should
/// be edited. [`Annotation::to_json`] produces the wire shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    attributes: Subject,
}

impl Annotation {
    /// Parse an annotation document and lift its flat keys.
    ///
    /// # Errors
    /// Propagates `LdError::MalformedDocument` from entity parsing and returns
    /// `LdError::NotAnObject` if the entity is not a JSON object.
    pub fn parse(document: &Value) -> Result<Self, LdError> {
        let entity = parse_entity(document)?;
        let nested = entity
            .as_object()
            .ok_or_else(|| LdError::not_an_object(&entity))?;
        Ok(Self {
            attributes: lift_flat_attributes(nested),
        })
    }

    /// Wrap attributes that are already in flat form.
    #[must_use]
    pub fn from_attributes(attributes: Subject) -> Self {
        Self { attributes }
    }

    /// All current attributes, flat and nested.
    #[must_use]
    pub fn attributes(&self) -> &Subject {
        &self.attributes
    }

    /// Get one attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set one attribute.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Overwrite attributes with every key of `changes`.
    ///
    /// Used to apply a freshly parsed server response or a batch of edits.
    pub fn update(&mut self, changes: &Subject) {
        for (key, value) in changes {
            self.attributes.insert(key.clone(), value.clone());
        }
    }

    /// The annotation's `@id`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.ld_id()
    }

    /// The flat motivation.
    #[must_use]
    pub fn motivation(&self) -> Option<Motivation> {
        self.get(FLAT_MOTIVATION)
            .and_then(Value::as_str)
            .map(Motivation::from_id)
    }

    /// The flat tag reference.
    #[must_use]
    pub fn tag_url(&self) -> Option<&str> {
        self.get(FLAT_TAG_URL).and_then(Value::as_str)
    }

    /// Text to show for this annotation.
    ///
    /// Comments show their body; tags show the glossary label of the tag.
    #[must_use]
    pub fn display_text(&self, glossary: &Lookup) -> Option<String> {
        match self.motivation()? {
            Motivation::Commenting => self.get(OA_HAS_BODY).and_then(get_string_literal),
            Motivation::Tagging => glossary.pref_label(self.tag_url()?),
            Motivation::Other(_) => None,
        }
    }

    /// `as:published` timestamp.
    #[must_use]
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.get(AS_PUBLISHED).and_then(get_date_time_literal)
    }

    /// `as:updated` timestamp.
    #[must_use]
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.get(AS_UPDATED).and_then(get_date_time_literal)
    }

    /// `dcterms:creator`, resolved or as a reference.
    #[must_use]
    pub fn creator(&self) -> Option<&Value> {
        self.get(DCTERMS_CREATOR)
    }

    /// The nested wire shape, without flat keys.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(lower_flat_attributes(&self.attributes))
    }
}

/// Path of the annotation collection for a record.
#[must_use]
pub fn record_annotations_path(target: &str) -> String {
    format!(
        "/api/record-annotations/{}/",
        utf8_percent_encode(target, COMPONENT)
    )
}

// =============================================================================
// TESTS
// =============================================================================
