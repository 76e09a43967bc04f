//! # Records
//!
//! Display helpers for resolved EDPOP records and the record ontology.

use crate::literal::get_string_literal;
use crate::lookup::Lookup;
use crate::primitives::{
    EDPOPREC_BIBLIOGRAPHICAL, EDPOPREC_BIOGRAPHICAL, EDPOPREC_NAME, EDPOPREC_ORIGINAL_TEXT,
    EDPOPREC_PREFIX, EDPOPREC_SUMMARY_TEXT, EDPOPREC_TITLE, FIELD_VALUE_SEPARATOR, RDFS_DOMAIN,
    TYPE,
};
use crate::types::SubjectExt;
use serde::Serialize;
use serde_json::Value;

/// The kind of record, from its `@type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Bibliographical,
    Biographical,
    Other,
}

impl RecordKind {
    /// Classify a record subject.
    #[must_use]
    pub fn of(record: &Value) -> Self {
        record
            .get(TYPE)
            .and_then(Value::as_str)
            .map_or(Self::Other, Self::from_type)
    }

    /// Classify a compacted class name.
    #[must_use]
    pub fn from_type(class: &str) -> Self {
        match class {
            EDPOPREC_BIBLIOGRAPHICAL => Self::Bibliographical,
            EDPOPREC_BIOGRAPHICAL => Self::Biographical,
            _ => Self::Other,
        }
    }

    /// The field holding the main display text.
    fn main_field(self) -> Option<&'static str> {
        match self {
            Self::Bibliographical => Some(EDPOPREC_TITLE),
            Self::Biographical => Some(EDPOPREC_NAME),
            Self::Other => None,
        }
    }
}

/// Main display text of a record: title or name, else `<@id>`.
#[must_use]
pub fn main_display(record: &Value) -> String {
    RecordKind::of(record)
        .main_field()
        .and_then(|field| record.get(field))
        .and_then(|field| field.get(EDPOPREC_ORIGINAL_TEXT))
        .and_then(get_string_literal)
        .unwrap_or_else(|| format!("<{}>", record.ld_id().unwrap_or_default()))
}

fn field_value_display(value: &Value) -> String {
    value
        .get(EDPOPREC_SUMMARY_TEXT)
        .and_then(get_string_literal)
        .filter(|s| !s.is_empty())
        .or_else(|| value.get(EDPOPREC_ORIGINAL_TEXT).and_then(get_string_literal))
        .unwrap_or_default()
}

/// Display text of a field value.
///
/// Summary text is preferred over original text. Repeated values are joined
/// with `" ; "`. Missing values give `None`.
#[must_use]
pub fn field_main_display(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(field_value_display)
                .collect::<Vec<_>>()
                .join(FIELD_VALUE_SEPARATOR),
        ),
        single => Some(field_value_display(single)),
    }
}

/// One `(property, value)` pair per value of each property.
///
/// A property the record lacks still gets a single `(property, null)` pair.
#[must_use]
pub fn flatter_fields(record: &Value, property_ids: &[&str]) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    for &key in property_ids {
        match record.get(key) {
            None | Some(Value::Null) => fields.push((key.to_string(), Value::Null)),
            Some(Value::Array(items)) => {
                fields.extend(items.iter().map(|v| (key.to_string(), v.clone())));
            }
            Some(single) => fields.push((key.to_string(), single.clone())),
        }
    }
    fields
}

/// Check whether an `rdfs:domain` id admits records of `kind`.
///
/// `edpoprec:Record` admits every kind; the qualified record classes admit
/// only their own.
#[must_use]
pub fn domain_fits(kind: RecordKind, domain_id: &str) -> bool {
    let Some(qualifier) = domain_id
        .strip_prefix(EDPOPREC_PREFIX)
        .and_then(|rest| rest.strip_suffix("Record"))
    else {
        return false;
    };
    match qualifier {
        "" => true,
        "Bibliographical" => kind == RecordKind::Bibliographical,
        "Biographical" => kind == RecordKind::Biographical,
        _ => false,
    }
}

/// Ontology properties with at least one domain that fits `kind`.
#[must_use]
pub fn properties_for(kind: RecordKind, ontology: &Lookup) -> Vec<&Value> {
    ontology
        .iter()
        .filter(|property| {
            let domains = match property.get(RDFS_DOMAIN) {
                Some(Value::Array(items)) => items.as_slice(),
                Some(single) => std::slice::from_ref(single),
                None => &[],
            };
            domains
                .iter()
                .filter_map(Value::ld_id)
                .any(|id| domain_fits(kind, id))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
