//! # Literal Extractors
//!
//! Pull display values out of JSON-LD literals.
//!
//! - Strings: plain `xsd:string` values or `rdf:langString` objects, possibly
//!   repeated, reduced to one value with a language preference
//! - Dates: single `xsd:date` / `xsd:dateTime` typed literals only

use crate::primitives::{DEFAULT_LANGUAGE, LANGUAGE, TYPE, VALUE, XSD_DATE, XSD_DATE_TIME};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::slice;

// =============================================================================
// STRING LITERALS
// =============================================================================

/// Get one string from a literal or a sequence of literals, preferring English.
///
/// See [`get_string_literal_in`].
#[must_use]
pub fn get_string_literal(value: &Value) -> Option<String> {
    get_string_literal_in(value, DEFAULT_LANGUAGE)
}

/// Get one string from a literal or a sequence of literals.
///
/// Values are considered left to right:
/// - a plain string is taken only if nothing was taken yet;
/// - a language-tagged `{"@language", "@value"}` object is taken if nothing
///   was taken yet, or if its tag starts with `language`.
///
/// Anything else is skipped. Returns `None` if no value was taken.
#[must_use]
pub fn get_string_literal_in(value: &Value, language: &str) -> Option<String> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => slice::from_ref(other),
    };

    items.iter().fold(None, |chosen, item| match item {
        Value::String(s) if chosen.is_none() => Some(s.clone()),
        Value::Object(obj) => match (obj.get(LANGUAGE), obj.get(VALUE)) {
            (Some(tag), Some(Value::String(text)))
                if chosen.is_none() || tag.as_str().is_some_and(|t| t.starts_with(language)) =>
            {
                Some(text.clone())
            }
            _ => chosen,
        },
        _ => chosen,
    })
}

// =============================================================================
// DATE LITERALS
// =============================================================================

/// Check whether `value` is a typed literal of the given full datatype IRI.
fn has_data_type(value: &Value, datatype: &str) -> bool {
    value.get(TYPE).and_then(Value::as_str) == Some(datatype)
}

/// Read an `xsd:date` literal as midnight UTC.
///
/// Arrays, plain strings and other datatypes yield `None`, as do values that
/// do not parse as `YYYY-MM-DD`.
#[must_use]
pub fn get_date_literal(value: &Value) -> Option<DateTime<Utc>> {
    if !has_data_type(value, XSD_DATE) {
        return None;
    }
    let text = value.get(VALUE)?.as_str()?;
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Read an `xsd:dateTime` literal.
///
/// RFC 3339 values keep their offset (converted to UTC); values without an
/// offset are taken as UTC.
#[must_use]
pub fn get_date_time_literal(value: &Value) -> Option<DateTime<Utc>> {
    if !has_data_type(value, XSD_DATE_TIME) {
        return None;
    }
    let text = value.get(VALUE)?.as_str()?.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// =============================================================================
// TESTS
// =============================================================================
