//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. Each
//! command takes a parsed document and returns the JSON value to print.

use ldforest_core::primitives::{ID, RDF_PROPERTY};
use ldforest_core::{
    Annotation, Collection, LdError, Limits, Lookup, NestedCollection, OrderedCollection,
    RecordKind, SubjectExt, enforest_with, field_main_display, flatter_fields, graph_of,
    main_display, parse_entity, properties_for,
};
use serde_json::{Value, json};
use std::io::Read;
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), LdError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| LdError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(LdError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path to resolve symlinks and "..", and ensures it names
/// an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LdError> {
    let canonical = path.canonicalize().map_err(|e| {
        LdError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LdError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Parse JSON from `reader`, refusing more than `max_size` bytes.
fn read_json(reader: impl Read, max_size: u64) -> Result<Value, LdError> {
    let mut buffer = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| LdError::IoError(format!("Cannot read input: {}", e)))?;

    if buffer.len() as u64 > max_size {
        return Err(LdError::SerializationError(format!(
            "Input exceeds maximum allowed {} bytes",
            max_size
        )));
    }
    Ok(serde_json::from_slice(&buffer)?)
}

/// Read a JSON document from `file`, or from stdin when no file is given.
pub fn read_document(file: Option<&Path>, max_size: u64) -> Result<Value, LdError> {
    match file {
        Some(path) => {
            let canonical = validate_file_path(path)?;
            validate_file_size(&canonical, max_size)?;
            let handle = std::fs::File::open(&canonical)
                .map_err(|e| LdError::IoError(format!("Cannot open file: {}", e)))?;
            tracing::debug!(path = %canonical.display(), "reading document");
            read_json(handle, max_size)
        }
        None => {
            tracing::debug!("reading document from stdin");
            read_json(std::io::stdin().lock(), max_size)
        }
    }
}

/// Serialize a command result for stdout.
pub fn render(value: &Value, pretty: bool) -> Result<String, LdError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

// =============================================================================
// GRAPH COMMANDS
// =============================================================================

/// Resolve every subject of a document's graph.
pub fn cmd_resolve(
    document: &Value,
    top_level_only: bool,
    limits: Limits,
) -> Result<Value, LdError> {
    let graph = graph_of(document);
    let resolved = enforest_with(&graph, top_level_only, limits)?;
    tracing::info!(
        input = graph.len(),
        output = resolved.len(),
        top_level_only,
        "graph resolved"
    );
    Ok(Value::Array(resolved))
}

/// Parse a single-entity document.
pub fn cmd_entity(document: &Value) -> Result<Value, LdError> {
    parse_entity(document)
}

/// Normalize a collection document to its raw envelope.
pub fn cmd_collection(document: &Value) -> Value {
    let collection = Collection::parse(document);
    tracing::info!(subjects = collection.len(), "collection parsed");
    collection.to_json()
}

/// Resolve a collection, optionally keeping only one class.
pub fn cmd_nested(document: &Value, class: Option<&str>) -> Result<Value, LdError> {
    let parser = match class {
        Some(class) => NestedCollection::with_target_class(class),
        None => NestedCollection::new(),
    };
    Ok(Value::Array(parser.parse(document)?))
}

/// Members of an ordered collection.
pub fn cmd_ordered(document: &Value, prefix: &str) -> Result<Value, LdError> {
    let ordered = OrderedCollection::parse_with_prefix(document, prefix)?;
    Ok(json!({
        "totalItems": ordered.total_items,
        "orderedItems": ordered.items,
    }))
}

// =============================================================================
// ANNOTATION COMMANDS
// =============================================================================

/// Parse an annotation and show it with its flat keys.
pub fn cmd_lift(document: &Value) -> Result<Value, LdError> {
    let annotation = Annotation::parse(document)?;
    Ok(Value::Object(annotation.attributes().clone()))
}

/// Fold flat annotation keys back into the nested wire shape.
pub fn cmd_lower(document: &Value) -> Result<Value, LdError> {
    let attributes = document
        .as_object()
        .ok_or_else(|| LdError::not_an_object(document))?;
    Ok(Annotation::from_attributes(attributes.clone()).to_json())
}

// =============================================================================
// LOOKUP COMMANDS
// =============================================================================

/// Show glossary labels: one entry, or every entry in label order.
pub fn cmd_label(document: &Value, id: Option<&str>, language: &str) -> Value {
    let glossary = Lookup::from_collection(document).with_language(language);
    let entry = |id: &str| {
        json!({
            ID: id,
            "label": glossary.pref_label(id),
            "description": glossary.description(id),
        })
    };

    match id {
        Some(id) => entry(id),
        None => Value::Array(
            glossary
                .iter()
                .filter_map(SubjectExt::ld_id)
                .map(entry)
                .collect(),
        ),
    }
}

/// Show a record with the ontology fields that apply to it.
pub fn cmd_record(document: &Value, ontology: &Value, language: &str) -> Result<Value, LdError> {
    let record = parse_entity(document)?;
    let kind = RecordKind::of(&record);
    let ontology = Lookup::from_nested(ontology, RDF_PROPERTY)?.with_language(language);

    let property_ids: Vec<&str> = properties_for(kind, &ontology)
        .into_iter()
        .filter_map(SubjectExt::ld_id)
        .collect();
    let fields: Vec<Value> = flatter_fields(&record, &property_ids)
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(property, value)| {
            json!({
                "property": property,
                "label": ontology.pref_label(&property),
                "value": field_main_display(Some(&value)),
            })
        })
        .collect();

    Ok(json!({
        ID: record.ld_id(),
        "kind": kind,
        "display": main_display(&record),
        "fields": fields,
    }))
}

// =============================================================================
// TESTS
// =============================================================================
