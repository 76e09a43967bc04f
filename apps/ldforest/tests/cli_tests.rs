//! Integration tests for CLI commands over documents on disk.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use ldforest::cli::{Commands, Input, read_document, run};
use ldforest::config::Config;
use ldforest_core::LdError;
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPERS
// =============================================================================

fn write_doc(dir: &TempDir, name: &str, doc: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec(doc).unwrap()).unwrap();
    path
}

fn input(path: PathBuf) -> Input {
    Input { file: Some(path) }
}

fn graph_doc() -> Value {
    json!({
        "@context": {"dc": "http://purl.org/dc/terms/"},
        "@graph": [
            {"@id": "ex:a", "@type": "ex:Book", "dc:creator": {"@id": "ex:b"}},
            {"@id": "ex:b", "@type": "ex:Person", "dc:name": "Anna"},
            {"@id": "ex:c", "@type": "ex:Book", "dc:creator": {"@id": "ex:elsewhere"}},
        ]
    })
}

// =============================================================================
// GRAPH COMMANDS
// =============================================================================

#[test]
fn test_resolve_top_level() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "graph.jsonld", &graph_doc());

    let output = run(
        &Commands::Resolve {
            input: input(path),
            top_level: true,
        },
        &Config::default(),
    )
    .unwrap();

    let subjects = output.as_array().unwrap();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0]["dc:creator"]["dc:name"], "Anna");
    assert_eq!(subjects[1]["dc:creator"], json!({"@id": "ex:elsewhere"}));
}

#[test]
fn test_resolve_deep_chain_reports_limit() {
    let dir = TempDir::new().unwrap();
    let graph: Vec<Value> = (0..20_000)
        .map(|i| json!({"@id": format!("ex:s{i}"), "ex:next": {"@id": format!("ex:s{}", i + 1)}}))
        .collect();
    let path = write_doc(&dir, "chain.jsonld", &json!({"@graph": graph}));
    let config = Config {
        max_depth: 50,
        ..Config::default()
    };

    let err = run(
        &Commands::Resolve {
            input: input(path),
            top_level: true,
        },
        &config,
    )
    .unwrap_err();

    assert!(matches!(err, LdError::DepthLimitExceeded { limit: 50, .. }));
}

#[test]
fn test_entity_rejects_multiple_subjects() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "graph.jsonld", &graph_doc());

    let err = run(&Commands::Entity { input: input(path) }, &Config::default()).unwrap_err();

    assert!(matches!(err, LdError::MalformedDocument { found: 2 }));
}

#[test]
fn test_entity_single_subject() {
    let dir = TempDir::new().unwrap();
    let doc = json!({"@context": {}, "@graph": [
        {"@id": "ex:a", "dc:creator": {"@id": "ex:b"}},
        {"@id": "ex:b", "dc:name": "Anna"},
    ]});
    let path = write_doc(&dir, "entity.jsonld", &doc);

    let output = run(&Commands::Entity { input: input(path) }, &Config::default()).unwrap();

    assert_eq!(output["@id"], "ex:a");
    assert_eq!(output["dc:creator"]["dc:name"], "Anna");
}

#[test]
fn test_collection_keeps_context() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "graph.jsonld", &graph_doc());

    let output = run(
        &Commands::Collection { input: input(path) },
        &Config::default(),
    )
    .unwrap();

    assert_eq!(output["@context"], graph_doc()["@context"]);
    assert_eq!(output["@graph"], graph_doc()["@graph"]);
}

#[test]
fn test_nested_uses_configured_class() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "graph.jsonld", &graph_doc());
    let config = Config {
        target_class: Some("ex:Person".to_string()),
        ..Config::default()
    };

    let output = run(
        &Commands::Nested {
            input: input(path.clone()),
            class: None,
        },
        &config,
    )
    .unwrap();
    assert_eq!(output, json!([{"@id": "ex:b", "@type": "ex:Person", "dc:name": "Anna"}]));

    let books = run(
        &Commands::Nested {
            input: input(path),
            class: Some("ex:Book".to_string()),
        },
        &config,
    )
    .unwrap();
    assert_eq!(books.as_array().unwrap().len(), 2);
}

#[test]
fn test_ordered_collection() {
    let dir = TempDir::new().unwrap();
    let doc = json!({"@graph": [
        {"@id": "ex:list", "@type": "as:OrderedCollection", "as:totalItems": 2,
         "as:orderedItems": {"@list": [{"@id": "ex:second"}, {"@id": "ex:first"}]}},
        {"@id": "ex:first", "dc:title": "First"},
        {"@id": "ex:second", "dc:title": "Second"},
    ]});
    let path = write_doc(&dir, "ordered.jsonld", &doc);

    let output = run(&Commands::Ordered { input: input(path) }, &Config::default()).unwrap();

    assert_eq!(output["totalItems"], 2);
    assert_eq!(output["orderedItems"][0]["dc:title"], "Second");
    assert_eq!(output["orderedItems"][1]["dc:title"], "First");
}

// =============================================================================
// ANNOTATION COMMANDS
// =============================================================================

#[test]
fn test_lift_and_lower() {
    let dir = TempDir::new().unwrap();
    let deep = json!({
        "@id": "http://example.com/anno",
        "oa:motivatedBy": {"@id": "oa:commenting"},
        "oa:hasBody": "awesome",
        "oa:hasTarget": {
            "oa:hasSource": {"@id": "http://example.com/source"},
            "oa:hasSelector": {
                "edpopcol:field": {"@id": "edpoprec:title"},
                "edpopcol:originalText": "fabulous",
            },
        },
    });
    let deep_path = write_doc(&dir, "deep.jsonld", &deep);

    let lifted = run(
        &Commands::Lift {
            input: input(deep_path),
        },
        &Config::default(),
    )
    .unwrap();
    assert_eq!(lifted["motivation"], "oa:commenting");
    assert_eq!(lifted["oa:hasSource"], "http://example.com/source");

    let flat_path = write_doc(&dir, "flat.json", &lifted);
    let lowered = run(
        &Commands::Lower {
            input: input(flat_path),
        },
        &Config::default(),
    )
    .unwrap();
    assert_eq!(lowered, deep);
}

// =============================================================================
// LOOKUP COMMANDS
// =============================================================================

#[test]
fn test_label_with_preferred_language() {
    let dir = TempDir::new().unwrap();
    let glossary = json!({"@graph": [
        {"@id": "ex:almanac", "skos:prefLabel": [
            {"@language": "en", "@value": "almanac"},
            {"@language": "nl", "@value": "almanak"},
        ]},
    ]});
    let path = write_doc(&dir, "glossary.jsonld", &glossary);
    let config = Config::default().with_env(|_| Some("nl".to_string()));

    let output = run(
        &Commands::Label {
            input: input(path),
            id: Some("ex:almanac".to_string()),
        },
        &config,
    )
    .unwrap();

    assert_eq!(output["label"], "almanak");
    assert_eq!(output["description"], Value::Null);
}

#[test]
fn test_record_fields_from_ontology() {
    let dir = TempDir::new().unwrap();
    let record = json!({
        "@id": "ex:rec",
        "@type": "edpoprec:BibliographicalRecord",
        "edpoprec:title": {"edpoprec:originalText": "Almanach"},
        "edpoprec:placeOfPublication": [
            {"edpoprec:originalText": "Amsterdam"},
            {"edpoprec:originalText": "Leiden"},
        ],
    });
    let ontology = json!({"@graph": [
        {"@id": "edpoprec:title", "@type": "rdf:property", "skos:prefLabel": "Title",
         "rdfs:domain": {"@id": "edpoprec:BibliographicalRecord"}},
        {"@id": "edpoprec:placeOfPublication", "@type": "rdf:property",
         "skos:prefLabel": "Place of publication",
         "rdfs:domain": {"@id": "edpoprec:Record"}},
        {"@id": "edpoprec:name", "@type": "rdf:property", "skos:prefLabel": "Name",
         "rdfs:domain": {"@id": "edpoprec:BiographicalRecord"}},
    ]});
    let record_path = write_doc(&dir, "record.jsonld", &record);
    let ontology_path = write_doc(&dir, "ontology.jsonld", &ontology);

    let output = run(
        &Commands::Record {
            input: input(record_path),
            ontology: ontology_path,
        },
        &Config::default(),
    )
    .unwrap();

    assert_eq!(output["kind"], "Bibliographical");
    assert_eq!(output["display"], "Almanach");
    assert_eq!(
        output["fields"],
        json!([
            {"property": "edpoprec:placeOfPublication", "label": "Place of publication", "value": "Amsterdam"},
            {"property": "edpoprec:placeOfPublication", "label": "Place of publication", "value": "Leiden"},
            {"property": "edpoprec:title", "label": "Title", "value": "Almanach"},
        ])
    );
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

#[test]
fn test_input_size_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "graph.jsonld", &graph_doc());

    let err = read_document(Some(path.as_path()), 16).unwrap_err();
    assert!(matches!(err, LdError::SerializationError(_)));
}

#[test]
fn test_directory_is_not_an_input() {
    let dir = TempDir::new().unwrap();

    let err = read_document(Some(dir.path()), 1024).unwrap_err();
    assert!(matches!(err, LdError::IoError(_)));
}

#[test]
fn test_config_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ldforest.toml");
    std::fs::write(&path, "preferred_language = \"nl\"\nactivity_streams_prefix = \"ast:\"\n")
        .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.preferred_language, "nl");
    assert_eq!(config.activity_streams_prefix, "ast:");
    assert!(config.target_class.is_none());
}
