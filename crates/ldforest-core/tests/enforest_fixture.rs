//! # Fixture Tests
//!
//! End-to-end checks against a small graph that exercises every shape the
//! resolver has to handle: plain subjects, internal and external references,
//! nested references, two kinds of cycles, arrays and `@list` values.

use ldforest_core::{
    Annotation, Forest, LdError, Subject, SubjectExt, enforest, lift_flat_attributes,
    lower_flat_attributes, parse_entity,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

// =============================================================================
// FIXTURES
// =============================================================================

fn example_graph() -> Vec<Value> {
    let graph = json!([
        {"@id": "http://example.com/s1", "dc:title": "Title without references"},
        {"@id": "http://example.com/s2", "dc:title": "Title with one internal reference",
         "dc:description": {"@id": "http://example.com/descForS2"}},
        {"@id": "http://example.com/s3", "dc:title": "Title with one external reference",
         "dc:description": {"@id": "http://example.com/somethingExternal"}},
        {"@id": "http://example.com/s4", "dc:title": "Title with one nested internal reference",
         "dc:description": {"@id": "http://example.com/descForS4"}},
        {"@id": "http://example.com/s5", "dc:title": "Title with sameAs s6",
         "owl:sameAs": {"@id": "http://example.com/s6"}},
        {"@id": "http://example.com/s6", "dc:title": "Title with sameAs s5",
         "owl:sameAs": {"@id": "http://example.com/s5"}},
        {"@id": "http://example.com/descForS4",
         "example:value": {"@id": "http://example.com/descForDescForS4"}},
        {"@id": "http://example.com/descForDescForS4", "example:value": "Random description"},
        {"@id": "http://example.com/descForS2", "example:value": "Random description"},
        {"@id": "http://example.com/s7", "dc:title": "Title with undetected cycle",
         "dc:description": {"@id": "http://example.com/descForS7"}},
        {"@id": "http://example.com/descForS7",
         "owl:sameAs": {"@id": "http://example.com/sameDescForS7"}},
        {"@id": "http://example.com/sameDescForS7",
         "owl:sameAs": {"@id": "http://example.com/descForS7"}},
        {"@id": "http://example.com/s8", "dc:title": "Title with nested array",
         "dc:description": [
             {"@id": "http://example.com/descForS2"},
             {"@id": "http://example.com/descForS4"},
             {"@id": "http://example.com/descForS7"},
         ]},
        {"@id": "http://example.com/s9", "dc:title": "Title with nested @list",
         "dc:description": {"@list": [
             {"@id": "http://example.com/s3"},
             {"@id": "http://example.com/descForS4"},
             {"@id": "http://example.com/s5"},
         ]}},
    ]);
    match graph {
        Value::Array(subjects) => subjects,
        _ => Vec::new(),
    }
}

fn by_id(subjects: Vec<Value>) -> BTreeMap<String, Value> {
    subjects
        .into_iter()
        .filter_map(|s| Some((s.ld_id()?.to_string(), s)))
        .collect()
}

fn object(value: Value) -> Subject {
    value.as_object().cloned().expect("fixture object")
}

fn deep_annotation() -> Value {
    json!({
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
    })
}

fn flat_annotation() -> Value {
    json!({
        "@id": "http://example.com/anno",
        "motivation": "oa:commenting",
        "oa:hasBody": "awesome",
        "oa:hasSource": "http://example.com/source",
        "edpopcol:field": "edpoprec:title",
        "edpopcol:originalText": "fabulous",
    })
}

fn server_mod() -> Value {
    json!({
        "@id": "http://example.com/anno2",
        "oa:motivatedBy": {"@id": "oa:tagging"},
        "oa:hasBody": {"@id": "http://example.com/almanac"},
        "oa:hasTarget": {
            "oa:hasSource": {"@id": "http://example.com/source"},
            "oa:hasSelector": {
                "edpopcol:field": {"@id": "edpoprec:notes"},
                "edpopcol:originalText": "pictures!",
            },
        },
    })
}

fn client_mod() -> Value {
    json!({
        "@id": "http://example.com/anno2",
        "motivation": "oa:tagging",
        "tagURL": "http://example.com/almanac",
        "oa:hasSource": "http://example.com/source",
        "edpopcol:field": "edpoprec:notes",
        "edpopcol:originalText": "pictures!",
    })
}

/// Every key of `expected` is present in `actual` with an equal value.
fn assert_contains(actual: &Subject, expected: &Value) {
    for (key, value) in object(expected.clone()) {
        assert_eq!(actual.get(&key), Some(&value), "mismatch at {key}");
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[test]
fn subject_without_references_is_unchanged() {
    let graph = example_graph();
    let resolved = by_id(enforest(&graph, false).expect("resolve"));
    assert_eq!(resolved["http://example.com/s1"], graph[0]);
}

#[test]
fn internal_reference_is_nested() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    assert_eq!(
        resolved["http://example.com/s2"]["dc:description"]["example:value"],
        "Random description"
    );
}

#[test]
fn external_reference_is_kept() {
    let graph = example_graph();
    let resolved = by_id(enforest(&graph, false).expect("resolve"));
    assert_eq!(
        resolved["http://example.com/s3"]["dc:description"],
        graph[2]["dc:description"]
    );
}

#[test]
fn nested_internal_reference_is_nested_twice() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    assert_eq!(
        resolved["http://example.com/s4"]["dc:description"]["example:value"]["example:value"],
        "Random description"
    );
}

#[test]
fn cycle_through_root_is_left_as_reference() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    assert_eq!(
        resolved["http://example.com/s5"]["owl:sameAs"]["owl:sameAs"]["@id"],
        "http://example.com/s5"
    );
}

#[test]
fn cycle_below_root_is_detected() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    assert_eq!(
        resolved["http://example.com/s7"]["dc:description"]["owl:sameAs"]["owl:sameAs"]["@id"],
        "http://example.com/descForS7"
    );
}

#[test]
fn arrays_of_references_are_resolved_in_order() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    let description = &resolved["http://example.com/s8"]["dc:description"];

    assert_eq!(description.as_array().map(Vec::len), Some(3));
    assert_eq!(description[0]["example:value"], "Random description");
    assert_eq!(
        description[1]["example:value"]["example:value"],
        "Random description"
    );
    assert_eq!(
        description[2]["owl:sameAs"]["owl:sameAs"]["@id"],
        "http://example.com/descForS7"
    );
}

#[test]
fn list_of_references_keeps_cycle_back_to_member() {
    let resolved = by_id(enforest(&example_graph(), false).expect("resolve"));
    let list = &resolved["http://example.com/s9"]["dc:description"]["@list"];

    assert_eq!(list[0]["@id"], "http://example.com/s3");
    assert_eq!(
        list[1]["example:value"]["example:value"],
        "Random description"
    );
    assert_eq!(
        list[2]["owl:sameAs"]["owl:sameAs"]["@id"],
        "http://example.com/s5"
    );
}

#[test]
fn top_level_only_keeps_unreferenced_subjects() {
    let ids: Vec<String> = enforest(&example_graph(), true).expect("resolve")
        .iter()
        .filter_map(|s| s.ld_id().map(str::to_string))
        .collect();

    assert_eq!(
        ids,
        vec![
            "http://example.com/s1",
            "http://example.com/s2",
            "http://example.com/s4",
            "http://example.com/s7",
            "http://example.com/s8",
            "http://example.com/s9",
        ]
    );
}

#[test]
fn forest_matches_enforest() {
    let graph = example_graph();
    let forest = Forest::grow(&graph);

    assert_eq!(
        forest.subjects().expect("build"),
        enforest(&graph, false).expect("resolve")
    );
    assert!(forest.is_internal("http://example.com/somethingExternal"));
    assert!(!forest.is_internal("http://example.com/s1"));
    assert_eq!(
        forest.top_level().expect("build"),
        enforest(&graph, true).expect("resolve")
    );
    assert_eq!(forest.len(), graph.len());
    assert_eq!(forest.node_count(), graph.len());
}

#[test]
fn input_is_not_mutated() {
    let graph = example_graph();
    let before = graph.clone();
    let _ = enforest(&graph, true).expect("resolve");
    assert_eq!(graph, before);
}

#[test]
fn empty_graph() {
    assert!(enforest(&[], true).expect("resolve").is_empty());
    assert!(matches!(
        parse_entity(&json!({"@graph": []})),
        Err(LdError::MalformedDocument { found: 0 })
    ));
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

#[test]
fn parse_lifts_flat_keys_and_keeps_nested() {
    let annotation = Annotation::parse(&deep_annotation()).expect("parse");
    assert_contains(annotation.attributes(), &flat_annotation());
    assert_contains(annotation.attributes(), &deep_annotation());
}

#[test]
fn flat_structure_serializes_to_deep() {
    let annotation = Annotation::from_attributes(object(flat_annotation()));
    assert_eq!(annotation.to_json(), deep_annotation());
}

#[test]
fn lift_then_lower_round_trips() {
    let deep = object(deep_annotation());
    let lowered = lower_flat_attributes(&lift_flat_attributes(&deep));

    assert_eq!(lowered, deep);
    for key in ["motivation", "tagURL", "oa:hasSource", "edpopcol:field", "edpopcol:originalText"] {
        assert!(!lowered.contains_key(key), "{key} survived lowering");
    }
}

#[test]
fn server_changes_update_flat_keys() {
    let mut annotation = Annotation::from_attributes(object(flat_annotation()));
    let server = Annotation::parse(&server_mod()).expect("parse");

    annotation.update(server.attributes());

    assert_contains(annotation.attributes(), &client_mod());
}

#[test]
fn client_changes_reach_the_server() {
    let mut annotation = Annotation::parse(&deep_annotation()).expect("parse");
    assert_contains(annotation.attributes(), &deep_annotation());
    assert_contains(annotation.attributes(), &flat_annotation());

    annotation.update(&object(client_mod()));

    assert_eq!(annotation.to_json(), server_mod());
}
