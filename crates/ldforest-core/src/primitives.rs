//! # Primitives
//!
//! Fixed vocabulary of the ldforest CORE.
//!
//! Only compacted JSON-LD is handled, so every keyword and predicate below is
//! matched as a literal string. No context processing takes place.
//!
//! ## Groups
//!
//! 1. **Keywords**: the JSON-LD keywords the resolver and parsers look at.
//! 2. **Datatypes**: the XSD types the literal extractors accept.
//! 3. **Annotation vocabulary**: Web Annotation and EDPOP predicates used by
//!    the flat/deep mapper.
//! 4. **Record vocabulary**: EDPOP record ontology terms.

// =============================================================================
// JSON-LD KEYWORDS
// =============================================================================

/// Subject identifier.
pub const ID: &str = "@id";

/// Top-level array of subjects in a compacted document.
pub const GRAPH: &str = "@graph";

/// Ordered list wrapper.
pub const LIST: &str = "@list";

/// Document context.
pub const CONTEXT: &str = "@context";

/// RDF class or literal datatype.
pub const TYPE: &str = "@type";

/// Literal value.
pub const VALUE: &str = "@value";

/// Language tag of a literal.
pub const LANGUAGE: &str = "@language";

// =============================================================================
// RESOLUTION LIMITS
// =============================================================================

/// Most subjects on one path of a built tree.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Most subjects inlined by one build call.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

// =============================================================================
// DATATYPES
// =============================================================================

/// XML Schema namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// `xsd:date` as a full IRI.
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

/// `xsd:dateTime` as a full IRI.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Language prefix preferred by [`crate::literal::get_string_literal`].
pub const DEFAULT_LANGUAGE: &str = "en";

// =============================================================================
// ANNOTATION VOCABULARY
// =============================================================================

pub const OA_MOTIVATED_BY: &str = "oa:motivatedBy";
pub const OA_HAS_BODY: &str = "oa:hasBody";
pub const OA_HAS_TARGET: &str = "oa:hasTarget";
pub const OA_HAS_SOURCE: &str = "oa:hasSource";
pub const OA_HAS_SELECTOR: &str = "oa:hasSelector";
pub const OA_COMMENTING: &str = "oa:commenting";
pub const OA_TAGGING: &str = "oa:tagging";

pub const EDPOPCOL_FIELD: &str = "edpopcol:field";
pub const EDPOPCOL_ORIGINAL_TEXT: &str = "edpopcol:originalText";

pub const AS_PUBLISHED: &str = "as:published";
pub const AS_UPDATED: &str = "as:updated";
pub const DCTERMS_CREATOR: &str = "dcterms:creator";

/// Flat key mirroring `oa:motivatedBy/@id`.
pub const FLAT_MOTIVATION: &str = "motivation";

/// Flat key mirroring `oa:hasBody/@id` when the body is a reference.
pub const FLAT_TAG_URL: &str = "tagURL";

/// Every synthetic key the annotation mapper lifts to the top level.
///
/// The last three share their names with the nested predicates they mirror.
pub const FLAT_FIELDS: [&str; 5] = [
    FLAT_MOTIVATION,
    FLAT_TAG_URL,
    OA_HAS_SOURCE,
    EDPOPCOL_FIELD,
    EDPOPCOL_ORIGINAL_TEXT,
];

/// Default ActivityStreams prefix for ordered collections.
pub const AS_PREFIX: &str = "as:";

// =============================================================================
// RECORD VOCABULARY
// =============================================================================

pub const SKOS_PREF_LABEL: &str = "skos:prefLabel";
pub const SKOS_DESCRIPTION: &str = "skos:description";
pub const RDFS_DOMAIN: &str = "rdfs:domain";
pub const RDF_PROPERTY: &str = "rdf:property";

pub const EDPOPREC_PREFIX: &str = "edpoprec:";
pub const EDPOPREC_BIBLIOGRAPHICAL: &str = "edpoprec:BibliographicalRecord";
pub const EDPOPREC_BIOGRAPHICAL: &str = "edpoprec:BiographicalRecord";
pub const EDPOPREC_TITLE: &str = "edpoprec:title";
pub const EDPOPREC_NAME: &str = "edpoprec:name";
pub const EDPOPREC_ORIGINAL_TEXT: &str = "edpoprec:originalText";
pub const EDPOPREC_SUMMARY_TEXT: &str = "edpoprec:summaryText";

/// Separator between repeated field values in a single display string.
pub const FIELD_VALUE_SEPARATOR: &str = " ; ";
