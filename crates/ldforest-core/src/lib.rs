//! # ldforest-core
//!
//! The JSON-LD graph engine for ldforest - THE LOGIC.
//!
//! Compacted JSON-LD documents describe a graph as a flat list of subjects
//! that point at each other by `@id`. This crate grows that list into a
//! forest of nested trees ("enforesting"), parses the common document
//! shapes, extracts string and date literals, and maps annotations between
//! their nested and flat forms.
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: no async, no network, no file I/O
//! - Inputs are borrowed and never mutated; every result is freshly built
//! - Deterministic: indexes are `BTreeMap`/`BTreeSet`, document key order is kept
//! - Every fallible operation returns `Result<T, LdError>`

// =============================================================================
// MODULES
// =============================================================================

pub mod annotation;
pub mod document;
pub mod literal;
pub mod lookup;
pub mod primitives;
pub mod record;
pub mod resolver;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{LdError, Subject, SubjectExt, reference};

// =============================================================================
// RE-EXPORTS: Graph Resolution
// =============================================================================

pub use resolver::{Forest, Limits, enforest, enforest_with};

// =============================================================================
// RE-EXPORTS: Documents and Literals
// =============================================================================

pub use document::{
    Collection, NestedCollection, OrderedCollection, graph_of, is_fragment, parse_entity,
    with_context,
};
pub use literal::{
    get_date_literal, get_date_time_literal, get_string_literal, get_string_literal_in,
};

// =============================================================================
// RE-EXPORTS: Annotations, Records and Lookups
// =============================================================================

pub use annotation::{
    Annotation, Motivation, lift_flat_attributes, lower_flat_attributes, record_annotations_path,
};
pub use lookup::{DocumentSource, LazyLookup, Lookup, LookupShape};
pub use record::{
    RecordKind, domain_fits, field_main_display, flatter_fields, main_display, properties_for,
};
