//! # Lookup Services
//!
//! Read-only, `@id`-indexed tables of subjects, such as a tag glossary or the
//! record ontology's property list.
//!
//! A `Lookup` is built once from a document and then only read. Callers pass
//! it explicitly to whatever needs labels. `LazyLookup` defers the build until
//! first use and caches it for the rest of its life.

use crate::document::{Collection, NestedCollection};
use crate::literal::get_string_literal_in;
use crate::primitives::{DEFAULT_LANGUAGE, SKOS_DESCRIPTION, SKOS_PREF_LABEL};
use crate::types::{LdError, SubjectExt};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

// =============================================================================
// LOOKUP
// =============================================================================

/// Subjects indexed by `@id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    by_id: BTreeMap<String, Value>,
    /// Ids sorted by preferred label, then by id.
    order: Vec<String>,
    language: String,
}

impl Lookup {
    /// Index `subjects` by `@id`. Subjects without one are skipped; a later
    /// duplicate replaces an earlier one.
    #[must_use]
    pub fn from_subjects(subjects: impl IntoIterator<Item = Value>) -> Self {
        Self::build(subjects, DEFAULT_LANGUAGE.to_string())
    }

    /// Index the raw subjects of a collection document.
    #[must_use]
    pub fn from_collection(document: &Value) -> Self {
        Self::from_subjects(Collection::parse(document).subjects)
    }

    /// Index the resolved subjects of the given class.
    ///
    /// # Errors
    /// Returns the resolver's limit errors when the subjects are too deep or
    /// too large to build.
    pub fn from_nested(document: &Value, class: &str) -> Result<Self, LdError> {
        let subjects = NestedCollection::with_target_class(class).parse(document)?;
        Ok(Self::from_subjects(subjects))
    }

    /// Prefer labels in another language (tag prefix such as `"nl"`).
    #[must_use]
    pub fn with_language(self, language: impl Into<String>) -> Self {
        Self::build(self.by_id.into_values(), language.into())
    }

    fn build(subjects: impl IntoIterator<Item = Value>, language: String) -> Self {
        let mut by_id = BTreeMap::new();
        for subject in subjects {
            match subject.ld_id() {
                Some(id) => {
                    by_id.insert(id.to_string(), subject);
                }
                None => tracing::debug!("skipping subject without @id"),
            }
        }

        let mut labelled: Vec<(Option<String>, &String)> = by_id
            .iter()
            .map(|(id, subject)| {
                let label = subject
                    .get(SKOS_PREF_LABEL)
                    .and_then(|v| get_string_literal_in(v, &language));
                (label, id)
            })
            .collect();
        // Unlabelled subjects go last.
        labelled.sort_by(|(la, ia), (lb, ib)| match (la, lb) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| ia.cmp(ib)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => ia.cmp(ib),
        });
        let order = labelled.into_iter().map(|(_, id)| id.clone()).collect();

        Self {
            by_id,
            order,
            language,
        }
    }

    /// Get a subject by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.by_id.get(id)
    }

    /// `skos:prefLabel` of a subject.
    #[must_use]
    pub fn pref_label(&self, id: &str) -> Option<String> {
        self.literal(id, SKOS_PREF_LABEL)
    }

    /// `skos:description` of a subject.
    #[must_use]
    pub fn description(&self, id: &str) -> Option<String> {
        self.literal(id, SKOS_DESCRIPTION)
    }

    fn literal(&self, id: &str, predicate: &str) -> Option<String> {
        let value = self.get(id)?.get(predicate)?;
        get_string_literal_in(value, &self.language)
    }

    /// Number of indexed subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Subjects sorted by preferred label.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }
}

// =============================================================================
// LAZY LOOKUP
// =============================================================================

/// Where a lookup document comes from.
///
/// Fetching is the caller's business; the core only asks for the document.
pub trait DocumentSource {
    /// Produce the document. Called at most once per successful load.
    fn load(&self) -> Result<Value, LdError>;
}

impl<F> DocumentSource for F
where
    F: Fn() -> Result<Value, LdError>,
{
    fn load(&self) -> Result<Value, LdError> {
        self()
    }
}

/// How to turn a loaded document into a [`Lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupShape {
    /// Every raw subject of the document.
    Collection,
    /// Resolved subjects of the given class.
    Nested(String),
}

impl LookupShape {
    fn build(&self, document: &Value) -> Result<Lookup, LdError> {
        match self {
            Self::Collection => Ok(Lookup::from_collection(document)),
            Self::Nested(class) => Lookup::from_nested(document, class),
        }
    }
}

/// A [`Lookup`] that is loaded on first access and then reused.
///
/// Load errors are returned to the caller and not cached, so the next access
/// tries again.
pub struct LazyLookup<S> {
    source: S,
    shape: LookupShape,
    cell: OnceLock<Lookup>,
}

impl<S: DocumentSource> LazyLookup<S> {
    /// Create an unloaded lookup.
    pub fn new(source: S, shape: LookupShape) -> Self {
        Self {
            source,
            shape,
            cell: OnceLock::new(),
        }
    }

    /// Get the lookup, loading it if this is the first access.
    pub fn get_or_load(&self) -> Result<&Lookup, LdError> {
        if let Some(lookup) = self.cell.get() {
            return Ok(lookup);
        }
        let document = self.source.load()?;
        let lookup = self.shape.build(&document)?;
        tracing::debug!(subjects = lookup.len(), "lookup loaded");
        Ok(self.cell.get_or_init(|| lookup))
    }

    /// Check whether the lookup has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
