//! # Graph Resolver
//!
//! Turns a flat list of compacted JSON-LD subjects into nested trees.
//!
//! Every reference (`{"@id": ...}`) that points at a subject present in the
//! same graph is replaced by a resolved copy of that subject, recursively.
//! References to ids outside the graph are left as they are.
//!
//! ## Two Phases
//!
//! 1. **Growing** ([`Forest::grow`]) walks the graph once with an explicit
//!    work stack. Each subject id becomes one node of an arena; a reference
//!    to an already resolved subject is stored as a link to its node, so
//!    shared substructure costs nothing extra.
//! 2. **Building** ([`Forest::subjects`], [`Forest::top_level`]) copies nodes
//!    out into owned `serde_json::Value` trees, again without recursion.
//!    Building is bounded by [`Limits`]: a tree nested deeper than
//!    `max_depth` subjects, or a call inlining more than `max_nodes`
//!    subjects, is refused with an error instead of exhausting the stack or
//!    memory.
//!
//! ## Cycle Guard
//!
//! Each subject id gets a memo slot that is reserved *before* its properties
//! are walked. A reference that reaches a slot still in progress keeps the
//! reference value unchanged instead of descending again. Growing therefore
//! terminates on any finite graph, and a subject that sits on a cycle shows up
//! as a shallow `{"@id": ...}` at the point where the cycle closes.
//!
//! ## Classification
//!
//! Walking the properties of every subject also records which ids are the
//! target of at least one reference ("internal"). Subjects never referenced
//! are "top-level". Ids are recorded even when they do not resolve.

use crate::primitives::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, ID, LIST};
use crate::types::{LdError, Subject, SubjectExt};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// LIMITS
// =============================================================================

/// Bounds applied while building nested trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Most subjects on one root-to-leaf path, the root included.
    pub max_depth: usize,
    /// Most subjects inlined by one build call, roots included.
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

// =============================================================================
// FOREST
// =============================================================================

/// The outcome of resolving one graph.
///
/// Borrows the input graph. Holds one arena node per resolved subject id, one
/// entry per input subject, and the set of ids that were referenced from
/// anywhere in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest<'g> {
    roots: Vec<Root<'g>>,
    nodes: Vec<Node<'g>>,
    internal: BTreeSet<&'g str>,
    limits: Limits,
}

impl<'g> Forest<'g> {
    /// Resolve every subject of `subjects`.
    ///
    /// Runs in time linear in the size of the input. Nothing is copied until
    /// a build method is called.
    #[must_use]
    pub fn grow(subjects: &'g [Value]) -> Self {
        let mut walker = Walker::new(subjects);
        let roots: Vec<Root<'g>> = subjects
            .iter()
            .map(|subject| walker.resolve_root(subject))
            .collect();

        tracing::debug!(
            subjects = roots.len(),
            nodes = walker.nodes.len(),
            internal = walker.internal.len(),
            "resolved graph"
        );

        Self {
            roots,
            nodes: walker.nodes,
            internal: walker.internal,
            limits: Limits::default(),
        }
    }

    /// Replace the build limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of input subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Check whether the graph had no subjects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of distinct subjects resolved into the arena.
    ///
    /// At most one per subject id, however often the id is referenced.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether `id` was the target of at least one reference.
    #[must_use]
    pub fn is_internal(&self, id: &str) -> bool {
        self.internal.contains(id)
    }

    /// Referenced ids in sorted order.
    pub fn internal_ids(&self) -> impl Iterator<Item = &str> {
        self.internal.iter().copied()
    }

    /// Check whether a subject is top-level.
    ///
    /// Subjects without a string `@id` can never be referenced and are always
    /// top-level.
    #[must_use]
    pub fn is_top_level(&self, subject: &Value) -> bool {
        subject.ld_id().is_none_or(|id| !self.is_internal(id))
    }

    /// Build every subject, in input order.
    ///
    /// # Errors
    /// Returns `LdError::DepthLimitExceeded` or `LdError::NodeLimitExceeded`
    /// when the result would exceed the forest's [`Limits`].
    pub fn subjects(&self) -> Result<Vec<Value>, LdError> {
        self.build_where(|_| true)
    }

    /// Build the subjects that nothing else in the graph refers to.
    ///
    /// Internal subjects are never built.
    ///
    /// # Errors
    /// Same as [`Forest::subjects`].
    pub fn top_level(&self) -> Result<Vec<Value>, LdError> {
        self.build_where(|root| self.is_top_level(root.input))
    }

    /// Build the first subject whose raw properties satisfy `predicate`.
    ///
    /// The predicate sees the subject the entry resolved to, so for duplicate
    /// ids it sees the last one.
    ///
    /// # Errors
    /// Same as [`Forest::subjects`].
    pub fn find(&self, predicate: impl Fn(&Subject) -> bool) -> Result<Option<Value>, LdError> {
        let mut budget = Budget::new(self.limits);
        self.roots
            .iter()
            .find(|root| root.raw.is_some_and(&predicate))
            .map(|root| self.build(&root.shape, &mut budget))
            .transpose()
    }

    /// Build every subject whose raw properties satisfy `predicate`, in input
    /// order.
    ///
    /// # Errors
    /// Same as [`Forest::subjects`].
    pub fn build_matching(
        &self,
        predicate: impl Fn(&Subject) -> bool,
    ) -> Result<Vec<Value>, LdError> {
        self.build_where(|root| root.raw.is_some_and(&predicate))
    }

    fn build_where(&self, keep: impl Fn(&Root<'g>) -> bool) -> Result<Vec<Value>, LdError> {
        let mut budget = Budget::new(self.limits);
        self.roots
            .iter()
            .filter(|&root| keep(root))
            .map(|root| self.build(&root.shape, &mut budget))
            .collect()
    }

    /// Copy one shape out into an owned tree.
    fn build(&self, shape: &Shape<'g>, budget: &mut Budget) -> Result<Value, LdError> {
        let mut current = match self.open(shape, 0, budget)? {
            Opened::Leaf(value) => return Ok(value),
            Opened::Frame(frame) => frame,
        };
        let mut stack = Vec::new();

        loop {
            if let Some(child) = current.next_child() {
                match self.open(child, current.depth, budget)? {
                    Opened::Leaf(value) => current.values.push(value),
                    Opened::Frame(frame) => stack.push(std::mem::replace(&mut current, frame)),
                }
                continue;
            }

            let value = current.close();
            match stack.pop() {
                Some(parent) => {
                    current = parent;
                    current.values.push(value);
                }
                None => return Ok(value),
            }
        }
    }

    fn open<'f>(
        &'f self,
        shape: &'f Shape<'g>,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<Opened<'f, 'g>, LdError> {
        Ok(match shape {
            Shape::Raw(value) => Opened::Leaf((*value).clone()),
            Shape::Array(items) => Opened::Frame(BuildFrame::array(items, depth)),
            Shape::Object(entries) => Opened::Frame(BuildFrame::object(entries, depth)),
            Shape::Node(index) => {
                let Some(node) = self.nodes.get(*index) else {
                    return Ok(Opened::Leaf(Value::Null));
                };
                let depth = depth + 1;
                budget.inline(node.id, depth)?;
                Opened::Frame(BuildFrame::object(&node.properties, depth))
            }
        })
    }
}

/// Return nested versions of `subjects` under the default [`Limits`].
///
/// With `top_level_only`, subjects that are referenced by another subject are
/// left out of the result. The name is the opposite of "deforestation".
///
/// # Errors
/// Returns `LdError::DepthLimitExceeded` or `LdError::NodeLimitExceeded` when
/// the nested result would be too deep or too large.
pub fn enforest(subjects: &[Value], top_level_only: bool) -> Result<Vec<Value>, LdError> {
    enforest_with(subjects, top_level_only, Limits::default())
}

/// [`enforest`] with explicit build limits.
///
/// # Errors
/// Same as [`enforest`].
pub fn enforest_with(
    subjects: &[Value],
    top_level_only: bool,
    limits: Limits,
) -> Result<Vec<Value>, LdError> {
    let forest = Forest::grow(subjects).with_limits(limits);
    if top_level_only {
        forest.top_level()
    } else {
        forest.subjects()
    }
}

// =============================================================================
// ARENA
// =============================================================================

/// A resolved value that borrows its leaves from the input graph.
#[derive(Debug, Clone, PartialEq)]
enum Shape<'g> {
    /// Copied as is: literals, external references, cycle points.
    Raw(&'g Value),
    Array(Vec<Shape<'g>>),
    /// An object without its own arena node (`@list` wrappers, roots without id).
    Object(Vec<(&'g str, Shape<'g>)>),
    /// A resolved subject.
    Node(usize),
}

/// One resolved subject.
#[derive(Debug, Clone, PartialEq)]
struct Node<'g> {
    id: &'g str,
    properties: Vec<(&'g str, Shape<'g>)>,
}

/// One entry of the input graph.
#[derive(Debug, Clone, PartialEq)]
struct Root<'g> {
    /// The entry as given.
    input: &'g Value,
    /// The subject the entry resolved to, if it is an object.
    raw: Option<&'g Subject>,
    shape: Shape<'g>,
}

// =============================================================================
// WALKER
// =============================================================================

/// Memo slot for one subject id.
#[derive(Debug)]
enum Slot {
    /// Properties are being walked further down the work stack.
    InProgress,
    /// Fully resolved arena node.
    Done(usize),
}

/// Outcome of looking at one value.
enum Step<'g> {
    Ready(Shape<'g>),
    Descend(WalkFrame<'g>),
}

/// What a walk frame turns into once its members are resolved.
enum Owner<'g> {
    Subject(&'g str),
    Object,
    Array,
}

enum Members<'g> {
    Entries(serde_json::map::Iter<'g>),
    Elements(std::slice::Iter<'g, Value>),
}

/// A container whose members are being resolved.
struct WalkFrame<'g> {
    owner: Owner<'g>,
    members: Members<'g>,
    keys: Vec<&'g str>,
    shapes: Vec<Shape<'g>>,
}

impl<'g> WalkFrame<'g> {
    fn entries(owner: Owner<'g>, obj: &'g Subject) -> Self {
        Self {
            owner,
            members: Members::Entries(obj.iter()),
            keys: Vec::with_capacity(obj.len()),
            shapes: Vec::with_capacity(obj.len()),
        }
    }

    fn elements(items: &'g [Value]) -> Self {
        Self {
            owner: Owner::Array,
            members: Members::Elements(items.iter()),
            keys: Vec::new(),
            shapes: Vec::with_capacity(items.len()),
        }
    }

    fn next_member(&mut self) -> Option<&'g Value> {
        match &mut self.members {
            Members::Entries(iter) => {
                let (key, value) = iter.next()?;
                self.keys.push(key.as_str());
                Some(value)
            }
            Members::Elements(iter) => iter.next(),
        }
    }
}

/// Per-call resolution state. Never escapes [`Forest::grow`].
struct Walker<'g> {
    /// `@id` -> raw subject. Later duplicates replace earlier ones.
    index: BTreeMap<&'g str, &'g Subject>,
    memo: BTreeMap<&'g str, Slot>,
    nodes: Vec<Node<'g>>,
    internal: BTreeSet<&'g str>,
}

impl<'g> Walker<'g> {
    fn new(subjects: &'g [Value]) -> Self {
        let mut index = BTreeMap::new();
        for subject in subjects {
            if let Some(obj) = subject.as_object()
                && let Some(id) = obj.ld_id()
                && index.insert(id, obj).is_some()
            {
                tracing::debug!(id, "duplicate subject id, keeping the last one");
            }
        }

        Self {
            index,
            memo: BTreeMap::new(),
            nodes: Vec::new(),
            internal: BTreeSet::new(),
        }
    }

    /// Resolve one entry of the input graph.
    fn resolve_root(&mut self, subject: &'g Value) -> Root<'g> {
        let Some(obj) = subject.as_object() else {
            return Root {
                input: subject,
                raw: None,
                shape: Shape::Raw(subject),
            };
        };

        let (raw, step) = match obj.ld_id().and_then(|id| Some((id, *self.index.get(id)?))) {
            Some((id, raw)) => (raw, self.enter(id, subject)),
            None => (obj, Step::Descend(WalkFrame::entries(Owner::Object, obj))),
        };
        let shape = match step {
            Step::Ready(shape) => shape,
            Step::Descend(frame) => self.walk(frame),
        };

        Root {
            input: subject,
            raw: Some(raw),
            shape,
        }
    }

    /// Start resolving the subject stored under `id`.
    ///
    /// `found_as` is kept unchanged when the id is already being resolved.
    fn enter(&mut self, id: &'g str, found_as: &'g Value) -> Step<'g> {
        match self.memo.get(id) {
            Some(Slot::Done(node)) => return Step::Ready(Shape::Node(*node)),
            Some(Slot::InProgress) => {
                tracing::trace!(id, "cycle detected, leaving reference unexpanded");
                return Step::Ready(Shape::Raw(found_as));
            }
            None => {}
        }

        let Some(&raw) = self.index.get(id) else {
            return Step::Ready(Shape::Raw(found_as));
        };

        self.memo.insert(id, Slot::InProgress);
        Step::Descend(WalkFrame::entries(Owner::Subject(id), raw))
    }

    fn step(&mut self, value: &'g Value) -> Step<'g> {
        match value {
            Value::Array(items) => Step::Descend(WalkFrame::elements(items)),
            Value::Object(obj) if obj.contains_key(LIST) => {
                Step::Descend(WalkFrame::entries(Owner::Object, obj))
            }
            Value::Object(obj) if obj.contains_key(ID) => match obj.ld_id() {
                Some(id) => {
                    self.internal.insert(id);
                    self.enter(id, value)
                }
                None => Step::Ready(Shape::Raw(value)),
            },
            _ => Step::Ready(Shape::Raw(value)),
        }
    }

    /// Resolve a container and everything below it with an explicit stack.
    fn walk(&mut self, root: WalkFrame<'g>) -> Shape<'g> {
        let mut current = root;
        let mut stack = Vec::new();

        loop {
            if let Some(value) = current.next_member() {
                match self.step(value) {
                    Step::Ready(shape) => current.shapes.push(shape),
                    Step::Descend(frame) => stack.push(std::mem::replace(&mut current, frame)),
                }
                continue;
            }

            let shape = self.close(current);
            match stack.pop() {
                Some(parent) => {
                    current = parent;
                    current.shapes.push(shape);
                }
                None => return shape,
            }
        }
    }

    fn close(&mut self, frame: WalkFrame<'g>) -> Shape<'g> {
        let WalkFrame {
            owner, keys, shapes, ..
        } = frame;
        match owner {
            Owner::Array => Shape::Array(shapes),
            Owner::Object => Shape::Object(keys.into_iter().zip(shapes).collect()),
            Owner::Subject(id) => {
                let index = self.nodes.len();
                self.nodes.push(Node {
                    id,
                    properties: keys.into_iter().zip(shapes).collect(),
                });
                self.memo.insert(id, Slot::Done(index));
                Shape::Node(index)
            }
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Running totals of one build call.
struct Budget {
    limits: Limits,
    inlined: usize,
}

impl Budget {
    fn new(limits: Limits) -> Self {
        Self { limits, inlined: 0 }
    }

    /// Account for one subject at `depth`.
    fn inline(&mut self, id: &str, depth: usize) -> Result<(), LdError> {
        if depth > self.limits.max_depth {
            tracing::warn!(id, limit = self.limits.max_depth, "nesting too deep");
            return Err(LdError::DepthLimitExceeded {
                id: id.to_string(),
                limit: self.limits.max_depth,
            });
        }
        self.inlined += 1;
        if self.inlined > self.limits.max_nodes {
            tracing::warn!(limit = self.limits.max_nodes, "too many subjects inlined");
            return Err(LdError::NodeLimitExceeded {
                limit: self.limits.max_nodes,
            });
        }
        Ok(())
    }
}

enum Opened<'f, 'g> {
    Leaf(Value),
    Frame(BuildFrame<'f, 'g>),
}

enum Children<'f, 'g> {
    Entries(std::slice::Iter<'f, (&'g str, Shape<'g>)>),
    Elements(std::slice::Iter<'f, Shape<'g>>),
}

/// An owned container being filled in.
struct BuildFrame<'f, 'g> {
    children: Children<'f, 'g>,
    /// Subjects on the path to this container.
    depth: usize,
    keys: Vec<&'g str>,
    values: Vec<Value>,
}

impl<'f, 'g> BuildFrame<'f, 'g> {
    fn object(entries: &'f [(&'g str, Shape<'g>)], depth: usize) -> Self {
        Self {
            children: Children::Entries(entries.iter()),
            depth,
            keys: Vec::with_capacity(entries.len()),
            values: Vec::with_capacity(entries.len()),
        }
    }

    fn array(items: &'f [Shape<'g>], depth: usize) -> Self {
        Self {
            children: Children::Elements(items.iter()),
            depth,
            keys: Vec::new(),
            values: Vec::with_capacity(items.len()),
        }
    }

    fn next_child(&mut self) -> Option<&'f Shape<'g>> {
        match &mut self.children {
            Children::Entries(iter) => {
                let (key, shape) = iter.next()?;
                self.keys.push(*key);
                Some(shape)
            }
            Children::Elements(iter) => iter.next(),
        }
    }

    fn close(self) -> Value {
        match self.children {
            Children::Elements(_) => Value::Array(self.values),
            Children::Entries(_) => Value::Object(
                self.keys
                    .into_iter()
                    .map(str::to_string)
                    .zip(self.values)
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
