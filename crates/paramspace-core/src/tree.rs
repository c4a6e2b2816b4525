//! The hierarchical parameter container and its dotted-path operations.

use indexmap::IndexMap;

use crate::error::TreeError;
use crate::reference::{Reference, Resolution};
use crate::value::Value;

/// Path separator used when none is configured explicitly.
pub const DEFAULT_SEPARATOR: char = '.';

/// Names claimed by the tree's own operation surface. Using one as a
/// parameter key would make dotted paths ambiguous, so insertion
/// rejects them with [`TreeError::InvalidName`].
pub const RESERVED_NAMES: &[&str] = &[
    "label",
    "origin",
    "separator",
    "flat",
    "flatten",
    "parameters",
    "names",
];

/// A hierarchical mapping from parameter names to values or nested
/// trees, addressable by dotted paths.
///
/// The mapping is insertion-ordered ([`IndexMap`]), which makes
/// [`flat`](Self::flat) stable between calls on an unmutated tree.
/// Equality is deep, structural, and key-order-insensitive; the label,
/// origin, and separator are carried metadata and do not participate.
///
/// ```
/// use paramspace_core::{ParameterTree, Value};
///
/// let mut sim = ParameterTree::new();
/// sim.add("sim.dt", Value::Real(0.1)).unwrap();
/// sim.add("sim.tstop", Value::Real(1000.0)).unwrap();
/// assert_eq!(sim.get("sim.dt").unwrap(), &Value::Real(0.1));
/// ```
#[derive(Clone, Debug)]
pub struct ParameterTree {
    items: IndexMap<String, Value>,
    label: Option<String>,
    origin: Option<String>,
    separator: char,
}

impl ParameterTree {
    /// Create an empty tree with the default separator.
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Create an empty tree with a custom path separator.
    pub fn with_separator(separator: char) -> Self {
        Self {
            items: IndexMap::new(),
            label: None,
            origin: None,
            separator,
        }
    }

    /// Build a tree from `(key, value)` entries.
    ///
    /// Dotted keys are shorthand paths and follow strict-set semantics:
    /// intermediate trees must already exist (have appeared earlier in
    /// the entry sequence). Nested trees arrive as [`Value::Tree`].
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidName`] for reserved or empty key components,
    /// [`TreeError::KeyNotFound`] for a dotted key whose parent does
    /// not exist yet.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, TreeError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut tree = Self::new();
        for (key, value) in entries {
            tree.set(&key.into(), value)?;
        }
        Ok(tree)
    }

    /// Copy construction from another tree.
    ///
    /// The source's label is preserved unless a new label is supplied.
    pub fn from_tree(source: &ParameterTree, label: Option<&str>) -> Self {
        let mut tree = source.deep_copy();
        if let Some(label) = label {
            tree.label = Some(label.to_owned());
        }
        tree
    }

    /// Internal: wrap an already-validated mapping.
    pub(crate) fn from_items(items: IndexMap<String, Value>, separator: char) -> Self {
        Self {
            items,
            label: None,
            origin: None,
            separator,
        }
    }

    /// Set the human-readable label, builder style.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The optional human-readable label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Provenance origin, e.g. the file the tree was loaded from.
    /// Carried for save-back; excluded from equality.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Record where this tree came from.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = Some(origin.into());
    }

    /// The path separator for composite dotted keys.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the tree has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-level keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Top-level `(key, value)` pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn check_key(&self, key: &str) -> Result<(), TreeError> {
        if key.is_empty() || RESERVED_NAMES.contains(&key) {
            return Err(TreeError::InvalidName { name: key.into() });
        }
        Ok(())
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        match path.split_once(self.separator) {
            None => self.items.get(path),
            Some((head, rest)) => match self.items.get(head)? {
                Value::Tree(t) => t.lookup(rest),
                _ => None,
            },
        }
    }

    fn lookup_mut(&mut self, path: &str) -> Option<&mut Value> {
        match path.split_once(self.separator) {
            None => self.items.get_mut(path),
            Some((head, rest)) => match self.items.get_mut(head)? {
                Value::Tree(t) => t.lookup_mut(rest),
                _ => None,
            },
        }
    }

    /// Look up the value at a dotted path.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if any path component is absent or a
    /// non-tree value is hit before the final component.
    pub fn get(&self, path: &str) -> Result<&Value, TreeError> {
        self.lookup(path).ok_or_else(|| TreeError::KeyNotFound {
            path: path.to_owned(),
        })
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, path: &str) -> Result<&mut Value, TreeError> {
        self.lookup_mut(path).ok_or_else(|| TreeError::KeyNotFound {
            path: path.to_owned(),
        })
    }

    /// Whether a dotted path resolves to a value.
    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Strict dotted-path set: every intermediate tree must already
    /// exist.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] when an intermediate component is
    /// missing or not a tree, [`TreeError::InvalidName`] for a reserved
    /// final component.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), TreeError> {
        let sep = self.separator;
        let mut node = self;
        let mut rest = path;
        while let Some((head, tail)) = rest.split_once(sep) {
            node = match node.items.get_mut(head) {
                Some(Value::Tree(t)) => t,
                _ => {
                    return Err(TreeError::KeyNotFound {
                        path: path.to_owned(),
                    })
                }
            };
            rest = tail;
        }
        node.check_key(rest)?;
        node.items.insert(rest.to_owned(), value.into());
        Ok(())
    }

    /// Lenient dotted-path set: missing intermediate trees are created
    /// on demand.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidName`] for a reserved component,
    /// [`TreeError::KeyNotFound`] when an existing intermediate is not
    /// a tree.
    pub fn add(&mut self, path: &str, value: impl Into<Value>) -> Result<(), TreeError> {
        let sep = self.separator;
        let mut node = self;
        let mut rest = path;
        while let Some((head, tail)) = rest.split_once(sep) {
            node.check_key(head)?;
            let slot = node
                .items
                .entry(head.to_owned())
                .or_insert_with(|| Value::Tree(ParameterTree::with_separator(sep)));
            node = match slot {
                Value::Tree(t) => t,
                _ => {
                    return Err(TreeError::KeyNotFound {
                        path: path.to_owned(),
                    })
                }
            };
            rest = tail;
        }
        node.check_key(rest)?;
        node.items.insert(rest.to_owned(), value.into());
        Ok(())
    }

    /// Merge another tree's top-level entries into this one,
    /// overwriting on key collision.
    pub fn update(&mut self, other: &ParameterTree) {
        for (key, value) in &other.items {
            self.items.insert(key.clone(), value.clone());
        }
    }

    /// Lazy, restartable iteration over every non-tree leaf as
    /// `(dotted path, value)` pairs.
    ///
    /// Ancestor keys are joined with the separator. Order is stable
    /// for a given tree instance between calls, absent mutation.
    pub fn flat(&self) -> Flat<'_> {
        Flat {
            separator: self.separator,
            stack: vec![(String::new(), self.items.iter())],
        }
    }

    /// Collected form of [`flat`](Self::flat).
    pub fn flatten(&self) -> IndexMap<String, Value> {
        self.flat().map(|(path, v)| (path, v.clone())).collect()
    }

    /// Recursive copy of the whole tree.
    ///
    /// Nested trees and references are rebuilt; label and origin are
    /// carried over. (Values own their payloads, so `Clone` already
    /// satisfies the deep-copy contract; this name states the intent.)
    pub fn deep_copy(&self) -> ParameterTree {
        self.clone()
    }

    /// Recursive conversion to a plain nested mapping: labels, origins,
    /// and tree metadata are stripped from every level.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.items
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::Tree(t) => Value::Tree(Self::from_items(t.to_map(), t.separator)),
                    other => other.clone(),
                };
                (k.clone(), v)
            })
            .collect()
    }

    /// Structural difference: `(only-in-self, only-in-other)` as plain
    /// mappings.
    ///
    /// Shared nested trees are recursed into; a key that resolves
    /// identically on both sides at every depth is omitted entirely.
    /// `a.diff(b)` and `b.diff(a)` return swapped contents.
    pub fn diff(
        &self,
        other: &ParameterTree,
    ) -> (IndexMap<String, Value>, IndexMap<String, Value>) {
        let mut only_self = IndexMap::new();
        let mut only_other = IndexMap::new();
        for (key, mine) in &self.items {
            match other.items.get(key) {
                None => {
                    only_self.insert(key.clone(), mine.clone());
                }
                Some(theirs) => match (mine, theirs) {
                    (Value::Tree(a), Value::Tree(b)) => {
                        let (d1, d2) = a.diff(b);
                        if !d1.is_empty() {
                            only_self
                                .insert(key.clone(), Value::Tree(Self::from_items(d1, a.separator)));
                        }
                        if !d2.is_empty() {
                            only_other
                                .insert(key.clone(), Value::Tree(Self::from_items(d2, b.separator)));
                        }
                    }
                    _ if mine != theirs => {
                        only_self.insert(key.clone(), mine.clone());
                        only_other.insert(key.clone(), theirs.clone());
                    }
                    _ => {}
                },
            }
        }
        for (key, theirs) in &other.items {
            if !self.items.contains_key(key) {
                only_other.insert(key.clone(), theirs.clone());
            }
        }
        (only_self, only_other)
    }

    /// Whether some leaf (recursive descent) is a range, a
    /// distribution, or a list containing a distribution, which makes
    /// this tree describe a space of configurations rather than a
    /// single one.
    pub fn is_space(&self) -> bool {
        self.flat().any(|(_, v)| match v {
            Value::Range(_) | Value::Dist(_) => true,
            Value::List(items) => items.iter().any(|i| matches!(i, Value::Dist(_))),
            _ => false,
        })
    }

    /// Dotted paths of every leaf that is still an unresolved
    /// reference.
    pub fn reference_paths(&self) -> Vec<String> {
        self.flat()
            .filter_map(|(path, v)| matches!(v, Value::Ref(_)).then_some(path))
            .collect()
    }

    fn pending_references(&self) -> Vec<(String, Reference)> {
        self.flat()
            .filter_map(|(path, v)| match v {
                Value::Ref(r) => Some((path, r.clone())),
                _ => None,
            })
            .collect()
    }

    /// Eliminate every reference by substituting the value at its
    /// target path and applying its deferred operation chain.
    ///
    /// Runs a fixed-point loop: each pass evaluates all remaining
    /// references against the whole current tree and writes the
    /// results back. References whose targets are themselves still
    /// unresolved are deferred to a later pass, so declaration order
    /// never matters. A pass that resolves nothing while references
    /// remain means the references form a cycle.
    ///
    /// Resolution is idempotent: on a reference-free tree this is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::ReferenceCycle`] on cyclic references, plus any
    /// evaluation error from
    /// [`Reference::evaluate`](crate::Reference::evaluate).
    pub fn resolve_references(&mut self) -> Result<(), TreeError> {
        loop {
            let pending = self.pending_references();
            if pending.is_empty() {
                return Ok(());
            }
            // Evaluate against a snapshot so writes within a pass
            // cannot be observed mid-pass; deferred references are
            // picked up again on the next pass.
            let snapshot = self.deep_copy();
            let mut resolved = 0usize;
            for (path, reference) in &pending {
                match reference.evaluate(&snapshot)? {
                    Resolution::Resolved(value) => {
                        self.set(path, value)?;
                        resolved += 1;
                    }
                    Resolution::Deferred => {}
                }
            }
            if resolved == 0 {
                return Err(TreeError::ReferenceCycle {
                    unresolved: pending.into_iter().map(|(path, _)| path).collect(),
                });
            }
        }
    }
}

impl Default for ParameterTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep, structural, key-order-insensitive equality over the mapping
/// only; label, origin, and separator are excluded.
impl PartialEq for ParameterTree {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// Lazy leaf iterator returned by [`ParameterTree::flat`].
pub struct Flat<'a> {
    separator: char,
    stack: Vec<(String, indexmap::map::Iter<'a, String, Value>)>,
}

impl<'a> Iterator for Flat<'a> {
    type Item = (String, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, iter) = self.stack.last_mut()?;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some((key, value)) => {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}{sep}{key}", sep = self.separator)
                    };
                    if let Value::Tree(t) = value {
                        self.stack.push((path, t.items.iter()));
                    } else {
                        return Some((path, value));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reference;

    fn sample() -> ParameterTree {
        let inner = ParameterTree::from_entries([("a", Value::Int(1)), ("b", Value::Int(2))])
            .unwrap()
            .with_label("PS1");
        let mid = ParameterTree::from_entries([
            ("ps", Value::Tree(inner)),
            ("c", Value::Int(19)),
        ])
        .unwrap()
        .with_label("PS2");
        ParameterTree::from_entries([
            ("hello", Value::from("world")),
            ("ps2", Value::Tree(mid)),
            ("null", Value::Null),
            ("flag", Value::Bool(false)),
            (
                "mylist",
                Value::List(vec![
                    Value::Int(1),
                    Value::Int(2),
                    Value::Int(3),
                    Value::Int(4),
                ]),
            ),
            (
                "mydict",
                Value::Tree(
                    ParameterTree::from_entries([("c", Value::Int(3)), ("d", Value::Int(4))])
                        .unwrap(),
                ),
            ),
        ])
        .unwrap()
        .with_label("PS3")
    }

    #[test]
    fn dotted_get_and_set() {
        let mut t = sample();
        assert_eq!(t.get("ps2.ps.b").unwrap(), &Value::Int(2));
        t.set("ps2.ps.b", Value::Int(3)).unwrap();
        assert_eq!(t.get("ps2.ps.b").unwrap(), &Value::Int(3));
    }

    #[test]
    fn strict_set_requires_existing_parent() {
        let mut t = sample();
        t.set("mydict.e", Value::Int(5)).unwrap();
        let err = t.set("bar.foo", Value::Real(10.0)).unwrap_err();
        assert_eq!(
            err,
            TreeError::KeyNotFound {
                path: "bar.foo".into()
            }
        );
    }

    #[test]
    fn lenient_add_creates_intermediates() {
        let mut t = ParameterTree::new();
        t.add("a.b.c", Value::Int(1)).unwrap();
        assert_eq!(t.get("a.b.c").unwrap(), &Value::Int(1));
        assert!(t.get("a.b").unwrap().as_tree().is_some());

        // An existing non-tree intermediate is still an error.
        let err = t.add("a.b.c.d", Value::Int(2)).unwrap_err();
        assert_eq!(
            err,
            TreeError::KeyNotFound {
                path: "a.b.c.d".into()
            }
        );
    }

    #[test]
    fn missing_paths_report_key_not_found() {
        let t = sample();
        assert_eq!(
            t.get("ps2.nope").unwrap_err(),
            TreeError::KeyNotFound {
                path: "ps2.nope".into()
            }
        );
        // Descending through a non-tree leaf fails the same way.
        assert_eq!(
            t.get("hello.deeper").unwrap_err(),
            TreeError::KeyNotFound {
                path: "hello.deeper".into()
            }
        );
    }

    #[test]
    fn reserved_names_are_rejected() {
        let mut t = ParameterTree::new();
        for name in ["label", "flatten", "parameters"] {
            assert_eq!(
                t.set(name, Value::Int(1)).unwrap_err(),
                TreeError::InvalidName { name: name.into() }
            );
            assert_eq!(
                t.add(name, Value::Int(1)).unwrap_err(),
                TreeError::InvalidName { name: name.into() }
            );
        }
        assert!(t.is_empty());
    }

    #[test]
    fn custom_separator() {
        let mut t = ParameterTree::with_separator('/');
        t.add("a/b", Value::Int(1)).unwrap();
        assert_eq!(t.get("a/b").unwrap(), &Value::Int(1));
        // A dot is now an ordinary key character.
        t.set("x.y", Value::Int(2)).unwrap();
        assert_eq!(t.get("x.y").unwrap(), &Value::Int(2));
        let flat: Vec<String> = t.flat().map(|(p, _)| p).collect();
        assert!(flat.contains(&"a/b".to_owned()));
    }

    #[test]
    fn flatten_yields_every_leaf() {
        let t = sample();
        let flat = t.flatten();
        assert_eq!(flat.get("ps2.ps.a"), Some(&Value::Int(1)));
        assert_eq!(flat.get("ps2.c"), Some(&Value::Int(19)));
        assert_eq!(flat.get("mydict.d"), Some(&Value::Int(4)));
        assert_eq!(flat.get("hello"), Some(&Value::from("world")));
        assert_eq!(flat.get("null"), Some(&Value::Null));
        assert_eq!(flat.len(), 9);

        // Restartable: a second pass sees the same pairs.
        assert_eq!(t.flat().count(), 9);
    }

    #[test]
    fn flatten_rebuild_round_trip() {
        let t = sample();
        let mut rebuilt = ParameterTree::new();
        for (path, value) in t.flat() {
            rebuilt.add(&path, value.clone()).unwrap();
        }
        assert_eq!(rebuilt, t);
    }

    #[test]
    fn equality_is_order_insensitive_and_ignores_labels() {
        let a = ParameterTree::from_entries([("x", Value::Int(1)), ("y", Value::Int(2))])
            .unwrap()
            .with_label("A");
        let b =
            ParameterTree::from_entries([("y", Value::Int(2)), ("x", Value::Int(1))]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn copy_construction_keeps_label_unless_replaced() {
        let t = sample();
        let same = ParameterTree::from_tree(&t, None);
        assert_eq!(same.label(), Some("PS3"));
        let renamed = ParameterTree::from_tree(&t, Some("PS5"));
        assert_eq!(renamed.label(), Some("PS5"));
        assert_eq!(renamed, t);
    }

    #[test]
    fn deep_copy_is_independent() {
        let t = sample();
        let mut copy = t.deep_copy();
        copy.set("ps2.ps.a", Value::Int(100)).unwrap();
        assert_eq!(t.get("ps2.ps.a").unwrap(), &Value::Int(1));
        assert_ne!(copy, t);
    }

    #[test]
    fn diff_reports_swapped_contents() {
        let a = sample();
        let (d1, d2) = a.diff(&a);
        assert!(d1.is_empty());
        assert!(d2.is_empty());

        let mut b = a.deep_copy();
        b.set("hello", Value::from("universe")).unwrap();
        let (d1, d2) = a.diff(&b);
        assert_eq!(d1.get("hello"), Some(&Value::from("world")));
        assert_eq!(d2.get("hello"), Some(&Value::from("universe")));
        let (e1, e2) = b.diff(&a);
        assert_eq!((e1, e2), (d2, d1));
    }

    #[test]
    fn diff_recurses_into_shared_subtrees() {
        let a = sample();
        let mut b = a.deep_copy();
        b.set("ps2.ps.b", Value::Int(3)).unwrap();
        let (d1, d2) = b.diff(&a);
        let nested = |m: &IndexMap<String, Value>, v: i64| {
            let ps2 = m.get("ps2").and_then(Value::as_tree).unwrap();
            assert_eq!(ps2.get("ps.b").unwrap(), &Value::Int(v));
            // Unchanged siblings are omitted entirely.
            assert!(!ps2.contains("c"));
            assert_eq!(ps2.get("ps").unwrap().as_tree().unwrap().len(), 1);
        };
        nested(&d1, 3);
        nested(&d2, 2);
    }

    #[test]
    fn update_overwrites_top_level_entries() {
        let mut a = sample();
        let b = ParameterTree::from_entries([
            ("hello", Value::from("there")),
            ("extra", Value::Int(7)),
        ])
        .unwrap();
        a.update(&b);
        assert_eq!(a.get("hello").unwrap(), &Value::from("there"));
        assert_eq!(a.get("extra").unwrap(), &Value::Int(7));
        assert_eq!(a.get("ps2.c").unwrap(), &Value::Int(19));
    }

    #[test]
    fn resolve_simple_references() {
        let mut t = sample();
        t.set("ref1", Value::Ref(Reference::to("null"))).unwrap();
        t.set("ref2", Value::Ref(Reference::to("ps2.ps.b"))).unwrap();
        t.add("nested.ref3", Value::Ref(Reference::to("mydict.d")))
            .unwrap();
        t.resolve_references().unwrap();
        assert_eq!(t.get("ref1").unwrap(), &Value::Null);
        assert_eq!(t.get("ref2").unwrap(), &Value::Int(2));
        assert_eq!(t.get("nested.ref3").unwrap(), &Value::Int(4));
    }

    #[test]
    fn resolve_chained_references_with_operations() {
        let mut t = ParameterTree::from_entries([
            ("p1", Value::Int(2)),
            ("p2", Value::Int(4)),
            (
                "p3",
                Value::Ref(
                    Reference::to("p1")
                        .add(Value::Ref(Reference::to("p2")))
                        .add(Value::Int(1)),
                ),
            ),
            ("p4", Value::Ref(Reference::to("p3").add(Value::Int(1)))),
        ])
        .unwrap();
        t.add(
            "p5.z",
            Value::Ref(Reference::to("p4").add(Value::Int(1))),
        )
        .unwrap();
        t.set("p6", Value::Ref(Reference::to("p5"))).unwrap();

        t.resolve_references().unwrap();
        assert_eq!(t.get("p3").unwrap(), &Value::Int(7));
        assert_eq!(t.get("p4").unwrap(), &Value::Int(8));
        assert_eq!(t.get("p5.z").unwrap(), &Value::Int(9));
        assert_eq!(t.get("p6.z").unwrap(), &Value::Int(9));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut t = ParameterTree::from_entries([
            ("p1", Value::Int(2)),
            ("p2", Value::Ref(Reference::to("p1").add(Value::Int(1)))),
        ])
        .unwrap();
        t.resolve_references().unwrap();
        let once = t.deep_copy();
        t.resolve_references().unwrap();
        assert_eq!(t, once);

        let mut plain = sample();
        let before = plain.deep_copy();
        plain.resolve_references().unwrap();
        assert_eq!(plain, before);
    }

    #[test]
    fn reference_cycle_is_detected() {
        let mut t = ParameterTree::from_entries([
            ("a", Value::Ref(Reference::to("b"))),
            ("b", Value::Ref(Reference::to("a"))),
        ])
        .unwrap();
        match t.resolve_references().unwrap_err() {
            TreeError::ReferenceCycle { unresolved } => {
                assert_eq!(unresolved.len(), 2);
                assert!(unresolved.contains(&"a".to_owned()));
                assert!(unresolved.contains(&"b".to_owned()));
            }
            other => panic!("expected a cycle, got {other}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut t =
            ParameterTree::from_entries([("a", Value::Ref(Reference::to("a")))]).unwrap();
        assert!(matches!(
            t.resolve_references().unwrap_err(),
            TreeError::ReferenceCycle { .. }
        ));
    }

    #[test]
    fn to_map_strips_metadata() {
        let t = sample();
        let map = t.to_map();
        let ps2 = map.get("ps2").and_then(Value::as_tree).unwrap();
        assert_eq!(ps2.label(), None);
        assert_eq!(ps2.get("ps.a").unwrap(), &Value::Int(1));
    }
}
