//! Single-pass construction of org-chart hierarchies from flat record sets.
//!
//! The [`Hierarchy`] knows nothing about companies or users. It consumes
//! anything implementing [`Record`], creating exactly one [`Node`] per
//! identity it encounters, whether that identity belongs to a listed record
//! or only shows up as somebody's parent or child reference. Nodes live in an
//! arena and point at each other through [`NodeId`] indices.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::Hash,
};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Anything that can be referenced by identity.
///
/// Both full records and the partially populated references they carry
/// implement this trait.
pub trait Entity {
    /// The identity type shared by records and their references.
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    /// The identity of this entity, or `None` if it was never populated.
    fn identity(&self) -> Option<Self::Id>;

    /// The label shown to consumers.
    ///
    /// Falls back to the rendered identity when `None`.
    fn display_label(&self) -> Option<String> {
        None
    }
}

/// A top-level input record for the [`HierarchyBuilder`].
pub trait Record: Entity {
    /// The reference type used for parents and children.
    type Ref: Entity<Id = Self::Id>;

    /// The record's parent, if it declares one.
    fn parent_ref(&self) -> Option<&Self::Ref>;

    /// The record's children, in the order they should be attached.
    fn child_refs(&self) -> &[Self::Ref];
}

impl Entity for Uuid {
    type Id = Self;

    fn identity(&self) -> Option<Self::Id> {
        Some(*self)
    }
}

impl Entity for String {
    type Id = Self;

    fn identity(&self) -> Option<Self::Id> {
        Some(self.clone())
    }
}

/// Index of a [`Node`] within its [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A single element of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node<K> {
    id: NodeId,
    key: K,
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

impl<K> Node<K> {
    /// The arena index of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The identity this node was created for.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The parent node, if one was attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in the order their references were encountered.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of parent hops to a root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Which part of a record failed to yield an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The top-level record itself.
    Record,
    /// The record's parent reference.
    Parent,
    /// One of the record's child references, by position.
    Child(usize),
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Parent => f.write_str("parent reference"),
            Self::Child(index) => write!(f, "child reference #{index}"),
        }
    }
}

/// Errors that abort hierarchy construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError<K: fmt::Debug + fmt::Display> {
    /// A record, or one of its references, has no identity.
    #[error("{part} of input record {position} has no identity")]
    MissingIdentity {
        /// Position of the offending record in the input.
        position: usize,
        /// Which part of the record was missing its identity.
        part: IdentitySource,
    },
    /// The parent chain or the child lists loop back on themselves.
    #[error("cyclic reference between {}", display_members(.members))]
    CyclicReference {
        /// Identities taking part in the cycle.
        members: Vec<K>,
    },
}

fn display_members<K: fmt::Display>(members: &[K]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Incrementally ingests records, one pass, in input order.
///
/// Once [`insert`](Self::insert) has failed, the builder is poisoned and
/// [`finish`](Self::finish) returns the same error, so a partially built
/// hierarchy is never handed out.
#[derive(Debug)]
pub struct HierarchyBuilder<K: fmt::Debug + fmt::Display> {
    nodes: Vec<Node<K>>,
    index: HashMap<K, NodeId>,
    roots: Vec<NodeId>,
    rooted: HashSet<NodeId>,
    /// Whether any node names the node at this index as its parent.
    has_dependents: Vec<bool>,
    inserted: usize,
    failure: Option<BuildError<K>>,
}

impl<K> Default for HierarchyBuilder<K>
where
    K: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K> HierarchyBuilder<K>
where
    K: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    /// Creates a builder with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            roots: Vec::new(),
            rooted: HashSet::new(),
            has_dependents: Vec::with_capacity(capacity),
            inserted: 0,
            failure: None,
        }
    }

    /// Ingests the next record.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingIdentity`] if the record or any of its
    /// references has no identity, or [`BuildError::CyclicReference`] if
    /// attaching the record's parent closes a loop in the parent chain.
    pub fn insert<R>(&mut self, record: &R) -> Result<NodeId, BuildError<K>>
    where
        R: Record<Id = K>,
    {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let result = self.try_insert(record);
        if let Err(e) = &result {
            self.failure = Some(e.clone());
        }
        self.inserted += 1;
        result
    }

    fn try_insert<R>(&mut self, record: &R) -> Result<NodeId, BuildError<K>>
    where
        R: Record<Id = K>,
    {
        let position = self.inserted;
        let missing = |part| BuildError::<K>::MissingIdentity { position, part };

        let key = record.identity().ok_or(missing(IdentitySource::Record))?;
        let node = self.upsert(key, record.display_label(), true);

        if let Some(parent_ref) = record.parent_ref() {
            let parent_key = parent_ref
                .identity()
                .ok_or(missing(IdentitySource::Parent))?;
            let parent = self.upsert(parent_key, parent_ref.display_label(), false);
            self.attach(node, parent)?;
        } else if self.rooted.insert(node) {
            tracing::debug!(key = %self.nodes[node.0].key, "registered root");
            self.roots.push(node);
        }

        for (i, child_ref) in record.child_refs().iter().enumerate() {
            let child_key = child_ref
                .identity()
                .ok_or(missing(IdentitySource::Child(i)))?;
            let child = self.upsert(child_key, child_ref.display_label(), false);
            self.nodes[node.0].children.push(child);
        }

        Ok(node)
    }

    /// Fetches the node for `key`, creating a placeholder if it is new.
    ///
    /// Labels supplied by a full record win over labels taken from references.
    fn upsert(&mut self, key: K, label: Option<String>, authoritative: bool) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            if authoritative {
                if let Some(label) = label {
                    self.nodes[id.0].label = label;
                }
            }
            return id;
        }

        let id = NodeId(self.nodes.len());
        let label = label.unwrap_or_else(|| key.to_string());
        if !authoritative {
            tracing::trace!(%key, "created placeholder node");
        }
        self.index.insert(key.clone(), id);
        self.has_dependents.push(false);
        self.nodes.push(Node {
            id,
            key,
            label,
            parent: None,
            children: Vec::new(),
            depth: 0,
        });
        id
    }

    fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), BuildError<K>> {
        self.nodes[child.0].parent = Some(parent);
        let closes_loop = parent == child
            || (self.has_dependents[child.0] && self.ancestors_of(parent).any(|id| id == child));
        self.has_dependents[parent.0] = true;

        if closes_loop {
            let mut members = vec![self.nodes[child.0].key.clone()];
            members.extend(
                self.ancestors_of(parent)
                    .take_while(|&id| id != child)
                    .map(|id| self.nodes[id.0].key.clone()),
            );
            return Err(BuildError::CyclicReference { members });
        }
        Ok(())
    }

    /// Walks parent links upwards from `start`, `start` included.
    ///
    /// Parent links are acyclic except through a node just attached, so
    /// callers stop at that node.
    fn ancestors_of(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(start), |id| self.nodes[id.0].parent)
    }

    /// Sets every depth in one pass, reusing the depths of settled
    /// ancestors.
    fn settle_depths(&mut self) {
        let mut settled = vec![false; self.nodes.len()];
        let mut pending = Vec::new();

        for start in 0..self.nodes.len() {
            let mut depth = 0;
            let mut current = NodeId(start);
            loop {
                if settled[current.0] {
                    depth = self.nodes[current.0].depth + 1;
                    break;
                }
                pending.push(current);
                match self.nodes[current.0].parent {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            while let Some(id) = pending.pop() {
                self.nodes[id.0].depth = depth;
                settled[id.0] = true;
                depth += 1;
            }
        }
    }

    /// Completes construction.
    ///
    /// # Errors
    ///
    /// Returns the error of any failed [`insert`](Self::insert), or
    /// [`BuildError::CyclicReference`] if the child lists contain a loop.
    #[instrument(
        level = "debug",
        skip(self),
        fields(nodes = self.nodes.len(), roots = self.roots.len())
    )]
    pub fn finish(mut self) -> Result<Hierarchy<K>, BuildError<K>> {
        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }

        if let Some(members) = self.child_cycle() {
            return Err(BuildError::CyclicReference { members });
        }

        self.settle_depths();
        tracing::debug!("settled node depths");

        Ok(Hierarchy {
            nodes: self.nodes,
            index: self.index,
            roots: self.roots,
        })
    }

    fn child_cycle(&self) -> Option<Vec<K>> {
        let mut graph = DiGraphMap::<usize, ()>::with_capacity(self.nodes.len(), self.nodes.len());
        for node in &self.nodes {
            graph.add_node(node.id.0);
            for child in &node.children {
                graph.add_edge(node.id.0, child.0, ());
            }
        }

        tarjan_scc(&graph).into_iter().find_map(|component| {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| graph.contains_edge(n, n));
            cyclic.then(|| {
                component
                    .into_iter()
                    .map(|n| self.nodes[n].key.clone())
                    .collect()
            })
        })
    }
}

/// A forest of nodes built from a flat record set.
#[derive(Debug, Clone)]
pub struct Hierarchy<K> {
    nodes: Vec<Node<K>>,
    index: HashMap<K, NodeId>,
    roots: Vec<NodeId>,
}

impl<K> Hierarchy<K>
where
    K: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    /// Builds a hierarchy from records in input order.
    ///
    /// # Errors
    ///
    /// See [`HierarchyBuilder::insert`] and [`HierarchyBuilder::finish`].
    #[instrument(level = "debug", skip_all)]
    pub fn build<'a, R, I>(records: I) -> Result<Self, BuildError<K>>
    where
        R: Record<Id = K> + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let records = records.into_iter();
        let mut builder = HierarchyBuilder::with_capacity(records.size_hint().0);
        for record in records {
            builder.insert(record)?;
        }
        builder.finish()
    }

    /// Looks up a node by identity.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Node<K>> {
        self.index.get(key).map(|id| &self.nodes[id.0])
    }

    /// Whether a node exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K> Hierarchy<K> {
    /// Resolves an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different hierarchy and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    /// Root indices, in input order.
    #[must_use]
    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    /// Root nodes, in input order.
    pub fn roots(&self) -> impl Iterator<Item = &Node<K>> + '_ {
        self.roots.iter().map(|id| &self.nodes[id.0])
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node<K>> + '_ {
        self.nodes.iter()
    }

    /// Number of distinct identities encountered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The parent of `node`, if any.
    #[must_use]
    pub fn parent_of(&self, node: &Node<K>) -> Option<&Node<K>> {
        node.parent.map(|id| &self.nodes[id.0])
    }

    /// The children of `node`, in attachment order.
    pub fn children_of<'a>(&'a self, node: &'a Node<K>) -> impl Iterator<Item = &'a Node<K>> + 'a {
        node.children.iter().map(|id| &self.nodes[id.0])
    }

    /// Walks from `node`'s parent up to its root.
    pub fn ancestors<'a>(&'a self, node: &'a Node<K>) -> impl Iterator<Item = &'a Node<K>> + 'a {
        std::iter::successors(self.parent_of(node), |n| self.parent_of(n))
    }

    /// The greatest depth of any node.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Pre-order depth-first listing of the forest.
    ///
    /// Roots are visited in input order and each node's children in the
    /// order they were attached. A node listed under several parents shows
    /// up once under each, together with its whole subtree, so stacked
    /// multi-parent listings can make the output much longer than the number
    /// of nodes.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Node<K>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let node = &self.nodes[id.0];
                out.push(node);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Ref(Option<&'static str>);

    impl Entity for Ref {
        type Id = String;

        fn identity(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[derive(Debug, Clone)]
    struct Rec {
        id: Option<&'static str>,
        label: Option<&'static str>,
        parent: Option<Ref>,
        children: Vec<Ref>,
    }

    impl Entity for Rec {
        type Id = String;

        fn identity(&self) -> Option<String> {
            self.id.map(str::to_string)
        }

        fn display_label(&self) -> Option<String> {
            self.label.map(str::to_string)
        }
    }

    impl Record for Rec {
        type Ref = Ref;

        fn parent_ref(&self) -> Option<&Ref> {
            self.parent.as_ref()
        }

        fn child_refs(&self) -> &[Ref] {
            &self.children
        }
    }

    fn rec(id: &'static str, parent: Option<&'static str>, children: &[&'static str]) -> Rec {
        Rec {
            id: Some(id),
            label: None,
            parent: parent.map(|p| Ref(Some(p))),
            children: children.iter().map(|&c| Ref(Some(c))).collect(),
        }
    }

    fn sample() -> Vec<Rec> {
        vec![
            rec("A", None, &[]),
            rec("B", Some("A"), &["C", "Ca"]),
            rec("C", Some("B"), &["D"]),
            rec("D", Some("C"), &[]),
            rec("Ca", Some("B"), &[]),
        ]
    }

    fn keys(hierarchy: &Hierarchy<String>) -> Vec<&str> {
        hierarchy.flatten().iter().map(|n| n.key().as_str()).collect()
    }

    fn depth(hierarchy: &Hierarchy<String>, key: &str) -> usize {
        hierarchy.get(&key.to_string()).unwrap().depth()
    }

    #[test]
    fn builds_documented_example() {
        let tree = Hierarchy::build(&sample()).unwrap();

        let roots: Vec<_> = tree.roots().map(|n| n.key().as_str()).collect();
        assert_eq!(roots, ["A"]);
        assert_eq!(depth(&tree, "A"), 0);
        assert_eq!(depth(&tree, "B"), 1);
        assert_eq!(depth(&tree, "C"), 2);
        assert_eq!(depth(&tree, "Ca"), 2);
        assert_eq!(depth(&tree, "D"), 3);
        assert_eq!(keys(&tree), ["A", "B", "C", "D", "Ca"]);
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn building_twice_is_deterministic() {
        let first = Hierarchy::build(&sample()).unwrap();
        let second = Hierarchy::build(&sample()).unwrap();

        assert_eq!(keys(&first), keys(&second));
        assert_eq!(first.root_ids(), second.root_ids());
        assert_eq!(keys(&first), keys(&first));
    }

    #[test]
    fn one_node_per_identity() {
        let records = vec![
            rec("A", None, &["B", "X"]),
            rec("B", Some("A"), &["X"]),
            rec("C", Some("Y"), &["B"]),
        ];
        let tree = Hierarchy::build(&records).unwrap();

        assert_eq!(tree.len(), 5);
        for key in ["A", "B", "C", "X", "Y"] {
            assert!(tree.contains(&key.to_string()), "missing {key}");
            assert_eq!(
                tree.iter().filter(|n| n.key() == key).count(),
                1,
                "duplicate {key}"
            );
        }
    }

    #[test]
    fn roots_come_only_from_records_without_parents() {
        let records = vec![
            rec("A", None, &["B"]),
            rec("B", None, &[]),
            rec("C", Some("A"), &[]),
        ];
        let tree = Hierarchy::build(&records).unwrap();

        // B is listed as A's child but its own record declares no parent.
        let roots: Vec<_> = tree.roots().map(|n| n.key().as_str()).collect();
        assert_eq!(roots, ["A", "B"]);
        assert!(tree.get(&"B".to_string()).unwrap().parent().is_none());
    }

    #[test]
    fn placeholder_parent_is_not_a_root() {
        let records = vec![rec("B", Some("A"), &[])];
        let tree = Hierarchy::build(&records).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_ids().len(), 0);
        assert!(tree.flatten().is_empty());
        assert_eq!(depth(&tree, "B"), 1);
    }

    #[test]
    fn depth_law_holds_for_out_of_order_input() {
        let records = vec![
            rec("D", Some("C"), &[]),
            rec("C", Some("B"), &["D"]),
            rec("B", Some("A"), &["C"]),
            rec("A", None, &["B"]),
        ];
        let tree = Hierarchy::build(&records).unwrap();

        for node in tree.iter() {
            match tree.parent_of(node) {
                Some(parent) => assert_eq!(node.depth(), parent.depth() + 1),
                None => assert_eq!(node.depth(), 0),
            }
        }
        assert_eq!(depth(&tree, "D"), 3);
        assert_eq!(keys(&tree), ["A", "B", "C", "D"]);
    }

    #[test]
    fn parents_precede_descendants_in_flatten() {
        let tree = Hierarchy::build(&sample()).unwrap();
        let order = keys(&tree);
        let position = |k: &str| order.iter().position(|&o| o == k).unwrap();

        for node in tree.iter() {
            for ancestor in tree.ancestors(node) {
                assert!(position(ancestor.key().as_str()) < position(node.key().as_str()));
            }
        }
    }

    #[test]
    fn siblings_keep_reference_order() {
        let records = vec![rec("root", None, &["z", "a", "m"])];
        let tree = Hierarchy::build(&records).unwrap();

        assert_eq!(keys(&tree), ["root", "z", "a", "m"]);
    }

    #[test]
    fn labels_default_to_identity_and_prefer_records() {
        let mut records = vec![rec("A", None, &["B"])];
        records.push(Rec {
            id: Some("B"),
            label: Some("Bea"),
            parent: Some(Ref(Some("A"))),
            children: Vec::new(),
        });
        let tree = Hierarchy::build(&records).unwrap();

        assert_eq!(tree.get(&"A".to_string()).unwrap().label(), "A");
        assert_eq!(tree.get(&"B".to_string()).unwrap().label(), "Bea");
    }

    #[test]
    fn missing_record_identity_is_rejected() {
        let mut records = sample();
        records.insert(2, Rec {
            id: None,
            label: None,
            parent: None,
            children: Vec::new(),
        });

        let err = Hierarchy::build(&records).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingIdentity {
                position: 2,
                part: IdentitySource::Record,
            }
        );
    }

    #[test]
    fn missing_reference_identity_is_rejected() {
        let records = vec![Rec {
            id: Some("A"),
            label: None,
            parent: None,
            children: vec![Ref(Some("B")), Ref(None)],
        }];

        let err = Hierarchy::build(&records).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingIdentity {
                position: 0,
                part: IdentitySource::Child(1),
            }
        );
    }

    #[test]
    fn poisoned_builder_cannot_finish() {
        let mut builder = HierarchyBuilder::default();
        builder.insert(&rec("A", None, &[])).unwrap();
        let bad = Rec {
            id: Some("B"),
            label: None,
            parent: Some(Ref(None)),
            children: Vec::new(),
        };
        assert!(builder.insert(&bad).is_err());
        assert!(builder.insert(&rec("C", None, &[])).is_err());

        let err = builder.finish().unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingIdentity {
                position: 1,
                part: IdentitySource::Parent,
            }
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let records = vec![rec("A", Some("A"), &[])];

        let err = Hierarchy::build(&records).unwrap_err();
        assert_eq!(
            err,
            BuildError::CyclicReference {
                members: vec!["A".to_string()]
            }
        );
    }

    #[test]
    fn parent_loop_is_a_cycle() {
        let records = vec![rec("A", Some("B"), &[]), rec("B", Some("A"), &[])];

        match Hierarchy::build(&records).unwrap_err() {
            BuildError::CyclicReference { mut members } => {
                members.sort();
                assert_eq!(members, ["A", "B"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    struct Link {
        id: usize,
        parent: Option<usize>,
        children: Vec<usize>,
    }

    impl Entity for usize {
        type Id = Self;

        fn identity(&self) -> Option<Self> {
            Some(*self)
        }
    }

    impl Entity for Link {
        type Id = usize;

        fn identity(&self) -> Option<usize> {
            Some(self.id)
        }
    }

    impl Record for Link {
        type Ref = usize;

        fn parent_ref(&self) -> Option<&usize> {
            self.parent.as_ref()
        }

        fn child_refs(&self) -> &[usize] {
            &self.children
        }
    }

    #[test]
    fn long_parent_chains_settle_in_either_order() {
        const LEN: usize = 50_000;
        let mut chain: Vec<_> = (0..LEN)
            .map(|id| Link {
                id,
                parent: id.checked_sub(1),
                children: (id + 1 < LEN).then_some(id + 1).into_iter().collect(),
            })
            .collect();

        for _ in 0..2 {
            let tree = Hierarchy::build(&chain).unwrap();
            assert_eq!(tree.max_depth(), LEN - 1);
            assert_eq!(tree.get(&1234).unwrap().depth(), 1234);
            assert_eq!(tree.flatten().len(), LEN);
            chain.reverse();
        }

        chain[0].parent = Some(LEN - 1);
        let err = Hierarchy::build(&chain).unwrap_err();
        assert!(matches!(
            err,
            BuildError::CyclicReference { ref members } if members.len() == LEN
        ));
    }

    #[test]
    fn child_loop_is_a_cycle() {
        let records = vec![rec("A", None, &["B"]), rec("B", None, &["A"])];

        let err = Hierarchy::build(&records).unwrap_err();
        assert!(matches!(err, BuildError::CyclicReference { .. }));
        assert!(err.to_string().starts_with("cyclic reference between"));
    }

    #[test]
    fn contradictory_children_are_listed_under_each_parent() {
        let records = vec![
            rec("A", None, &["X"]),
            rec("B", None, &["X"]),
            rec("X", Some("B"), &[]),
        ];
        let tree = Hierarchy::build(&records).unwrap();

        assert_eq!(keys(&tree), ["A", "X", "B", "X"]);
        let x = tree.get(&"X".to_string()).unwrap();
        assert_eq!(tree.parent_of(x).unwrap().key(), "B");
    }

    #[test]
    fn bare_ids_work_as_references() {
        struct Team {
            id: Uuid,
            lead: Option<Uuid>,
            members: Vec<Uuid>,
        }

        impl Entity for Team {
            type Id = Uuid;

            fn identity(&self) -> Option<Uuid> {
                Some(self.id)
            }
        }

        impl Record for Team {
            type Ref = Uuid;

            fn parent_ref(&self) -> Option<&Uuid> {
                self.lead.as_ref()
            }

            fn child_refs(&self) -> &[Uuid] {
                &self.members
            }
        }

        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let teams = [
            Team {
                id: a,
                lead: None,
                members: vec![b],
            },
            Team {
                id: b,
                lead: Some(a),
                members: Vec::new(),
            },
        ];
        let tree = Hierarchy::build(&teams).unwrap();

        assert_eq!(tree.get(&b).unwrap().label(), b.to_string());
        assert_eq!(tree.flatten().len(), 2);
    }
}
