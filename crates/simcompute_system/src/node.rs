//! Simulated nodes and node collections.

use core::fmt;
use std::sync::{Arc, Weak};

use crate::aggregate::Aggregates;

/// Identifier of a node within its simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Creates a node ID.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

struct NodeInner {
    id: NodeId,
    aggregates: Aggregates,
}

/// Handle to a simulated node.
///
/// Cloning a `Node` yields another handle to the same node. Two handles are
/// equal when they refer to the same node. Everything a node can do is
/// provided by objects aggregated onto it (see [`Node::aggregates`]).
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    /// Creates a node with the given ID and nothing aggregated.
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id,
                aggregates: Aggregates::new(),
            }),
        }
    }

    /// Returns the node's ID.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Returns the objects aggregated onto this node.
    #[must_use]
    pub fn aggregates(&self) -> &Aggregates {
        &self.inner.aggregates
    }

    /// Returns a non-owning handle to this node.
    #[must_use]
    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Arc::downgrade(&self.inner))
    }

    /// Returns `true` if both handles refer to the same node.
    #[must_use]
    pub fn same_node(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id)
            .field("aggregates", &self.inner.aggregates)
            .finish()
    }
}

/// Non-owning handle to a [`Node`].
///
/// Objects aggregated onto a node use this to refer back to their host
/// without keeping it alive.
#[derive(Clone, Default)]
pub struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    /// Returns the node if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(|inner| Node { inner })
    }

    /// Returns `true` if this handle refers to `node`.
    #[must_use]
    pub fn points_to(&self, node: &Node) -> bool {
        Weak::ptr_eq(&self.0, &Arc::downgrade(&node.inner))
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({})", node.id()),
            None => f.write_str("WeakNode(<dropped>)"),
        }
    }
}

/// An ordered collection of node handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeContainer {
    nodes: Vec<Node>,
}

impl NodeContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node.
    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends every node of `other`.
    pub fn extend_from(&mut self, other: &NodeContainer) {
        self.nodes.extend(other.nodes.iter().cloned());
    }

    /// Returns the node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Iterates over the nodes in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the container holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Node> for NodeContainer {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodeContainer {
    type Item = &'a Node;
    type IntoIter = core::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
