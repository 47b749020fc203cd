//! Name registry for nodes.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::node::{Node, WeakNode};

/// Errors raised by [`Names`].
#[derive(Debug, thiserror::Error)]
pub enum NamesError {
    /// The name is already bound to a live node.
    #[error("name '{0}' is already registered")]
    Duplicate(String),
}

/// Maps human-readable names to nodes.
///
/// The registry holds weak handles: naming a node does not keep it alive,
/// and a name whose node has been dropped resolves to nothing.
#[derive(Debug, Default)]
pub struct Names {
    entries: RwLock<HashMap<String, WeakNode>>,
}

impl Names {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `node`, dropping names whose nodes are gone.
    ///
    /// # Errors
    ///
    /// Returns [`NamesError::Duplicate`] if `name` already refers to a live node.
    pub fn add(&self, name: impl Into<String>, node: &Node) -> Result<(), NamesError> {
        let name = name.into();
        let mut entries = self.entries.write();
        entries.retain(|_, weak| weak.upgrade().is_some());
        if entries.get(&name).and_then(WeakNode::upgrade).is_some() {
            return Err(NamesError::Duplicate(name));
        }
        tracing::trace!(%name, node = %node.id(), "registered node name");
        entries.insert(name, node.downgrade());
        Ok(())
    }

    /// Resolves `name` to a node.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Node> {
        self.entries.read().get(name).and_then(WeakNode::upgrade)
    }

    /// Returns the name bound to `node`, if any.
    #[must_use]
    pub fn name_of(&self, node: &Node) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|(_, weak)| weak.points_to(node))
            .map(|(name, _)| name.clone())
    }

    /// Returns the number of bound names, including ones whose node has been
    /// dropped since the last [`add`](Self::add).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no names are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Unbinds `name`, returning `true` if it was bound.
    pub fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    #[test]
    fn find_resolves_registered_names() {
        let names = Names::new();
        let node = Node::new(NodeId::new(1));
        names.add("edge-1", &node).unwrap();

        assert_eq!(names.find("edge-1"), Some(node.clone()));
        assert_eq!(names.name_of(&node).as_deref(), Some("edge-1"));
        assert!(names.find("edge-2").is_none());
    }

    #[test]
    fn duplicate_live_name_is_rejected() {
        let names = Names::new();
        let a = Node::new(NodeId::new(0));
        let b = Node::new(NodeId::new(1));
        names.add("server", &a).unwrap();

        assert!(matches!(
            names.add("server", &b),
            Err(NamesError::Duplicate(_))
        ));
    }

    #[test]
    fn dropped_node_frees_its_name() {
        let names = Names::new();
        let node = Node::new(NodeId::new(0));
        names.add("temp", &node).unwrap();
        drop(node);

        assert!(names.find("temp").is_none());
        let replacement = Node::new(NodeId::new(1));
        assert!(names.add("temp", &replacement).is_ok());
        assert!(names.remove("temp"));
        assert!(!names.remove("temp"));
    }

    #[test]
    fn add_prunes_names_of_dropped_nodes() {
        let names = Names::new();
        for id in 0..4 {
            let transient = Node::new(NodeId::new(id));
            names.add(format!("job-{id}"), &transient).unwrap();
        }
        assert_eq!(names.len(), 4);

        let kept = Node::new(NodeId::new(9));
        names.add("kept", &kept).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.find("kept"), Some(kept));
    }
}
