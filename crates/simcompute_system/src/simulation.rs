//! Simulation runtime.
//!
//! The [`Simulation`] owns the global node collection, the node name
//! registry, simulation-wide globals and the plugins that configure them.
//!
//! ```
//! use simcompute_system::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! let edge = sim.create_named_node("edge").unwrap();
//! sim.create_nodes(3);
//!
//! assert_eq!(sim.nodes().len(), 4);
//! assert_eq!(sim.names().find("edge"), Some(edge));
//! ```

use hashbrown::{HashMap, HashSet};

use crate::globals::{Global, GlobalRef, GlobalRefMut, Globals};
use crate::names::{Names, NamesError};
use crate::node::{Node, NodeContainer, NodeId};
use crate::plugin::{Plugin, PluginId};

/// Build progress of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BuildState {
    #[default]
    NotStarted,
    Building,
    Built,
}

struct PluginEntry {
    id: PluginId,
    plugin: Box<dyn Plugin>,
}

/// A simulation: nodes, their names, globals and plugins.
#[derive(Default)]
pub struct Simulation {
    /// Every node created through this simulation, in creation order.
    nodes: NodeContainer,
    names: Names,
    globals: Globals,
    pending_plugins: Vec<PluginEntry>,
    built_plugins: Vec<PluginEntry>,
    plugin_ids: HashSet<PluginId>,
    build_state: BuildState,
}

impl Simulation {
    /// Creates an empty simulation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nodes
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a node and adds it to the global collection.
    ///
    /// IDs are assigned sequentially from zero.
    pub fn create_node(&mut self) -> Node {
        let id = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        let node = Node::new(NodeId::new(id));
        self.nodes.add(node.clone());
        tracing::trace!(node = %node.id(), "created node");
        node
    }

    /// Creates `count` nodes and returns them as a container.
    pub fn create_nodes(&mut self, count: usize) -> NodeContainer {
        (0..count).map(|_| self.create_node()).collect()
    }

    /// Creates a node and binds it to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NamesError::Duplicate`] if the name is taken. The node is
    /// still created and part of the global collection.
    pub fn create_named_node(&mut self, name: impl Into<String>) -> Result<Node, NamesError> {
        let node = self.create_node();
        self.names.add(name, &node)?;
        Ok(node)
    }

    /// Returns every node of the simulation.
    #[must_use]
    pub fn nodes(&self) -> &NodeContainer {
        &self.nodes
    }

    /// Returns the node name registry.
    #[must_use]
    pub fn names(&self) -> &Names {
        &self.names
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Globals
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores a global, returning the previous value of that type.
    pub fn insert_global<G: Global>(&mut self, value: G) -> Option<G> {
        self.globals.insert(value)
    }

    /// Returns `true` if a global of type `G` exists.
    #[must_use]
    pub fn contains_global<G: Global>(&self) -> bool {
        self.globals.contains::<G>()
    }

    /// Borrows a global for reading.
    ///
    /// Returns `None` if it doesn't exist or is borrowed for writing.
    #[must_use]
    pub fn get_global<G: Global>(&self) -> Option<GlobalRef<'_, G>> {
        self.globals.get::<G>().ok()
    }

    /// Borrows a global for writing.
    ///
    /// Returns `None` if it doesn't exist or is already borrowed.
    #[must_use]
    pub fn get_global_mut<G: Global>(&self) -> Option<GlobalRefMut<'_, G>> {
        self.globals.get_mut::<G>().ok()
    }

    /// Removes a global and returns it.
    pub fn remove_global<G: Global>(&mut self) -> Option<G> {
        self.globals.remove::<G>()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plugins
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a plugin.
    ///
    /// Plugins added before [`finish()`](Self::finish) are queued; plugins
    /// added while building are built immediately.
    ///
    /// # Panics
    ///
    /// Panics if a unique plugin is added twice.
    pub fn add_plugins<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        let id = PluginId::of::<P>();

        if plugin.is_unique() && self.plugin_ids.contains(&id) {
            panic!(
                "Plugin '{}' is unique and was already added.",
                plugin.name()
            );
        }
        self.plugin_ids.insert(id);

        let entry = PluginEntry {
            id,
            plugin: Box::new(plugin),
        };
        if self.build_state == BuildState::Building {
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        } else {
            self.pending_plugins.push(entry);
        }
        self
    }

    /// Returns `true` if a plugin of type `P` has been added.
    #[must_use]
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        self.plugin_ids.contains(&PluginId::of::<P>())
    }

    /// Returns `true` once [`finish()`](Self::finish) has completed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.build_state == BuildState::Built
    }

    /// Builds and readies all plugins in dependency order.
    ///
    /// # Panics
    ///
    /// - If called more than once
    /// - If a plugin's dependency was not added
    /// - If plugin dependencies form a cycle
    pub fn finish(&mut self) {
        assert!(
            self.build_state == BuildState::NotStarted,
            "Simulation::finish() was already called. Cannot build twice."
        );

        let sorted = self.sort_plugins_by_dependencies();

        self.build_state = BuildState::Building;
        for entry in sorted {
            tracing::debug!(plugin = entry.plugin.name(), "building plugin");
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        }

        let built = core::mem::take(&mut self.built_plugins);
        for entry in &built {
            entry.plugin.ready(self);
        }
        let added_during_ready = core::mem::replace(&mut self.built_plugins, built);
        self.built_plugins.extend(added_during_ready);

        self.build_state = BuildState::Built;
    }

    /// Cleans up all plugins in reverse dependency order.
    pub fn cleanup(&mut self) {
        let built = core::mem::take(&mut self.built_plugins);
        for entry in built.iter().rev() {
            entry.plugin.cleanup(self);
        }
        self.built_plugins = built;
    }

    /// Orders pending plugins so every plugin follows its dependencies.
    fn sort_plugins_by_dependencies(&mut self) -> Vec<PluginEntry> {
        let pending = core::mem::take(&mut self.pending_plugins);
        let n = pending.len();

        let index_of: HashMap<PluginId, usize> = pending
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id, i))
            .collect();

        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, entry) in pending.iter().enumerate() {
            for dep in entry.plugin.dependencies() {
                if let Some(&dep_idx) = index_of.get(&dep) {
                    dependents[dep_idx].push(i);
                    in_degree[i] += 1;
                } else if !self.built_plugins.iter().any(|p| p.id == dep) {
                    panic!(
                        "Plugin '{}' requires '{}' which was not added.",
                        entry.plugin.name(),
                        dep.type_name()
                    );
                }
            }
        }

        // Kahn's algorithm; seeding in reverse keeps insertion order for independent plugins.
        let mut queue: Vec<usize> = (0..n).rev().filter(|&i| in_degree[i] == 0).collect();
        let mut order: Vec<usize> = Vec::with_capacity(n);
        while let Some(idx) = queue.pop() {
            order.push(idx);
            for &dependent in dependents[idx].iter().rev() {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push(dependent);
                }
            }
        }

        if order.len() != n {
            let in_cycle: Vec<&str> = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| pending[i].plugin.name())
                .collect();
            panic!("Circular dependency detected among plugins: {in_cycle:?}");
        }

        let mut slots: Vec<Option<PluginEntry>> = pending.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Journal(Arc<Mutex<Vec<String>>>);

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        deps: Vec<PluginId>,
    }

    impl Plugin for Recorder {
        fn build(&self, _sim: &mut Simulation) {
            self.log.lock().push(format!("build:{}", self.label));
        }

        fn ready(&self, _sim: &mut Simulation) {
            self.log.lock().push(format!("ready:{}", self.label));
        }

        fn cleanup(&self, _sim: &mut Simulation) {
            self.log.lock().push(format!("cleanup:{}", self.label));
        }

        fn dependencies(&self) -> Vec<PluginId> {
            self.deps.clone()
        }

        fn is_unique(&self) -> bool {
            false
        }
    }

    struct Base(Arc<Mutex<Vec<String>>>);

    impl Plugin for Base {
        fn build(&self, sim: &mut Simulation) {
            self.0.lock().push("build:base".into());
            sim.insert_global(Journal(Arc::clone(&self.0)));
        }
    }

    #[test]
    fn node_ids_are_sequential() {
        let mut sim = Simulation::new();
        let batch = sim.create_nodes(3);
        let ids: Vec<u32> = batch.iter().map(|n| n.id().index()).collect();

        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(sim.nodes().len(), 3);
    }

    #[test]
    fn named_node_resolves() {
        let mut sim = Simulation::new();
        let node = sim.create_named_node("gateway").unwrap();

        assert_eq!(sim.names().find("gateway"), Some(node));
        assert!(sim.create_named_node("gateway").is_err());
        assert_eq!(sim.nodes().len(), 2);
    }

    #[test]
    fn dependencies_build_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sim = Simulation::new();
        sim.add_plugins(Recorder {
            label: "dependent",
            log: Arc::clone(&log),
            deps: vec![PluginId::of::<Base>()],
        });
        sim.add_plugins(Base(Arc::clone(&log)));
        sim.finish();
        sim.cleanup();

        let log = log.lock().clone();
        assert_eq!(
            log,
            vec![
                "build:base",
                "build:dependent",
                "ready:dependent",
                "cleanup:dependent",
            ]
        );
        assert_eq!(sim.get_global::<Journal>().unwrap().0.lock().len(), 4);
        assert!(sim.is_built());
    }

    #[test]
    #[should_panic(expected = "is unique and was already added")]
    fn unique_plugin_added_twice_panics() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sim = Simulation::new();
        sim.add_plugins(Base(Arc::clone(&log)));
        sim.add_plugins(Base(log));
    }

    #[test]
    #[should_panic(expected = "which was not added")]
    fn missing_dependency_panics() {
        let mut sim = Simulation::new();
        sim.add_plugins(Recorder {
            label: "orphan",
            log: Arc::default(),
            deps: vec![PluginId::of::<Base>()],
        });
        sim.finish();
    }

    #[test]
    #[should_panic(expected = "already called")]
    fn finish_twice_panics() {
        let mut sim = Simulation::new();
        sim.finish();
        sim.finish();
    }
}
