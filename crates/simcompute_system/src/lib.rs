//! The simulation substrate for simcompute.
//!
//! `simcompute_system` provides the pieces that resource models attach to:
//!
//! - [`node`] - Node handles and ordered node collections
//! - [`aggregate`] - Per-node, type-keyed object aggregation
//! - [`names`] - Name → node registry
//! - [`globals`] - Simulation-wide values keyed by type
//! - [`plugin`] - Plugin trait for composing a simulation
//! - [`simulation`] - The runtime owning nodes, names, globals and plugins
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use simcompute_system::plugin::Plugin;
//! use simcompute_system::simulation::Simulation;
//!
//! struct Radio;
//!
//! struct RadioPlugin;
//!
//! impl Plugin for RadioPlugin {
//!     fn build(&self, sim: &mut Simulation) {
//!         for node in sim.nodes() {
//!             node.aggregates().insert(Arc::new(Radio)).unwrap();
//!         }
//!     }
//! }
//!
//! let mut sim = Simulation::new();
//! let nodes = sim.create_nodes(2);
//! sim.add_plugins(RadioPlugin);
//! sim.finish();
//!
//! assert!(nodes.iter().all(|n| n.aggregates().contains::<Radio>()));
//! ```

pub mod aggregate;
pub mod globals;
pub mod names;
pub mod node;
pub mod plugin;
pub mod simulation;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::aggregate::{Aggregate, AggregateError, Aggregates};
    pub use crate::globals::{Global, GlobalError, GlobalRef, GlobalRefMut, Globals};
    pub use crate::names::{Names, NamesError};
    pub use crate::node::{Node, NodeContainer, NodeId, WeakNode};
    pub use crate::plugin::{Plugin, PluginId};
    pub use crate::simulation::Simulation;
}
