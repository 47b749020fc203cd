//! Plugin trait for composing a simulation.
//!
//! Plugins configure a [`Simulation`]: they publish globals, register
//! model variants, create and name nodes, and install per-node objects. The
//! simulation builds plugins in dependency order.
//!
//! # Example
//!
//! ```
//! use simcompute_system::plugin::Plugin;
//! use simcompute_system::simulation::Simulation;
//!
//! struct Seed(u64);
//!
//! struct SeedPlugin(u64);
//!
//! impl Plugin for SeedPlugin {
//!     fn build(&self, sim: &mut Simulation) {
//!         sim.insert_global(Seed(self.0));
//!     }
//! }
//!
//! let mut sim = Simulation::new();
//! sim.add_plugins(SeedPlugin(42));
//! sim.finish();
//! assert_eq!(sim.get_global::<Seed>().unwrap().0, 42);
//! ```

use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::simulation::Simulation;

/// Identifies a plugin by its concrete type.
///
/// Equality and hashing use the [`TypeId`] alone; the type name only feeds
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct PluginId {
    id: TypeId,
    name: &'static str,
}

impl PluginId {
    /// The id of plugin type `P`.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: type_name::<P>(),
        }
    }

    /// The plugin's [`TypeId`].
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name of the plugin type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PluginId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PluginId {}

impl Hash for PluginId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A unit of simulation configuration.
///
/// Lifecycle, driven by [`Simulation::finish`] and [`Simulation::cleanup`]:
///
/// 1. **Build** - `build()` in dependency order
/// 2. **Ready** - `ready()` in dependency order, once every plugin is built
/// 3. **Cleanup** - `cleanup()` in reverse dependency order
pub trait Plugin: Send + Sync + 'static {
    /// Configures the simulation. Called once.
    fn build(&self, sim: &mut Simulation);

    /// Called after all plugins have been built.
    fn ready(&self, _sim: &mut Simulation) {}

    /// Called when the simulation is torn down.
    fn cleanup(&self, _sim: &mut Simulation) {}

    /// Name used in logs and ordering errors.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Plugins whose `build()` must run first.
    fn dependencies(&self) -> Vec<PluginId> {
        Vec::new()
    }

    /// Whether adding a second instance of this type is rejected.
    fn is_unique(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    impl Plugin for Alpha {
        fn build(&self, _sim: &mut Simulation) {}
    }

    impl Plugin for Beta {
        fn build(&self, _sim: &mut Simulation) {}
    }

    #[test]
    fn ids_compare_by_type() {
        assert_eq!(PluginId::of::<Alpha>(), PluginId::of::<Alpha>());
        assert_ne!(PluginId::of::<Alpha>(), PluginId::of::<Beta>());
        assert!(PluginId::of::<Beta>().to_string().ends_with("Beta"));
        assert_eq!(Alpha.name(), PluginId::of::<Alpha>().type_name());
    }
}
