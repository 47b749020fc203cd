//! Compute resource accounting for simulated network nodes.
//!
//! Every node in a [`Simulation`](prelude::Simulation) can carry one
//! [`ComputationModel`](prelude::ComputationModel) tracking the CPU and memory
//! it has left. Models are installed idempotently by a
//! [`ComputationHelper`](prelude::ComputationHelper), usually through the
//! [`ComputationPlugin`](prelude::ComputationPlugin).
//!
//! ```
//! use simcompute::prelude::*;
//!
//! let config = ComputationConfig::from_json(
//!     r#"{ "capacity": { "cpu": "2GHz", "mem": "4GiB" },
//!          "limits": { "max_cpu": 4000000000, "max_mem": 68719476736 },
//!          "install_all": true }"#,
//! )
//! .unwrap();
//!
//! let mut sim = Simulation::new();
//! let nodes = sim.create_nodes(2);
//! sim.add_plugins(TracingPlugin::default());
//! sim.add_plugins(ComputationPlugin::new(config));
//! sim.add_plugins(StateTracePlugin);
//! sim.finish();
//!
//! let model = ComputationModel::of(nodes.get(0).unwrap()).unwrap();
//! let task = ResourceQuantity::new(500_000_000, 8 * 1024 * 1024 * 1024);
//! let left = model.try_update(|available| available.reserve(&task)).unwrap();
//! assert_eq!(left.cpu(), 1_500_000_000);
//! ```

pub use simcompute_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use simcompute_internal::prelude::*;
}
