//! Resource accounting models for simulated nodes.
//!
//! `simcompute_model` tracks how much CPU and memory each node has left:
//!
//! - [`quantity`] - [`ResourceQuantity`](quantity::ResourceQuantity) with reserve and release
//! - [`limits`] - Upper bounds applied to quantities
//! - [`id_gen`] - Injectable quantity identity generators
//! - [`storage`] - Plain holder for one quantity
//! - [`model`] - The thread-safe, observable [`ComputationModel`](model::ComputationModel)
//! - [`simple`] - The default overwrite-on-commit variant
//! - [`observer`] - Named state-change observers
//! - [`registry`] - Variant name to constructor registry
//! - [`helper`] - Idempotent installation onto nodes
//! - [`config`] - JSON configuration
//! - [`plugin`] - Simulation plugins
//!
//! # Example
//!
//! ```
//! use simcompute_model::prelude::*;
//! use simcompute_system::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! let node = sim.create_node();
//!
//! let capacity = ResourceQuantity::new(500, 300);
//! let helper = ComputationHelper::new().with_initial_state(capacity);
//! let model = helper.install(&node).unwrap();
//!
//! let request = ResourceQuantity::new(200, 100);
//! let left = model.get_state().reserve(&request).unwrap();
//! model.set_state(left);
//! assert_eq!((model.get_state().cpu(), model.get_state().mem()), (300, 200));
//! ```

pub mod config;
pub mod error;
pub mod helper;
pub mod id_gen;
pub mod limits;
pub mod model;
pub mod observer;
pub mod plugin;
pub mod quantity;
pub mod registry;
pub mod simple;
pub mod storage;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{CapacityConfig, ComputationConfig};
    pub use crate::error::{
        ConfigError, InstallError, ModelError, ObserverError, QuantityError, RegistryError,
    };
    pub use crate::helper::ComputationHelper;
    pub use crate::id_gen::{IdGenerator, NanoIdGenerator, SequentialIdGenerator, generate_id};
    pub use crate::limits::QuantityLimits;
    pub use crate::model::{AccountingStrategy, ComputationModel};
    pub use crate::observer::{StateObserver, StateObservers};
    pub use crate::plugin::{ComputationPlugin, InstallObservers, StateTracePlugin};
    pub use crate::quantity::ResourceQuantity;
    pub use crate::registry::{ModelConstructor, ModelContext, ModelRegistry, SimObject};
    pub use crate::simple::SimpleModel;
    pub use crate::storage::QuantityStorage;
}
