//! Core infrastructure plugins for simcompute.
//!
//! - [`TracingPlugin`] - Logging via the `tracing` crate
//!
//! # Example
//!
//! ```
//! use simcompute_core_plugins::TracingPlugin;
//! use simcompute_system::simulation::Simulation;
//! use tracing::Level;
//!
//! let mut sim = Simulation::new();
//! sim.add_plugins(TracingPlugin::default().with_level(Level::DEBUG));
//! sim.finish();
//! ```

mod tracing_plugin;

pub use tracing_plugin::{TracingConfig, TracingFormat, TracingPlugin, UnknownFormat};
