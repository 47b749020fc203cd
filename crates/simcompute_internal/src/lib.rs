//! # simcompute Internal Library
//!
//! Re-exports the simcompute crates for convenience.

/// Size and clock-rate literals.
pub use simcompute_units;

/// Nodes, names, globals and plugins.
pub use simcompute_system;

/// Resource quantities, accounting models and their installer.
pub use simcompute_model;

/// Infrastructure plugins.
pub use simcompute_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use simcompute_core_plugins::{TracingConfig, TracingFormat, TracingPlugin};
    pub use simcompute_model::prelude::*;
    pub use simcompute_system::prelude::*;
    pub use simcompute_units::{CpuSize, DataSize, ParseError, parse_cpu_size, parse_data_size};
}
