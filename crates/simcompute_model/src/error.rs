//! Error types for quantities, models and installation.

use simcompute_system::node::NodeId;

use crate::limits::QuantityLimits;

/// Errors from resource-quantity arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    /// A reservation asked for more than is held on at least one dimension.
    #[error(
        "insufficient resources: requested {requested_cpu}:{requested_mem}, \
         available {available_cpu}:{available_mem}"
    )]
    InsufficientResources {
        /// CPU held by the quantity being drawn down.
        available_cpu: u64,
        /// Memory held by the quantity being drawn down.
        available_mem: u64,
        /// CPU requested.
        requested_cpu: u64,
        /// Memory requested.
        requested_mem: u64,
    },

    /// A release would push a dimension past its maximum.
    #[error("resources released are too high: {cpu}:{mem} exceeds {max_cpu}:{max_mem}")]
    OverCapacity {
        /// Resulting CPU (saturated on overflow).
        cpu: u64,
        /// Resulting memory (saturated on overflow).
        mem: u64,
        /// CPU maximum that was applied.
        max_cpu: u64,
        /// Memory maximum that was applied.
        max_mem: u64,
    },

    /// Text was not of the form `cpu:mem` or `cpu:mem:uuid`.
    #[error("malformed resource quantity '{0}': expected 'cpu:mem' or 'cpu:mem:uuid'")]
    MalformedText(String),
}

/// Errors from a [`ComputationModel`](crate::model::ComputationModel).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The model already belongs to a different node.
    #[error("model is already attached to {existing:?}, cannot attach to {requested}")]
    HostAlreadyAttached {
        /// The current host, if it is still alive.
        existing: Option<NodeId>,
        /// The node the caller tried to attach.
        requested: NodeId,
    },
}

/// Errors from observer registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    /// An observer with this name is already registered.
    #[error("observer '{0}' is already registered")]
    DuplicateName(String),
}

/// Errors from [`ModelRegistry`](crate::registry::ModelRegistry) registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A constructor is already registered under this variant name.
    #[error("computation model variant '{0}' is already registered")]
    DuplicateVariant(String),
}

/// Errors raised while installing models onto nodes.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// A node name did not resolve to a live node.
    #[error("no node named '{0}'")]
    EntityNotFound(String),

    /// The selected variant is not registered.
    #[error("unknown computation model variant '{0}'")]
    UnknownVariant(String),

    /// The variant's constructor produced something that is not an accounting model.
    #[error("the requested computation model is not a computation model: '{variant}' built {type_name}")]
    InvalidFactoryProduct {
        /// The selected variant name.
        variant: String,
        /// Type name of the object the constructor produced.
        type_name: &'static str,
    },

    /// Attaching the new model to its node failed.
    #[error(transparent)]
    Host(#[from] ModelError),

    /// Registering an install-time observer failed.
    #[error(transparent)]
    Observer(#[from] ObserverError),
}

impl InstallError {
    /// Returns `true` for errors that indicate a broken deployment rather
    /// than a bad lookup.
    ///
    /// Startup code should abort on fatal errors instead of continuing with
    /// partially configured nodes.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, InstallError::EntityNotFound(_))
    }
}

/// Errors loading a [`ComputationConfig`](crate::config::ComputationConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or a literal failed to parse.
    #[error("invalid computation config: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured capacity does not fit within the configured limits.
    #[error("configured capacity {cpu}:{mem} exceeds limits {max_cpu}:{max_mem}")]
    CapacityExceedsLimits {
        /// Configured CPU.
        cpu: u64,
        /// Configured memory.
        mem: u64,
        /// CPU maximum.
        max_cpu: u64,
        /// Memory maximum.
        max_mem: u64,
    },

    /// Different process-wide limits were fixed before this config applied.
    #[error("configured limits {configured:?} conflict with active limits {active:?}")]
    LimitsConflict {
        /// Limits named by the config.
        configured: QuantityLimits,
        /// Limits already in force.
        active: QuantityLimits,
    },
}
