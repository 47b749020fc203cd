//! JSON configuration for computation models.
//!
//! ```
//! use simcompute_model::config::ComputationConfig;
//!
//! let config = ComputationConfig::from_json(r#"{
//!     "variant": "simple",
//!     "limits": { "max_cpu": 4000000000, "max_mem": 8589934592 },
//!     "capacity": { "cpu": "2GHz", "mem": "1GiB" },
//!     "install_all": true
//! }"#).unwrap();
//!
//! let capacity = config.capacity.unwrap();
//! assert_eq!(capacity.cpu.hz(), 2_000_000_000);
//! assert_eq!(capacity.mem.bits(), 8_589_934_592);
//! ```

use serde::{Deserialize, Serialize};
use simcompute_units::{CpuSize, DataSize};

use crate::error::ConfigError;
use crate::id_gen::IdGenerator;
use crate::limits::QuantityLimits;
use crate::quantity::ResourceQuantity;
use crate::registry::ModelRegistry;

/// Initial capacity given as size and rate literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Processing capacity, e.g. `"500Hz"` or `"2GHz"`.
    pub cpu: CpuSize,
    /// Memory capacity, e.g. `"300b"` or `"1GiB"`.
    pub mem: DataSize,
}

impl CapacityConfig {
    /// Converts into a quantity with an identity drawn from `ids`.
    #[must_use]
    pub fn to_quantity(&self, ids: &dyn IdGenerator) -> ResourceQuantity {
        ResourceQuantity::with_generator(self.cpu.hz(), self.mem.bits(), ids)
    }
}

/// Settings for [`ComputationPlugin`](crate::plugin::ComputationPlugin).
///
/// Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputationConfig {
    /// Variant installed on nodes.
    pub variant: String,
    /// Limits applied to quantities.
    pub limits: QuantityLimits,
    /// Initial capacity of new models. Full capacity (the limits) when absent.
    pub capacity: Option<CapacityConfig>,
    /// Whether to install on every node of the simulation once it is built.
    pub install_all: bool,
}

impl Default for ComputationConfig {
    fn default() -> Self {
        Self {
            variant: ModelRegistry::SIMPLE.to_owned(),
            limits: QuantityLimits::default(),
            capacity: None,
            install_all: false,
        }
    }
}

impl ComputationConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Json`] for malformed JSON or unparsable literals
    /// - [`ConfigError::CapacityExceedsLimits`] if the capacity does not fit
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured capacity fits within the limits.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CapacityExceedsLimits`] if it does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.capacity {
            Some(capacity) if !self.limits.admits(capacity.cpu.hz(), capacity.mem.bits()) => {
                Err(ConfigError::CapacityExceedsLimits {
                    cpu: capacity.cpu.hz(),
                    mem: capacity.mem.bits(),
                    max_cpu: self.limits.max_cpu,
                    max_mem: self.limits.max_mem,
                })
            }
            _ => Ok(()),
        }
    }

    /// Fixes the process-wide limits to the configured ones.
    ///
    /// Succeeds when the same limits are already in force.
    ///
    /// # Errors
    ///
    /// [`ConfigError::LimitsConflict`] if different limits were fixed first,
    /// for example by an earlier [`QuantityLimits::global`] call.
    pub fn install_limits(&self) -> Result<(), ConfigError> {
        match QuantityLimits::install_global(self.limits) {
            Err(active) if active != self.limits => Err(ConfigError::LimitsConflict {
                configured: self.limits,
                active,
            }),
            _ => Ok(()),
        }
    }
}
