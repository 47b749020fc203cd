//! Upper bounds on resource quantities.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static GLOBAL_LIMITS: OnceLock<QuantityLimits> = OnceLock::new();

/// Maximum CPU and memory a valid quantity may hold.
///
/// Limits can be passed explicitly (`*_within` methods on
/// [`ResourceQuantity`](crate::quantity::ResourceQuantity)) or taken from the
/// process-wide value returned by [`QuantityLimits::global`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantityLimits {
    /// Largest valid CPU amount.
    pub max_cpu: u64,
    /// Largest valid memory amount.
    pub max_mem: u64,
}

impl QuantityLimits {
    /// Default CPU maximum.
    pub const DEFAULT_MAX_CPU: u64 = 1000;
    /// Default memory maximum.
    pub const DEFAULT_MAX_MEM: u64 = 1000;

    /// Creates limits with the given maxima.
    #[must_use]
    pub const fn new(max_cpu: u64, max_mem: u64) -> Self {
        Self { max_cpu, max_mem }
    }

    /// Returns `true` if `cpu` and `mem` are both within the limits.
    #[must_use]
    pub const fn admits(&self, cpu: u64, mem: u64) -> bool {
        cpu <= self.max_cpu && mem <= self.max_mem
    }

    /// Returns the process-wide limits.
    ///
    /// The first call fixes the value: either what was passed to
    /// [`install_global`](Self::install_global) or the defaults.
    #[must_use]
    pub fn global() -> Self {
        *GLOBAL_LIMITS.get_or_init(Self::default)
    }

    /// Sets the process-wide limits.
    ///
    /// # Errors
    ///
    /// Returns the currently installed limits if the process-wide value was
    /// already fixed, by an earlier install or by a call to [`global`](Self::global).
    pub fn install_global(limits: Self) -> Result<(), Self> {
        GLOBAL_LIMITS
            .set(limits)
            .map_err(|_| Self::global())
    }
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CPU, Self::DEFAULT_MAX_MEM)
    }
}
