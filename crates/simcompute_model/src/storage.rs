//! Plain holder for a node's current quantity.

use crate::quantity::ResourceQuantity;

/// Holds exactly one [`ResourceQuantity`].
///
/// No synchronization: callers that share a storage must serialize access.
/// [`ComputationModel`](crate::model::ComputationModel) does this for its
/// strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStorage {
    current: ResourceQuantity,
}

impl QuantityStorage {
    /// Creates a storage holding `initial`.
    #[must_use]
    pub const fn new(initial: ResourceQuantity) -> Self {
        Self { current: initial }
    }

    /// Replaces the stored quantity.
    pub fn set(&mut self, quantity: ResourceQuantity) {
        self.current = quantity;
    }

    /// Returns the stored quantity.
    #[must_use]
    pub const fn get(&self) -> ResourceQuantity {
        self.current
    }
}

impl Default for QuantityStorage {
    fn default() -> Self {
        Self::new(ResourceQuantity::default())
    }
}
