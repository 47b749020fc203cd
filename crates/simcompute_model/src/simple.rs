//! The default accounting variant.

use crate::model::AccountingStrategy;
use crate::quantity::ResourceQuantity;
use crate::registry::ModelContext;
use crate::storage::QuantityStorage;

/// Overwrites the stored quantity on every commit.
///
/// No admission control: callers that want it reserve or release on the
/// quantity before calling [`set_state`](crate::model::ComputationModel::set_state),
/// or use [`try_update`](crate::model::ComputationModel::try_update).
#[derive(Debug, Clone, Default)]
pub struct SimpleModel {
    storage: QuantityStorage,
}

impl SimpleModel {
    /// Variant name reported by [`AccountingStrategy::variant`].
    pub const VARIANT: &'static str = "simple";

    /// Creates the strategy holding `initial`.
    #[must_use]
    pub fn new(initial: ResourceQuantity) -> Self {
        Self {
            storage: QuantityStorage::new(initial),
        }
    }

    /// Creates the strategy holding the full capacity described by `ctx`.
    #[must_use]
    pub fn from_context(ctx: &ModelContext) -> Self {
        Self::new(ctx.full_quantity())
    }
}

impl AccountingStrategy for SimpleModel {
    fn mutate(&mut self, quantity: ResourceQuantity) {
        self.storage.set(quantity);
    }

    fn read(&self) -> ResourceQuantity {
        self.storage.get()
    }

    fn variant(&self) -> &str {
        Self::VARIANT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_unconditionally() {
        let mut simple = SimpleModel::new(ResourceQuantity::with_uuid(10, 10, 1));
        simple.mutate(ResourceQuantity::with_uuid(5000, 0, 2));
        assert_eq!(simple.read(), ResourceQuantity::with_uuid(5000, 0, 2));
    }
}
