//! The observable, thread-safe accounting model attached to each node.
//!
//! [`ComputationModel`] composes an [`AccountingStrategy`], which decides how a
//! new quantity is committed, with the parts every variant shares:
//!
//! - a writer mutex that serializes [`set_state`](ComputationModel::set_state)
//! - a reader-writer lock around the strategy so reads never race a commit
//! - [`StateObservers`] notified after every commit
//! - a weak back reference to the host [`Node`]

use core::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use simcompute_system::node::{Node, WeakNode};

use crate::error::ModelError;
use crate::observer::StateObservers;
use crate::quantity::ResourceQuantity;

// ─────────────────────────────────────────────────────────────────────────────
// AccountingStrategy
// ─────────────────────────────────────────────────────────────────────────────

/// Variant-specific commit and read behavior.
///
/// Strategies are never shared directly: [`ComputationModel`] owns one and
/// serializes every call into it.
///
/// # Example
///
/// A strategy that keeps the lowest quantity it has seen:
///
/// ```
/// use simcompute_model::model::{AccountingStrategy, ComputationModel};
/// use simcompute_model::quantity::ResourceQuantity;
///
/// struct LowWater(ResourceQuantity);
///
/// impl AccountingStrategy for LowWater {
///     fn mutate(&mut self, quantity: ResourceQuantity) {
///         if quantity.cpu() < self.0.cpu() {
///             self.0 = quantity;
///         }
///     }
///
///     fn read(&self) -> ResourceQuantity {
///         self.0
///     }
///
///     fn variant(&self) -> &str {
///         "low-water"
///     }
/// }
///
/// let model = ComputationModel::new(LowWater(ResourceQuantity::with_uuid(10, 10, 1)));
/// model.set_state(ResourceQuantity::with_uuid(20, 0, 2));
/// assert_eq!(model.get_state().cpu(), 10);
/// ```
pub trait AccountingStrategy: Send + Sync + 'static {
    /// Commits `quantity` according to the variant's policy.
    fn mutate(&mut self, quantity: ResourceQuantity);

    /// Returns the current quantity.
    fn read(&self) -> ResourceQuantity;

    /// Name of the variant, for diagnostics.
    fn variant(&self) -> &str;
}

// ─────────────────────────────────────────────────────────────────────────────
// ComputationModel
// ─────────────────────────────────────────────────────────────────────────────

/// One node's resource accounting.
///
/// # Thread Safety
///
/// Writers are serialized by an internal mutex held for the whole of
/// [`set_state`](Self::set_state), notification included. Readers take a
/// shared lock and never observe a half-committed quantity. Observers run on
/// the writing thread after the commit; they may call
/// [`get_state`](Self::get_state) but must not write to the same model.
pub struct ComputationModel {
    writer: Mutex<()>,
    state: RwLock<Box<dyn AccountingStrategy>>,
    observers: StateObservers,
    host: OnceLock<WeakNode>,
}

impl ComputationModel {
    /// Wraps `strategy`.
    #[must_use]
    pub fn new<S: AccountingStrategy>(strategy: S) -> Self {
        Self::from_boxed(Box::new(strategy))
    }

    /// Wraps an already boxed strategy.
    #[must_use]
    pub fn from_boxed(strategy: Box<dyn AccountingStrategy>) -> Self {
        Self {
            writer: Mutex::new(()),
            state: RwLock::new(strategy),
            observers: StateObservers::new(),
            host: OnceLock::new(),
        }
    }

    /// Returns the model installed on `node`, if any.
    #[must_use]
    pub fn of(node: &Node) -> Option<Arc<Self>> {
        node.aggregates().get::<Self>()
    }

    /// Commits `quantity` and notifies observers.
    ///
    /// Both locks are guards, so a panicking strategy leaves the model
    /// usable by later calls.
    pub fn set_state(&self, quantity: ResourceQuantity) {
        let _writer = self.writer.lock();
        self.commit(quantity);
        self.observers.notify(self);
    }

    /// Atomically replaces the state with `update(current)`.
    ///
    /// Runs under the writer mutex, so no other write can land between the
    /// read and the commit. Observers are notified only on success.
    ///
    /// # Errors
    ///
    /// Propagates the error from `update`; the state is left unchanged.
    ///
    /// ```
    /// use simcompute_model::model::ComputationModel;
    /// use simcompute_model::quantity::ResourceQuantity;
    /// use simcompute_model::simple::SimpleModel;
    ///
    /// let model = ComputationModel::new(SimpleModel::new(ResourceQuantity::with_uuid(500, 300, 1)));
    /// let request = ResourceQuantity::new(200, 100);
    /// let left = model.try_update(|current| current.reserve(&request)).unwrap();
    /// assert_eq!((left.cpu(), left.mem()), (300, 200));
    /// ```
    pub fn try_update<E>(
        &self,
        update: impl FnOnce(ResourceQuantity) -> Result<ResourceQuantity, E>,
    ) -> Result<ResourceQuantity, E> {
        let _writer = self.writer.lock();
        let next = update(self.get_state())?;
        let committed = self.commit(next);
        self.observers.notify(self);
        Ok(committed)
    }

    /// Returns the current quantity.
    #[must_use]
    pub fn get_state(&self) -> ResourceQuantity {
        self.state.read().read()
    }

    /// Name of the wrapped strategy's variant.
    #[must_use]
    pub fn variant(&self) -> String {
        self.state.read().variant().to_owned()
    }

    /// Observers notified after every commit.
    #[must_use]
    pub fn observers(&self) -> &StateObservers {
        &self.observers
    }

    /// Associates this model with `node`.
    ///
    /// Attaching the same node again is a no-op.
    ///
    /// # Errors
    ///
    /// [`ModelError::HostAlreadyAttached`] if a different node was attached first.
    pub fn attach_host(&self, node: &Node) -> Result<(), ModelError> {
        let host = self.host.get_or_init(|| node.downgrade());
        if host.points_to(node) {
            return Ok(());
        }
        Err(ModelError::HostAlreadyAttached {
            existing: host.upgrade().map(|existing| existing.id()),
            requested: node.id(),
        })
    }

    /// Returns the host node, if attached and still alive.
    #[must_use]
    pub fn host(&self) -> Option<Node> {
        self.host.get().and_then(WeakNode::upgrade)
    }

    fn commit(&self, quantity: ResourceQuantity) -> ResourceQuantity {
        let mut state = self.state.write();
        state.mutate(quantity);
        let committed = state.read();
        tracing::debug!(
            variant = state.variant(),
            cpu = committed.cpu(),
            mem = committed.mem(),
            uuid = committed.uuid(),
            "state committed"
        );
        committed
    }
}

impl fmt::Debug for ComputationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ComputationModel")
            .field("variant", &state.variant())
            .field("state", &state.read())
            .field("observers", &self.observers)
            .field("host", &self.host().map(|node| node.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple::SimpleModel;
    use simcompute_system::node::NodeId;

    fn model(cpu: u64, mem: u64) -> ComputationModel {
        ComputationModel::new(SimpleModel::new(ResourceQuantity::with_uuid(cpu, mem, 1)))
    }

    #[test]
    fn set_then_get() {
        let model = model(1000, 1000);
        model.set_state(ResourceQuantity::with_uuid(400, 200, 5));
        assert_eq!(model.get_state(), ResourceQuantity::with_uuid(400, 200, 5));
    }

    #[test]
    fn try_update_failure_leaves_state_and_skips_observers() {
        let model = model(500, 300);
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        model
            .observers()
            .register("count", move |_| *counter.lock() += 1)
            .unwrap();

        let request = ResourceQuantity::new(450, 301);
        let result = model.try_update(|current| current.reserve(&request));

        assert!(result.is_err());
        assert_eq!(model.get_state(), ResourceQuantity::with_uuid(500, 300, 1));
        assert_eq!(*calls.lock(), 0);
    }

    /// Refuses zero quantities by panicking inside the write.
    struct NoZero(ResourceQuantity);

    impl AccountingStrategy for NoZero {
        fn mutate(&mut self, quantity: ResourceQuantity) {
            assert!(quantity.cpu() > 0, "zero cpu");
            self.0 = quantity;
        }

        fn read(&self) -> ResourceQuantity {
            self.0
        }

        fn variant(&self) -> &str {
            "no-zero"
        }
    }

    #[test]
    fn panicking_mutation_releases_locks() {
        let model = ComputationModel::new(NoZero(ResourceQuantity::with_uuid(5, 5, 1)));
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        model
            .observers()
            .register("count", move |_| *counter.lock() += 1)
            .unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            model.set_state(ResourceQuantity::with_uuid(0, 5, 1));
        }));
        assert!(result.is_err());
        assert_eq!(*calls.lock(), 0);
        assert_eq!(model.get_state(), ResourceQuantity::with_uuid(5, 5, 1));

        model.set_state(ResourceQuantity::with_uuid(7, 3, 1));
        assert_eq!(model.get_state(), ResourceQuantity::with_uuid(7, 3, 1));
        assert_eq!(*calls.lock(), 1);

        let left = model
            .try_update(|current| current.reserve(&ResourceQuantity::new(2, 1)))
            .unwrap();
        assert_eq!(left, ResourceQuantity::with_uuid(5, 2, 1));
        assert_eq!(*calls.lock(), 2);
    }

    #[test]
    fn host_is_set_once() {
        let model = model(1, 1);
        assert!(model.host().is_none());

        let first = Node::new(NodeId::new(0));
        let second = Node::new(NodeId::new(1));
        model.attach_host(&first).unwrap();
        model.attach_host(&first).unwrap();

        let err = model.attach_host(&second).unwrap_err();
        assert_eq!(
            err,
            ModelError::HostAlreadyAttached {
                existing: Some(NodeId::new(0)),
                requested: NodeId::new(1),
            }
        );
        assert_eq!(model.host().unwrap(), first);
    }

    #[test]
    fn host_reference_is_weak() {
        let model = model(1, 1);
        let node = Node::new(NodeId::new(3));
        model.attach_host(&node).unwrap();
        drop(node);
        assert!(model.host().is_none());
    }

    #[test]
    fn of_finds_aggregated_model() {
        let node = Node::new(NodeId::new(0));
        assert!(ComputationModel::of(&node).is_none());

        let installed = Arc::new(model(1, 1));
        node.aggregates().insert(Arc::clone(&installed)).unwrap();
        assert!(Arc::ptr_eq(&ComputationModel::of(&node).unwrap(), &installed));
    }

    #[test]
    fn debug_shows_variant_and_state() {
        let rendered = format!("{:?}", model(3, 4));
        assert!(rendered.contains("simple"));
        assert!(rendered.contains("cpu: 3"));
    }
}
