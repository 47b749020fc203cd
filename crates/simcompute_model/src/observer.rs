//! Named observers of model state changes.
//!
//! Every successful [`set_state`](crate::model::ComputationModel::set_state)
//! invokes each registered observer once, in registration order, with the
//! model that changed. Observers may read the model's state but must not
//! write it.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use simcompute_model::model::ComputationModel;
//! use simcompute_model::quantity::ResourceQuantity;
//! use simcompute_model::simple::SimpleModel;
//!
//! let model = ComputationModel::new(SimpleModel::new(ResourceQuantity::new(10, 10)));
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! model
//!     .observers()
//!     .register("count", move |_model| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     })
//!     .unwrap();
//!
//! model.set_state(ResourceQuantity::new(4, 4));
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ObserverError;
use crate::model::ComputationModel;

/// Shared observer callback.
pub type StateObserver = Arc<dyn Fn(&ComputationModel) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// ObserverEntry
// ─────────────────────────────────────────────────────────────────────────────

struct ObserverEntry {
    name: String,
    observer: StateObserver,
}

// ─────────────────────────────────────────────────────────────────────────────
// StateObservers
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered registry of state-change observers.
///
/// Registration and notification may happen from different threads.
/// Notification works on a snapshot, so observers registered during a
/// notification are first called on the next change.
#[derive(Default)]
pub struct StateObservers {
    entries: RwLock<Vec<ObserverEntry>>,
}

impl StateObservers {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer under `name`.
    ///
    /// # Errors
    ///
    /// [`ObserverError::DuplicateName`] if `name` is already taken.
    pub fn register<F>(&self, name: impl Into<String>, observer: F) -> Result<(), ObserverError>
    where
        F: Fn(&ComputationModel) + Send + Sync + 'static,
    {
        self.register_shared(name, Arc::new(observer))
    }

    /// Registers an already shared observer under `name`.
    ///
    /// # Errors
    ///
    /// [`ObserverError::DuplicateName`] if `name` is already taken.
    pub fn register_shared(
        &self,
        name: impl Into<String>,
        observer: StateObserver,
    ) -> Result<(), ObserverError> {
        let name = name.into();
        let mut entries = self.entries.write();
        if entries.iter().any(|entry| entry.name == name) {
            return Err(ObserverError::DuplicateName(name));
        }
        entries.push(ObserverEntry { name, observer });
        Ok(())
    }

    /// Removes the observer registered under `name`.
    ///
    /// Returns `true` if one was removed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.name != name);
        entries.len() != before
    }

    /// Names of registered observers, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn notify(&self, model: &ComputationModel) {
        let snapshot: Vec<StateObserver> = self
            .entries
            .read()
            .iter()
            .map(|entry| Arc::clone(&entry.observer))
            .collect();
        for observer in snapshot {
            observer(model);
        }
    }
}

impl fmt::Debug for StateObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateObservers")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::ResourceQuantity;
    use crate::simple::SimpleModel;
    use parking_lot::Mutex;

    fn model() -> ComputationModel {
        ComputationModel::new(SimpleModel::new(ResourceQuantity::with_uuid(10, 10, 0)))
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let observers = StateObservers::new();
        observers.register("log", |_| {}).unwrap();
        let err = observers.register("log", |_| {}).unwrap_err();
        assert_eq!(err, ObserverError::DuplicateName("log".into()));
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn notified_in_registration_order() {
        let model = model();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            model
                .observers()
                .register(name, move |_| order.lock().push(name))
                .unwrap();
        }

        model.set_state(ResourceQuantity::with_uuid(1, 1, 1));
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unregister_stops_notifications() {
        let model = model();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        model
            .observers()
            .register("count", move |_| *counter.lock() += 1)
            .unwrap();

        model.set_state(ResourceQuantity::with_uuid(1, 1, 1));
        assert!(model.observers().unregister("count"));
        assert!(!model.observers().unregister("count"));
        model.set_state(ResourceQuantity::with_uuid(2, 2, 2));

        assert_eq!(*calls.lock(), 1);
        assert!(model.observers().is_empty());
    }

    #[test]
    fn observer_sees_new_state() {
        let model = model();
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        model
            .observers()
            .register("read", move |m| *slot.lock() = Some(m.get_state()))
            .unwrap();

        model.set_state(ResourceQuantity::with_uuid(7, 8, 9));
        assert_eq!(*seen.lock(), Some(ResourceQuantity::with_uuid(7, 8, 9)));
    }
}
