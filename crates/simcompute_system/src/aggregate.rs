//! Capability aggregation onto nodes.
//!
//! Every [`Node`](crate::node::Node) carries an [`Aggregates`] container. Other
//! crates attach objects to a node by aggregating them here and discover them
//! later by type, without the node knowing anything about them. Once an object
//! is aggregated, the container is its owner for the lifetime of the node.

use core::any::{Any, TypeId};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

/// An object that can be aggregated onto a node.
///
/// Any type that is `Send + Sync + 'static` automatically implements `Aggregate`.
pub trait Aggregate: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Aggregate for T {}

/// Errors raised by [`Aggregates`].
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// An object of this type is already aggregated.
    #[error("an object of type {0} is already aggregated")]
    AlreadyAggregated(&'static str),
}

type SharedObject = Arc<dyn Any + Send + Sync>;

/// Type-keyed set of objects aggregated onto one node.
///
/// At most one object per concrete type is held. Lookups hand out `Arc`
/// clones, so callers can keep using an object without holding any lock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use simcompute_system::aggregate::Aggregates;
///
/// struct Battery { charge: u32 }
///
/// let aggregates = Aggregates::new();
/// aggregates.insert(Arc::new(Battery { charge: 80 })).unwrap();
///
/// assert_eq!(aggregates.get::<Battery>().unwrap().charge, 80);
/// assert!(aggregates.insert(Arc::new(Battery { charge: 10 })).is_err());
/// ```
#[derive(Default)]
pub struct Aggregates {
    objects: RwLock<HashMap<TypeId, SharedObject>>,
}

impl core::fmt::Debug for Aggregates {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Aggregates")
            .field("len", &self.len())
            .finish()
    }
}

impl Aggregates {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the aggregated object of type `T`, if any.
    #[must_use]
    pub fn get<T: Aggregate>(&self) -> Option<Arc<T>> {
        let object = self.objects.read().get(&TypeId::of::<T>()).cloned()?;
        object.downcast::<T>().ok()
    }

    /// Returns `true` if an object of type `T` is aggregated.
    #[must_use]
    pub fn contains<T: Aggregate>(&self) -> bool {
        self.objects.read().contains_key(&TypeId::of::<T>())
    }

    /// Aggregates `object`.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::AlreadyAggregated`] if an object of the same
    /// type is already present; the existing object is kept.
    pub fn insert<T: Aggregate>(&self, object: Arc<T>) -> Result<(), AggregateError> {
        let mut objects = self.objects.write();
        let id = TypeId::of::<T>();
        if objects.contains_key(&id) {
            return Err(AggregateError::AlreadyAggregated(core::any::type_name::<T>()));
        }
        objects.insert(id, object);
        Ok(())
    }

    /// Returns the object of type `T`, creating it with `create` if absent.
    ///
    /// The lookup and the insertion happen under one write lock, so
    /// concurrent callers on the same container observe exactly one
    /// creation. The returned flag is `true` when `create` ran.
    ///
    /// `create` must not access this container.
    ///
    /// # Errors
    ///
    /// Propagates the error from `create`; nothing is aggregated in that case.
    pub fn get_or_try_insert_with<T, E>(
        &self,
        create: impl FnOnce() -> Result<Arc<T>, E>,
    ) -> Result<(Arc<T>, bool), E>
    where
        T: Aggregate,
    {
        if let Some(existing) = self.get::<T>() {
            return Ok((existing, false));
        }

        let mut objects = self.objects.write();
        let id = TypeId::of::<T>();
        if let Some(existing) = objects.get(&id).cloned()
            && let Ok(existing) = existing.downcast::<T>()
        {
            return Ok((existing, false));
        }

        let created = create()?;
        objects.insert(id, Arc::clone(&created) as SharedObject);
        Ok((created, true))
    }

    /// Removes and returns the object of type `T`.
    pub fn remove<T: Aggregate>(&self) -> Option<Arc<T>> {
        let object = self.objects.write().remove(&TypeId::of::<T>())?;
        object.downcast::<T>().ok()
    }

    /// Returns the number of aggregated objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns `true` if nothing is aggregated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}
