//! Simulation-wide values keyed by type.
//!
//! A [`Simulation`](crate::simulation::Simulation) keeps one value per type in
//! its [`Globals`]: model registries, configuration, installers. Plugins
//! publish them while building and look them up by type afterwards.

use core::any::{Any, TypeId, type_name};
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Slot = RwLock<Box<dyn Any + Send + Sync>>;

/// A value that can live in [`Globals`].
///
/// Implemented for every `Send + Sync + 'static` type.
pub trait Global: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Global for T {}

/// Failed lookups in [`Globals`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlobalError {
    /// No value of this type is stored.
    #[error("no global of type {0}")]
    Missing(&'static str),

    /// The value is borrowed in a way that conflicts with the request.
    #[error("global {0} is already borrowed")]
    Borrowed(&'static str),
}

/// One value per type, each behind its own lock.
///
/// Lookups never block. A borrow that conflicts with an outstanding guard
/// fails with [`GlobalError::Borrowed`].
///
/// ```
/// use simcompute_system::globals::Globals;
///
/// struct Seed(u64);
///
/// let mut globals = Globals::new();
/// globals.insert(Seed(7));
///
/// globals.get_mut::<Seed>().unwrap().0 += 1;
/// assert_eq!(globals.get::<Seed>().unwrap().0, 8);
/// ```
#[derive(Default)]
pub struct Globals {
    slots: HashMap<TypeId, Slot>,
}

impl Globals {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the previous value of the same type.
    pub fn insert<T: Global>(&mut self, value: T) -> Option<T> {
        self.slots
            .insert(TypeId::of::<T>(), RwLock::new(Box::new(value)))
            .and_then(unbox::<T>)
    }

    /// Removes and returns the value of type `T`.
    pub fn remove<T: Global>(&mut self) -> Option<T> {
        self.slots.remove(&TypeId::of::<T>()).and_then(unbox::<T>)
    }

    /// Returns `true` if a value of type `T` is stored.
    #[must_use]
    pub fn contains<T: Global>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Borrows the value of type `T` for reading.
    ///
    /// # Errors
    ///
    /// [`GlobalError::Missing`] or [`GlobalError::Borrowed`] if a writer holds it.
    pub fn get<T: Global>(&self) -> Result<GlobalRef<'_, T>, GlobalError> {
        let guard = self
            .slot::<T>()?
            .try_read()
            .ok_or(GlobalError::Borrowed(type_name::<T>()))?;
        Ok(GlobalRef {
            guard,
            _type: PhantomData,
        })
    }

    /// Borrows the value of type `T` for writing.
    ///
    /// # Errors
    ///
    /// [`GlobalError::Missing`] or [`GlobalError::Borrowed`] if any guard holds it.
    pub fn get_mut<T: Global>(&self) -> Result<GlobalRefMut<'_, T>, GlobalError> {
        let guard = self
            .slot::<T>()?
            .try_write()
            .ok_or(GlobalError::Borrowed(type_name::<T>()))?;
        Ok(GlobalRefMut {
            guard,
            _type: PhantomData,
        })
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot<T: Global>(&self) -> Result<&Slot, GlobalError> {
        self.slots
            .get(&TypeId::of::<T>())
            .ok_or(GlobalError::Missing(type_name::<T>()))
    }
}

impl core::fmt::Debug for Globals {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Globals").field("len", &self.len()).finish()
    }
}

fn unbox<T: Global>(slot: Slot) -> Option<T> {
    slot.into_inner().downcast::<T>().ok().map(|value| *value)
}

/// Shared borrow of a global. Releases on drop.
pub struct GlobalRef<'a, T: Global> {
    guard: RwLockReadGuard<'a, Box<dyn Any + Send + Sync>>,
    _type: PhantomData<&'a T>,
}

impl<T: Global> Deref for GlobalRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Slots are keyed by TypeId::of::<T>().
        self.guard
            .downcast_ref::<T>()
            .expect("global stored under the wrong type")
    }
}

/// Exclusive borrow of a global. Releases on drop.
pub struct GlobalRefMut<'a, T: Global> {
    guard: RwLockWriteGuard<'a, Box<dyn Any + Send + Sync>>,
    _type: PhantomData<&'a mut T>,
}

impl<T: Global> Deref for GlobalRefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.guard
            .downcast_ref::<T>()
            .expect("global stored under the wrong type")
    }
}

impl<T: Global> DerefMut for GlobalRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.guard
            .downcast_mut::<T>()
            .expect("global stored under the wrong type")
    }
}
