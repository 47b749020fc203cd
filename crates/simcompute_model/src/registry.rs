//! Variant registry: maps a variant name to a model constructor.
//!
//! The installer never names a concrete strategy type. It asks the registry to
//! build whatever is registered under the selected name, then checks that the
//! product really is an [`AccountingStrategy`].
//!
//! ```
//! use simcompute_model::registry::{ModelContext, ModelRegistry};
//! use simcompute_model::simple::SimpleModel;
//!
//! let mut registry = ModelRegistry::new();
//! registry.register("capped", |ctx: &ModelContext| Box::new(SimpleModel::from_context(ctx)));
//!
//! assert!(registry.contains("capped"));
//! assert!(registry.contains(ModelRegistry::SIMPLE));
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::RegistryError;
use crate::id_gen::{IdGenerator, NanoIdGenerator};
use crate::limits::QuantityLimits;
use crate::model::AccountingStrategy;
use crate::quantity::ResourceQuantity;
use crate::simple::SimpleModel;

// ─────────────────────────────────────────────────────────────────────────────
// SimObject
// ─────────────────────────────────────────────────────────────────────────────

/// Anything a variant constructor may produce.
///
/// Every [`AccountingStrategy`] is a `SimObject` that converts into itself.
/// Other objects report their type name and convert into nothing, which the
/// installer treats as a misconfigured variant.
pub trait SimObject: Send + 'static {
    /// Type name of the concrete object.
    fn type_name(&self) -> &'static str;

    /// Converts into an accounting strategy, if this object is one.
    fn into_accounting(self: Box<Self>) -> Option<Box<dyn AccountingStrategy>> {
        None
    }
}

impl<T: AccountingStrategy> SimObject for T {
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn into_accounting(self: Box<Self>) -> Option<Box<dyn AccountingStrategy>> {
        Some(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ModelContext
// ─────────────────────────────────────────────────────────────────────────────

/// What a constructor gets to build a new model with.
#[derive(Clone)]
pub struct ModelContext {
    /// Identity source for the model's quantities.
    pub ids: Arc<dyn IdGenerator>,
    /// Limits the model's capacity should respect.
    pub limits: QuantityLimits,
}

impl ModelContext {
    /// Creates a context.
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, limits: QuantityLimits) -> Self {
        Self { ids, limits }
    }

    /// The full-capacity quantity for these limits, with a fresh identity.
    #[must_use]
    pub fn full_quantity(&self) -> ResourceQuantity {
        ResourceQuantity::full(&self.limits, self.ids.as_ref())
    }
}

impl Default for ModelContext {
    fn default() -> Self {
        Self::new(Arc::new(NanoIdGenerator), QuantityLimits::global())
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ModelRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Shared variant constructor.
pub type ModelConstructor = Arc<dyn Fn(&ModelContext) -> Box<dyn SimObject> + Send + Sync>;

/// Registry of model variants by name.
///
/// [`ModelRegistry::new`] pre-registers the simple variant under
/// [`SIMPLE`](Self::SIMPLE) and its short alias `"simple"`.
pub struct ModelRegistry {
    constructors: HashMap<String, ModelConstructor>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("variants", &self.variant_names())
            .finish()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Name of the default variant.
    pub const SIMPLE: &'static str = "simcompute::SimpleComputationModel";

    /// Creates a registry with the built-in variants.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for name in [Self::SIMPLE, SimpleModel::VARIANT] {
            registry.register(name, |ctx: &ModelContext| {
                Box::new(SimpleModel::from_context(ctx))
            });
        }
        registry
    }

    /// Creates a registry with no variants at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers a constructor under `name`.
    ///
    /// # Panics
    ///
    /// Panics if a constructor with the same name is already registered.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&ModelContext) -> Box<dyn SimObject> + Send + Sync + 'static,
    {
        if let Err(err) = self.try_register(name, constructor) {
            panic!("{err}");
        }
    }

    /// Registers a constructor under `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateVariant`] if `name` is already registered.
    pub fn try_register<F>(
        &mut self,
        name: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&ModelContext) -> Box<dyn SimObject> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(RegistryError::DuplicateVariant(name));
        }
        self.constructors.insert(name, Arc::new(constructor));
        Ok(())
    }

    /// Builds the object registered under `name`.
    ///
    /// Returns `None` if no such variant is registered.
    #[must_use]
    pub fn create(&self, name: &str, ctx: &ModelContext) -> Option<Box<dyn SimObject>> {
        self.constructors.get(name).map(|constructor| constructor(ctx))
    }

    /// Checks if a variant is registered.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.constructors.contains_key(name.as_ref())
    }

    /// Lists registered variant names, sorted.
    #[must_use]
    pub fn variant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }
}
