//! Installing computation models onto nodes.
//!
//! [`ComputationHelper`] makes sure every node it is pointed at carries exactly
//! one [`ComputationModel`]. Installing twice on the same node returns the
//! model that is already there.
//!
//! ```
//! use std::sync::Arc;
//! use simcompute_model::helper::ComputationHelper;
//! use simcompute_system::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! let nodes = sim.create_nodes(3);
//!
//! let helper = ComputationHelper::new();
//! helper.install_container(&nodes).unwrap();
//!
//! let first = helper.install(nodes.get(0).unwrap()).unwrap();
//! let again = helper.install(nodes.get(0).unwrap()).unwrap();
//! assert!(Arc::ptr_eq(&first, &again));
//! ```

use core::fmt;
use std::sync::Arc;

use simcompute_system::names::Names;
use simcompute_system::node::{Node, NodeContainer};
use simcompute_system::simulation::Simulation;

use crate::config::CapacityConfig;
use crate::error::InstallError;
use crate::id_gen::IdGenerator;
use crate::limits::QuantityLimits;
use crate::model::ComputationModel;
use crate::observer::StateObserver;
use crate::quantity::ResourceQuantity;
use crate::registry::{ModelContext, ModelRegistry};

/// Builds and attaches computation models.
///
/// Holds the selected variant name, the registry it resolves against, the
/// identity generator and limits handed to constructors, an optional initial
/// quantity for new models, and observers to register on every new model.
#[derive(Clone)]
pub struct ComputationHelper {
    registry: Arc<ModelRegistry>,
    variant: String,
    ctx: ModelContext,
    initial: Option<ResourceQuantity>,
    capacity: Option<CapacityConfig>,
    observers: Vec<(String, StateObserver)>,
}

impl Default for ComputationHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputationHelper {
    /// Creates a helper that installs the simple variant from a default registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ModelRegistry::new()),
            variant: ModelRegistry::SIMPLE.to_owned(),
            ctx: ModelContext::default(),
            initial: None,
            capacity: None,
            observers: Vec::new(),
        }
    }

    /// Resolves variants against `registry`.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Draws quantity identities from `ids`.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ctx.ids = ids;
        self
    }

    /// Hands `limits` to constructors.
    #[must_use]
    pub fn with_limits(mut self, limits: QuantityLimits) -> Self {
        self.ctx.limits = limits;
        self
    }

    /// Seeds every new model with `initial` instead of its constructor's default.
    ///
    /// Seeding happens before the model is published and fires no notification.
    #[must_use]
    pub fn with_initial_state(mut self, initial: ResourceQuantity) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Seeds every new model with `capacity` and a fresh identity.
    ///
    /// Ignored when an initial state is set.
    #[must_use]
    pub fn with_capacity(mut self, capacity: CapacityConfig) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Registers `observer` under `name` on every new model.
    ///
    /// A later observer with the same name replaces the earlier one.
    #[must_use]
    pub fn with_observer(mut self, name: impl Into<String>, observer: StateObserver) -> Self {
        let name = name.into();
        self.observers.retain(|(existing, _)| *existing != name);
        self.observers.push((name, observer));
        self
    }

    /// Selects the variant built by later installs.
    ///
    /// Models already installed are unaffected. An unregistered name is only
    /// reported by the next install.
    pub fn set_computation_model(&mut self, variant: impl Into<String>) {
        self.variant = variant.into();
        tracing::debug!(variant = %self.variant, "computation model variant selected");
    }

    /// Returns the selected variant name.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Returns the registry variants are resolved against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Ensures `node` carries a model and returns it.
    ///
    /// If the node already has one it is returned untouched. Otherwise a model
    /// of the selected variant is built, attached to the node and aggregated
    /// onto it. Lookup and insertion are atomic per node.
    ///
    /// # Errors
    ///
    /// - [`InstallError::UnknownVariant`] if the selected variant is not registered
    /// - [`InstallError::InvalidFactoryProduct`] if its constructor built
    ///   something that is not an accounting strategy
    /// - [`InstallError::Host`] or [`InstallError::Observer`] if wiring the new
    ///   model fails
    ///
    /// Nothing is aggregated when an error is returned.
    pub fn install(&self, node: &Node) -> Result<Arc<ComputationModel>, InstallError> {
        let (model, created) = node
            .aggregates()
            .get_or_try_insert_with(|| self.build_model(node).map(Arc::new))?;

        if created {
            tracing::debug!(node = %node.id(), variant = %self.variant, "computation model installed");
        } else {
            tracing::trace!(node = %node.id(), "computation model already present");
        }
        Ok(model)
    }

    /// Installs on every node of `nodes`, in order.
    ///
    /// Stops at the first error. Nodes before it keep their new models.
    ///
    /// # Errors
    ///
    /// The first error from [`install`](Self::install).
    pub fn install_container(
        &self,
        nodes: &NodeContainer,
    ) -> Result<Vec<Arc<ComputationModel>>, InstallError> {
        nodes.iter().map(|node| self.install(node)).collect()
    }

    /// Installs on the node registered under `name`.
    ///
    /// # Errors
    ///
    /// [`InstallError::EntityNotFound`] if `name` does not resolve to a live
    /// node, otherwise as [`install`](Self::install).
    pub fn install_by_name(
        &self,
        names: &Names,
        name: &str,
    ) -> Result<Arc<ComputationModel>, InstallError> {
        let node = names
            .find(name)
            .ok_or_else(|| InstallError::EntityNotFound(name.to_owned()))?;
        self.install(&node)
    }

    /// Installs on every node of `sim`.
    ///
    /// # Errors
    ///
    /// As [`install_container`](Self::install_container).
    pub fn install_all(
        &self,
        sim: &Simulation,
    ) -> Result<Vec<Arc<ComputationModel>>, InstallError> {
        self.install_container(sim.nodes())
    }

    fn build_model(&self, node: &Node) -> Result<ComputationModel, InstallError> {
        let product = self
            .registry
            .create(&self.variant, &self.ctx)
            .ok_or_else(|| InstallError::UnknownVariant(self.variant.clone()))?;

        let type_name = product.type_name();
        let mut strategy =
            product
                .into_accounting()
                .ok_or_else(|| InstallError::InvalidFactoryProduct {
                    variant: self.variant.clone(),
                    type_name,
                })?;

        match (self.initial, self.capacity) {
            (Some(initial), _) => strategy.mutate(initial),
            (None, Some(capacity)) => strategy.mutate(capacity.to_quantity(self.ctx.ids.as_ref())),
            (None, None) => {}
        }

        let model = ComputationModel::from_boxed(strategy);
        model.attach_host(node)?;
        for (name, observer) in &self.observers {
            model
                .observers()
                .register_shared(name.clone(), Arc::clone(observer))?;
        }
        Ok(model)
    }
}

impl fmt::Debug for ComputationHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputationHelper")
            .field("variant", &self.variant)
            .field("registry", &self.registry)
            .field("limits", &self.ctx.limits)
            .field("initial", &self.initial)
            .field("capacity", &self.capacity)
            .field(
                "observers",
                &self.observers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
