//! Plugins wiring computation models into a [`Simulation`].

use std::sync::Arc;

use simcompute_system::plugin::{Plugin, PluginId};
use simcompute_system::simulation::Simulation;

use crate::config::ComputationConfig;
use crate::helper::ComputationHelper;
use crate::model::ComputationModel;
use crate::observer::StateObserver;
use crate::registry::ModelRegistry;

// ─────────────────────────────────────────────────────────────────────────────
// InstallObservers
// ─────────────────────────────────────────────────────────────────────────────

/// Observers registered on every model the simulation's helper installs.
///
/// Available as a mutable global during the build phase. Plugins that want
/// to watch state changes add themselves here.
#[derive(Default)]
pub struct InstallObservers {
    entries: Vec<(String, StateObserver)>,
}

impl InstallObservers {
    /// Adds `observer` under `name`, replacing an earlier one with that name.
    pub fn add(&mut self, name: impl Into<String>, observer: StateObserver) {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, observer));
    }

    /// Names of the collected observers.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl core::fmt::Debug for InstallObservers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InstallObservers")
            .field("names", &self.names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ComputationPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Provides computation models to a simulation.
///
/// # Lifecycle
///
/// 1. **`build()`**: validates the config, fixes the process-wide
///    [`QuantityLimits`](crate::limits::QuantityLimits), and inserts a mutable [`ModelRegistry`],
///    [`InstallObservers`] and the [`ComputationConfig`] as globals. Variant
///    plugins register constructors in the registry during their own build.
///
/// 2. **`ready()`**: moves the registry into a [`ComputationHelper`] global
///    configured from the config and, if `install_all` is set, installs a
///    model on every node.
///
/// # Panics
///
/// Panics at build time on an invalid config or when different
/// process-wide limits are already in force, and at ready time if
/// installation hits a fatal [`InstallError`](crate::error::InstallError).
#[derive(Debug, Default, Clone)]
pub struct ComputationPlugin {
    config: ComputationConfig,
}

impl ComputationPlugin {
    /// Creates the plugin from `config`.
    #[must_use]
    pub fn new(config: ComputationConfig) -> Self {
        Self { config }
    }

    /// Returns the plugin's config.
    #[must_use]
    pub fn config(&self) -> &ComputationConfig {
        &self.config
    }
}

impl Plugin for ComputationPlugin {
    fn build(&self, sim: &mut Simulation) {
        if let Err(err) = self.config.validate() {
            panic!("{err}");
        }
        if let Err(err) = self.config.install_limits() {
            panic!("{err}");
        }

        if !sim.contains_global::<ModelRegistry>() {
            sim.insert_global(ModelRegistry::new());
        }
        sim.insert_global(InstallObservers::default());
        sim.insert_global(self.config.clone());
    }

    fn ready(&self, sim: &mut Simulation) {
        let registry = sim.remove_global::<ModelRegistry>().unwrap_or_default();
        let observers = sim
            .remove_global::<InstallObservers>()
            .unwrap_or_default();

        let mut helper = ComputationHelper::new()
            .with_registry(Arc::new(registry))
            .with_limits(self.config.limits);
        helper.set_computation_model(self.config.variant.clone());
        if let Some(capacity) = self.config.capacity {
            helper = helper.with_capacity(capacity);
        }
        for (name, observer) in observers.entries {
            helper = helper.with_observer(name, observer);
        }

        if self.config.install_all {
            match helper.install_all(sim) {
                Ok(models) => {
                    tracing::info!(count = models.len(), "computation models installed");
                }
                Err(err) if err.is_fatal() => {
                    panic!("failed to install computation models: {err}");
                }
                Err(err) => tracing::warn!(%err, "computation model install incomplete"),
            }
        }

        sim.insert_global(helper);
    }

    fn cleanup(&self, sim: &mut Simulation) {
        sim.remove_global::<ComputationHelper>();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StateTracePlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Logs every state change of every model installed by the simulation's helper.
///
/// Events go to the `simcompute::state` target at `INFO` level with the
/// host node and the new quantity as fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateTracePlugin;

impl StateTracePlugin {
    /// Observer name used on each model.
    pub const OBSERVER: &'static str = "state-trace";
}

impl Plugin for StateTracePlugin {
    fn build(&self, sim: &mut Simulation) {
        let mut observers = sim
            .get_global_mut::<InstallObservers>()
            .expect("ComputationPlugin must be added before StateTracePlugin");
        observers.add(Self::OBSERVER, Arc::new(trace_state_change));
    }

    fn dependencies(&self) -> Vec<PluginId> {
        vec![PluginId::of::<ComputationPlugin>()]
    }
}

fn trace_state_change(model: &ComputationModel) {
    let state = model.get_state();
    let node = model
        .host()
        .map_or_else(|| "detached".to_owned(), |node| node.id().to_string());
    tracing::info!(
        target: "simcompute::state",
        node = %node,
        cpu = state.cpu(),
        mem = state.mem(),
        uuid = state.uuid(),
        "state changed"
    );
}
