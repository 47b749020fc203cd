//! Subscriber installation across simulations in one process.

use simcompute_core_plugins::{TracingConfig, TracingFormat, TracingPlugin};
use simcompute_system::simulation::Simulation;
use tracing::Level;

/// A second simulation in the same process keeps the first subscriber.
#[test]
fn second_simulation_reuses_subscriber() {
    for format in [TracingFormat::Compact, TracingFormat::Json] {
        let mut sim = Simulation::new();
        sim.create_nodes(2);
        sim.add_plugins(TracingPlugin::new().with_format(format));
        sim.finish();

        tracing::info!(target: "simcompute::test", nodes = sim.nodes().len(), "simulation built");
        assert_eq!(sim.get_global::<TracingConfig>().unwrap().format, format);
        sim.cleanup();
    }
}

/// A filter that does not parse falls back to the configured level.
#[test]
fn invalid_filter_does_not_abort_startup() {
    let mut sim = Simulation::new();
    sim.add_plugins(
        TracingPlugin::new()
            .with_level(Level::WARN)
            .with_env_filter("simcompute=[not a level"),
    );
    sim.finish();

    assert!(sim.is_built());
    assert_eq!(
        sim.get_global::<TracingConfig>().unwrap().filter,
        "simcompute=[not a level"
    );
}
