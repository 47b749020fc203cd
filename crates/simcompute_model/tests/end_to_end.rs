//! Installing, reserving and observing through the public API.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use simcompute_model::prelude::*;
use simcompute_system::simulation::Simulation;
use simcompute_units::{parse_cpu_size, parse_data_size};

/// A variant whose constructor builds the wrong kind of object.
struct Gauge;

impl SimObject for Gauge {
    fn type_name(&self) -> &'static str {
        "Gauge"
    }
}

/// A variant that never lets capacity grow.
struct Shrinking(ResourceQuantity);

impl AccountingStrategy for Shrinking {
    fn mutate(&mut self, quantity: ResourceQuantity) {
        if quantity.cpu() <= self.0.cpu() && quantity.mem() <= self.0.mem() {
            self.0 = quantity;
        }
    }

    fn read(&self) -> ResourceQuantity {
        self.0
    }

    fn variant(&self) -> &str {
        "shrinking"
    }
}

#[test]
fn literals_to_reservation() {
    let cpu = parse_cpu_size("500Hz").unwrap();
    let mem = parse_data_size("300b").unwrap();
    assert_eq!((cpu, mem), (500, 300));

    let mut sim = Simulation::new();
    let node = sim.create_node();
    let helper = ComputationHelper::new()
        .with_initial_state(ResourceQuantity::with_uuid(cpu, mem, 1))
        .with_id_generator(Arc::new(SequentialIdGenerator::starting_at(100)));
    let model = helper.install(&node).unwrap();

    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    model
        .observers()
        .register("count", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    model.set_state(ResourceQuantity::with_uuid(400, 200, 1));
    assert_eq!(model.get_state(), ResourceQuantity::with_uuid(400, 200, 1));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);

    let err = model
        .get_state()
        .reserve(&ResourceQuantity::new(450, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        QuantityError::InsufficientResources {
            available_cpu: 400,
            requested_cpu: 450,
            ..
        }
    ));
    assert_eq!(model.get_state(), ResourceQuantity::with_uuid(400, 200, 1));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn reserve_then_release_restores_capacity() {
    let limits = QuantityLimits::new(1000, 1000);
    let mut sim = Simulation::new();
    let node = sim.create_node();
    let model = ComputationHelper::new()
        .with_limits(limits)
        .install(&node)
        .unwrap();
    let full = model.get_state();

    let task = ResourceQuantity::new(250, 125);
    model
        .try_update(|current| current.reserve(&task))
        .unwrap();
    assert_eq!(model.get_state().cpu(), full.cpu() - 250);

    model
        .try_update(|current| current.release_within(&task, &limits))
        .unwrap();
    assert_eq!(model.get_state(), full);
}

#[test]
fn install_on_container_and_by_name() {
    let mut sim = Simulation::new();
    let nodes = sim.create_nodes(3);
    let gateway = sim.create_named_node("gateway").unwrap();
    let helper = ComputationHelper::new();

    let models = helper.install_container(&nodes).unwrap();
    assert_eq!(models.len(), 3);
    for (node, model) in nodes.iter().zip(&models) {
        assert!(Arc::ptr_eq(&ComputationModel::of(node).unwrap(), model));
        assert_eq!(model.host().unwrap(), *node);
    }

    let by_name = helper.install_by_name(sim.names(), "gateway").unwrap();
    assert!(Arc::ptr_eq(&ComputationModel::of(&gateway).unwrap(), &by_name));

    let err = helper.install_by_name(sim.names(), "nowhere").unwrap_err();
    assert!(matches!(err, InstallError::EntityNotFound(ref name) if name == "nowhere"));
    assert!(!err.is_fatal());
}

#[test]
fn install_all_is_idempotent() {
    let mut sim = Simulation::new();
    sim.create_nodes(5);
    let helper = ComputationHelper::new();

    let first = helper.install_all(&sim).unwrap();
    let second = helper.install_all(&sim).unwrap();

    assert_eq!(first.len(), 5);
    for (a, b) in first.iter().zip(&second) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert!(sim.nodes().iter().all(|node| node.aggregates().len() == 1));
}

#[test]
fn container_install_stops_at_first_failure() {
    let mut sim = Simulation::new();
    let nodes = sim.create_nodes(3);
    let helper = ComputationHelper::new();
    helper.install(nodes.get(0).unwrap()).unwrap();

    let mut broken = helper.clone();
    broken.set_computation_model("missing");
    let err = broken.install_container(&nodes).unwrap_err();

    assert!(matches!(err, InstallError::UnknownVariant(_)));
    assert!(ComputationModel::of(nodes.get(0).unwrap()).is_some());
    assert!(ComputationModel::of(nodes.get(1).unwrap()).is_none());
    assert!(ComputationModel::of(nodes.get(2).unwrap()).is_none());
}

#[test]
fn custom_variants_resolve_through_the_registry() {
    let mut registry = ModelRegistry::new();
    registry.register("shrinking", |ctx: &ModelContext| {
        Box::new(Shrinking(ctx.full_quantity()))
    });
    registry.register("gauge", |_: &ModelContext| Box::new(Gauge));
    let registry = Arc::new(registry);

    let mut sim = Simulation::new();
    let nodes = sim.create_nodes(2);

    let mut helper = ComputationHelper::new()
        .with_registry(Arc::clone(&registry))
        .with_limits(QuantityLimits::new(100, 100));
    helper.set_computation_model("shrinking");
    let model = helper.install(nodes.get(0).unwrap()).unwrap();
    assert_eq!(model.variant(), "shrinking");

    model.set_state(ResourceQuantity::new(50, 50));
    model.set_state(ResourceQuantity::new(80, 10));
    assert_eq!((model.get_state().cpu(), model.get_state().mem()), (50, 50));

    helper.set_computation_model("gauge");
    let err = helper.install(nodes.get(1).unwrap()).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("Gauge"));
}

#[test]
fn observers_read_committed_state() {
    let mut sim = Simulation::new();
    let node = sim.create_node();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let helper = ComputationHelper::new().with_observer(
        "log",
        Arc::new(move |model: &ComputationModel| sink.lock().push(model.get_state().cpu())),
    );
    let model = helper.install(&node).unwrap();

    for cpu in [10, 20, 30] {
        model.set_state(ResourceQuantity::new(cpu, 0));
    }
    assert_eq!(*log.lock(), vec![10, 20, 30]);
}

#[test]
fn quantity_text_and_record_formats() {
    let q = ResourceQuantity::with_uuid(500, 300, 42);
    assert_eq!(q.to_string(), "500:300:42");
    assert_eq!("500:300:42".parse::<ResourceQuantity>().unwrap(), q);
    assert!("500;300".parse::<ResourceQuantity>().is_err());

    let record: ResourceQuantity =
        serde_json::from_str(r#"{ "cpu": 500, "mem": 300, "uuid": 42 }"#).unwrap();
    assert_eq!(record, q);
    assert!(serde_json::from_str::<ResourceQuantity>(r#"{ "cpu": 500, "mem": 300 }"#).is_err());
    assert!(
        serde_json::from_str::<ResourceQuantity>(r#"{ "cpu": -1, "mem": 300, "uuid": 1 }"#)
            .is_err()
    );
}

#[test]
fn plugin_configured_from_json() {
    let config = ComputationConfig::from_json(
        r#"{ "capacity": { "cpu": "500Hz", "mem": "300b" }, "install_all": true }"#,
    )
    .unwrap();

    let mut sim = Simulation::new();
    let nodes = sim.create_nodes(2);
    sim.add_plugins(ComputationPlugin::new(config));
    sim.add_plugins(StateTracePlugin);
    sim.finish();

    let states: Vec<_> = nodes
        .iter()
        .map(|node| ComputationModel::of(node).unwrap().get_state())
        .collect();
    assert!(states.iter().all(|s| (s.cpu(), s.mem()) == (500, 300)));
    assert_ne!(states[0].uuid(), states[1].uuid());
}
