//! Concurrent access tests for node aggregation.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use simcompute_system::node::{Node, NodeId};

#[derive(Debug)]
struct Probe {
    serial: usize,
}

/// Racing creators on one node aggregate exactly one object.
#[test]
fn concurrent_get_or_insert_creates_once() {
    let node = Node::new(NodeId::new(0));
    let created = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let node = node.clone();
            let created = Arc::clone(&created);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let (probe, _) = node
                    .aggregates()
                    .get_or_try_insert_with(|| {
                        let serial = created.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ()>(Arc::new(Probe { serial }))
                    })
                    .unwrap();
                probe.serial
            })
        })
        .collect();

    let serials: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(serials.iter().all(|&s| s == 0));
    assert_eq!(node.aggregates().len(), 1);
}

/// Readers on different nodes never contend.
#[test]
fn lookups_on_many_nodes_from_many_threads() {
    let nodes: Vec<Node> = (0..4)
        .map(|i| {
            let node = Node::new(NodeId::new(i));
            node.aggregates()
                .insert(Arc::new(Probe { serial: i as usize }))
                .unwrap();
            node
        })
        .collect();
    let nodes = Arc::new(nodes);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let nodes = Arc::clone(&nodes);
            thread::spawn(move || {
                for _ in 0..100 {
                    for (i, node) in nodes.iter().enumerate() {
                        assert_eq!(node.aggregates().get::<Probe>().unwrap().serial, i);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}
