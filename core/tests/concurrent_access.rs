//! Concurrent access integration tests.
//!
//! Writers and readers hammer one shared `RouteGraph` from plain threads.
//! Readers check invariants that must hold at every point a reader can
//! observe: both directions of a route agree, no route references a removed
//! city, and every returned path is contiguous.

use std::sync::{Arc, Barrier};
use std::thread;

use route_graph_core::{Path, RouteGraph, RouteTable};

const ITERATIONS: usize = 500;

fn scenario() -> RouteGraph {
    let g = RouteGraph::new();
    for city in ["Kyiv", "Lviv", "Odesa", "Dnipro"] {
        g.add_city(city);
    }
    g.add_route("Kyiv", "Lviv", 200);
    g.add_route("Kyiv", "Odesa", 150);
    g.add_route("Lviv", "Dnipro", 250);
    g
}

fn assert_contiguous(path: &Path, from: &str, to: &str) {
    let routes = path.routes();
    assert!(!routes.is_empty(), "returned path must not be empty");
    assert_eq!(routes[0].from, from);
    assert_eq!(routes[routes.len() - 1].to, to);
    for pair in routes.windows(2) {
        assert_eq!(pair[0].to, pair[1].from, "path broken at {}", pair[0]);
    }
}

/// Every directed entry has a partner with the same price, and both
/// endpoints are known cities.
fn assert_consistent(table: &RouteTable) {
    let snapshot = table.snapshot();
    for route in &snapshot.routes {
        assert!(table.contains_city(&route.from), "dangling source {}", route.from);
        assert!(table.contains_city(&route.to), "dangling target {}", route.to);
        let back = table
            .route(&route.to, &route.from)
            .unwrap_or_else(|| panic!("missing reverse of {route}"));
        assert_eq!(back.price, route.price, "diverged price on {route}");
    }
}

/// Test that many path queries can run side by side and agree.
#[test]
fn test_concurrent_readers() {
    let graph = Arc::new(scenario());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    let path = graph.find_path("Kyiv", "Dnipro").expect("path exists");
                    assert_eq!(path.to_string(), "Kyiv -> Lviv -> Dnipro");
                    assert_eq!(path.total_price(), 450);
                }
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        handle
            .join()
            .unwrap_or_else(|_| panic!("reader thread {i} panicked"));
    }
}

/// Test that a route toggled by one writer is always seen whole by readers.
#[test]
fn test_route_toggle_is_atomic_to_readers() {
    let graph = Arc::new(scenario());
    let barrier = Arc::new(Barrier::new(5));

    let writer = {
        let graph = Arc::clone(&graph);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS {
                graph.add_route("Kyiv", "Dnipro", 220);
                graph.remove_route("Kyiv", "Dnipro");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    let path = graph.find_path("Kyiv", "Dnipro").expect("always connected");
                    assert_contiguous(&path, "Kyiv", "Dnipro");
                    assert!(path.hops() == 1 || path.hops() == 2);

                    graph.read(|t| {
                        let forward = t.route("Kyiv", "Dnipro");
                        let backward = t.route("Dnipro", "Kyiv");
                        assert_eq!(forward.is_some(), backward.is_some());
                    });
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert!(graph.route("Kyiv", "Dnipro").is_none());
    assert_eq!(graph.route_count(), 6);
}

/// Test that competing price writers never leave the two directions apart.
#[test]
fn test_competing_price_updates_stay_symmetric() {
    let graph = Arc::new(scenario());
    let barrier = Arc::new(Barrier::new(4));

    let writers: Vec<_> = [(300, "Kyiv", "Lviv"), (310, "Lviv", "Kyiv")]
        .into_iter()
        .map(|(price, from, to)| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITERATIONS as i64 {
                    graph.change_ticket_price(from, to, price + i % 3);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    graph.read(assert_consistent);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("thread panicked");
    }

    let forward = graph.route("Kyiv", "Lviv").expect("route kept");
    let backward = graph.route("Lviv", "Kyiv").expect("route kept");
    assert_eq!(forward.price, backward.price);
}

/// Test that city removal never leaves dangling routes visible to readers.
#[test]
fn test_city_churn_never_dangles() {
    let graph = Arc::new(scenario());
    let barrier = Arc::new(Barrier::new(4));

    let writer = {
        let graph = Arc::clone(&graph);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS {
                graph.add_city("Kharkiv");
                graph.add_route("Kharkiv", "Dnipro", 120);
                graph.add_route("Kharkiv", "Kyiv", 180);
                graph.remove_city("Kharkiv");
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    graph.read(assert_consistent);
                    if let Some(path) = graph.find_path("Odesa", "Dnipro") {
                        assert_contiguous(&path, "Odesa", "Dnipro");
                    }
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert!(!graph.contains_city("Kharkiv"));
    assert_eq!(graph.snapshot(), scenario().snapshot());
}
