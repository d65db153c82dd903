use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use route_graph_core::RouteGraph;
use tracing::info;

use crate::config::DemoConfig;

/// Longest single sleep, so a stop request is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Seed the starting network: four cities, three connections.
pub fn seed(graph: &RouteGraph) {
    for city in ["Kyiv", "Lviv", "Odesa", "Dnipro"] {
        graph.add_city(city);
    }
    graph.add_route("Kyiv", "Lviv", 200);
    graph.add_route("Kyiv", "Odesa", 150);
    graph.add_route("Lviv", "Dnipro", 250);
}

/// Sleep for `ticks` periods, waking early if `stop` is set.
/// Returns false once the actor should exit.
fn pause(stop: &AtomicBool, tick: Duration, ticks: u32) -> bool {
    let deadline = Instant::now() + tick * ticks;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

/// Keeps setting the Kyiv–Lviv ticket price.
fn price_actor(graph: &RouteGraph, stop: &AtomicBool, tick: Duration) {
    loop {
        info!(actor = "price", "changing Kyiv–Lviv ticket price to 300");
        graph.change_ticket_price("Kyiv", "Lviv", 300);
        if !pause(stop, tick, 1) {
            break;
        }
    }
}

/// Opens and closes a direct Kyiv–Dnipro connection.
fn route_actor(graph: &RouteGraph, stop: &AtomicBool, tick: Duration) {
    loop {
        info!(actor = "route", "adding route Kyiv–Dnipro");
        graph.add_route("Kyiv", "Dnipro", 220);
        if !pause(stop, tick, 2) {
            break;
        }
        info!(actor = "route", "removing route Kyiv–Dnipro");
        graph.remove_route("Kyiv", "Dnipro");
        if !pause(stop, tick, 2) {
            break;
        }
    }
}

/// Adds and removes Kharkiv.
fn city_actor(graph: &RouteGraph, stop: &AtomicBool, tick: Duration) {
    loop {
        info!(actor = "city", "adding city Kharkiv");
        graph.add_city("Kharkiv");
        if !pause(stop, tick, 3) {
            break;
        }
        info!(actor = "city", "removing city Kharkiv");
        graph.remove_city("Kharkiv");
        if !pause(stop, tick, 3) {
            break;
        }
    }
}

/// Repeatedly runs the watched path query and reports each leg.
fn path_actor(graph: &RouteGraph, stop: &AtomicBool, tick: Duration, from: &str, to: &str) {
    loop {
        info!(actor = "path", from, to, "searching for a path");
        match graph.find_path(from, to) {
            Some(path) => {
                info!(
                    actor = "path",
                    hops = path.hops(),
                    total_price = path.total_price(),
                    "path found: {path}"
                );
                for route in &path {
                    info!(actor = "path", "  {} -> {} for {}", route.from, route.to, route.price);
                }
            }
            None => info!(actor = "path", "no path found"),
        }
        if !pause(stop, tick, 1) {
            break;
        }
    }
}

fn spawn_actor<F>(
    name: &str,
    graph: &Arc<RouteGraph>,
    stop: &Arc<AtomicBool>,
    body: F,
) -> io::Result<JoinHandle<()>>
where
    F: FnOnce(&RouteGraph, &AtomicBool) + Send + 'static,
{
    let graph = Arc::clone(graph);
    let stop = Arc::clone(stop);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || body(&graph, &stop))
}

/// Start all four actors on named threads sharing `graph`.
pub fn spawn_all(
    graph: &Arc<RouteGraph>,
    stop: &Arc<AtomicBool>,
    config: &DemoConfig,
) -> io::Result<Vec<JoinHandle<()>>> {
    let tick = config.tick;
    let (from, to) = (config.from.clone(), config.to.clone());

    Ok(vec![
        spawn_actor("price", graph, stop, move |g, s| price_actor(g, s, tick))?,
        spawn_actor("route", graph, stop, move |g, s| route_actor(g, s, tick))?,
        spawn_actor("city", graph, stop, move |g, s| city_actor(g, s, tick))?,
        spawn_actor("path", graph, stop, move |g, s| {
            path_actor(g, s, tick, &from, &to)
        })?,
    ])
}
