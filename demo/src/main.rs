//! route-graph-demo: concurrent actors driving one shared route network.
//!
//! Seeds a small network, then runs four threads against it:
//! - price: keeps resetting the Kyiv–Lviv ticket price
//! - route: opens and closes a direct Kyiv–Dnipro route
//! - city: adds and removes Kharkiv
//! - path: repeatedly searches the watched path and logs each leg

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use route_graph_core::RouteGraph;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod actors;
mod config;

use config::{Cli, DemoConfig};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let config = DemoConfig::try_from(Cli::parse()).context("invalid configuration")?;
    init_logging(config.verbose);

    let graph = Arc::new(RouteGraph::new());
    actors::seed(&graph);
    info!(
        cities = graph.city_count(),
        routes = graph.route_count(),
        "network seeded"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let handles = actors::spawn_all(&graph, &stop, &config).context("failed to start actors")?;
    info!(
        tick_ms = config.tick.as_millis() as u64,
        from = %config.from,
        to = %config.to,
        "actors running"
    );

    // Without a duration the actors never stop and the joins below block
    // until the process is killed.
    if let Some(run_for) = config.run_for {
        thread::sleep(run_for);
        info!("stopping actors");
        stop.store(true, Ordering::Relaxed);
    }

    for handle in handles {
        let name = handle.thread().name().unwrap_or("actor").to_string();
        handle
            .join()
            .map_err(|_| anyhow!("actor thread '{name}' panicked"))?;
    }

    let snapshot = graph.snapshot();
    if config.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        info!(
            cities = snapshot.cities.len(),
            routes = snapshot.routes.len(),
            "final network"
        );
        for route in &snapshot.routes {
            info!("  {route}");
        }
    }

    Ok(())
}
