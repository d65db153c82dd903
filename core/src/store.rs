use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::graph::{NetworkSnapshot, Price, Route, RouteTable};
use crate::traversal::{self, Path};

/// Thread-safe route network.
///
/// One reader-writer lock guards the whole table. Every mutation takes it
/// exclusively for exactly one acquisition, so both directions of a route
/// (and a city's cascade of removed routes) change together as seen by any
/// reader. Path queries and inspection helpers take it shared for their full
/// duration.
///
/// Mutations naming unknown cities or routes do nothing; they never error.
/// Share between threads with `Arc<RouteGraph>`.
#[derive(Debug, Default)]
pub struct RouteGraph {
    table: RwLock<RouteTable>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the table under one shared acquisition, for callers
    /// that need several reads to agree with each other.
    pub fn read<R, F: FnOnce(&RouteTable) -> R>(&self, f: F) -> R {
        let table = self.table.read();
        f(&*table)
    }

    pub fn into_inner(self) -> RouteTable {
        self.table.into_inner()
    }

    pub fn add_city(&self, name: &str) {
        let inserted = self.table.write().add_city(name);
        debug!(city = name, inserted, "city added");
    }

    pub fn remove_city(&self, name: &str) {
        let mut table = self.table.write();
        let routes_before = table.route_count();
        if table.remove_city(name) {
            let routes_removed = routes_before - table.route_count();
            drop(table);
            debug!(city = name, routes_removed, "city removed");
        } else {
            trace!(city = name, "remove_city: unknown city ignored");
        }
    }

    pub fn add_route(&self, from: &str, to: &str, price: Price) {
        if self.table.write().add_route(from, to, price) {
            debug!(from, to, price, "route added");
        } else {
            trace!(from, to, "add_route: unknown endpoint ignored");
        }
    }

    pub fn remove_route(&self, from: &str, to: &str) {
        if self.table.write().remove_route(from, to) {
            debug!(from, to, "route removed");
        } else {
            trace!(from, to, "remove_route: no such route");
        }
    }

    pub fn change_ticket_price(&self, from: &str, to: &str, price: Price) {
        if self.table.write().change_ticket_price(from, to, price) {
            debug!(from, to, price, "ticket price changed");
        } else {
            trace!(from, to, "change_ticket_price: no such route");
        }
    }

    /// Fewest-hops path from `from` to `to`; see [`traversal::find_path`].
    pub fn find_path(&self, from: &str, to: &str) -> Option<Path> {
        self.search(from, to, u32::MAX)
    }

    /// Path search bounded to `max_hops` routes.
    pub fn find_path_within(&self, from: &str, to: &str, max_hops: u32) -> Option<Path> {
        self.search(from, to, max_hops)
    }

    fn search(&self, from: &str, to: &str, max_hops: u32) -> Option<Path> {
        let result = {
            let table = self.table.read();
            traversal::search(&table, from, to, max_hops)
        };
        trace!(
            from,
            to,
            found = result.path.is_some(),
            hops = result.path.as_ref().map_or(0, Path::hops),
            expanded = result.expanded,
            "path query"
        );
        result.path
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.table.read().contains_city(name)
    }

    pub fn city_count(&self) -> usize {
        self.table.read().city_count()
    }

    pub fn cities(&self) -> Vec<String> {
        self.table.read().cities()
    }

    /// Number of directed route entries.
    pub fn route_count(&self) -> usize {
        self.table.read().route_count()
    }

    pub fn route(&self, from: &str, to: &str) -> Option<Route> {
        self.table.read().route(from, to)
    }

    pub fn routes_from(&self, city: &str) -> Vec<Route> {
        self.table.read().routes_from(city)
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        self.table.read().snapshot()
    }
}

impl From<RouteTable> for RouteGraph {
    fn from(table: RouteTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}
