use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

/// Ticket price carried by a route.
pub type Price = i64;

/// Compact handle for a fare record. Both directions of a connection hold
/// the same handle, so the price lives in exactly one place.
type FareId = u64;

/// A city in the network. Identified by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub name: String,
}

/// A directed, priced leg between two cities.
///
/// Returned by value: the table never hands out references into its own
/// storage, so a `Route` stays valid after the lock that produced it is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub price: Price,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} @ {}", self.from, self.to, self.price)
    }
}

/// Borrowed view of one adjacency slot, used by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Leg<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub price: Price,
}

impl Leg<'_> {
    pub fn to_route(self) -> Route {
        Route {
            from: self.from.to_string(),
            to: self.to.to_string(),
            price: self.price,
        }
    }
}

/// Point-in-time copy of the whole network, sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSnapshot {
    pub cities: Vec<String>,
    pub routes: Vec<Route>,
}

/// Unsynchronized route network: node table + adjacency table + fares.
///
/// Every connection is reachable from both endpoints' adjacency lists, and
/// both slots point at the same fare record. Mutations keep the two slots
/// in lockstep; `RouteGraph` wraps this in the lock that makes each
/// mutation atomic to readers.
///
/// Neighbor lists are ordered by name so traversal order is deterministic.
#[derive(Debug, Default)]
pub struct RouteTable {
    cities: HashMap<String, City>,
    adjacency: HashMap<String, BTreeMap<String, FareId>>,
    fares: HashMap<FareId, Price>,
    next_fare: FareId,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known network size.
    pub fn with_capacity(city_count: usize) -> Self {
        Self {
            cities: HashMap::with_capacity(city_count),
            adjacency: HashMap::with_capacity(city_count),
            fares: HashMap::new(),
            next_fare: 0,
        }
    }

    // --- Node table ---

    /// Insert or replace a city. Existing routes of that city are kept.
    /// Returns true if the city was not present before.
    pub fn add_city(&mut self, name: &str) -> bool {
        self.cities
            .insert(name.to_string(), City { name: name.to_string() })
            .is_none()
    }

    /// Remove a city and every route that starts or ends at it.
    /// Returns true if the city was present.
    pub fn remove_city(&mut self, name: &str) -> bool {
        let removed = self.cities.remove(name).is_some();

        if let Some(outgoing) = self.adjacency.remove(name) {
            for fare in outgoing.into_values() {
                self.fares.remove(&fare);
            }
        }
        // Sweep every list, not only the neighbors recorded above: no slot
        // may keep pointing at a removed city.
        for routes in self.adjacency.values_mut() {
            if let Some(fare) = routes.remove(name) {
                self.fares.remove(&fare);
            }
        }
        self.adjacency.retain(|_, routes| !routes.is_empty());

        removed
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.cities.contains_key(name)
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// City names in lexicographic order.
    pub fn cities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cities.keys().cloned().collect();
        names.sort();
        names
    }

    // --- Adjacency table ---

    /// Create or replace the connection between `from` and `to` in both
    /// directions. Returns false, changing nothing, if either city is unknown.
    pub fn add_route(&mut self, from: &str, to: &str, price: Price) -> bool {
        if !self.contains_city(from) || !self.contains_city(to) {
            return false;
        }

        let fare = match self.fare_id(from, to) {
            Some(fare) => fare,
            None => {
                let fare = self.next_fare;
                self.next_fare += 1;
                fare
            }
        };
        self.fares.insert(fare, price);

        self.adjacency
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), fare);
        self.adjacency
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string(), fare);
        true
    }

    /// Remove the `from -> to` and `to -> from` slots, each independently.
    /// Returns true if at least one slot existed.
    pub fn remove_route(&mut self, from: &str, to: &str) -> bool {
        let forward = self.remove_slot(from, to);
        let backward = self.remove_slot(to, from);

        for fare in [forward, backward].into_iter().flatten() {
            self.fares.remove(&fare);
        }
        forward.is_some() || backward.is_some()
    }

    /// Update the price of an existing connection. Both directions share
    /// one fare record, so they always change together.
    /// Returns false if no connection exists between the two cities.
    pub fn change_ticket_price(&mut self, from: &str, to: &str, price: Price) -> bool {
        match self.fare_id(from, to) {
            Some(fare) => {
                self.fares.insert(fare, price);
                true
            }
            None => false,
        }
    }

    /// The directed route `from -> to`, if present.
    pub fn route(&self, from: &str, to: &str) -> Option<Route> {
        let (from_key, routes) = self.adjacency.get_key_value(from)?;
        let (to_key, fare) = routes.get_key_value(to)?;
        let price = *self.fares.get(fare)?;
        Some(Route {
            from: from_key.clone(),
            to: to_key.clone(),
            price,
        })
    }

    /// Outgoing routes of `city`, ordered by destination name.
    pub fn routes_from(&self, city: &str) -> Vec<Route> {
        self.legs(city).map(Leg::to_route).collect()
    }

    /// Number of directed adjacency entries (two per connection between
    /// distinct cities).
    pub fn route_count(&self) -> usize {
        self.adjacency.values().map(|routes| routes.len()).sum()
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        let cities = self.cities();
        let routes = cities
            .iter()
            .flat_map(|city| self.legs(city).map(Leg::to_route))
            .collect();
        NetworkSnapshot { cities, routes }
    }

    /// Borrowed outgoing legs of `city`. Empty if the city has no routes.
    pub(crate) fn legs<'a>(&'a self, city: &str) -> impl Iterator<Item = Leg<'a>> + 'a {
        self.adjacency
            .get_key_value(city)
            .into_iter()
            .flat_map(move |(from, routes)| {
                routes.iter().filter_map(move |(to, fare)| {
                    self.fares.get(fare).map(|&price| Leg {
                        from: from.as_str(),
                        to: to.as_str(),
                        price,
                    })
                })
            })
    }

    pub(crate) fn has_routes(&self, city: &str) -> bool {
        self.adjacency
            .get(city)
            .is_some_and(|routes| !routes.is_empty())
    }

    fn fare_id(&self, from: &str, to: &str) -> Option<FareId> {
        let forward = self.adjacency.get(from).and_then(|r| r.get(to));
        let backward = self.adjacency.get(to).and_then(|r| r.get(from));
        forward.or(backward).copied()
    }

    fn remove_slot(&mut self, from: &str, to: &str) -> Option<FareId> {
        let routes = self.adjacency.get_mut(from)?;
        let fare = routes.remove(to);
        if routes.is_empty() {
            self.adjacency.remove(from);
        }
        fare
    }
}
