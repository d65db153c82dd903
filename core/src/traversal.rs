use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::graph::{Leg, Price, Route, RouteTable};

/// A connecting sequence of routes. Never empty: the first route starts at
/// the query's origin, the last one ends at its destination, and each
/// route's `to` is the next route's `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path {
    routes: Vec<Route>,
}

impl Path {
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    pub fn hops(&self) -> usize {
        self.routes.len()
    }

    /// Sum of all ticket prices along the path.
    pub fn total_price(&self) -> Price {
        self.routes.iter().map(|r| r.price).sum()
    }

    pub fn origin(&self) -> &str {
        &self.routes[0].from
    }

    pub fn destination(&self) -> &str {
        &self.routes[self.routes.len() - 1].to
    }
}

impl fmt::Display for Path {
    /// `Kyiv -> Lviv -> Dnipro`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.origin())?;
        for route in &self.routes {
            write!(f, " -> {}", route.to)?;
        }
        Ok(())
    }
}

impl IntoIterator for Path {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// Outcome of one search, with the bookkeeping the store logs.
#[derive(Debug)]
pub(crate) struct PathSearch {
    pub path: Option<Path>,
    /// Cities whose outgoing routes were expanded.
    pub expanded: usize,
}

/// A partial path in the BFS queue: its last leg plus the index of the
/// candidate it extends. Candidates are never modified once pushed, so
/// siblings sharing a prefix share it read-only.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    leg: Leg<'a>,
    parent: Option<usize>,
    hops: u32,
}

/// Breadth-first path search from `from` to `to`.
///
/// Explores partial paths in FIFO order and returns the first one ending at
/// `to`, i.e. one with the fewest hops (not the cheapest). Ties go to the
/// candidate enqueued first; neighbors are enqueued in name order.
///
/// Returns None if `from` has no routes or `to` is unreachable.
pub fn find_path(table: &RouteTable, from: &str, to: &str) -> Option<Path> {
    search(table, from, to, u32::MAX).path
}

/// Like [`find_path`], but never considers paths longer than `max_hops`
/// routes. `max_hops == 0` always returns None.
pub fn find_path_within(table: &RouteTable, from: &str, to: &str, max_hops: u32) -> Option<Path> {
    search(table, from, to, max_hops).path
}

pub(crate) fn search(table: &RouteTable, from: &str, to: &str, max_hops: u32) -> PathSearch {
    let mut expanded = 0;

    if max_hops == 0 || !table.has_routes(from) {
        return PathSearch { path: None, expanded };
    }

    let mut arena: Vec<Candidate<'_>> = table
        .legs(from)
        .map(|leg| Candidate {
            leg,
            parent: None,
            hops: 1,
        })
        .collect();
    let mut queue: VecDeque<usize> = (0..arena.len()).collect();

    // Visited is marked on expansion, not on enqueue: a city may sit at the
    // end of several queued candidates, and only the first dequeued one
    // gets expanded.
    let mut visited: HashSet<&str> = HashSet::new();

    while let Some(idx) = queue.pop_front() {
        let Candidate { leg, hops, .. } = arena[idx];
        let last = leg.to;

        if last == to {
            return PathSearch {
                path: Some(reconstruct_path(&arena, idx)),
                expanded,
            };
        }

        if !visited.insert(last) {
            continue;
        }
        expanded += 1;

        if hops >= max_hops {
            continue;
        }

        for next in table.legs(last) {
            arena.push(Candidate {
                leg: next,
                parent: Some(idx),
                hops: hops + 1,
            });
            queue.push_back(arena.len() - 1);
        }
    }

    PathSearch {
        path: None,
        expanded,
    }
}

/// Walk parent links from `idx` back to a seed candidate, copying each leg
/// into a freshly owned route.
fn reconstruct_path(arena: &[Candidate<'_>], idx: usize) -> Path {
    let mut routes = Vec::new();
    let mut current = Some(idx);

    while let Some(i) = current {
        let candidate = &arena[i];
        routes.push(candidate.leg.to_route());
        current = candidate.parent;
    }

    routes.reverse();
    Path { routes }
}
