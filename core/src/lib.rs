//! route-graph-core: concurrent in-memory route network.
//!
//! Cities connected by priced, bidirectional routes, held in one table
//! behind a single reader-writer lock. Mutations take the lock exclusively;
//! breadth-first path queries take it shared for their whole traversal.
//!
//! Unknown cities and routes are absorbed silently: mutations become no-ops
//! and queries return `None`. There is no error type.

mod graph;
mod store;
mod traversal;

pub use graph::{City, NetworkSnapshot, Price, Route, RouteTable};
pub use store::RouteGraph;
pub use traversal::{find_path, find_path_within, Path};
