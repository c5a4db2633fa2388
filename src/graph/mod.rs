//! Graph utilities: Kruskal MST and unique-path enumeration.

pub mod mst;
pub mod paths;

pub use mst::{SpanningTree, kruskal, kruskal_edges};
pub use paths::{PathCheck, PathKey, find_unique_paths, graph_from_predicate};
