//! **waygraph-core** — Agent navigation toolkit (core types).
//!
//! This crate provides the read-only waypoint graph that every search in the
//! *waygraph* ecosystem runs over: float positions, node identities,
//! directed weighted edges, and the [`GraphBuilder`] that validates and
//! freezes them into a compact [`Graph`] arena.

pub mod geom;
pub mod graph;

pub use geom::Point;
pub use graph::{Edge, Graph, GraphBuilder, GraphError, NodeId};
