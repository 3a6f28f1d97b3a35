//! Ready-made heuristics.
//!
//! The geometric ones are admissible only when every edge costs at least
//! the matching distance between its endpoints (true for edges added with
//! [`GraphBuilder::connect`](waygraph_core::GraphBuilder::connect)).

use waygraph_core::{Graph, NodeId, Point};

use crate::traits::Heuristic;

/// Always zero. A* with this heuristic is Dijkstra.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Zero;

impl Heuristic for Zero {
    #[inline]
    fn estimate(&self, _graph: &Graph, _node: NodeId) -> f64 {
        0.0
    }
}

/// Straight-line distance to a goal position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Euclidean {
    pub goal: Point,
}

impl Euclidean {
    /// Aim at the position of node `goal`. `None` if it is not in `graph`.
    pub fn towards(graph: &Graph, goal: NodeId) -> Option<Self> {
        graph.position(goal).map(|goal| Self { goal })
    }
}

impl Heuristic for Euclidean {
    #[inline]
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64 {
        graph.position(node).map_or(0.0, |p| p.distance(self.goal))
    }
}

/// Manhattan distance to a goal position; admissible on axis-aligned
/// waypoint layouts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Manhattan {
    pub goal: Point,
}

impl Manhattan {
    /// Aim at the position of node `goal`. `None` if it is not in `graph`.
    pub fn towards(graph: &Graph, goal: NodeId) -> Option<Self> {
        graph.position(goal).map(|goal| Self { goal })
    }
}

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64 {
        graph.position(node).map_or(0.0, |p| p.manhattan(self.goal))
    }
}

/// Adapts a closure into a [`Heuristic`].
#[derive(Copy, Clone, Debug)]
pub struct HeuristicFn<F>(pub F);

impl<F: Fn(&Graph, NodeId) -> f64> Heuristic for HeuristicFn<F> {
    #[inline]
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64 {
        (self.0)(graph, node)
    }
}
