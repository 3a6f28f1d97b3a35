use waygraph_core::{Graph, NodeId};

/// Estimate of the remaining cost from a node to the goal, used by A*.
///
/// Must never overestimate the true cost (admissible), and should be
/// consistent (`h(a) <= cost(a, b) + h(b)` for every edge) so that a closed
/// node's cost is final. [`Zero`](crate::Zero) turns A* into Dijkstra.
pub trait Heuristic {
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64;
}

/// Goal predicate: the search succeeds on the first popped node for which
/// this returns `true`.
pub trait Goal {
    fn is_goal(&self, node: NodeId) -> bool;
}

/// A single destination node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target(pub NodeId);

impl Goal for Target {
    #[inline]
    fn is_goal(&self, node: NodeId) -> bool {
        node == self.0
    }
}

/// Any node of a set; the search stops at the nearest one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnyOf(pub Vec<NodeId>);

impl Goal for AnyOf {
    fn is_goal(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }
}

/// Never satisfied: the search expands every reachable node and then
/// reports failure. Used to build shortest-path trees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Exhaustive;

impl Goal for Exhaustive {
    #[inline]
    fn is_goal(&self, _node: NodeId) -> bool {
        false
    }
}

/// Adapts a closure into a [`Goal`].
#[derive(Copy, Clone, Debug)]
pub struct GoalFn<F>(pub F);

impl<F: Fn(NodeId) -> bool> Goal for GoalFn<F> {
    #[inline]
    fn is_goal(&self, node: NodeId) -> bool {
        (self.0)(node)
    }
}
