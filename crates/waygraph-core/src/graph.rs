//! The waypoint graph arena: [`NodeId`], [`Edge`], [`Graph`] and
//! [`GraphBuilder`].
//!
//! A [`Graph`] is frozen once built. Edges are stored contiguously and
//! grouped by source node, so [`Graph::edges`] is a slice lookup.

use std::fmt;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Dense node identity, assigned by [`GraphBuilder::add_node`] in insertion
/// order starting at zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(u32);

impl NodeId {
    /// Create an id from its raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The id as an index into per-node arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed, weighted arc. `cost` is finite and non-negative.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: f64,
}

impl Edge {
    /// Create a new edge. No validation happens here; [`GraphBuilder`]
    /// checks costs when the edge is added to a graph.
    #[inline]
    pub const fn new(from: NodeId, to: NodeId, cost: f64) -> Self {
        Self { from, to, cost }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} ({})", self.from, self.to, self.cost)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling a graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge refers to a node that was never added.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// Edge costs must be finite and non-negative.
    #[error("invalid cost {cost} on edge {from}->{to}")]
    InvalidCost { from: NodeId, to: NodeId, cost: f64 },
    /// A node position has a NaN or infinite coordinate.
    #[error("invalid position {pos} for node {node}")]
    InvalidPosition { node: NodeId, pos: Point },
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Collects nodes and edges, validating as it goes, then freezes them into
/// a [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    positions: Vec<Point>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-populated with `n` nodes at the origin.
    ///
    /// Handy for purely topological graphs where no geometric heuristic is
    /// needed.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            positions: vec![Point::ZERO; n],
            edges: Vec::new(),
        }
    }

    /// Add a node at `pos` and return its id.
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(pos);
        id
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Add a directed edge.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: f64) -> Result<(), GraphError> {
        self.check_node(from)?;
        self.check_node(to)?;
        if !cost.is_finite() || cost < 0.0 {
            return Err(GraphError::InvalidCost { from, to, cost });
        }
        self.edges.push(Edge::new(from, to, cost));
        Ok(())
    }

    /// Add a pair of opposite edges with the same cost.
    pub fn add_undirected_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        cost: f64,
    ) -> Result<(), GraphError> {
        self.add_edge(a, b, cost)?;
        self.add_edge(b, a, cost)
    }

    /// Add a directed edge whose cost is the straight-line distance between
    /// the two node positions.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check_node(from)?;
        self.check_node(to)?;
        let cost = self.positions[from.index()].distance(self.positions[to.index()]);
        self.add_edge(from, to, cost)
    }

    /// Freeze into a [`Graph`].
    ///
    /// Outgoing edges keep the order in which they were added.
    pub fn build(self) -> Result<Graph, GraphError> {
        for (i, &pos) in self.positions.iter().enumerate() {
            if !pos.is_finite() {
                return Err(GraphError::InvalidPosition {
                    node: NodeId(i as u32),
                    pos,
                });
            }
        }

        let n = self.positions.len();
        let mut edges = self.edges;
        // Stable, so per-node insertion order survives.
        edges.sort_by_key(|e| e.from);

        let mut offsets = vec![0usize; n + 1];
        for e in &edges {
            offsets[e.from.index() + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        Ok(Graph {
            positions: self.positions,
            offsets,
            edges,
        })
    }

    fn check_node(&self, id: NodeId) -> Result<(), GraphError> {
        if id.index() < self.positions.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Immutable waypoint graph.
///
/// Nodes are addressed by [`NodeId`]; `offsets[i]..offsets[i + 1]` is the
/// range of node `i`'s outgoing edges inside `edges`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    positions: Vec<Point>,
    offsets: Vec<usize>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a topological graph of `n` nodes (all at the origin) from
    /// `(from, to, cost)` triples.
    pub fn from_edges(n: usize, edges: &[(u32, u32, f64)]) -> Result<Self, GraphError> {
        let mut b = GraphBuilder::with_nodes(n);
        for &(from, to, cost) in edges {
            b.add_edge(NodeId(from), NodeId(to), cost)?;
        }
        b.build()
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total number of directed edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `id` names a node of this graph.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.positions.len()
    }

    /// Iterate over every node id in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.positions.len() as u32).map(NodeId)
    }

    /// Outgoing edges of `id`. Empty for unknown ids.
    #[inline]
    pub fn edges(&self, id: NodeId) -> &[Edge] {
        if !self.contains(id) {
            return &[];
        }
        let i = id.index();
        &self.edges[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Every edge, grouped by source node.
    #[inline]
    pub fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The cheapest direct edge from `from` to `to`, if any.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges(from)
            .iter()
            .filter(|e| e.to == to)
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }

    /// Position of `id`, or `None` for unknown ids.
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions.get(id.index()).copied()
    }
}

// The serialized form is the builder input; deserializing re-runs
// validation.

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GraphData {
    positions: Vec<Point>,
    edges: Vec<Edge>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Graph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphData {
            positions: self.positions.clone(),
            edges: self.edges.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Graph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = GraphData::deserialize(deserializer)?;
        let mut b = GraphBuilder::new();
        for pos in data.positions {
            b.add_node(pos);
        }
        for e in data.edges {
            b.add_edge(e.from, e.to, e.cost)
                .map_err(serde::de::Error::custom)?;
        }
        b.build().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn build_groups_edges_by_source() {
        let mut b = GraphBuilder::with_nodes(3);
        b.add_edge(n(2), n(0), 1.0).unwrap();
        b.add_edge(n(0), n(1), 2.0).unwrap();
        b.add_edge(n(0), n(2), 3.0).unwrap();
        let g = b.build().unwrap();

        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(
            g.edges(n(0)),
            &[Edge::new(n(0), n(1), 2.0), Edge::new(n(0), n(2), 3.0)]
        );
        assert!(g.edges(n(1)).is_empty());
        assert_eq!(g.edges(n(2)), &[Edge::new(n(2), n(0), 1.0)]);
    }

    #[test]
    fn unknown_ids_are_empty() {
        let g = Graph::from_edges(2, &[(0, 1, 1.0)]).unwrap();
        assert!(!g.contains(n(5)));
        assert!(g.edges(n(5)).is_empty());
        assert_eq!(g.position(n(5)), None);
    }

    #[test]
    fn rejects_bad_edges() {
        let mut b = GraphBuilder::with_nodes(2);
        assert_eq!(
            b.add_edge(n(0), n(7), 1.0),
            Err(GraphError::UnknownNode(n(7)))
        );
        assert!(matches!(
            b.add_edge(n(0), n(1), -1.0),
            Err(GraphError::InvalidCost { .. })
        ));
        assert!(matches!(
            b.add_edge(n(0), n(1), f64::NAN),
            Err(GraphError::InvalidCost { .. })
        ));
        assert!(matches!(
            b.add_edge(n(0), n(1), f64::INFINITY),
            Err(GraphError::InvalidCost { .. })
        ));
        assert!(b.add_edge(n(0), n(1), 0.0).is_ok());
    }

    #[test]
    fn rejects_bad_positions() {
        let mut b = GraphBuilder::new();
        b.add_node(Point::new(0.0, 0.0));
        let bad = b.add_node(Point::new(f64::NAN, 1.0));
        assert!(matches!(
            b.build(),
            Err(GraphError::InvalidPosition { node, .. }) if node == bad
        ));
    }

    #[test]
    fn connect_uses_distance() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(3.0, 4.0));
        b.connect(a, c).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.edges(a)[0].cost, 5.0);
    }

    #[test]
    fn undirected_adds_both_ways() {
        let mut b = GraphBuilder::with_nodes(2);
        b.add_undirected_edge(n(0), n(1), 2.5).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.edge(n(0), n(1)).map(|e| e.cost), Some(2.5));
        assert_eq!(g.edge(n(1), n(0)).map(|e| e.cost), Some(2.5));
    }

    #[test]
    fn cheapest_parallel_edge() {
        let g = Graph::from_edges(2, &[(0, 1, 4.0), (0, 1, 1.5), (0, 1, 3.0)]).unwrap();
        assert_eq!(g.edge(n(0), n(1)).map(|e| e.cost), Some(1.5));
        assert!(g.edge(n(1), n(0)).is_none());
    }

    #[test]
    fn node_iteration() {
        let g = Graph::from_edges(4, &[]).unwrap();
        let ids: Vec<_> = g.nodes().collect();
        assert_eq!(ids, vec![n(0), n(1), n(2), n(3)]);
        assert!(Graph::default().is_empty());
    }

    #[test]
    fn error_messages() {
        assert_eq!(GraphError::UnknownNode(n(3)).to_string(), "unknown node n3");
        let e = GraphError::InvalidCost {
            from: n(0),
            to: n(1),
            cost: -2.0,
        };
        assert_eq!(e.to_string(), "invalid cost -2 on edge n0->n1");
    }
}
