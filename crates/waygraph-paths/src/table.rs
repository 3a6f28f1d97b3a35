//! Precomputed all-pairs shortest paths.
//!
//! [`AllPairsTable::create`] runs an exhaustive Dijkstra from every node
//! and keeps, per (source, destination), the path cost plus the first and
//! last edge of the shortest path. Queries are then O(1), and
//! [`path`](AllPairsTable::path) is O(path length).
//!
//! The table is a snapshot: if the graph it was built from is replaced, the
//! caller must [`rebuild`](AllPairsTable::rebuild) it.

use waygraph_core::{Edge, Graph, NodeId};

use crate::schedule::{RunToCompletion, Scheduler};
use crate::search::{Search, SearchError};
use crate::traits::Exhaustive;

/// Cost reported for unreachable pairs.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Errors from [`AllPairsTable::path`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("node {0} is not covered by the path table")]
    UnknownNode(NodeId),
    #[error("no path from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Entry {
    cost: f64,
    /// First edge on the path; `None` for the source itself or unreachable.
    first: Option<Edge>,
    /// Edge entering the destination in the source's shortest-path tree.
    last: Option<Edge>,
}

impl Entry {
    const NONE: Self = Self {
        cost: UNREACHABLE,
        first: None,
        last: None,
    };
}

/// Cost and first hop for every ordered pair of nodes.
#[derive(Clone, Debug, Default)]
pub struct AllPairsTable {
    n: usize,
    /// Row-major: `entries[src * n + dst]`.
    entries: Vec<Entry>,
}

impl AllPairsTable {
    /// Build the table for `graph`.
    pub fn create(graph: &Graph) -> Result<Self, SearchError> {
        let mut table = Self::default();
        table.rebuild(graph)?;
        Ok(table)
    }

    /// Replace the contents with a fresh build from `graph`. On error the
    /// table keeps its previous contents.
    pub fn rebuild(&mut self, graph: &Graph) -> Result<(), SearchError> {
        let n = graph.len();
        let mut entries = vec![Entry::NONE; n * n];

        let mut reachable = 0usize;
        for src in graph.nodes() {
            let row = src.index() * n;
            reachable += fill_row(graph, src, &mut entries[row..row + n])?;
        }
        self.n = n;
        self.entries = entries;
        log::debug!(
            "all-pairs table built: {} nodes, {} edges, {} reachable pairs",
            n,
            graph.edge_count(),
            reachable
        );
        Ok(())
    }

    /// Number of nodes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    fn entry(&self, src: NodeId, dst: NodeId) -> Option<&Entry> {
        if src.index() >= self.n || dst.index() >= self.n {
            return None;
        }
        self.entries.get(src.index() * self.n + dst.index())
    }

    /// Shortest-path cost, or [`UNREACHABLE`].
    pub fn cost(&self, src: NodeId, dst: NodeId) -> f64 {
        self.entry(src, dst).map_or(UNREACHABLE, |e| e.cost)
    }

    pub fn path_exists(&self, src: NodeId, dst: NodeId) -> bool {
        self.cost(src, dst) < UNREACHABLE
    }

    /// First edge of the shortest path. `None` if unreachable or
    /// `src == dst`.
    pub fn next_edge(&self, src: NodeId, dst: NodeId) -> Option<Edge> {
        self.entry(src, dst)?.first
    }

    /// First hop of the shortest path. `None` if unreachable or
    /// `src == dst`.
    pub fn next_node(&self, src: NodeId, dst: NodeId) -> Option<NodeId> {
        self.next_edge(src, dst).map(|e| e.to)
    }

    /// Edges of the shortest path from `src` to `dst`; empty if they are
    /// the same node. The first edge always agrees with
    /// [`next_edge`](Self::next_edge).
    pub fn path(&self, src: NodeId, dst: NodeId) -> Result<Vec<Edge>, PathError> {
        for id in [src, dst] {
            if id.index() >= self.n {
                return Err(PathError::UnknownNode(id));
            }
        }
        if !self.path_exists(src, dst) {
            return Err(PathError::Unreachable { from: src, to: dst });
        }

        // Walk src's own tree backwards. Chaining next hops across rows
        // can cycle when zero-cost edges make several trees equally short.
        let mut path = Vec::new();
        let mut cur = dst;
        while cur != src {
            let Some(edge) = self.entry(src, cur).and_then(|e| e.last) else {
                return Err(PathError::Unreachable { from: src, to: dst });
            };
            path.push(edge);
            cur = edge.from;
        }
        path.reverse();
        Ok(path)
    }
}

/// Fill `row` from an exhaustive Dijkstra rooted at `src`; returns the
/// number of settled destinations.
fn fill_row(graph: &Graph, src: NodeId, row: &mut [Entry]) -> Result<usize, SearchError> {
    let mut run = RunToCompletion::new(Search::dijkstra(graph, src, Exhaustive)?);
    run.do_search()?;
    let search = run.into_search();
    let arena = search.arena();

    let mut settled = 0;
    // Parents settle before children, so the parent's first edge is
    // already in the row when the child is reached.
    for (dst, rec) in search.settled() {
        let first = match rec.parent {
            None => None,
            Some(pid) if arena[pid].node == src => rec.edge,
            Some(pid) => row[arena[pid].node.index()].first,
        };
        row[dst.index()] = Entry {
            cost: rec.g,
            first,
            last: rec.edge,
        };
        settled += 1;
    }
    Ok(settled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> NodeId {
        NodeId::new(i)
    }

    /// A→B(1), B→C(1), A→C(5), isolated D.
    fn abcd() -> Graph {
        Graph::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]).unwrap()
    }

    #[test]
    fn scenario_costs_and_paths() {
        let t = AllPairsTable::create(&abcd()).unwrap();
        assert_eq!(t.len(), 4);
        assert_eq!(t.cost(n(0), n(2)), 2.0);
        assert_eq!(t.next_node(n(0), n(2)), Some(n(1)));
        assert_eq!(
            t.path(n(0), n(2)),
            Ok(vec![Edge::new(n(0), n(1), 1.0), Edge::new(n(1), n(2), 1.0)])
        );
        assert_eq!(t.cost(n(2), n(0)), UNREACHABLE);
        assert!(!t.path_exists(n(2), n(0)));
    }

    #[test]
    fn isolated_node_is_unreachable() {
        let t = AllPairsTable::create(&abcd()).unwrap();
        assert!(!t.path_exists(n(0), n(3)));
        assert_eq!(t.cost(n(0), n(3)), UNREACHABLE);
        assert_eq!(t.next_node(n(0), n(3)), None);
        assert_eq!(
            t.path(n(0), n(3)),
            Err(PathError::Unreachable {
                from: n(0),
                to: n(3)
            })
        );
    }

    #[test]
    fn self_cost_is_zero() {
        let g = abcd();
        let t = AllPairsTable::create(&g).unwrap();
        for id in g.nodes() {
            assert_eq!(t.cost(id, id), 0.0);
            assert!(t.path_exists(id, id));
            assert_eq!(t.next_node(id, id), None);
            assert_eq!(t.path(id, id), Ok(vec![]));
        }
    }

    #[test]
    fn unknown_nodes() {
        let t = AllPairsTable::create(&abcd()).unwrap();
        assert_eq!(t.cost(n(0), n(9)), UNREACHABLE);
        assert_eq!(t.cost(n(9), n(9)), UNREACHABLE);
        assert_eq!(t.path(n(9), n(0)), Err(PathError::UnknownNode(n(9))));
        assert_eq!(t.path(n(0), n(9)), Err(PathError::UnknownNode(n(9))));
    }

    #[test]
    fn first_hop_deep_in_tree() {
        // 0 → 1 → 2 → 3 → 4 with a costly shortcut 0 → 4.
        let g = Graph::from_edges(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (0, 4, 10.0)],
        )
        .unwrap();
        let t = AllPairsTable::create(&g).unwrap();
        for dst in 1..5 {
            assert_eq!(t.next_node(n(0), n(dst)), Some(n(1)));
        }
        assert_eq!(t.next_node(n(2), n(4)), Some(n(3)));
        assert_eq!(t.cost(n(0), n(4)), 4.0);
        assert_eq!(t.path(n(0), n(4)).map(|p| p.len()), Ok(4));
    }

    #[test]
    fn zero_cost_cycle_terminates() {
        let g = Graph::from_edges(
            3,
            &[(0, 1, 0.0), (1, 0, 0.0), (0, 2, 1.0), (1, 2, 1.0)],
        )
        .unwrap();
        let t = AllPairsTable::create(&g).unwrap();
        for src in [n(0), n(1)] {
            let path = t.path(src, n(2)).unwrap();
            let total: f64 = path.iter().map(|e| e.cost).sum();
            assert_eq!(total, 1.0);
            assert_eq!(path.first().map(|e| e.from), Some(src));
            assert_eq!(path.last().map(|e| e.to), Some(n(2)));
        }
    }

    #[test]
    fn rebuild_replaces_contents() {
        let mut t = AllPairsTable::create(&abcd()).unwrap();
        let g2 = Graph::from_edges(2, &[(1, 0, 3.0)]).unwrap();
        t.rebuild(&g2).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.cost(n(1), n(0)), 3.0);
        assert!(!t.path_exists(n(0), n(1)));
        assert_eq!(t.cost(n(0), n(2)), UNREACHABLE);

        t.rebuild(&Graph::default()).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn rebuild_keeps_rows_and_size_in_step() {
        let mut t = AllPairsTable::create(&Graph::from_edges(2, &[(0, 1, 1.0)]).unwrap()).unwrap();
        for g in [abcd(), Graph::from_edges(1, &[]).unwrap(), abcd()] {
            t.rebuild(&g).unwrap();
            assert_eq!(t.len(), g.len());
            assert_eq!(t.entries.len(), g.len() * g.len());
            for id in g.nodes() {
                assert_eq!(t.cost(id, id), 0.0);
            }
        }
        assert_eq!(t.cost(n(0), n(2)), 2.0);
    }
}
