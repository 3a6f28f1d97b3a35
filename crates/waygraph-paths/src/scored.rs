//! Scored nodes and the arena that holds their backpointer chains.
//!
//! Every relaxation records an immutable [`ScoredNode`] whose `parent`
//! points (by [`ScoredId`]) at the record it was reached from. Walking the
//! parents of the goal record and reversing yields the path.

use std::ops::Index;

use waygraph_core::{Edge, NodeId};

/// Index of a [`ScoredNode`] inside a [`ScoredArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScoredId(u32);

impl ScoredId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node annotated with its accumulated cost `g`, estimated total `f`, and
/// how it was reached. The root has neither `edge` nor `parent`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoredNode {
    pub node: NodeId,
    pub g: f64,
    pub f: f64,
    pub edge: Option<Edge>,
    pub parent: Option<ScoredId>,
}

impl ScoredNode {
    /// The search root: `g = 0`, no parent.
    pub const fn root(node: NodeId, f: f64) -> Self {
        Self {
            node,
            g: 0.0,
            f,
            edge: None,
            parent: None,
        }
    }

    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Append-only storage for [`ScoredNode`]s.
#[derive(Clone, Debug, Default)]
pub struct ScoredArena {
    nodes: Vec<ScoredNode>,
}

impl ScoredArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(cap),
        }
    }

    /// Store `node` and return its id.
    pub fn push(&mut self, node: ScoredNode) -> ScoredId {
        let id = ScoredId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: ScoredId) -> Option<&ScoredNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Iterate from `id` back to the root.
    pub fn chain(&self, id: ScoredId) -> Chain<'_> {
        Chain {
            arena: self,
            next: Some(id),
        }
    }

    /// Number of edges between the root and `id`.
    pub fn depth(&self, id: ScoredId) -> usize {
        self.chain(id).count().saturating_sub(1)
    }

    /// Edges from the root to `id`, in travel order.
    pub fn path_edges(&self, id: ScoredId) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.chain(id).filter_map(|s| s.edge).collect();
        edges.reverse();
        edges
    }

    /// Nodes from the root to `id`, both included.
    pub fn path_nodes(&self, id: ScoredId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.chain(id).map(|s| s.node).collect();
        nodes.reverse();
        nodes
    }

    /// Structural equality: same node, `g` and `f` at every step of both
    /// chains, down to the root.
    pub fn same_chain(&self, a: ScoredId, b: ScoredId) -> bool {
        let mut ca = self.chain(a);
        let mut cb = self.chain(b);
        loop {
            match (ca.next(), cb.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if x.node != y.node || x.g != y.g || x.f != y.f {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Index<ScoredId> for ScoredArena {
    type Output = ScoredNode;

    #[inline]
    fn index(&self, id: ScoredId) -> &ScoredNode {
        &self.nodes[id.index()]
    }
}

/// Iterator over a backpointer chain, goal first.
pub struct Chain<'a> {
    arena: &'a ScoredArena,
    next: Option<ScoredId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ScoredNode;

    fn next(&mut self) -> Option<&'a ScoredNode> {
        let node = self.arena.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
