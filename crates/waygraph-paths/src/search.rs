//! Incremental best-first search shared by every scheduler.
//!
//! A [`Search`] is a small state machine. Each call to `step` performs one
//! *cycle*: pop the frontier minimum, test it against the goal, close it,
//! and relax its outgoing edges. All state lives in the session, so cycles
//! can be spread over as many calls as the caller likes without changing
//! the outcome.

use waygraph_core::{Edge, Graph, NodeId};

use crate::distance::Zero;
use crate::pqueue::{IndexedPriorityQueue, QueueError};
use crate::scored::{ScoredArena, ScoredId, ScoredNode};
use crate::traits::{Goal, Heuristic};

/// Lifecycle of a [`Search`]. `Succeeded` and `Failed` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    Initialized,
    Running,
    Succeeded,
    Failed,
}

impl SearchState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Caller-facing view; a session that has not started yet is running.
    #[inline]
    pub fn status(self) -> SearchStatus {
        match self {
            Self::Initialized | Self::Running => SearchStatus::Running,
            Self::Succeeded => SearchStatus::Success,
            Self::Failed => SearchStatus::Failure,
        }
    }
}

/// What a scheduler call reports back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Running,
    Success,
    Failure,
}

impl SearchStatus {
    #[inline]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Caller-contract violations. An unreachable goal is *not* an error; it
/// ends the search in [`SearchState::Failed`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The session already reached a terminal state.
    #[error("search already finished ({state:?})")]
    Finished { state: SearchState },
    /// The source node is not part of the graph.
    #[error("unknown source node {0}")]
    UnknownNode(NodeId),
    /// The frontier rejected an operation.
    #[error("frontier: {0}")]
    Frontier(#[from] QueueError),
}

/// One search session over a borrowed graph.
///
/// `H` is the A* heuristic ([`Zero`] for Dijkstra) and `G` the goal
/// predicate. The graph is borrowed for the whole session, so it cannot
/// change underneath a running search.
pub struct Search<'g, H, G> {
    graph: &'g Graph,
    source: NodeId,
    goal: G,
    heuristic: H,
    state: SearchState,
    frontier: IndexedPriorityQueue<NodeId, ScoredId, f64>,
    arena: ScoredArena,
    /// Best g seen so far per node; `INFINITY` if unseen.
    best_g: Vec<f64>,
    /// Finalized record per node, `Some` once popped.
    closed: Vec<Option<ScoredId>>,
    /// Closed nodes in the order they were popped.
    settled: Vec<NodeId>,
    cycles: usize,
    reached: Option<ScoredId>,
    solution: Vec<Edge>,
}

impl<'g, G: Goal> Search<'g, Zero, G> {
    /// Dijkstra from `source` until `goal` holds.
    pub fn dijkstra(graph: &'g Graph, source: NodeId, goal: G) -> Result<Self, SearchError> {
        Self::astar(graph, source, goal, Zero)
    }
}

impl<'g, H: Heuristic, G: Goal> Search<'g, H, G> {
    /// A* from `source` until `goal` holds, guided by `heuristic`.
    pub fn astar(
        graph: &'g Graph,
        source: NodeId,
        goal: G,
        heuristic: H,
    ) -> Result<Self, SearchError> {
        if !graph.contains(source) {
            return Err(SearchError::UnknownNode(source));
        }
        let n = graph.len();
        Ok(Self {
            graph,
            source,
            goal,
            heuristic,
            state: SearchState::Initialized,
            frontier: IndexedPriorityQueue::new(),
            arena: ScoredArena::with_capacity(n),
            best_g: vec![f64::INFINITY; n],
            closed: vec![None; n],
            settled: Vec::new(),
            cycles: 0,
            reached: None,
            solution: Vec::new(),
        })
    }

    /// Perform one cycle and return the resulting state.
    ///
    /// The first call also seeds the frontier with the source. Calling this
    /// on a terminal session is an error and changes nothing.
    pub(crate) fn step(&mut self) -> Result<SearchState, SearchError> {
        match self.state {
            SearchState::Succeeded | SearchState::Failed => {
                return Err(SearchError::Finished { state: self.state });
            }
            SearchState::Initialized => {
                self.seed()?;
                self.state = SearchState::Running;
            }
            SearchState::Running => {}
        }

        self.cycles += 1;

        let (node, sid, _) = match self.frontier.dequeue() {
            Ok(entry) => entry,
            Err(QueueError::Empty) => {
                self.state = SearchState::Failed;
                log::debug!(
                    "search from {}: frontier exhausted after {} cycles ({} settled)",
                    self.source,
                    self.cycles,
                    self.settled.len()
                );
                return Ok(self.state);
            }
            Err(e) => return Err(e.into()),
        };

        let current = self.arena[sid];
        self.closed[node.index()] = Some(sid);
        self.settled.push(node);
        log::trace!(
            "search from {}: cycle {} expands {} (g={}, f={})",
            self.source,
            self.cycles,
            node,
            current.g,
            current.f
        );

        if self.goal.is_goal(node) {
            self.reached = Some(sid);
            self.solution = self.arena.path_edges(sid);
            self.state = SearchState::Succeeded;
            log::debug!(
                "search from {}: reached {} at cost {} in {} cycles",
                self.source,
                node,
                current.g,
                self.cycles
            );
            return Ok(self.state);
        }

        let graph = self.graph;
        for &edge in graph.edges(node) {
            let ni = edge.to.index();
            if self.closed[ni].is_some() {
                continue;
            }
            let g = current.g + edge.cost;
            if g >= self.best_g[ni] {
                continue;
            }
            self.best_g[ni] = g;
            let f = g + self.heuristic.estimate(graph, edge.to);
            let id = self.arena.push(ScoredNode {
                node: edge.to,
                g,
                f,
                edge: Some(edge),
                parent: Some(sid),
            });
            if self.frontier.contains_key(&edge.to) {
                self.frontier.change_value_and_priority(&edge.to, id, f)?;
            } else {
                self.frontier.enqueue(edge.to, id, f)?;
            }
        }

        Ok(self.state)
    }

    fn seed(&mut self) -> Result<(), SearchError> {
        let h = self.heuristic.estimate(self.graph, self.source);
        let root = self.arena.push(ScoredNode::root(self.source, h));
        self.best_g[self.source.index()] = 0.0;
        self.frontier.enqueue(self.source, root, h)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.state.status()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    #[inline]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn goal(&self) -> &G {
        &self.goal
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Cycles performed since the session was created.
    #[inline]
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Edges from source to goal, once succeeded. Empty when the source
    /// itself satisfied the goal.
    pub fn solution(&self) -> Option<&[Edge]> {
        self.reached.map(|_| self.solution.as_slice())
    }

    /// Nodes from source to goal, both included, once succeeded.
    pub fn solution_nodes(&self) -> Option<Vec<NodeId>> {
        self.reached.map(|id| self.arena.path_nodes(id))
    }

    /// Total cost of the solution, once succeeded.
    pub fn cost(&self) -> Option<f64> {
        self.reached.map(|id| self.arena[id].g)
    }

    /// The node that satisfied the goal.
    pub fn goal_node(&self) -> Option<NodeId> {
        self.reached.map(|id| self.arena[id].node)
    }

    /// Whether `node` has been popped and its cost finalized.
    pub fn is_closed(&self, node: NodeId) -> bool {
        self.closed.get(node.index()).is_some_and(Option::is_some)
    }

    /// Best cost known so far for `node`; final once the node is closed.
    pub fn best_cost(&self, node: NodeId) -> Option<f64> {
        self.best_g
            .get(node.index())
            .copied()
            .filter(|g| g.is_finite())
    }

    /// The finalized record of a closed node.
    pub fn closed_record(&self, node: NodeId) -> Option<&ScoredNode> {
        let id = (*self.closed.get(node.index())?)?;
        self.arena.get(id)
    }

    /// Closed nodes with their finalized records, in settle order
    /// (non-decreasing `f`).
    pub fn settled(&self) -> impl Iterator<Item = (NodeId, &ScoredNode)> + '_ {
        self.settled.iter().filter_map(move |&n| {
            let id = self.closed[n.index()]?;
            Some((n, &self.arena[id]))
        })
    }

    /// Number of entries waiting in the frontier.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Every record created so far, including superseded ones.
    pub fn arena(&self) -> &ScoredArena {
        &self.arena
    }
}
