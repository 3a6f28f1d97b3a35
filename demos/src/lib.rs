//! Shared demo model: a jittered waypoint lattice and agents that plan over
//! it with different schedulers.
//!
//! Demonstrates: graph building, A* with a Euclidean heuristic, the three
//! scheduling strategies driven one call per frame, and cross-checking
//! against an all-pairs table.

use rand::{Rng, RngExt};
use waygraph_core::{Edge, Graph, GraphBuilder, GraphError, NodeId, Point};
use waygraph_paths::{
    BudgetConfig, Budgeted, Euclidean, OneCyclePerCall, RunToCompletion, Scheduler, Search,
    SearchError, SearchStatus, Target,
};

/// Distance between lattice columns and rows.
pub const SPACING: f64 = 10.0;

/// Build a `cols` x `rows` lattice of waypoints, each nudged by up to
/// `SPACING / 4`, with 4-way links. Each link is dropped with probability
/// `blocked`, simulating walls.
pub fn waypoint_lattice(
    rng: &mut impl Rng,
    cols: usize,
    rows: usize,
    blocked: f64,
) -> Result<Graph, GraphError> {
    let mut b = GraphBuilder::new();
    let jitter = SPACING / 4.0;
    for y in 0..rows {
        for x in 0..cols {
            b.add_node(Point::new(
                x as f64 * SPACING + rng.random_range(-jitter..jitter),
                y as f64 * SPACING + rng.random_range(-jitter..jitter),
            ));
        }
    }
    let id = |x: usize, y: usize| NodeId::new((y * cols + x) as u32);
    for y in 0..rows {
        for x in 0..cols {
            if x + 1 < cols && !rng.random_bool(blocked) {
                link(&mut b, id(x, y), id(x + 1, y))?;
            }
            if y + 1 < rows && !rng.random_bool(blocked) {
                link(&mut b, id(x, y), id(x, y + 1))?;
            }
        }
    }
    b.build()
}

fn link(b: &mut GraphBuilder, a: NodeId, c: NodeId) -> Result<(), GraphError> {
    b.connect(a, c)?;
    b.connect(c, a)
}

/// How an agent spreads its planning over frames.
pub enum Planner<'g> {
    Instant(RunToCompletion<'g, Euclidean, Target>),
    PerFrame(OneCyclePerCall<'g, Euclidean, Target>),
    Budgeted(Budgeted<'g, Euclidean, Target>),
}

impl<'g> Planner<'g> {
    /// Pick a scheduler by index: 0 instant, 1 one cycle per frame,
    /// anything else budgeted.
    pub fn new(
        graph: &'g Graph,
        from: NodeId,
        to: NodeId,
        kind: usize,
        budget: BudgetConfig,
    ) -> Result<Self, SearchError> {
        let h = Euclidean::towards(graph, to).ok_or(SearchError::UnknownNode(to))?;
        let search = Search::astar(graph, from, Target(to), h)?;
        Ok(match kind {
            0 => Self::Instant(search.run_to_completion()),
            1 => Self::PerFrame(search.one_cycle_per_call()),
            _ => Self::Budgeted(search.budgeted(budget)),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Instant(_) => "instant",
            Self::PerFrame(_) => "per-frame",
            Self::Budgeted(_) => "budgeted",
        }
    }

    /// Advance by one frame's worth of work.
    pub fn tick(&mut self) -> Result<SearchStatus, SearchError> {
        match self {
            Self::Instant(s) => s.do_search().map(|p| p.status),
            Self::PerFrame(s) => s.do_search(),
            Self::Budgeted(s) => s.tick().map(|p| p.status),
        }
    }

    fn search(&self) -> &Search<'g, Euclidean, Target> {
        match self {
            Self::Instant(s) => s.search(),
            Self::PerFrame(s) => s.search(),
            Self::Budgeted(s) => s.search(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.search().status()
    }

    pub fn solution(&self) -> Option<&[Edge]> {
        self.search().solution()
    }

    pub fn cost(&self) -> Option<f64> {
        self.search().cost()
    }

    pub fn cycles(&self) -> usize {
        self.search().cycles()
    }
}

/// A walker with a destination and a planner.
pub struct Agent<'g> {
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub planner: Planner<'g>,
    /// Frames spent planning.
    pub frames: usize,
}

impl<'g> Agent<'g> {
    /// Spend one frame planning unless the plan is already settled.
    pub fn update(&mut self) -> Result<SearchStatus, SearchError> {
        if self.planner.status().is_finished() {
            return Ok(self.planner.status());
        }
        self.frames += 1;
        self.planner.tick()
    }
}
