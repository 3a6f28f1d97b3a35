//! Incremental shortest-path search over waypoint graphs.
//!
//! This crate provides a resumable Dijkstra/A* engine for game agents that
//! cannot afford a full search in a single frame:
//!
//! - **Search sessions** ([`Search::dijkstra`], [`Search::astar`]) holding
//!   the frontier, closed set and backpointer arena between calls
//! - **Schedulers** that slice the work: [`RunToCompletion`],
//!   [`OneCyclePerCall`] and [`Budgeted`]
//! - **All-pairs table** ([`AllPairsTable`]) for O(1) cost and next-hop
//!   queries on small, static graphs
//! - **Indexed priority queue** ([`IndexedPriorityQueue`]) with by-key
//!   re-prioritization
//!
//! However the work is sliced, the terminal state, cost and solution are
//! the same.
//!
//! # Trait seams
//!
//! | Trait | Purpose | Provided |
//! |---|---|---|
//! | [`Heuristic`] | A* remaining-cost estimate | [`Zero`], [`Euclidean`], [`Manhattan`], [`HeuristicFn`] |
//! | [`Goal`] | when the search stops | [`Target`], [`AnyOf`], [`Exhaustive`], [`GoalFn`] |
//! | [`Scheduler`] | read access to a driven session | the three schedulers |

mod distance;
mod pqueue;
mod schedule;
mod scored;
mod search;
mod table;
mod traits;

pub use distance::{Euclidean, HeuristicFn, Manhattan, Zero};
pub use pqueue::{IndexedPriorityQueue, QueueError};
pub use schedule::{BudgetConfig, Budgeted, OneCyclePerCall, Progress, RunToCompletion, Scheduler};
pub use scored::{Chain, ScoredArena, ScoredId, ScoredNode};
pub use search::{Search, SearchError, SearchState, SearchStatus};
pub use table::{AllPairsTable, PathError, UNREACHABLE};
pub use traits::{AnyOf, Exhaustive, Goal, GoalFn, Heuristic, Target};
