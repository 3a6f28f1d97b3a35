//! Scheduling wrappers: how much search work happens per call.
//!
//! | Scheduler | Work per `do_search` |
//! |---|---|
//! | [`RunToCompletion`] | until the search succeeds or fails |
//! | [`OneCyclePerCall`] | exactly one cycle |
//! | [`Budgeted`] | up to `budget` cycles |
//!
//! All three drive the same [`Search`] state machine, so for the same
//! graph, source, goal and heuristic they reach the same terminal state,
//! cost and solution, and the cycle counts add up to the same total.

use waygraph_core::Edge;

use crate::search::{Search, SearchError, SearchStatus};
use crate::traits::{Goal, Heuristic};

/// Outcome of a multi-cycle scheduler call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub status: SearchStatus,
    /// Cycles consumed by this call only.
    pub cycles: usize,
}

/// Per-call budget for [`Budgeted`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BudgetConfig {
    pub cycles_per_call: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self { cycles_per_call: 8 }
    }
}

/// Read access shared by every scheduler.
pub trait Scheduler<'g> {
    type Heuristic: Heuristic;
    type Goal: Goal;

    /// The wrapped session.
    fn search(&self) -> &Search<'g, Self::Heuristic, Self::Goal>;

    /// Unwrap into the session.
    fn into_search(self) -> Search<'g, Self::Heuristic, Self::Goal>
    where
        Self: Sized;

    fn status(&self) -> SearchStatus {
        self.search().status()
    }

    fn is_finished(&self) -> bool {
        self.search().is_finished()
    }

    /// Ordered source-to-goal edges once the search succeeded.
    fn solution<'s>(&'s self) -> Option<&'s [Edge]>
    where
        'g: 's,
    {
        self.search().solution()
    }

    fn cost(&self) -> Option<f64> {
        self.search().cost()
    }

    /// Cycles consumed across every call so far.
    fn total_cycles(&self) -> usize {
        self.search().cycles()
    }
}

fn ensure_running<H: Heuristic, G: Goal>(search: &Search<'_, H, G>) -> Result<(), SearchError> {
    if search.is_finished() {
        return Err(SearchError::Finished {
            state: search.state(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RunToCompletion
// ---------------------------------------------------------------------------

/// Finishes the whole search in one call.
pub struct RunToCompletion<'g, H, G> {
    search: Search<'g, H, G>,
}

impl<'g, H: Heuristic, G: Goal> RunToCompletion<'g, H, G> {
    pub fn new(search: Search<'g, H, G>) -> Self {
        Self { search }
    }

    /// Step until the search succeeds or fails.
    ///
    /// Returns [`SearchError::Finished`] if a previous call already did.
    pub fn do_search(&mut self) -> Result<Progress, SearchError> {
        ensure_running(&self.search)?;
        let mut cycles = 0;
        loop {
            let state = self.search.step()?;
            cycles += 1;
            if state.is_terminal() {
                return Ok(Progress {
                    status: state.status(),
                    cycles,
                });
            }
        }
    }
}

impl<'g, H: Heuristic, G: Goal> Scheduler<'g> for RunToCompletion<'g, H, G> {
    type Heuristic = H;
    type Goal = G;

    fn search(&self) -> &Search<'g, H, G> {
        &self.search
    }

    fn into_search(self) -> Search<'g, H, G> {
        self.search
    }
}

// ---------------------------------------------------------------------------
// OneCyclePerCall
// ---------------------------------------------------------------------------

/// Exactly one cycle per call; meant to be polled once per frame.
pub struct OneCyclePerCall<'g, H, G> {
    search: Search<'g, H, G>,
}

impl<'g, H: Heuristic, G: Goal> OneCyclePerCall<'g, H, G> {
    pub fn new(search: Search<'g, H, G>) -> Self {
        Self { search }
    }

    /// Perform one cycle and report where the search stands.
    ///
    /// Returns [`SearchError::Finished`] once the search is over.
    pub fn do_search(&mut self) -> Result<SearchStatus, SearchError> {
        self.search.step().map(|s| s.status())
    }
}

impl<'g, H: Heuristic, G: Goal> Scheduler<'g> for OneCyclePerCall<'g, H, G> {
    type Heuristic = H;
    type Goal = G;

    fn search(&self) -> &Search<'g, H, G> {
        &self.search
    }

    fn into_search(self) -> Search<'g, H, G> {
        self.search
    }
}

// ---------------------------------------------------------------------------
// Budgeted
// ---------------------------------------------------------------------------

/// At most a fixed number of cycles per call.
pub struct Budgeted<'g, H, G> {
    search: Search<'g, H, G>,
    config: BudgetConfig,
}

impl<'g, H: Heuristic, G: Goal> Budgeted<'g, H, G> {
    pub fn new(search: Search<'g, H, G>, config: BudgetConfig) -> Self {
        Self { search, config }
    }

    #[inline]
    pub fn config(&self) -> BudgetConfig {
        self.config
    }

    pub fn set_config(&mut self, config: BudgetConfig) {
        self.config = config;
    }

    /// Perform up to `budget` cycles, stopping early on success or failure.
    ///
    /// A zero budget does no work and just reports the current status.
    /// Returns [`SearchError::Finished`] if the search was already over.
    pub fn do_search(&mut self, budget: usize) -> Result<Progress, SearchError> {
        ensure_running(&self.search)?;
        let mut cycles = 0;
        let mut status = self.search.status();
        while cycles < budget {
            let state = self.search.step()?;
            cycles += 1;
            status = state.status();
            if state.is_terminal() {
                break;
            }
        }
        Ok(Progress { status, cycles })
    }

    /// [`do_search`](Self::do_search) with the configured budget.
    pub fn tick(&mut self) -> Result<Progress, SearchError> {
        self.do_search(self.config.cycles_per_call)
    }
}

impl<'g, H: Heuristic, G: Goal> Scheduler<'g> for Budgeted<'g, H, G> {
    type Heuristic = H;
    type Goal = G;

    fn search(&self) -> &Search<'g, H, G> {
        &self.search
    }

    fn into_search(self) -> Search<'g, H, G> {
        self.search
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors on Search
// ---------------------------------------------------------------------------

impl<'g, H: Heuristic, G: Goal> Search<'g, H, G> {
    pub fn run_to_completion(self) -> RunToCompletion<'g, H, G> {
        RunToCompletion::new(self)
    }

    pub fn one_cycle_per_call(self) -> OneCyclePerCall<'g, H, G> {
        OneCyclePerCall::new(self)
    }

    pub fn budgeted(self, config: BudgetConfig) -> Budgeted<'g, H, G> {
        Budgeted::new(self, config)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn budget_config_defaults_missing_fields() {
        let cfg: BudgetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, BudgetConfig::default());
        let cfg: BudgetConfig = serde_json::from_str(r#"{"cycles_per_call":2}"#).unwrap();
        assert_eq!(cfg.cycles_per_call, 2);
    }

    #[test]
    fn status_round_trip() {
        let json = serde_json::to_string(&SearchStatus::Failure).unwrap();
        let back: SearchStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SearchStatus::Failure);
    }
}
