use super::{grid_successors, Query, Solver};
use crate::common::{Cell, Solution};
use crate::config::Config;
use crate::heuristic::HeuristicKind;
use crate::map::Grid;
use crate::search::{
    g_score_dominance, DominanceCheck, Frontier, Heuristic, PotentialPriority, PriorityQueue,
};
use crate::stat::Stats;

use std::rc::Rc;
use tracing::instrument;

/// Potential search, optionally anytime: each pass lowers the budget to
/// `best - margin`.
pub struct PotentialSolver {
    grid: Rc<Grid>,
    query: Query,
    heuristic: HeuristicKind,
    budget: f64,
    margin: f64,
    iterations: usize,
    stats: Stats,
}

impl PotentialSolver {
    pub fn new(grid: Rc<Grid>, config: &Config) -> Self {
        PotentialSolver {
            grid,
            query: Query::from_config(config),
            heuristic: config.heuristics[0],
            budget: config.budget,
            margin: config.margin,
            iterations: config.iterations,
            stats: Stats::default(),
        }
    }
}

impl Solver for PotentialSolver {
    #[instrument(skip_all, name = "potential_solver", level = "debug")]
    fn solve(&mut self) -> Vec<Solution<Cell>> {
        // A constant weight only rescales h / (budget - g).
        let heuristic: Heuristic<Cell> = Rc::new(self.heuristic.function());
        let mut policy =
            PotentialPriority::new(heuristic, 1.0, 0.0, self.budget, self.margin, self.iterations);
        if let Some(deadline) = self.query.deadline() {
            policy = policy.with_deadline(deadline);
        }

        let mut frontier = Frontier::new(
            PriorityQueue::new(),
            DominanceCheck::new(g_score_dominance()),
            Box::new(policy),
            grid_successors(&self.grid),
        );
        self.stats = Stats::default();
        self.query.run(&mut frontier, &mut self.stats)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}
