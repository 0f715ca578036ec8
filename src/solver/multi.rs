use super::{grid_successors, Query, Solver};
use crate::common::{Cell, Solution};
use crate::config::{Algorithm, Config, Scoring};
use crate::heuristic::HeuristicKind;
use crate::map::Grid;
use crate::search::{
    g_score_dominance, ClosedSharing, DominanceCheck, Frontier, Heuristic, MultiFrontier,
    PotentialPriority, PriorityPolicy, PriorityQueue, WeightedPriority,
};
use crate::stat::Stats;

use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, instrument};

/// IMHA* / SMHA*: the first heuristic drives the anchor lane, every other one
/// an inadmissible lane.
pub struct MultiHeuristicSolver {
    grid: Rc<Grid>,
    query: Query,
    heuristics: Vec<HeuristicKind>,
    sharing: ClosedSharing,
    scoring: Scoring,
    w1: f64,
    w2: f64,
    decay: f64,
    iterations: usize,
    budget: f64,
    margin: f64,
    stats: Stats,
}

impl MultiHeuristicSolver {
    pub fn new(grid: Rc<Grid>, config: &Config) -> Self {
        let sharing = match config.algorithm {
            Algorithm::Smha => ClosedSharing::Shared,
            _ => ClosedSharing::Independent,
        };
        MultiHeuristicSolver {
            grid,
            query: Query::from_config(config),
            heuristics: config.heuristics.clone(),
            sharing,
            scoring: config.scoring,
            w1: config.w1,
            w2: config.w2,
            decay: config.decay,
            iterations: config.iterations,
            budget: config.budget,
            margin: config.margin,
            stats: Stats::default(),
        }
    }

    fn policy(&self, kind: HeuristicKind, deadline: Option<Instant>) -> Box<dyn PriorityPolicy<Cell>> {
        let heuristic: Heuristic<Cell> = Rc::new(kind.function());
        match self.scoring {
            Scoring::Weighted => {
                let mut policy =
                    WeightedPriority::new(heuristic, self.w1, self.decay, self.iterations);
                if let Some(deadline) = deadline {
                    policy = policy.with_deadline(deadline);
                }
                Box::new(policy)
            }
            Scoring::Potential => {
                let mut policy = PotentialPriority::new(
                    heuristic,
                    self.w1,
                    self.decay,
                    self.budget,
                    self.margin,
                    self.iterations,
                );
                if let Some(deadline) = deadline {
                    policy = policy.with_deadline(deadline);
                }
                Box::new(policy)
            }
        }
    }
}

impl Solver for MultiHeuristicSolver {
    #[instrument(skip_all, name = "multi_heuristic_solver", level = "debug")]
    fn solve(&mut self) -> Vec<Solution<Cell>> {
        let deadline = self.query.deadline();
        let dc = DominanceCheck::new(g_score_dominance());
        let lane = |kind: HeuristicKind, dc: DominanceCheck<Cell>| {
            Frontier::new(
                PriorityQueue::new(),
                dc,
                self.policy(kind, deadline),
                grid_successors(&self.grid),
            )
        };

        let inads = self.heuristics[1..]
            .iter()
            .map(|&kind| lane(kind, dc.copy()))
            .collect();
        let anchor = lane(self.heuristics[0], dc);
        debug!(
            "{:?} multi-heuristic search, anchor {:?}, {:?} inadmissible lanes",
            self.sharing,
            self.heuristics[0],
            self.heuristics.len() - 1
        );

        let mut frontier = MultiFrontier::new(anchor, inads, self.w2, self.decay, self.sharing);
        self.stats = Stats::default();
        self.query.run(&mut frontier, &mut self.stats)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}
