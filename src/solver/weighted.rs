use super::{grid_successors, Query, Solver};
use crate::common::{Cell, Solution};
use crate::config::Config;
use crate::heuristic::HeuristicKind;
use crate::map::Grid;
use crate::search::{
    g_score_dominance, DominanceCheck, Frontier, Heuristic, PriorityQueue, WeightedPriority,
};
use crate::stat::Stats;

use std::rc::Rc;
use tracing::{debug, instrument};

/// A*, weighted A* and ARA* over a single frontier.
pub struct WeightedSolver {
    grid: Rc<Grid>,
    query: Query,
    heuristic: HeuristicKind,
    w1: f64,
    decay: f64,
    iterations: usize,
    stats: Stats,
}

impl WeightedSolver {
    pub fn new(grid: Rc<Grid>, config: &Config) -> Self {
        WeightedSolver {
            grid,
            query: Query::from_config(config),
            heuristic: config.heuristics[0],
            w1: config.w1,
            decay: config.decay,
            iterations: config.iterations,
            stats: Stats::default(),
        }
    }
}

impl Solver for WeightedSolver {
    #[instrument(skip_all, name = "weighted_solver", level = "debug")]
    fn solve(&mut self) -> Vec<Solution<Cell>> {
        let heuristic: Heuristic<Cell> = Rc::new(self.heuristic.function());
        let mut policy = WeightedPriority::new(heuristic, self.w1, self.decay, self.iterations);
        if let Some(deadline) = self.query.deadline() {
            policy = policy.with_deadline(deadline);
        }
        debug!("weighted search with {:?}", self.heuristic);

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Algorithm;
    use crate::map::Connectivity;

    #[test]
    fn test_ara_on_room_map() {
        let grid = Rc::new(Grid::from_file("map_file/room-8-8.map", Connectivity::Four).unwrap());
        let config = Config {
            algorithm: Algorithm::Ara,
            start: (1, 1),
            goal: Some((6, 6)),
            w1: 5.0,
            decay: 2.0,
            iterations: 4,
            ..Config::default()
        };
        let optimal = grid.distance_table((6, 6))[1][1] as f64;

        let mut solver = WeightedSolver::new(Rc::clone(&grid), &config);
        let solutions = solver.solve();

        assert!(!solutions.is_empty());
        assert_eq!(solutions.last().unwrap().cost, optimal);
        assert_eq!(solver.stats().best_cost, Some(optimal));
        assert!(solver.stats().expanded_nodes > 0);
    }

    #[test]
    fn test_solve_twice_resets_stats() {
        let grid = Rc::new(Grid::uniform(4, 4, Connectivity::Eight));
        let config = Config {
            heuristics: vec![HeuristicKind::Chebyshev],
            w1: 1.0,
            decay: 0.0,
            iterations: 1,
            goal: Some((3, 3)),
            ..Config::default()
        };
        let mut solver = WeightedSolver::new(grid, &config);
        let first = solver.solve();
        let second = solver.solve();

        assert_eq!(first[0].cost, 3.0);
        assert_eq!(second[0].cost, 3.0);
        assert_eq!(solver.stats().passes, 1);
    }
}
