mod multi;
mod potential;
mod weighted;

pub use multi::MultiHeuristicSolver;
pub use potential::PotentialSolver;
pub use weighted::WeightedSolver;

use crate::common::{Cell, NodeRef, SearchNode, Solution};
use crate::config::{Algorithm, Config};
use crate::map::Grid;
use crate::search::{anytime_search, SearchFrontier, Successors};
use crate::stat::Stats;

use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::info;

pub trait Solver {
    /// Runs every anytime pass and returns the solutions in the order found.
    fn solve(&mut self) -> Vec<Solution<Cell>>;

    fn stats(&self) -> &Stats;
}

/// Start, goal and wall-clock limit shared by every preset.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub start: Cell,
    pub goal: Cell,
    pub time_limit: Option<Duration>,
}

impl Query {
    pub fn from_config(config: &Config) -> Self {
        Query {
            start: config.start,
            goal: config.goal(),
            time_limit: config.time_limit_ms.map(Duration::from_millis),
        }
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.time_limit.map(|limit| Instant::now() + limit)
    }

    pub(crate) fn run<F: SearchFrontier<Cell>>(
        &self,
        frontier: &mut F,
        stats: &mut Stats,
    ) -> Vec<Solution<Cell>> {
        let goal = self.goal;
        anytime_search(
            SearchNode::root(self.start, goal),
            move |node: &SearchNode<Cell>| node.state == goal,
            frontier,
            stats,
        )
    }
}

pub(crate) fn grid_successors(grid: &Rc<Grid>) -> Successors<Cell> {
    let grid = Rc::clone(grid);
    Rc::new(move |node: &NodeRef<Cell>| grid.successors(node))
}

/// Builds the preset named by `config.algorithm`.
///
/// `astar` pins `w1 = 1` and a single pass, `weighted-astar` and `potential`
/// run a single pass, the rest use the configured schedule.
pub fn build_solver(config: &Config, grid: Rc<Grid>) -> anyhow::Result<Box<dyn Solver>> {
    config.validate()?;
    config.validate_endpoints(&grid)?;

    let mut config = config.clone();
    match config.algorithm {
        Algorithm::Astar => {
            config.w1 = 1.0;
            config.decay = 0.0;
            config.iterations = 1;
        }
        Algorithm::WeightedAstar => {
            config.decay = 0.0;
            config.iterations = 1;
        }
        Algorithm::Potential => config.iterations = 1,
        Algorithm::Ara | Algorithm::AnytimePotential | Algorithm::Imha | Algorithm::Smha => {}
    }
    info!(
        "{:?}: {:?} -> {:?}, w1 {:?}, iterations {:?}",
        config.algorithm,
        config.start,
        config.goal(),
        config.w1,
        config.iterations
    );

    Ok(match config.algorithm {
        Algorithm::Astar | Algorithm::WeightedAstar | Algorithm::Ara => {
            Box::new(WeightedSolver::new(grid, &config))
        }
        Algorithm::Potential | Algorithm::AnytimePotential => {
            Box::new(PotentialSolver::new(grid, &config))
        }
        Algorithm::Imha | Algorithm::Smha => Box::new(MultiHeuristicSolver::new(grid, &config)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scoring;
    use crate::heuristic::HeuristicKind;
    use crate::map::Connectivity;

    fn open_grid() -> Rc<Grid> {
        Rc::new(Grid::uniform(8, 8, Connectivity::Four))
    }

    fn config(algorithm: Algorithm) -> Config {
        Config {
            algorithm,
            height: 8,
            width: 8,
            w1: 3.0,
            w2: 2.0,
            decay: 1.0,
            iterations: 3,
            budget: 30.0,
            margin: 1.0,
            ..Config::default()
        }
    }

    #[test]
    fn test_every_preset_reaches_the_goal() {
        for algorithm in [
            Algorithm::Astar,
            Algorithm::WeightedAstar,
            Algorithm::Ara,
            Algorithm::Imha,
            Algorithm::Smha,
            Algorithm::Potential,
            Algorithm::AnytimePotential,
        ] {
            let grid = open_grid();
            let mut solver = build_solver(&config(algorithm), Rc::clone(&grid)).unwrap();
            let solutions = solver.solve();

            assert!(!solutions.is_empty(), "{algorithm:?} found nothing");
            for solution in &solutions {
                assert_eq!(solution.path[0], (0, 0));
                assert_eq!(*solution.path.last().unwrap(), (7, 7));
                assert!(grid.verify_path(&solution.path, solution.cost));
            }
            assert_eq!(solver.stats().solutions, solutions.len());
        }
    }

    #[test]
    fn test_astar_ignores_configured_weight() {
        let mut solver = build_solver(&config(Algorithm::Astar), open_grid()).unwrap();
        let solutions = solver.solve();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].cost, 14.0);
        assert_eq!(solver.stats().passes, 1);
    }

    #[test]
    fn test_multi_heuristic_potential_scoring() {
        let config = Config {
            scoring: Scoring::Potential,
            heuristics: vec![HeuristicKind::Manhattan, HeuristicKind::Chebyshev],
            ..config(Algorithm::Smha)
        };
        let mut solver = build_solver(&config, open_grid()).unwrap();
        let solutions = solver.solve();
        assert!(!solutions.is_empty());
        assert!(solutions.last().unwrap().cost <= 30.0);
    }

    #[test]
    fn test_build_rejects_bad_endpoints() {
        let config = Config {
            goal: Some((8, 0)),
            ..config(Algorithm::Ara)
        };
        assert!(build_solver(&config, open_grid()).is_err());
    }

    #[test]
    fn test_build_rejects_blocked_start() {
        let grid = Rc::new(Grid::from_rows(&[
            "@..", //
            "...",
            "...",
        ]));
        let config = Config {
            height: 3,
            width: 3,
            ..config(Algorithm::Astar)
        };
        assert!(build_solver(&config, grid).is_err());
    }

    #[test]
    fn test_build_rejects_single_heuristic_multi_search() {
        let config = Config {
            heuristics: vec![HeuristicKind::Manhattan],
            ..config(Algorithm::Imha)
        };
        assert!(build_solver(&config, open_grid()).is_err());
    }

    #[test]
    fn test_expired_deadline_runs_no_pass() {
        let config = Config {
            time_limit_ms: Some(0),
            ..config(Algorithm::Ara)
        };
        let mut solver = build_solver(&config, open_grid()).unwrap();
        assert!(solver.solve().is_empty());
        assert_eq!(solver.stats().passes, 0);
    }
}
