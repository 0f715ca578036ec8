use crate::common::Cell;
use crate::heuristic::HeuristicKind;
use crate::map::{Connectivity, Grid};

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Astar,
    WeightedAstar,
    Ara,
    Imha,
    Smha,
    Potential,
    AnytimePotential,
}

impl Algorithm {
    pub fn is_multi_heuristic(self) -> bool {
        matches!(self, Algorithm::Imha | Algorithm::Smha)
    }
}

/// Cost model of the multi-heuristic lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scoring {
    #[default]
    Weighted,
    Potential,
}

#[derive(Parser, Debug)]
#[command(
    name = "Rust MHA",
    about = "Anytime multi-heuristic search algorithms implemented in Rust.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, value_enum, help = "Search algorithm")]
    pub algorithm: Option<Algorithm>,

    #[arg(long, value_enum, help = "Cost model for multi-heuristic search")]
    pub scoring: Option<Scoring>,

    #[arg(long, help = "Path to a MovingAI map file (random grid if absent)")]
    pub map_path: Option<String>,

    #[arg(long, help = "Random grid height")]
    pub height: Option<usize>,

    #[arg(long, help = "Random grid width")]
    pub width: Option<usize>,

    #[arg(long, help = "Obstacle probability of the random grid")]
    pub obstacle_prob: Option<f64>,

    #[arg(long, help = "Maximum cell cost of the random grid")]
    pub max_cost: Option<u32>,

    #[arg(long, help = "Neighborhood: 4 or 8")]
    pub connectivity: Option<u8>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Start cell as row,col", value_delimiter = ',')]
    pub start: Option<Vec<usize>>,

    #[arg(long, help = "Goal cell as row,col", value_delimiter = ',')]
    pub goal: Option<Vec<usize>>,

    #[arg(
        long,
        help = "Heuristics, anchor first (manhattan, euclidean, chebyshev, octile)",
        value_delimiter = ','
    )]
    pub heuristics: Option<Vec<String>>,

    #[arg(long, help = "Heuristic inflation weight")]
    pub w1: Option<f64>,

    #[arg(long, help = "Inadmissible lane bound")]
    pub w2: Option<f64>,

    #[arg(long, help = "Weight decay per anytime pass")]
    pub decay: Option<f64>,

    #[arg(long, help = "Maximum number of anytime passes")]
    pub iterations: Option<usize>,

    #[arg(long, help = "Initial cost budget for potential search")]
    pub budget: Option<f64>,

    #[arg(long, help = "Budget margin below the best solution")]
    pub margin: Option<f64>,

    #[arg(long, help = "Wall-clock limit in milliseconds")]
    pub time_limit_ms: Option<u64>,

    #[arg(long, help = "Path to the output file")]
    pub output_path: Option<String>,
}

fn cell_arg(name: &str, values: &[usize]) -> anyhow::Result<Cell> {
    match values {
        &[x, y] => Ok((x, y)),
        _ => Err(anyhow!("{name} needs exactly two coordinates, got {values:?}")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub algorithm: Algorithm,
    pub scoring: Scoring,
    pub map_path: Option<String>,
    pub height: usize,
    pub width: usize,
    pub obstacle_prob: f64,
    pub max_cost: u32,
    pub connectivity: Connectivity,
    pub seed: u64,
    pub start: Cell,
    /// Bottom-right corner when absent.
    pub goal: Option<Cell>,
    pub heuristics: Vec<HeuristicKind>,
    pub w1: f64,
    pub w2: f64,
    pub decay: f64,
    pub iterations: usize,
    pub budget: f64,
    pub margin: f64,
    pub time_limit_ms: Option<u64>,
    pub output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::Ara,
            scoring: Scoring::Weighted,
            map_path: None,
            height: 20,
            width: 20,
            obstacle_prob: 0.3,
            max_cost: 10,
            connectivity: Connectivity::Four,
            seed: 0,
            start: (0, 0),
            goal: None,
            heuristics: vec![
                HeuristicKind::Manhattan,
                HeuristicKind::Euclidean,
                HeuristicKind::Chebyshev,
                HeuristicKind::Octile,
            ],
            w1: 10.0,
            w2: 10.0,
            decay: 2.0,
            iterations: 5,
            budget: 200.0,
            margin: 15.0,
            time_limit_ms: None,
            output_path: "result/result.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(scoring) = cli.scoring {
            self.scoring = scoring;
        }
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(obstacle_prob) = cli.obstacle_prob {
            self.obstacle_prob = obstacle_prob;
        }
        if let Some(max_cost) = cli.max_cost {
            self.max_cost = max_cost;
        }
        if let Some(connectivity) = cli.connectivity {
            self.connectivity = match connectivity {
                4 => Connectivity::Four,
                8 => Connectivity::Eight,
                other => return Err(anyhow!("Connectivity must be 4 or 8, got {other}")),
            };
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(start) = &cli.start {
            self.start = cell_arg("start", start)?;
        }
        if let Some(goal) = &cli.goal {
            self.goal = Some(cell_arg("goal", goal)?);
        }
        if let Some(heuristics) = &cli.heuristics {
            self.heuristics = heuristics
                .iter()
                .map(|name| name.parse())
                .collect::<anyhow::Result<_>>()?;
        }
        if let Some(w1) = cli.w1 {
            self.w1 = w1;
        }
        if let Some(w2) = cli.w2 {
            self.w2 = w2;
        }
        if let Some(decay) = cli.decay {
            self.decay = decay;
        }
        if let Some(iterations) = cli.iterations {
            self.iterations = iterations;
        }
        if let Some(budget) = cli.budget {
            self.budget = budget;
        }
        if let Some(margin) = cli.margin {
            self.margin = margin;
        }
        if let Some(time_limit_ms) = cli.time_limit_ms {
            self.time_limit_ms = Some(time_limit_ms);
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }
        Ok(self)
    }

    pub fn goal(&self) -> Cell {
        self.goal
            .unwrap_or((self.height.saturating_sub(1), self.width.saturating_sub(1)))
    }

    /// Checks knobs that do not depend on the loaded grid.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut check_weights = false;
        let mut check_bound = false;
        let mut check_budget = false;

        match self.algorithm {
            Algorithm::Astar => {}
            Algorithm::WeightedAstar | Algorithm::Ara => check_weights = true,
            Algorithm::Imha | Algorithm::Smha => {
                check_weights = true;
                check_bound = true;
                check_budget = self.scoring == Scoring::Potential;
            }
            Algorithm::Potential | Algorithm::AnytimePotential => check_budget = true,
        }

        if check_weights && self.w1 < 1.0 {
            return Err(anyhow!("w1 must be at least 1.0, got {}", self.w1));
        }
        if check_bound && self.w2 < 1.0 {
            return Err(anyhow!("w2 must be at least 1.0, got {}", self.w2));
        }
        if check_budget && self.budget <= 0.0 {
            return Err(anyhow!("Budget must be positive, got {}", self.budget));
        }
        if self.decay < 0.0 {
            return Err(anyhow!("Decay must not be negative, got {}", self.decay));
        }
        if self.iterations == 0 {
            return Err(anyhow!("At least one iteration is required"));
        }
        if self.heuristics.is_empty() {
            return Err(anyhow!("At least one heuristic is required"));
        }
        if self.algorithm.is_multi_heuristic() && self.heuristics.len() < 2 {
            return Err(anyhow!(
                "{:?} needs an anchor and at least one inadmissible heuristic, got {}",
                self.algorithm,
                self.heuristics.len()
            ));
        }
        if !(0.0..1.0).contains(&self.obstacle_prob) {
            return Err(anyhow!(
                "Obstacle probability must be in [0, 1), got {}",
                self.obstacle_prob
            ));
        }
        Ok(())
    }

    /// Checks start and goal against the grid actually searched.
    pub fn validate_endpoints(&self, grid: &Grid) -> anyhow::Result<()> {
        let (height, width) = (grid.height, grid.width);
        for (name, (x, y)) in [("Start", self.start), ("Goal", self.goal())] {
            if x >= height || y >= width {
                return Err(anyhow!("{name} ({x}, {y}) is outside the {height}x{width} grid"));
            }
            if !grid.is_passable(x, y) {
                return Err(anyhow!("{name} ({x}, {y}) is an obstacle"));
            }
        }
        Ok(())
    }
}
