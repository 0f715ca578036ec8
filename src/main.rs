use mha_rust::common::{Cell, Solution};
use mha_rust::config::{Cli, Config};
use mha_rust::map::Grid;
use mha_rust::solver::build_solver;
use mha_rust::stat::Stats;

use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const MAX_GRID_ATTEMPTS: u64 = 100;

#[derive(Serialize)]
struct Output<'a> {
    config: &'a Config,
    solutions: &'a [Solution<Cell>],
    stats: &'a Stats,
}

fn load_grid(config: &Config) -> anyhow::Result<Grid> {
    if let Some(map_path) = &config.map_path {
        return Grid::from_file(map_path, config.connectivity);
    }

    let (start, goal) = (config.start, config.goal());
    for attempt in 0..MAX_GRID_ATTEMPTS {
        let seed = config.seed + attempt;
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::random(
            config.height,
            config.width,
            config.obstacle_prob,
            config.max_cost,
            config.connectivity,
            &mut rng,
        );
        if grid.path_exists(start, goal) {
            info!("random {}x{} grid with seed {seed}", config.height, config.width);
            return Ok(grid);
        }
    }
    Err(anyhow!(
        "no connected {}x{} grid within {MAX_GRID_ATTEMPTS} seeds from {}",
        config.height,
        config.width,
        config.seed
    ))
}

fn write_output(path: &str, output: &Output) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create output directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("cannot create output file {path}"))?;
    serde_json::to_writer_pretty(file, output)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;
    config.validate()?;

    let grid = Rc::new(load_grid(&config)?);
    let mut solver = build_solver(&config, Rc::clone(&grid))?;
    let solutions = solver.solve();

    for solution in &solutions {
        if !grid.verify_path(&solution.path, solution.cost) {
            warn!("pass {:?} returned an invalid path", solution.pass);
        }
    }
    if solutions.is_empty() {
        warn!("no solution found");
    }
    solver.stats().print();

    write_output(
        &config.output_path,
        &Output {
            config: &config,
            solutions: &solutions,
            stats: solver.stats(),
        },
    )?;
    info!("results written to {}", config.output_path);

    Ok(())
}
