use crate::common::Cell;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::str::FromStr;

fn deltas(a: &Cell, b: &Cell) -> (f64, f64) {
    (a.0.abs_diff(b.0) as f64, a.1.abs_diff(b.1) as f64)
}

pub fn manhattan(a: &Cell, b: &Cell) -> f64 {
    let (dx, dy) = deltas(a, b);
    dx + dy
}

pub fn euclidean(a: &Cell, b: &Cell) -> f64 {
    let (dx, dy) = deltas(a, b);
    (dx * dx + dy * dy).sqrt()
}

pub fn chebyshev(a: &Cell, b: &Cell) -> f64 {
    let (dx, dy) = deltas(a, b);
    dx.max(dy)
}

pub fn octile(a: &Cell, b: &Cell) -> f64 {
    let (dx, dy) = deltas(a, b);
    (dx + dy) + (SQRT_2 - 2.0) * dx.min(dy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Manhattan,
    Euclidean,
    Chebyshev,
    Octile,
}

impl HeuristicKind {
    pub fn function(self) -> fn(&Cell, &Cell) -> f64 {
        match self {
            HeuristicKind::Manhattan => manhattan,
            HeuristicKind::Euclidean => euclidean,
            HeuristicKind::Chebyshev => chebyshev,
            HeuristicKind::Octile => octile,
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "euclidean" => Ok(HeuristicKind::Euclidean),
            "chebyshev" => Ok(HeuristicKind::Chebyshev),
            "octile" => Ok(HeuristicKind::Octile),
            other => Err(anyhow!("Unknown heuristic: {other}")),
        }
    }
}
