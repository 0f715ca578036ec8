pub mod common;
pub mod config;
pub mod heuristic;
pub mod map;
pub mod search;
pub mod solver;
pub mod stat;
