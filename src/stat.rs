use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub passes: usize,
    pub solutions: usize,
    pub best_cost: Option<f64>,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub time_ms: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Best cost {:?} Solutions {:?} Passes {:?} Time(milliseconds) {:?} Expanded nodes {:?} Generated nodes {:?}",
            self.best_cost,
            self.solutions,
            self.passes,
            self.time_ms,
            self.expanded_nodes,
            self.generated_nodes
        );
    }
}
