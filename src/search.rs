mod dominance;
mod driver;
mod frontier;
mod multi;
mod priority;
mod queue;

pub use dominance::{g_score_dominance, Dominance, DominanceCheck};
pub use driver::anytime_search;
pub use frontier::{Frontier, Successors};
pub use multi::{ClosedSharing, FrontierPicker, Lane, MultiFrontier};
pub use priority::{Heuristic, PotentialPriority, PriorityPolicy, WeightedPriority};
pub use queue::PriorityQueue;

use crate::common::{NodeRef, State};

/// What the anytime driver needs from a (multi-)frontier.
pub trait SearchFrontier<S: State> {
    fn insert(&mut self, node: NodeRef<S>);

    /// Pops the next node to expand. Panics when empty.
    fn remove(&mut self) -> NodeRef<S>;

    /// Generates and queues the successors of `node`; returns how many were
    /// generated.
    fn expand_node(&mut self, node: &NodeRef<S>) -> usize;

    /// The node `remove` would return. Panics when empty.
    fn peek(&self) -> NodeRef<S>;

    fn is_empty(&self) -> bool;

    /// Starts the next anytime pass from the open and inconsistent nodes.
    /// Returns false once the policy allows no further pass.
    fn restart(&mut self) -> bool;

    fn observe_solution(&mut self, cost: f64);
}
