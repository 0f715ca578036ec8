use crate::common::{SearchNode, State};

use std::rc::Rc;
use std::time::Instant;
use tracing::debug;

/// Heuristic estimate from a state to the goal state. Must be non-negative.
pub type Heuristic<S> = Rc<dyn Fn(&S, &S) -> f64>;

/// Scores nodes for a frontier and owns the anytime tightening schedule.
pub trait PriorityPolicy<S: State> {
    /// Lower is more urgent. `f64::INFINITY` means the node can never be
    /// selected.
    fn priority(&self, node: &SearchNode<S>) -> f64;

    /// Whether another anytime pass may start.
    fn valid(&self) -> bool;

    /// Tighten the knobs for the next pass. Only legal while `valid()`.
    fn update(&mut self);

    /// Cost of the best solution found so far.
    fn observe_solution(&mut self, _cost: f64) {}
}

/// Knobs shared by both scoring rules.
#[derive(Debug, Clone)]
struct Schedule {
    w1: f64,
    decay: f64,
    iterations: usize,
    deadline: Option<Instant>,
}

impl Schedule {
    fn valid(&self) -> bool {
        self.w1 >= 1.0
            && self.iterations > 0
            && self.deadline.map_or(true, |deadline| Instant::now() < deadline)
    }

    fn step(&mut self) {
        self.w1 = (self.w1 - self.decay).max(1.0);
        self.iterations -= 1;
    }
}

/// `w1 * h + g`; `w1 = 1` is plain A*.
pub struct WeightedPriority<S: State> {
    heuristic: Heuristic<S>,
    schedule: Schedule,
}

impl<S: State> WeightedPriority<S> {
    pub fn new(heuristic: Heuristic<S>, w1: f64, decay: f64, iterations: usize) -> Self {
        WeightedPriority {
            heuristic,
            schedule: Schedule {
                w1,
                decay,
                iterations,
                deadline: None,
            },
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.schedule.deadline = Some(deadline);
        self
    }

    pub fn w1(&self) -> f64 {
        self.schedule.w1
    }

    pub fn iterations(&self) -> usize {
        self.schedule.iterations
    }
}

impl<S: State> PriorityPolicy<S> for WeightedPriority<S> {
    fn priority(&self, node: &SearchNode<S>) -> f64 {
        self.schedule.w1 * (self.heuristic)(&node.state, node.goal_state()) + node.g_score
    }

    fn valid(&self) -> bool {
        self.schedule.valid()
    }

    fn update(&mut self) {
        assert!(self.valid(), "update called on an exhausted weighted policy");
        self.schedule.step();
        debug!(
            "weighted policy: w1 {:?}, iterations left {:?}",
            self.schedule.w1, self.schedule.iterations
        );
    }
}

/// Potential search: `w1 * h / (budget - g)`.
///
/// A node whose cost already reached the budget scores `+inf` and is never
/// selected. Among the rest, a zero heuristic scores `0`. After each pass
/// the budget drops to `best - margin`.
pub struct PotentialPriority<S: State> {
    heuristic: Heuristic<S>,
    schedule: Schedule,
    budget: f64,
    margin: f64,
    best: Option<f64>,
}

impl<S: State> PotentialPriority<S> {
    pub fn new(
        heuristic: Heuristic<S>,
        w1: f64,
        decay: f64,
        budget: f64,
        margin: f64,
        iterations: usize,
    ) -> Self {
        PotentialPriority {
            heuristic,
            schedule: Schedule {
                w1,
                decay,
                iterations,
                deadline: None,
            },
            budget,
            margin,
            best: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.schedule.deadline = Some(deadline);
        self
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }
}

impl<S: State> PriorityPolicy<S> for PotentialPriority<S> {
    fn priority(&self, node: &SearchNode<S>) -> f64 {
        let slack = self.budget - node.g_score;
        if slack <= 0.0 {
            return f64::INFINITY;
        }
        let h = self.schedule.w1 * (self.heuristic)(&node.state, node.goal_state());
        if h == 0.0 {
            return 0.0;
        }
        h / slack
    }

    fn valid(&self) -> bool {
        self.schedule.valid() && self.budget > 0.0
    }

    fn update(&mut self) {
        assert!(self.valid(), "update called on an exhausted potential policy");
        if let Some(best) = self.best {
            self.budget = best - self.margin;
        }
        self.schedule.step();
        debug!(
            "potential policy: budget {:?}, w1 {:?}, iterations left {:?}",
            self.budget, self.schedule.w1, self.schedule.iterations
        );
    }

    fn observe_solution(&mut self, cost: f64) {
        self.best = Some(self.best.map_or(cost, |best| best.min(cost)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Cell;
    use crate::heuristic::manhattan;
    use std::time::Duration;

    fn node_at(g: f64) -> Rc<SearchNode<Cell>> {
        let root = SearchNode::root((0, 0), (3, 4));
        SearchNode::child(&root, (0, 0), g)
    }

    #[test]
    fn test_weighted_priority() {
        let policy = WeightedPriority::<Cell>::new(Rc::new(manhattan), 2.0, 1.0, 3);
        // h = 7
        assert_eq!(policy.priority(&node_at(5.0)), 19.0);
    }

    #[test]
    fn test_weighted_update_floors_at_one() {
        let mut policy = WeightedPriority::<Cell>::new(Rc::new(manhattan), 3.0, 2.0, 3);
        policy.update();
        assert_eq!(policy.w1(), 1.0);
        policy.update();
        assert_eq!(policy.w1(), 1.0);
        assert!(policy.valid());
        policy.update();
        assert_eq!(policy.iterations(), 0);
        assert!(!policy.valid());
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn test_update_after_invalid_panics() {
        let mut policy = WeightedPriority::<Cell>::new(Rc::new(manhattan), 1.0, 0.0, 1);
        policy.update();
        policy.update();
    }

    #[test]
    fn test_weight_below_one_is_invalid() {
        let policy = WeightedPriority::<Cell>::new(Rc::new(manhattan), 0.5, 0.0, 5);
        assert!(!policy.valid());
    }

    #[test]
    fn test_deadline_invalidates() {
        let past = Instant::now() - Duration::from_millis(1);
        let policy =
            WeightedPriority::<Cell>::new(Rc::new(manhattan), 1.0, 0.0, 5).with_deadline(past);
        assert!(!policy.valid());
    }

    #[test]
    fn test_potential_priority() {
        let policy = PotentialPriority::<Cell>::new(Rc::new(manhattan), 1.0, 0.0, 17.0, 1.0, 1);
        // h = 7, slack = 17 - 3
        assert_eq!(policy.priority(&node_at(3.0)), 0.5);
        assert_eq!(policy.priority(&node_at(17.0)), f64::INFINITY);
        assert_eq!(policy.priority(&node_at(20.0)), f64::INFINITY);

        let root = SearchNode::root((3, 4), (3, 4));
        assert_eq!(policy.priority(&root), 0.0);
    }

    #[test]
    fn test_goal_over_budget_is_never_selected() {
        let policy = PotentialPriority::<Cell>::new(Rc::new(manhattan), 1.0, 0.0, 10.0, 1.0, 1);
        let root = SearchNode::root((0, 0), (0, 1));
        // h = 0 at the goal, but the budget check comes first.
        assert_eq!(policy.priority(&SearchNode::child(&root, (0, 1), 9.0)), 0.0);
        assert_eq!(policy.priority(&SearchNode::child(&root, (0, 1), 10.0)), f64::INFINITY);
    }

    #[test]
    fn test_potential_update_tightens_budget() {
        let mut policy =
            PotentialPriority::<Cell>::new(Rc::new(manhattan), 1.0, 0.0, 100.0, 5.0, 3);
        policy.update();
        assert_eq!(policy.budget(), 100.0);
        policy.observe_solution(40.0);
        policy.observe_solution(60.0);
        policy.update();
        assert_eq!(policy.budget(), 35.0);
        assert!(policy.valid());

        policy.observe_solution(5.0);
        policy.update();
        assert_eq!(policy.budget(), 0.0);
        assert!(!policy.valid());
    }
}
