use crate::common::{NodeRef, SearchNode, State};

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::trace;

/// `dominate(existing, candidate)`: true when `existing` makes `candidate`
/// redundant.
pub type Dominance<S> = Rc<dyn Fn(&SearchNode<S>, &SearchNode<S>) -> bool>;

/// Default rule: a node dominates any other node of the same state that did
/// not reach it more cheaply.
pub fn g_score_dominance<S: State>() -> Dominance<S> {
    Rc::new(|existing: &SearchNode<S>, candidate: &SearchNode<S>| {
        existing.g_score <= candidate.g_score
    })
}

/// Per-state bookkeeping for one frontier: best node seen, open and closed
/// states, and improvements found after a state was closed.
pub struct DominanceCheck<S: State> {
    dominate: Dominance<S>,
    best: HashMap<S, NodeRef<S>>,
    open: HashMap<S, NodeRef<S>>,
    closed: HashSet<S>,
    incons: HashMap<S, NodeRef<S>>,
}

impl<S: State> DominanceCheck<S> {
    pub fn new(dominate: Dominance<S>) -> Self {
        DominanceCheck {
            dominate,
            best: HashMap::new(),
            open: HashMap::new(),
            closed: HashSet::new(),
            incons: HashMap::new(),
        }
    }

    /// Fresh instance sharing only the dominance rule.
    pub fn copy(&self) -> Self {
        DominanceCheck::new(Rc::clone(&self.dominate))
    }

    /// Records `node` as the best for its state and as open.
    pub fn insert(&mut self, node: NodeRef<S>) {
        self.best.insert(node.state.clone(), node.clone());
        self.open.insert(node.state.clone(), node);
    }

    /// Moves a popped node from open to closed.
    pub fn expand(&mut self, node: &NodeRef<S>) {
        if self
            .open
            .get(&node.state)
            .is_some_and(|open| Rc::ptr_eq(open, node))
        {
            self.open.remove(&node.state);
        }
        self.closed.insert(node.state.clone());
    }

    /// Closes a state expanded by another frontier.
    pub fn close(&mut self, node: &NodeRef<S>) {
        self.open.remove(&node.state);
        self.closed.insert(node.state.clone());
    }

    /// Forgets an open node that will never be queued.
    pub fn prune(&mut self, node: &NodeRef<S>) {
        if self
            .open
            .get(&node.state)
            .is_some_and(|open| Rc::ptr_eq(open, node))
        {
            self.open.remove(&node.state);
        }
    }

    /// Returns false only when `node` must be queued now. A better node for
    /// a closed state is kept for the next pass instead.
    pub fn is_dominated(&mut self, node: &NodeRef<S>) -> bool {
        if let Some(existing) = self.best.get(&node.state) {
            if (self.dominate)(existing, node) {
                return true;
            }
        }

        self.best.insert(node.state.clone(), node.clone());
        if self.closed.contains(&node.state) {
            trace!("inconsistent: {:?} g {:?}", node.state, node.g_score);
            self.incons.insert(node.state.clone(), node.clone());
            return true;
        }
        self.open.insert(node.state.clone(), node.clone());
        false
    }

    /// Whether `node` is still the live entry for its state.
    pub fn is_current(&self, node: &NodeRef<S>) -> bool {
        !self.closed.contains(&node.state)
            && self
                .best
                .get(&node.state)
                .is_some_and(|best| Rc::ptr_eq(best, node))
    }

    pub fn is_closed(&self, state: &S) -> bool {
        self.closed.contains(state)
    }

    pub fn best(&self, state: &S) -> Option<&NodeRef<S>> {
        self.best.get(state)
    }

    pub fn get_open(&self) -> impl Iterator<Item = &NodeRef<S>> {
        self.open.values()
    }

    pub fn get_incons(&self) -> impl Iterator<Item = &NodeRef<S>> {
        self.incons.values()
    }

    /// Resets open, closed and inconsistent bookkeeping for a new pass. Best
    /// records survive so unimproved closed states stay settled.
    pub fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.incons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Dc = DominanceCheck<(usize, usize)>;

    #[test]
    fn test_first_node_is_not_dominated() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        let node = SearchNode::child(&root, (0, 1), 1.0);
        assert!(!dc.is_dominated(&node));
        assert!(dc.is_current(&node));
        assert_eq!(dc.get_open().count(), 1);
    }

    #[test]
    fn test_worse_or_equal_node_is_dominated() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        let first = SearchNode::child(&root, (0, 1), 2.0);
        let equal = SearchNode::child(&root, (0, 1), 2.0);
        let worse = SearchNode::child(&root, (0, 1), 3.0);

        assert!(!dc.is_dominated(&first));
        assert!(dc.is_dominated(&equal));
        assert!(dc.is_dominated(&worse));
        assert!(Rc::ptr_eq(dc.best(&(0, 1)).unwrap(), &first));
        assert_eq!(dc.get_incons().count(), 0);
    }

    #[test]
    fn test_better_open_node_replaces_record() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        let first = SearchNode::child(&root, (0, 1), 5.0);
        let better = SearchNode::child(&root, (0, 1), 1.0);

        assert!(!dc.is_dominated(&first));
        assert!(!dc.is_dominated(&better));
        assert!(!dc.is_current(&first));
        assert!(dc.is_current(&better));
        let open: Vec<_> = dc.get_open().collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].g_score, 1.0);
    }

    #[test]
    fn test_better_node_for_closed_state_is_inconsistent() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        let first = SearchNode::child(&root, (0, 1), 5.0);
        dc.insert(first.clone());
        dc.expand(&first);
        assert!(dc.is_closed(&(0, 1)));
        assert_eq!(dc.get_open().count(), 0);

        let better = SearchNode::child(&root, (0, 1), 2.0);
        assert!(dc.is_dominated(&better));
        let incons: Vec<_> = dc.get_incons().collect();
        assert_eq!(incons.len(), 1);
        assert_eq!(incons[0].g_score, 2.0);
        assert!(!dc.is_current(&better));
    }

    #[test]
    fn test_clear_keeps_best_records() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        let node = SearchNode::child(&root, (0, 1), 1.0);
        dc.insert(node.clone());
        dc.expand(&node);
        dc.clear();

        assert!(!dc.is_closed(&(0, 1)));
        assert_eq!(dc.get_open().count(), 0);
        assert!(dc.is_dominated(&SearchNode::child(&root, (0, 1), 1.0)));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut dc = Dc::new(g_score_dominance());
        let root = SearchNode::root((0, 0), (2, 2));
        dc.insert(root.clone());

        let mut other = dc.copy();
        assert!(other.best(&(0, 0)).is_none());
        assert!(!other.is_dominated(&root));
        other.expand(&root);
        assert!(!dc.is_closed(&(0, 0)));
    }

    #[test]
    fn test_custom_dominance_rule() {
        // Never dominate: every node is treated as an improvement.
        let mut dc = Dc::new(Rc::new(|_: &SearchNode<(usize, usize)>, _: &SearchNode<(usize, usize)>| false));
        let root = SearchNode::root((0, 0), (2, 2));
        assert!(!dc.is_dominated(&SearchNode::child(&root, (0, 1), 1.0)));
        assert!(!dc.is_dominated(&SearchNode::child(&root, (0, 1), 9.0)));
    }
}
