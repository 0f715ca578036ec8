use super::dominance::DominanceCheck;
use super::priority::PriorityPolicy;
use super::queue::PriorityQueue;
use super::SearchFrontier;
use crate::common::{NodeRef, State};

use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Produces the neighbors of a node with their accumulated cost.
pub type Successors<S> = Rc<dyn Fn(&NodeRef<S>) -> Vec<NodeRef<S>>>;

/// One search lane: a queue ordered by its own policy, the dominance
/// bookkeeping for that queue, and the successor generator.
pub struct Frontier<S: State> {
    queue: PriorityQueue<S>,
    dc: DominanceCheck<S>,
    policy: Box<dyn PriorityPolicy<S>>,
    successors: Successors<S>,
    retired: bool,
    pruned: usize,
}

impl<S: State> Frontier<S> {
    pub fn new(
        queue: PriorityQueue<S>,
        dc: DominanceCheck<S>,
        policy: Box<dyn PriorityPolicy<S>>,
        successors: Successors<S>,
    ) -> Self {
        Frontier {
            queue,
            dc,
            policy,
            successors,
            retired: false,
            pruned: 0,
        }
    }

    pub fn dominance(&self) -> &DominanceCheck<S> {
        &self.dc
    }

    pub fn policy(&self) -> &dyn PriorityPolicy<S> {
        self.policy.as_ref()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Nodes dropped because their priority was infinite.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    pub fn peek_priority(&self) -> Option<f64> {
        self.queue.peek_priority()
    }

    /// Marks a state expanded elsewhere as closed in this lane.
    pub fn close(&mut self, node: &NodeRef<S>) {
        self.dc.close(node);
        self.discard_stale();
    }

    fn enqueue(&mut self, node: NodeRef<S>) {
        assert!(!self.retired, "frontier used after its policy was exhausted");
        let priority = self.policy.priority(&node);
        if priority.is_infinite() {
            trace!("prune {:?} g {:?}", node.state, node.g_score);
            self.dc.prune(&node);
            self.pruned += 1;
            return;
        }
        self.queue.push(priority, node);
    }

    // Heads replaced by a cheaper node, or whose state is already closed,
    // are dropped so peek() only ever shows a live node.
    fn discard_stale(&mut self) {
        while !self.queue.is_empty() {
            let (_, head) = self.queue.peek();
            if self.dc.is_current(head) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<S: State> SearchFrontier<S> for Frontier<S> {
    fn insert(&mut self, node: NodeRef<S>) {
        self.dc.insert(node.clone());
        self.enqueue(node);
        self.discard_stale();
    }

    fn remove(&mut self) -> NodeRef<S> {
        let node = self.queue.pop();
        self.dc.expand(&node);
        self.discard_stale();
        node
    }

    fn expand_node(&mut self, node: &NodeRef<S>) -> usize {
        let successors = (self.successors)(node);
        let generated = successors.len();
        for successor in successors {
            if !self.dc.is_dominated(&successor) {
                self.enqueue(successor);
            }
        }
        self.discard_stale();
        generated
    }

    fn peek(&self) -> NodeRef<S> {
        self.queue.peek().1.clone()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn restart(&mut self) -> bool {
        if !self.policy.valid() {
            self.retired = true;
            return false;
        }

        // Lowest g per state across open and inconsistent nodes.
        let mut reopen: HashMap<S, NodeRef<S>> = HashMap::new();
        for node in self.dc.get_open().chain(self.dc.get_incons()) {
            match reopen.get(&node.state) {
                Some(kept) if kept.g_score <= node.g_score => {}
                _ => {
                    reopen.insert(node.state.clone(), node.clone());
                }
            }
        }
        debug!(
            "restart: {:?} open, {:?} inconsistent, {:?} reopened",
            self.dc.get_open().count(),
            self.dc.get_incons().count(),
            reopen.len()
        );

        self.queue.clear();
        self.dc.clear();
        self.policy.update();

        for node in reopen.into_values() {
            self.dc.insert(node.clone());
            self.enqueue(node);
        }
        self.discard_stale();
        true
    }

    fn observe_solution(&mut self, cost: f64) {
        self.policy.observe_solution(cost);
    }
}
