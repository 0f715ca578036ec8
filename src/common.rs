use serde::Serialize;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Anything the search can deduplicate on.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// Grid coordinates as (row, column).
pub type Cell = (usize, usize);

pub type NodeRef<S> = Rc<SearchNode<S>>;

/// A state reached with some accumulated cost, plus the back-pointer used to
/// rebuild the path. Nodes never change after creation.
#[derive(Debug)]
pub struct SearchNode<S: State> {
    pub state: S,
    pub parent: Option<NodeRef<S>>,
    pub g_score: f64,
    pub goal: Rc<S>,
}

impl<S: State> SearchNode<S> {
    pub fn root(state: S, goal: S) -> NodeRef<S> {
        Rc::new(SearchNode {
            state,
            parent: None,
            g_score: 0.0,
            goal: Rc::new(goal),
        })
    }

    pub fn child(parent: &NodeRef<S>, state: S, edge_cost: f64) -> NodeRef<S> {
        debug_assert!(edge_cost >= 0.0, "negative edge cost {edge_cost}");
        Rc::new(SearchNode {
            state,
            parent: Some(Rc::clone(parent)),
            g_score: parent.g_score + edge_cost,
            goal: Rc::clone(&parent.goal),
        })
    }

    pub fn goal_state(&self) -> &S {
        &self.goal
    }

    /// States from the root of the back-pointer tree down to this node.
    pub fn path(&self) -> Vec<S> {
        let mut path = vec![self.state.clone()];
        let mut current = self.parent.as_ref();
        while let Some(node) = current {
            path.push(node.state.clone());
            current = node.parent.as_ref();
        }
        path.reverse();
        path
    }
}

impl<S: State> PartialEq for SearchNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<S: State> Eq for SearchNode<S> {}

impl<S: State> Hash for SearchNode<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.hash(state);
    }
}

// Unlink the chain one ancestor at a time, otherwise dropping the tail of a
// long path recurses once per node.
impl<S: State> Drop for SearchNode<S> {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Walks back-pointers from `node` until `start` (or a missing parent) and
/// returns the states in travel order.
pub fn reconstruct_path<S: State>(start: &S, node: &SearchNode<S>) -> Vec<S> {
    let mut path = vec![node.state.clone()];
    let mut current = node;
    while current.state != *start {
        match current.parent.as_deref() {
            Some(parent) => {
                path.push(parent.state.clone());
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution<S: State> {
    pub path: Vec<S>,
    pub cost: f64,
    /// Anytime pass (1-based) that produced this solution.
    pub pass: usize,
    /// Expansions performed up to and including that pass.
    pub expanded: usize,
}
