use crate::common::{NodeRef, State};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct QueueEntry<S: State> {
    priority: f64,
    seq: u64,
    node: NodeRef<S>,
}

impl<S: State> PartialEq for QueueEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: State> Eq for QueueEntry<S> {}

impl<S: State> PartialOrd for QueueEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: the "greatest" entry is the one popped first.
impl<S: State> Ord for QueueEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            // Lower g cost first
            .then_with(|| other.node.g_score.total_cmp(&self.node.g_score))
            // Earlier insertion first
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of search nodes. Priorities are fixed at push time.
pub struct PriorityQueue<S: State> {
    heap: BinaryHeap<QueueEntry<S>>,
    seq: u64,
}

impl<S: State> Default for PriorityQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> PriorityQueue<S> {
    pub fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn push(&mut self, priority: f64, node: NodeRef<S>) {
        assert!(!priority.is_nan(), "NaN priority for {:?}", node.state);
        self.heap.push(QueueEntry {
            priority,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    pub fn pop(&mut self) -> NodeRef<S> {
        match self.heap.pop() {
            Some(entry) => entry.node,
            None => panic!("pop from an empty priority queue"),
        }
    }

    pub fn peek(&self) -> (f64, &NodeRef<S>) {
        match self.heap.peek() {
            Some(entry) => (entry.priority, &entry.node),
            None => panic!("peek from an empty priority queue"),
        }
    }

    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Every node currently queued, in no particular order.
    pub fn enumerate(&self) -> Vec<NodeRef<S>> {
        self.heap.iter().map(|entry| entry.node.clone()).collect()
    }
}
