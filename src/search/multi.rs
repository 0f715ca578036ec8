use super::frontier::Frontier;
use super::SearchFrontier;
use crate::common::{NodeRef, State};

use tracing::{debug, trace};

/// Which frontier serves the next expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Anchor,
    Inadmissible(usize),
}

/// How inadmissible frontiers track closed states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosedSharing {
    /// Each frontier closes only what it pops itself (IMHA*).
    #[default]
    Independent,
    /// A pop from any inadmissible frontier closes the state in all of
    /// them (SMHA*).
    Shared,
}

/// Round-robin selection between inadmissible frontiers, backed by the
/// anchor whenever the candidate is outside the `w2` bound.
#[derive(Debug, Clone)]
pub struct FrontierPicker {
    index: usize,
    w2: f64,
    decay: f64,
}

impl FrontierPicker {
    pub fn new(w2: f64, decay: f64) -> Self {
        FrontierPicker {
            index: 0,
            w2,
            decay,
        }
    }

    pub fn w2(&self) -> f64 {
        self.w2
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pick<S: State>(&self, anchor: &Frontier<S>, inads: &[Frontier<S>]) -> Lane {
        let bound = match anchor.peek_priority() {
            Some(priority) => self.w2 * priority,
            None => return Lane::Anchor,
        };
        // Skip exhausted lanes; the first live one is the candidate.
        let candidate = (0..inads.len())
            .map(|offset| (self.index + offset) % inads.len())
            .find(|&i| !inads[i].is_empty());
        match candidate {
            Some(i) if inads[i].peek_priority().is_some_and(|p| p <= bound) => Lane::Inadmissible(i),
            _ => Lane::Anchor,
        }
    }

    pub fn advance(&mut self, lane: Lane, lanes: usize) {
        if let Lane::Inadmissible(i) = lane {
            self.index = (i + 1) % lanes;
        }
    }

    fn restart(&mut self) {
        self.w2 = (self.w2 - self.decay).max(1.0);
        self.index = 0;
    }
}

/// An admissible anchor frontier plus inadmissible frontiers that all see
/// every generated node but race on their own priorities.
pub struct MultiFrontier<S: State> {
    anchor: Frontier<S>,
    inads: Vec<Frontier<S>>,
    picker: FrontierPicker,
    sharing: ClosedSharing,
}

impl<S: State> MultiFrontier<S> {
    pub fn new(
        anchor: Frontier<S>,
        inads: Vec<Frontier<S>>,
        w2: f64,
        decay: f64,
        sharing: ClosedSharing,
    ) -> Self {
        assert!(
            !inads.is_empty(),
            "multi frontier needs at least one inadmissible frontier"
        );
        MultiFrontier {
            anchor,
            inads,
            picker: FrontierPicker::new(w2, decay),
            sharing,
        }
    }

    pub fn anchor(&self) -> &Frontier<S> {
        &self.anchor
    }

    pub fn inadmissible(&self) -> &[Frontier<S>] {
        &self.inads
    }

    pub fn picker(&self) -> &FrontierPicker {
        &self.picker
    }

    pub fn pick(&self) -> Lane {
        self.picker.pick(&self.anchor, &self.inads)
    }

    fn lane(&self, lane: Lane) -> &Frontier<S> {
        match lane {
            Lane::Anchor => &self.anchor,
            Lane::Inadmissible(i) => &self.inads[i],
        }
    }
}

impl<S: State> SearchFrontier<S> for MultiFrontier<S> {
    fn insert(&mut self, node: NodeRef<S>) {
        self.anchor.insert(node.clone());
        for frontier in &mut self.inads {
            frontier.insert(node.clone());
        }
    }

    fn remove(&mut self) -> NodeRef<S> {
        let lane = self.pick();
        trace!("pick {lane:?}");
        self.picker.advance(lane, self.inads.len());
        match lane {
            Lane::Anchor => self.anchor.remove(),
            Lane::Inadmissible(i) => {
                let node = self.inads[i].remove();
                if self.sharing == ClosedSharing::Shared {
                    for (j, frontier) in self.inads.iter_mut().enumerate() {
                        if j != i {
                            frontier.close(&node);
                        }
                    }
                }
                node
            }
        }
    }

    fn expand_node(&mut self, node: &NodeRef<S>) -> usize {
        let mut generated = self.anchor.expand_node(node);
        for frontier in &mut self.inads {
            generated = generated.max(frontier.expand_node(node));
        }
        generated
    }

    fn peek(&self) -> NodeRef<S> {
        self.lane(self.pick()).peek()
    }

    fn is_empty(&self) -> bool {
        self.anchor.is_empty()
    }

    fn restart(&mut self) -> bool {
        if !self.anchor.restart() {
            return false;
        }
        for frontier in &mut self.inads {
            if !frontier.restart() {
                return false;
            }
        }
        self.picker.restart();
        debug!("multi frontier restart: w2 {:?}", self.picker.w2());
        true
    }

    fn observe_solution(&mut self, cost: f64) {
        self.anchor.observe_solution(cost);
        for frontier in &mut self.inads {
            frontier.observe_solution(cost);
        }
    }
}
