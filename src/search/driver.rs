use super::SearchFrontier;
use crate::common::{reconstruct_path, NodeRef, SearchNode, Solution, State};
use crate::stat::Stats;

use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Anytime repairing loop over any frontier.
///
/// Every pass starts with `restart()`, so the policy's first `update()`
/// happens before the first node is expanded. A pass ends when the goal
/// reaches the head of the frontier (the goal node stays queued) or when the
/// frontier runs dry. Returns one solution per pass that found one, with
/// non-increasing costs.
#[instrument(skip_all, name = "anytime_search", level = "debug")]
pub fn anytime_search<S, F, G>(
    start: NodeRef<S>,
    goal_check: G,
    frontier: &mut F,
    stats: &mut Stats,
) -> Vec<Solution<S>>
where
    S: State,
    F: SearchFrontier<S>,
    G: Fn(&SearchNode<S>) -> bool,
{
    let search_start_time = Instant::now();
    let mut solutions: Vec<Solution<S>> = Vec::new();

    frontier.insert(start.clone());
    while frontier.restart() {
        stats.passes += 1;
        debug!("pass {:?}", stats.passes);

        while !frontier.is_empty() {
            let current = frontier.peek();
            if goal_check(&current) {
                let cost = current.g_score;
                if solutions.last().is_some_and(|best| cost > best.cost) {
                    warn!("pass {:?} found a worse solution {cost:?}, dropped", stats.passes);
                } else {
                    let solution = Solution {
                        path: reconstruct_path(&start.state, &current),
                        cost,
                        pass: stats.passes,
                        expanded: stats.expanded_nodes,
                    };
                    info!(
                        "pass {:?}: solution cost {:?} with {:?} steps",
                        stats.passes,
                        cost,
                        solution.path.len()
                    );
                    solutions.push(solution);
                    stats.solutions += 1;
                    stats.best_cost = Some(cost);
                }
                frontier.observe_solution(cost);
                break;
            }

            let node = frontier.remove();
            trace!("expand node: {:?} g {:?}", node.state, node.g_score);
            stats.expanded_nodes += 1;
            stats.generated_nodes += frontier.expand_node(&node);
        }
    }

    stats.time_ms = search_start_time.elapsed().as_millis() as usize;
    solutions
}
