//! Diversified late acceptance search (DLAS).
//!
//! A random node of a large component is swapped out; the move is kept if
//! it leaves the cost unchanged or beats the worst cost in a short
//! history, otherwise the previous removed set is restored.
//!
//! # Reference
//!
//! Namazi, M. et al. (2018). "Diversified Late Acceptance Search",
//! *AI 2018: Advances in Artificial Intelligence*, 299-311.

use rand::Rng;

use super::config::SearchConfig;
use super::runner::descend;
use super::types::SearchResult;
use crate::graph::CnpGraph;

/// Late-acceptance cost history with a cached maximum.
struct History {
    costs: Vec<u64>,
    max_cost: u64,
    num_max: usize,
}

impl History {
    fn new(length: usize, initial: u64) -> Self {
        Self {
            costs: vec![initial; length],
            max_cost: initial,
            num_max: length,
        }
    }

    fn accepts(&self, previous: u64, current: u64) -> bool {
        current == previous || current < self.max_cost
    }

    fn record(&mut self, step: u64, previous: u64, current: u64) {
        let slot = (step % self.costs.len() as u64) as usize;
        let old = self.costs[slot];
        if current > old {
            self.costs[slot] = current;
            if current > self.max_cost {
                self.max_cost = current;
                self.num_max = 1;
            } else if current == self.max_cost {
                self.num_max += 1;
            }
        } else if current < old && current < previous {
            self.costs[slot] = current;
            if old == self.max_cost {
                self.num_max -= 1;
            }
            if self.num_max == 0 {
                self.max_cost = self.costs.iter().copied().max().unwrap_or(current);
                self.num_max = self.costs.iter().filter(|&&c| c == self.max_cost).count();
            }
        }
    }
}

pub(super) fn run<R: Rng>(graph: &mut CnpGraph, config: &SearchConfig, rng: &mut R) -> SearchResult {
    let mut history = History::new(config.history_length, graph.objective_value());

    descend(graph, config.max_idle_steps, |g, step| {
        let previous_removed = g.removed_nodes().clone();
        let previous = g.objective_value();

        let Some(component) = g.select_removed_component(rng) else {
            return;
        };
        let Some(node) = g.random_node_from_component(component, rng) else {
            return;
        };
        g.remove_node(node);
        if let Some(back) = g.greedy_node_to_add(rng) {
            g.add_node(back);
            g.set_node_age(back, step);
        }

        let mut current = g.objective_value();
        if !history.accepts(previous, current) {
            g.update_by_removed_nodes(&previous_removed);
            current = previous;
        }
        history.record(step, previous, current);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_tracks_max() {
        let mut h = History::new(3, 10);
        assert!(h.accepts(10, 10));
        assert!(h.accepts(12, 9));
        assert!(!h.accepts(9, 11));

        // lower every slot once; the cached maximum follows
        h.record(0, 10, 8);
        h.record(1, 10, 7);
        assert_eq!(h.max_cost, 10);
        h.record(2, 10, 6);
        assert_eq!(h.max_cost, 8);
        assert_eq!(h.num_max, 1);
    }
}
