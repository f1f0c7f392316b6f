//! Betweenness-centrality local search (BCLS) for DCNP.
//!
//! Nodes are queued by decreasing betweenness. Each step pops the front
//! candidate; with probability `selection_prob` it is removed and the
//! cheapest removed node is restored (and queued at the back), otherwise
//! the candidate is re-queued behind the first five.

use std::collections::VecDeque;

use rand::Rng;

use super::config::SearchConfig;
use super::runner::descend;
use super::types::SearchResult;
use crate::graph::{DcnpGraph, Node};

/// Position a skipped candidate is re-inserted at.
const REQUEUE_POSITION: usize = 5;

pub(super) fn run<R: Rng>(graph: &mut DcnpGraph, config: &SearchConfig, rng: &mut R) -> SearchResult {
    let centrality = graph.betweenness_centrality();
    let mut order: Vec<Node> = (0..graph.id_space()).filter(|&v| graph.is_active(v)).collect();
    order.sort_by(|&a, &b| centrality[b].total_cmp(&centrality[a]).then(a.cmp(&b)));
    let mut candidates: VecDeque<Node> = order.into();
    let selection_prob = config.selection_prob;

    descend(graph, config.max_idle_steps, |g, _| {
        while let Some(node) = candidates.pop_front() {
            let r: f64 = rng.random();
            if g.is_removed(node) {
                continue;
            }
            if r < selection_prob {
                g.remove_node(node);
                match g.best_node_to_add(rng) {
                    Some(back) => {
                        g.add_node(back);
                        candidates.push_back(back);
                    }
                    None => candidates.push_front(node),
                }
                return;
            }
            if candidates.len() >= REQUEUE_POSITION {
                candidates.insert(REQUEUE_POSITION, node);
            } else {
                candidates.push_back(node);
            }
        }
    })
}
