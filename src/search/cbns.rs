//! Component-based neighbourhood search (CBNS).
//!
//! Each step removes the longest-unmoved node of a large component and
//! restores the removed node whose return costs least.
//!
//! # Reference
//!
//! Zhou, Y., Hao, J.-K. & Glover, F. (2019). "Memetic search for
//! identifying critical nodes in sparse graphs", *IEEE Transactions on
//! Cybernetics* 49(10), 3699-3712.

use rand::Rng;

use super::config::SearchConfig;
use super::runner::descend;
use super::types::SearchResult;
use crate::graph::CnpGraph;

pub(super) fn run<R: Rng>(graph: &mut CnpGraph, config: &SearchConfig, rng: &mut R) -> SearchResult {
    descend(graph, config.max_idle_steps, |g, step| {
        let Some(component) = g.select_removed_component(rng) else {
            return;
        };
        let Some(node) = g.age_node_from_component(component, rng) else {
            return;
        };
        swap(g, node, step, rng);
    })
}

/// Removes `node`, then restores the cheapest removed node. Both moves are
/// stamped with `step`.
pub(super) fn swap<R: Rng>(g: &mut CnpGraph, node: usize, step: u64, rng: &mut R) {
    g.remove_node(node);
    g.set_node_age(node, step);
    if let Some(back) = g.greedy_node_to_add(rng) {
        g.add_node(back);
        g.set_node_age(back, step);
    }
}
