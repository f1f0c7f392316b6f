//! Component-based hybrid neighbourhood search (CHNS).
//!
//! Like CBNS, except that with probability `theta` the removed node is the
//! one whose removal splits its component best.

use rand::Rng;

use super::cbns::swap;
use super::config::SearchConfig;
use super::runner::descend;
use super::types::SearchResult;
use crate::graph::CnpGraph;

pub(super) fn run<R: Rng>(graph: &mut CnpGraph, config: &SearchConfig, rng: &mut R) -> SearchResult {
    let theta = config.theta;
    descend(graph, config.max_idle_steps, |g, step| {
        let Some(component) = g.select_removed_component(rng) else {
            return;
        };
        let node = if rng.random_bool(theta) {
            g.impact_node_from_component(component, rng)
        } else {
            g.age_node_from_component(component, rng)
        };
        if let Some(node) = node {
            swap(g, node, step, rng);
        }
    })
}
