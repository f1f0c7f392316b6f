//! Double backbone crossover (DBX).
//!
//! The backbone shared by both parents is always inherited. Every node
//! removed by only one parent is inherited with probability [`THETA`]. The
//! child is then repaired to exactly `budget` removed nodes: missing slots
//! are filled with random nodes from large components, surplus nodes are
//! restored greedily.
//!
//! # Reference
//!
//! Zhou, Y. & Hao, J.-K. (2017). "A fast heuristic algorithm for the
//! critical node problem", *GECCO '17 Companion*, 121-122.

use rand::Rng;

use super::types::check_parents;
use crate::error::{CnpError, Result};
use crate::graph::{Graph, Solution};
use crate::random::create_rng;

/// Inheritance probability for nodes removed by a single parent.
pub const THETA: f64 = 0.85;

/// Builds a DBX offspring from two parents on a CNP graph.
///
/// # Errors
///
/// [`CnpError::ParentCount`] unless two parents are given;
/// [`CnpError::IncompatibleGraph`] for a DCNP graph.
pub fn double_backbone_crossover(original: &Graph, parents: &[&Solution], seed: u64) -> Result<Graph> {
    check_parents("DBX", parents, 2)?;
    let mut offspring = original.clone();
    let Some(graph) = offspring.as_cnp_mut() else {
        return Err(CnpError::IncompatibleGraph {
            operation: "DBX",
            problem_type: original.problem_type().to_string(),
        });
    };
    let mut rng = create_rng(seed);
    let (first, second) = (parents[0], parents[1]);

    let mut inherited = Solution::new();
    for &node in first {
        if second.contains(&node) || rng.random::<f64>() < THETA {
            inherited.insert(node);
        }
    }
    for &node in second {
        if !inherited.contains(&node) && rng.random::<f64>() < THETA {
            inherited.insert(node);
        }
    }
    graph.update_by_removed_nodes(&inherited);

    let target = graph.budget();
    while graph.removed_nodes().len() < target {
        let Some(node) = graph
            .select_removed_component(&mut rng)
            .and_then(|c| graph.random_node_from_component(c, &mut rng))
        else {
            break;
        };
        graph.remove_node(node);
    }
    while graph.removed_nodes().len() > target {
        let Some(node) = graph.greedy_node_to_add(&mut rng) else {
            break;
        };
        graph.add_node(node);
    }
    Ok(offspring)
}
