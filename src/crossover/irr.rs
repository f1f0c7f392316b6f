//! Inherit-Repair-Recombination (IRR) crossover for DCNP.
//!
//! 1. Inherit: nodes removed by all three parents are kept.
//! 2. Recombine: up to 90% of the budget is filled by drawing from the
//!    nodes removed by two parents, one parent or none, in that order of
//!    preference.
//! 3. Repair: the remaining slots are filled with the node whose removal
//!    lowers the hop-limited connectivity most.

use rand::Rng;

use super::types::check_parents;
use crate::error::{CnpError, Result};
use crate::graph::{Graph, Node, Solution};
use crate::random::create_rng;

/// Share of the budget filled before greedy repair.
pub const TARGET_RATIO: f64 = 0.9;
/// Probability band for nodes removed by two parents.
pub const P2: f64 = 0.5;
/// Share of the remaining band for nodes removed by one parent.
pub const P1: f64 = 0.9;

fn take<R: Rng>(pool: &mut Vec<Node>, rng: &mut R) -> Option<Node> {
    if pool.is_empty() {
        None
    } else {
        Some(pool.remove(rng.random_range(0..pool.len())))
    }
}

/// Builds an IRR offspring from exactly three parents on a DCNP graph.
///
/// # Errors
///
/// [`CnpError::ParentCount`] unless three parents are given;
/// [`CnpError::IncompatibleGraph`] for a CNP graph.
pub fn inherit_repair_recombination(original: &Graph, parents: &[&Solution], seed: u64) -> Result<Graph> {
    check_parents("IRR", parents, 3)?;
    let mut offspring = original.clone();
    let Some(graph) = offspring.as_dcnp_mut() else {
        return Err(CnpError::IncompatibleGraph {
            operation: "IRR",
            problem_type: original.problem_type().to_string(),
        });
    };
    let mut rng = create_rng(seed);
    let budget = graph.budget();

    let mut frequency = vec![0usize; graph.id_space()];
    for parent in parents {
        for &node in parent.iter() {
            if let Some(f) = frequency.get_mut(node) {
                *f += 1;
            }
        }
    }

    let mut removed = Solution::new();
    let (mut twice, mut once, mut never) = (Vec::new(), Vec::new(), Vec::new());
    for node in (0..graph.id_space()).filter(|&v| graph.is_active(v)) {
        match frequency[node] {
            0 => never.push(node),
            1 => once.push(node),
            2 => twice.push(node),
            _ => {
                removed.insert(node);
            }
        }
    }

    let phase_target = ((TARGET_RATIO * budget as f64) as usize).min(budget);
    while removed.len() < phase_target {
        let r: f64 = rng.random();
        let node = if r < P2 && !twice.is_empty() {
            take(&mut twice, &mut rng)
        } else if r < P2 + (1.0 - P2) * P1 && !once.is_empty() {
            take(&mut once, &mut rng)
        } else if !never.is_empty() {
            take(&mut never, &mut rng)
        } else {
            take(&mut twice, &mut rng).or_else(|| take(&mut once, &mut rng))
        };
        match node {
            Some(node) => {
                removed.insert(node);
            }
            None => break,
        }
    }

    graph.update_by_removed_nodes(&removed);
    while graph.removed_nodes().len() < budget {
        let Some(node) = graph.best_node_to_remove(&mut rng) else {
            break;
        };
        graph.remove_node(node);
    }
    Ok(offspring)
}
