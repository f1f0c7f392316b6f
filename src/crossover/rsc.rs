//! Reduce-Solve-Combine (RSC) crossover.
//!
//! Nodes removed by both parents are fixed as removed with probability
//! `beta`. The instance is shrunk by deleting them, a random start on the
//! reduced instance is refined by the inner local search, and the fixed
//! nodes plus the refined removal form the offspring.

use rand::Rng;

use super::types::check_parents;
use crate::error::{CnpError, Result};
use crate::graph::{Graph, Solution};
use crate::random::create_rng;
use crate::search::LocalSearch;

/// Builds an RSC offspring from two parents.
///
/// # Errors
///
/// [`CnpError::ParentCount`] unless two parents are given,
/// [`CnpError::InvalidReduceParams`] for `beta` outside `[0, 1]`, and any
/// error of the inner search.
///
/// # Examples
///
/// ```
/// use u_cnp::crossover::reduce_solve_combine;
/// use u_cnp::graph::{ProblemData, ProblemType, Solution};
/// use u_cnp::search::{LocalSearch, SearchStrategy};
///
/// let data = ProblemData::from_edges((0..9).map(|i| (i, i + 1)));
/// let graph = data.create_original_graph(ProblemType::Cnp, 2, 1).unwrap();
/// let a: Solution = [3, 6].into_iter().collect();
/// let b: Solution = [3, 7].into_iter().collect();
/// let inner = LocalSearch::new(SearchStrategy::Cbns);
/// let child = reduce_solve_combine(&graph, &[&a, &b], &inner, 1.0, 5).unwrap();
/// assert_eq!(child.removed_nodes().len(), 2);
/// assert!(child.removed_nodes().contains(&3));
/// ```
pub fn reduce_solve_combine(
    original: &Graph,
    parents: &[&Solution],
    search: &LocalSearch,
    beta: f64,
    seed: u64,
) -> Result<Graph> {
    check_parents("RSC", parents, 2)?;
    if !(0.0..=1.0).contains(&beta) {
        return Err(CnpError::InvalidReduceParams(format!(
            "beta for RSC crossover must be in [0, 1], got {beta}"
        )));
    }
    let mut rng = create_rng(seed);

    let preserved: Solution = parents[0]
        .iter()
        .copied()
        .filter(|node| parents[1].contains(node) && rng.random::<f64>() < beta)
        .collect();

    let mut working = original.clone();
    working.reduce_by_removed_nodes(&preserved);
    let mut reduced = working.random_feasible_graph(&mut rng);
    let inner = search.run(&mut reduced, seed)?;

    let mut combined = preserved;
    combined.extend(inner.solution);
    let mut offspring = original.clone();
    offspring.update_by_removed_nodes(&combined);
    Ok(offspring)
}
