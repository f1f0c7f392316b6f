//! The graph handed between crossover and local search.

use rand::Rng;

use super::cnp::CnpGraph;
use super::dcnp::DcnpGraph;
use super::types::{Node, ProblemType, Solution};

/// A CNP or DCNP graph together with its current removed set.
///
/// Operators that only make sense for one objective reach the concrete
/// graph through [`Graph::as_cnp_mut`] / [`Graph::as_dcnp_mut`].
#[derive(Debug, Clone)]
pub enum Graph {
    Cnp(CnpGraph),
    Dcnp(DcnpGraph),
}

impl Graph {
    /// Objective this graph measures.
    pub fn problem_type(&self) -> ProblemType {
        match self {
            Graph::Cnp(_) => ProblemType::Cnp,
            Graph::Dcnp(_) => ProblemType::Dcnp,
        }
    }

    /// Number of nodes still part of the instance.
    pub fn num_nodes(&self) -> usize {
        match self {
            Graph::Cnp(g) => g.num_nodes(),
            Graph::Dcnp(g) => g.num_nodes(),
        }
    }

    /// Size of the node id space.
    pub fn id_space(&self) -> usize {
        match self {
            Graph::Cnp(g) => g.id_space(),
            Graph::Dcnp(g) => g.id_space(),
        }
    }

    /// Removal budget.
    pub fn budget(&self) -> usize {
        match self {
            Graph::Cnp(g) => g.budget(),
            Graph::Dcnp(g) => g.budget(),
        }
    }

    /// Currently removed nodes.
    pub fn removed_nodes(&self) -> &Solution {
        match self {
            Graph::Cnp(g) => g.removed_nodes(),
            Graph::Dcnp(g) => g.removed_nodes(),
        }
    }

    /// Returns `true` if `node` is currently removed.
    pub fn is_removed(&self, node: Node) -> bool {
        match self {
            Graph::Cnp(g) => g.is_removed(node),
            Graph::Dcnp(g) => g.is_removed(node),
        }
    }

    /// Returns `true` if `node` belongs to the instance.
    pub fn is_active(&self, node: Node) -> bool {
        match self {
            Graph::Cnp(g) => g.is_active(node),
            Graph::Dcnp(g) => g.is_active(node),
        }
    }

    /// Residual connectivity; lower is better.
    pub fn objective_value(&self) -> u64 {
        match self {
            Graph::Cnp(g) => g.objective_value(),
            Graph::Dcnp(g) => g.objective_value(),
        }
    }

    pub fn remove_node(&mut self, node: Node) {
        match self {
            Graph::Cnp(g) => g.remove_node(node),
            Graph::Dcnp(g) => g.remove_node(node),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        match self {
            Graph::Cnp(g) => g.add_node(node),
            Graph::Dcnp(g) => g.add_node(node),
        }
    }

    pub fn set_node_age(&mut self, node: Node, age: u64) {
        match self {
            Graph::Cnp(g) => g.set_node_age(node, age),
            Graph::Dcnp(g) => g.set_node_age(node, age),
        }
    }

    /// Replaces the removed set with `nodes`.
    pub fn update_by_removed_nodes(&mut self, nodes: &Solution) {
        match self {
            Graph::Cnp(g) => g.update_by_removed_nodes(nodes),
            Graph::Dcnp(g) => g.update_by_removed_nodes(nodes),
        }
    }

    /// Fixes `nodes` as removed by deleting them from the instance; the
    /// budget shrinks by the number deleted.
    pub fn reduce_by_removed_nodes(&mut self, nodes: &Solution) {
        match self {
            Graph::Cnp(g) => g.reduce_by_removed_nodes(nodes),
            Graph::Dcnp(g) => g.reduce_by_removed_nodes(nodes),
        }
    }

    /// Copy with exactly `budget` uniformly chosen nodes removed.
    pub fn random_feasible_graph<R: Rng>(&self, rng: &mut R) -> Graph {
        match self {
            Graph::Cnp(g) => Graph::Cnp(g.random_feasible_graph(rng)),
            Graph::Dcnp(g) => Graph::Dcnp(g.random_feasible_graph(rng)),
        }
    }

    /// Removed node that is cheapest to restore.
    pub fn best_node_to_add<R: Rng>(&mut self, rng: &mut R) -> Option<Node> {
        match self {
            Graph::Cnp(g) => g.greedy_node_to_add(rng),
            Graph::Dcnp(g) => g.best_node_to_add(rng),
        }
    }

    /// Random present node.
    pub fn random_node_to_remove<R: Rng>(&self, rng: &mut R) -> Option<Node> {
        match self {
            Graph::Cnp(g) => g.random_node_to_remove(rng),
            Graph::Dcnp(g) => g.random_node_to_remove(rng),
        }
    }

    pub fn as_cnp_mut(&mut self) -> Option<&mut CnpGraph> {
        match self {
            Graph::Cnp(g) => Some(g),
            Graph::Dcnp(_) => None,
        }
    }

    pub fn as_dcnp_mut(&mut self) -> Option<&mut DcnpGraph> {
        match self {
            Graph::Dcnp(g) => Some(g),
            Graph::Cnp(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProblemData;
    use crate::random::create_rng;

    #[test]
    fn test_dispatch_keeps_kind() {
        let data = ProblemData::from_edges([(0, 1), (1, 2), (2, 3)]);
        let mut rng = create_rng(4);
        let cnp = data.create_original_graph(ProblemType::Cnp, 1, 2).unwrap();
        let dcnp = data.create_original_graph(ProblemType::Dcnp, 1, 2).unwrap();
        assert_eq!(cnp.random_feasible_graph(&mut rng).problem_type(), ProblemType::Cnp);
        assert_eq!(dcnp.random_feasible_graph(&mut rng).problem_type(), ProblemType::Dcnp);
    }

    #[test]
    fn test_best_node_to_add_restores_cheapest() {
        let data = ProblemData::from_edges([(0, 1), (1, 2), (2, 3), (3, 4)]);
        let mut graph = data.create_original_graph(ProblemType::Cnp, 2, 1).unwrap();
        graph.update_by_removed_nodes(&[0, 2].into_iter().collect());
        let mut rng = create_rng(0);
        assert_eq!(graph.best_node_to_add(&mut rng), Some(0));
        assert!(graph.as_cnp_mut().is_some());
        assert!(graph.as_dcnp_mut().is_none());
    }
}
