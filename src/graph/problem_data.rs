//! Raw problem instance: node set plus undirected adjacency.

use std::collections::BTreeSet;

use super::cnp::CnpGraph;
use super::dcnp::DcnpGraph;
use super::instance::Graph;
use super::types::{Node, ProblemType};
use crate::error::{CnpError, Result};

/// Hop limit used when a DCNP instance does not set one; large enough
/// to behave as "no limit" on any graph that fits in memory.
pub const DEFAULT_HOP_DISTANCE: usize = 1 << 30;

/// Undirected graph data prior to choosing an objective.
///
/// Node ids are dense indices; `add_edge` creates missing endpoints.
///
/// # Examples
///
/// ```
/// use u_cnp::graph::ProblemData;
///
/// let mut data = ProblemData::new();
/// data.add_edge(0, 1);
/// data.add_edge(1, 2);
/// assert_eq!(data.num_nodes(), 3);
/// assert_eq!(data.num_edges(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemData {
    nodes: BTreeSet<Node>,
    adjacency: Vec<BTreeSet<Node>>,
}

impl ProblemData {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance with nodes `0..num_nodes` and no edges.
    pub fn with_nodes(num_nodes: usize) -> Self {
        Self {
            nodes: (0..num_nodes).collect(),
            adjacency: vec![BTreeSet::new(); num_nodes],
        }
    }

    /// Builds an instance from an edge list.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Node, Node)>,
    {
        let mut data = Self::new();
        for (u, v) in edges {
            data.add_edge(u, v);
        }
        data
    }

    /// Adds an isolated node (no-op if present).
    pub fn add_node(&mut self, node: Node) {
        if node >= self.adjacency.len() {
            self.adjacency.resize(node + 1, BTreeSet::new());
        }
        self.nodes.insert(node);
    }

    /// Adds an undirected edge, creating both endpoints. Self loops only
    /// create the node.
    pub fn add_edge(&mut self, u: Node, v: Node) {
        self.add_node(u);
        self.add_node(v);
        if u != v {
            self.adjacency[u].insert(v);
            self.adjacency[v].insert(u);
        }
    }

    /// Number of nodes in the instance.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Size of the id space (`max id + 1`).
    pub fn id_space(&self) -> usize {
        self.adjacency.len()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns `true` if `node` was added.
    pub fn contains(&self, node: Node) -> bool {
        self.nodes.contains(&node)
    }

    /// Neighbours of `node` in ascending order.
    pub fn neighbors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Builds the graph the search works on.
    ///
    /// # Errors
    ///
    /// Returns [`CnpError::InvalidParameter`] when the budget exceeds the
    /// number of nodes, or when a DCNP hop distance of zero is requested.
    pub fn create_original_graph(
        &self,
        problem_type: ProblemType,
        budget: usize,
        hop_distance: usize,
    ) -> Result<Graph> {
        if budget > self.num_nodes() {
            return Err(CnpError::InvalidParameter(format!(
                "budget {budget} exceeds the {} nodes of the instance",
                self.num_nodes()
            )));
        }
        match problem_type {
            ProblemType::Cnp => Ok(Graph::Cnp(CnpGraph::new(self, budget))),
            ProblemType::Dcnp => {
                if hop_distance == 0 {
                    return Err(CnpError::InvalidParameter(
                        "hop_distance must be at least 1".into(),
                    ));
                }
                Ok(Graph::Dcnp(DcnpGraph::new(self, budget, hop_distance)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_creates_nodes() {
        let mut data = ProblemData::new();
        data.add_edge(3, 1);
        assert_eq!(data.num_nodes(), 2);
        assert_eq!(data.id_space(), 4);
        assert!(data.contains(3));
        assert!(!data.contains(0));
        assert_eq!(data.neighbors(1).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_duplicate_and_self_edges() {
        let mut data = ProblemData::with_nodes(3);
        data.add_edge(0, 1);
        data.add_edge(1, 0);
        data.add_edge(2, 2);
        assert_eq!(data.num_edges(), 1);
        assert_eq!(data.num_nodes(), 3);
    }

    #[test]
    fn test_budget_exceeds_nodes() {
        let data = ProblemData::from_edges([(0, 1)]);
        let err = data
            .create_original_graph(ProblemType::Cnp, 3, DEFAULT_HOP_DISTANCE)
            .unwrap_err();
        assert!(matches!(err, CnpError::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_hop_distance_rejected() {
        let data = ProblemData::from_edges([(0, 1)]);
        assert!(data.create_original_graph(ProblemType::Dcnp, 1, 0).is_err());
        assert!(data.create_original_graph(ProblemType::Cnp, 1, 0).is_ok());
    }
}
