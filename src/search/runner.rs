//! Strategy dispatch and the shared idle-step loop.

use super::config::SearchConfig;
use super::types::{SearchResult, SearchStrategy};
use super::{bcls, cbns, chns, dlas};
use crate::error::{CnpError, Result};
use crate::graph::{CnpGraph, DcnpGraph, Graph, Solution};
use crate::random::create_rng;

/// Graph state the idle-step loop needs to track the incumbent.
pub(super) trait Residual {
    fn objective_value(&self) -> u64;
    fn removed_nodes(&self) -> &Solution;
}

impl Residual for CnpGraph {
    fn objective_value(&self) -> u64 {
        CnpGraph::objective_value(self)
    }
    fn removed_nodes(&self) -> &Solution {
        CnpGraph::removed_nodes(self)
    }
}

impl Residual for DcnpGraph {
    fn objective_value(&self) -> u64 {
        DcnpGraph::objective_value(self)
    }
    fn removed_nodes(&self) -> &Solution {
        DcnpGraph::removed_nodes(self)
    }
}

/// Applies `step` until `max_idle_steps` consecutive steps fail to beat
/// the best objective, and returns the best state seen.
///
/// `step` receives the 1-based step number.
pub(super) fn descend<G, F>(graph: &mut G, max_idle_steps: usize, mut step: F) -> SearchResult
where
    G: Residual,
    F: FnMut(&mut G, u64),
{
    let mut best = graph.removed_nodes().clone();
    let mut best_obj = graph.objective_value();
    let mut idle = 0;
    let mut steps = 0u64;

    while idle < max_idle_steps {
        steps += 1;
        step(graph, steps);

        let obj = graph.objective_value();
        if obj < best_obj {
            best_obj = obj;
            best = graph.removed_nodes().clone();
            idle = 0;
        } else {
            idle += 1;
        }
    }

    SearchResult {
        solution: best,
        obj_value: best_obj as f64,
    }
}

/// A configured local-search strategy.
///
/// # Examples
///
/// ```
/// use u_cnp::graph::{ProblemData, ProblemType};
/// use u_cnp::random::create_rng;
/// use u_cnp::search::{LocalSearch, SearchStrategy};
///
/// let data = ProblemData::from_edges((0..9).map(|i| (i, i + 1)));
/// let original = data.create_original_graph(ProblemType::Cnp, 1, 1).unwrap();
/// let mut graph = original.random_feasible_graph(&mut create_rng(3));
/// let search = LocalSearch::new(SearchStrategy::Chns);
/// let result = search.run(&mut graph, 7).unwrap();
/// assert_eq!(result.solution.len(), 1);
/// assert!(result.obj_value <= 45.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSearch {
    strategy: SearchStrategy,
    config: SearchConfig,
}

impl LocalSearch {
    /// Creates a search with the strategy's default parameters.
    pub fn new(strategy: SearchStrategy) -> Self {
        Self {
            strategy,
            config: SearchConfig::for_strategy(strategy),
        }
    }

    /// Overrides the parameters.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Refines the removed set of `graph` in place and returns the best
    /// solution seen. The graph is left in the search's final state.
    ///
    /// The search only swaps nodes, so `graph` must already hold exactly
    /// `budget` removed nodes, e.g. from [`Graph::random_feasible_graph`].
    ///
    /// # Errors
    ///
    /// [`CnpError::IncompatibleGraph`] when the strategy does not support
    /// the graph's problem type; [`CnpError::InvalidParameter`] for an
    /// invalid [`SearchConfig`] or a removed set of the wrong size.
    pub fn run(&self, graph: &mut Graph, seed: u64) -> Result<SearchResult> {
        self.config.validate().map_err(CnpError::InvalidParameter)?;
        if graph.removed_nodes().len() != graph.budget() {
            return Err(CnpError::InvalidParameter(format!(
                "search start must remove {} nodes, found {}",
                graph.budget(),
                graph.removed_nodes().len()
            )));
        }
        let mut rng = create_rng(seed);
        let problem_type = graph.problem_type();

        match (self.strategy, graph) {
            (SearchStrategy::Cbns, Graph::Cnp(g)) => Ok(cbns::run(g, &self.config, &mut rng)),
            (SearchStrategy::Chns, Graph::Cnp(g)) => Ok(chns::run(g, &self.config, &mut rng)),
            (SearchStrategy::Dlas, Graph::Cnp(g)) => Ok(dlas::run(g, &self.config, &mut rng)),
            (SearchStrategy::Bcls, Graph::Dcnp(g)) => Ok(bcls::run(g, &self.config, &mut rng)),
            (strategy, _) => Err(CnpError::IncompatibleGraph {
                operation: strategy.as_str(),
                problem_type: problem_type.to_string(),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ProblemData, ProblemType};

    fn two_stars() -> ProblemData {
        // two stars joined by a bridge 0-10; removing both centres is optimal
        let mut data = ProblemData::new();
        for i in 1..8 {
            data.add_edge(0, i);
            data.add_edge(10, 10 + i);
        }
        data.add_edge(0, 10);
        data
    }

    fn start_graph(problem_type: ProblemType, seed: u64) -> Graph {
        let original = two_stars().create_original_graph(problem_type, 2, 3).unwrap();
        let mut rng = create_rng(seed);
        original.random_feasible_graph(&mut rng)
    }

    #[test]
    fn test_cnp_strategies_find_centres() {
        for strategy in [SearchStrategy::Cbns, SearchStrategy::Chns, SearchStrategy::Dlas] {
            let mut graph = start_graph(ProblemType::Cnp, 3);
            let result = LocalSearch::new(strategy).run(&mut graph, 42).unwrap();
            assert_eq!(result.solution.len(), 2, "{strategy}");
            assert_eq!(result.obj_value, 0.0, "{strategy} got {:?}", result.solution);
        }
    }

    #[test]
    fn test_bcls_finds_centres() {
        let mut graph = start_graph(ProblemType::Dcnp, 5);
        let result = LocalSearch::new(SearchStrategy::Bcls).run(&mut graph, 42).unwrap();
        assert_eq!(result.solution.len(), 2);
        assert_eq!(result.obj_value, 0.0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let search = LocalSearch::new(SearchStrategy::Dlas)
            .with_config(SearchConfig::default().with_max_idle_steps(50));
        let mut a = start_graph(ProblemType::Cnp, 8);
        let mut b = start_graph(ProblemType::Cnp, 8);
        assert_eq!(search.run(&mut a, 9).unwrap(), search.run(&mut b, 9).unwrap());
    }

    #[test]
    fn test_result_never_worse_than_start() {
        let mut graph = start_graph(ProblemType::Cnp, 21);
        let start = graph.objective_value() as f64;
        let result = LocalSearch::new(SearchStrategy::Cbns)
            .with_config(SearchConfig::default().with_max_idle_steps(1))
            .run(&mut graph, 1)
            .unwrap();
        assert!(result.obj_value <= start);
    }

    #[test]
    fn test_incompatible_graph() {
        let mut graph = start_graph(ProblemType::Dcnp, 1);
        let err = LocalSearch::new(SearchStrategy::Chns).run(&mut graph, 0).unwrap_err();
        assert!(matches!(err, CnpError::IncompatibleGraph { .. }));

        let mut graph = start_graph(ProblemType::Cnp, 1);
        assert!(LocalSearch::new(SearchStrategy::Bcls).run(&mut graph, 0).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let mut graph = start_graph(ProblemType::Cnp, 1);
        let search = LocalSearch::new(SearchStrategy::Cbns)
            .with_config(SearchConfig::default().with_max_idle_steps(0));
        assert!(matches!(search.run(&mut graph, 0), Err(CnpError::InvalidParameter(_))));
    }

    #[test]
    fn test_start_must_hold_budget() {
        let mut original = two_stars().create_original_graph(ProblemType::Cnp, 2, 3).unwrap();
        let err = LocalSearch::new(SearchStrategy::Chns).run(&mut original, 0).unwrap_err();
        assert!(err.to_string().contains("found 0"), "{err}");
    }
}
