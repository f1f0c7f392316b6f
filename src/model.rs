//! Convenience front end.
//!
//! [`Model`] collects a graph edge by edge and solves it with default
//! parameters. For full control, go through [`Model::search`].

use crate::error::Result;
use crate::graph::{Node, ProblemData, ProblemType};
use crate::memetic::{MemeticResult, MemeticSearch, MemeticSearchBuilder, MemeticSearchParams};
use crate::stop::StoppingCriterion;

/// A graph under construction plus a one-call solver.
///
/// # Examples
///
/// ```
/// use u_cnp::model::Model;
/// use u_cnp::stop::MaxIterations;
///
/// let mut model = Model::new();
/// for i in 1..6 {
///     model.add_edge(0, i);
///     model.add_edge(10, 10 + i);
/// }
/// model.add_edge(0, 10);
///
/// let mut stop = MaxIterations::new(3).unwrap();
/// let result = model.solve("CNP", 2, &mut stop, 1).unwrap();
/// assert_eq!(result.best_obj_value, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    data: ProblemData,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing problem data, e.g. from [`crate::graph::read`].
    pub fn from_data(data: ProblemData) -> Self {
        Self { data }
    }

    pub fn add_node(&mut self, node: Node) {
        self.data.add_node(node);
    }

    /// Adds an undirected edge; endpoints are added as needed.
    pub fn add_edge(&mut self, u: Node, v: Node) {
        self.data.add_edge(u, v);
    }

    pub fn problem_data(&self) -> &ProblemData {
        &self.data
    }

    /// A search builder over this model's graph.
    pub fn search(&self) -> MemeticSearchBuilder<'_> {
        MemeticSearch::builder(&self.data)
    }

    /// Solves with the default parameters for `problem_type`, quietly and
    /// with statistics collected.
    pub fn solve(
        &self,
        problem_type: &str,
        budget: usize,
        stop: &mut dyn StoppingCriterion,
        seed: u64,
    ) -> Result<MemeticResult> {
        let problem_type: ProblemType = problem_type.parse()?;
        self.search()
            .problem_type(problem_type.as_str())
            .budget(budget)
            .seed(seed)
            .params(MemeticSearchParams::for_problem(problem_type))
            .build()?
            .run(stop, true, false)
    }
}
