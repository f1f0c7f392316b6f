//! Memetic loop execution.
//!
//! [`MemeticSearch`] orchestrates the complete process:
//! validation → population initialization → selection → crossover →
//! local search → population update → repeat until the stopping criterion
//! fires.

use std::time::Instant;

use tracing::debug;

use super::config::{MemeticSearchParams, ReduceSettings, VariablePopulationParams, DEFAULT_DISPLAY_INTERVAL};
use super::population::{Population, PopulationConfig};
use super::progress::ProgressPrinter;
use super::result::MemeticResult;
use super::statistics::Statistics;
use super::validation::{
    validate_crossover_strategy, validate_problem_type, validate_reduce_params, validate_search_strategy,
};
use crate::crossover::{
    double_backbone_crossover, inherit_repair_recombination, reduce_solve_combine, CrossoverStrategy,
};
use crate::error::{CnpError, Result};
use crate::graph::{Graph, ProblemData, ProblemType, Solution, DEFAULT_HOP_DISTANCE};
use crate::search::LocalSearch;
use crate::stop::StoppingCriterion;

/// Builder for [`MemeticSearch`]; all checks run in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MemeticSearchBuilder<'a> {
    data: &'a ProblemData,
    problem_type: String,
    budget: Option<usize>,
    seed: u64,
    params: Option<MemeticSearchParams>,
    variable_params: VariablePopulationParams,
    hop_distance: usize,
    display_interval: f64,
    parallel: bool,
}

impl<'a> MemeticSearchBuilder<'a> {
    fn new(data: &'a ProblemData) -> Self {
        Self {
            data,
            problem_type: ProblemType::Cnp.as_str().to_string(),
            budget: None,
            seed: 0,
            params: None,
            variable_params: VariablePopulationParams::default(),
            hop_distance: DEFAULT_HOP_DISTANCE,
            display_interval: DEFAULT_DISPLAY_INTERVAL,
            parallel: false,
        }
    }

    /// `"CNP"` or `"DCNP"`, case-insensitive. Defaults to CNP.
    pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = problem_type.into();
        self
    }

    /// Number of nodes to remove. Required.
    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Initial value of the run's seed counter.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Strategy and population parameters. Without this call the
    /// defaults of [`MemeticSearchParams::for_problem`] are used.
    pub fn params(mut self, params: MemeticSearchParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn variable_params(mut self, params: VariablePopulationParams) -> Self {
        self.variable_params = params;
        self
    }

    /// Hop limit for DCNP; ignored for CNP.
    pub fn hop_distance(mut self, hop_distance: usize) -> Self {
        self.hop_distance = hop_distance;
        self
    }

    /// Seconds between progress lines.
    pub fn display_interval(mut self, seconds: f64) -> Self {
        self.display_interval = seconds;
        self
    }

    /// Runs the local searches of population initialization and growth on
    /// the rayon pool. Has an effect only with the `parallel` feature;
    /// results are identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration and builds the original graph.
    ///
    /// # Errors
    ///
    /// A configuration error for any invalid setting, checked before any
    /// graph is built; [`CnpError::GraphConstruction`] if the instance
    /// cannot be created from the problem data.
    pub fn build(self) -> Result<MemeticSearch> {
        if !(self.display_interval.is_finite() && self.display_interval > 0.0) {
            return Err(CnpError::InvalidParameter(format!(
                "display_interval must be positive, got {}",
                self.display_interval
            )));
        }
        let problem_type = validate_problem_type(&self.problem_type)?;
        let budget = self
            .budget
            .ok_or_else(|| CnpError::InvalidParameter("budget must be set".into()))?;

        let params = self
            .params
            .unwrap_or_else(|| MemeticSearchParams::for_problem(problem_type));
        params.validate().map_err(CnpError::InvalidParameter)?;
        self.variable_params
            .validate()
            .map_err(CnpError::InvalidParameter)?;
        if params.is_pop_variable && params.initial_pop_size > self.variable_params.max_pop_size {
            return Err(CnpError::InvalidParameter(format!(
                "initial_pop_size {} exceeds max_pop_size {}",
                params.initial_pop_size, self.variable_params.max_pop_size
            )));
        }

        let search = validate_search_strategy(&params.search, problem_type)?;
        let crossover = validate_crossover_strategy(&params, problem_type)?;
        let reduce = validate_reduce_params(&params.reduce_params, problem_type)?;

        let original = self
            .data
            .create_original_graph(problem_type, budget, self.hop_distance)
            .map_err(|e| CnpError::GraphConstruction(Box::new(e)))?;

        Ok(MemeticSearch {
            problem_type,
            budget,
            seed: self.seed,
            variable_params: self.variable_params,
            display_interval: self.display_interval,
            parallel: self.parallel,
            search: LocalSearch::new(search),
            crossover,
            reduce: Reducer {
                search: LocalSearch::new(reduce.search),
                settings: reduce,
            },
            params,
            original,
        })
    }
}

#[derive(Debug, Clone)]
struct Reducer {
    settings: ReduceSettings,
    search: LocalSearch,
}

/// A validated memetic search over one problem instance.
///
/// # Examples
///
/// ```
/// use u_cnp::graph::ProblemData;
/// use u_cnp::memetic::MemeticSearch;
/// use u_cnp::stop::MaxIterations;
///
/// let data = ProblemData::from_edges((0..19).map(|i| (i, i + 1)));
/// let search = MemeticSearch::builder(&data)
///     .problem_type("cnp")
///     .budget(3)
///     .seed(7)
///     .build()
///     .unwrap();
/// let mut stop = MaxIterations::new(5).unwrap();
/// let result = search.run(&mut stop, true, false).unwrap();
/// assert_eq!(result.best_solution.len(), 3);
/// assert_eq!(result.num_iterations, 4);
/// ```
#[derive(Debug, Clone)]
pub struct MemeticSearch {
    problem_type: ProblemType,
    budget: usize,
    seed: u64,
    params: MemeticSearchParams,
    variable_params: VariablePopulationParams,
    display_interval: f64,
    parallel: bool,
    search: LocalSearch,
    crossover: CrossoverStrategy,
    reduce: Reducer,
    original: Graph,
}

impl MemeticSearch {
    /// Starts configuring a search over `data`.
    pub fn builder(data: &ProblemData) -> MemeticSearchBuilder<'_> {
        MemeticSearchBuilder::new(data)
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Crossover chosen by validation.
    pub fn crossover(&self) -> CrossoverStrategy {
        self.crossover
    }

    /// Local search applied to every offspring.
    pub fn search(&self) -> &LocalSearch {
        &self.search
    }

    pub fn params(&self) -> &MemeticSearchParams {
        &self.params
    }

    /// Runs the memetic loop until `stop` fires.
    ///
    /// Every run starts its seed counter from the configured seed, so
    /// repeated runs with fresh criteria of the same kind reproduce each
    /// other. A time-based criterion also bounds population
    /// initialization.
    pub fn run(
        &self,
        stop: &mut dyn StoppingCriterion,
        collect_stats: bool,
        display: bool,
    ) -> Result<MemeticResult> {
        let start = Instant::now();
        let mut stats = Statistics::new(collect_stats);
        let mut printer = ProgressPrinter::new(display, self.display_interval);
        debug!(
            problem_type = %self.problem_type,
            budget = self.budget,
            seed = self.seed,
            search = %self.search.strategy(),
            crossover = %self.crossover,
            stop = %stop.name(),
            "memetic search started"
        );

        printer.start(self.problem_type, self.budget, self.seed);
        printer.initializing_population();

        let mut population = Population::new(
            &self.original,
            &self.search,
            PopulationConfig {
                initial_pop_size: self.params.initial_pop_size,
                is_pop_variable: self.params.is_pop_variable,
                max_pop_size: self.variable_params.max_pop_size,
                increase_pop_size: self.variable_params.increase_pop_size,
                max_idle_gens: self.variable_params.max_idle_gens,
                parallel: self.parallel,
            },
            self.seed,
        )?;

        let deadline = stop.deadline();
        let mut best_solution = Solution::new();
        let mut best_obj_value = f64::INFINITY;
        let mut best_found_at_time = 0.0;

        let (init_solution, init_obj_value) = population.initialize(display, deadline)?;
        if init_obj_value < best_obj_value {
            best_solution = init_solution;
            best_obj_value = init_obj_value;
            best_found_at_time = start.elapsed().as_secs_f64();
        }

        if !deadline.is_some_and(|d| Instant::now() >= d) {
            printer.iterations_header();
        }

        let mut seed = self.seed;
        let mut num_idle_generations = 0usize;
        let mut iterations = 0usize;

        while !stop.should_stop(best_obj_value) {
            iterations += 1;

            let mut offspring = self.offspring(&mut population, seed)?;
            seed = seed.wrapping_add(1);
            let result = self.search.run(&mut offspring, seed)?;
            seed = seed.wrapping_add(1);

            let improved = result.obj_value < best_obj_value;
            if improved {
                best_solution = result.solution.clone();
                best_obj_value = result.obj_value;
                best_found_at_time = start.elapsed().as_secs_f64();
            }
            population.update(result.solution, result.obj_value, num_idle_generations, display)?;
            num_idle_generations = if improved { 0 } else { num_idle_generations + 1 };

            stats.collect(best_obj_value, population.size(), num_idle_generations);
            printer.iteration(&stats);
        }

        let result = MemeticResult {
            best_solution,
            best_obj_value,
            num_iterations: iterations,
            runtime: start.elapsed().as_secs_f64(),
            best_found_at_time,
            stats: collect_stats.then_some(stats),
        };
        debug!(
            iterations,
            best_obj_value,
            runtime = result.runtime,
            "memetic search finished"
        );
        printer.end(&result);
        Ok(result)
    }

    /// Selects parents and applies the configured crossover.
    fn offspring(&self, population: &mut Population<'_>, seed: u64) -> Result<Graph> {
        match self.crossover {
            CrossoverStrategy::Rsc => {
                let (a, b) = population.select()?;
                let reducer = &self.reduce;
                reduce_solve_combine(&self.original, &[&a, &b], &reducer.search, reducer.settings.beta, seed)
            }
            CrossoverStrategy::Dbx => {
                let (a, b) = population.select()?;
                double_backbone_crossover(&self.original, &[&a, &b], seed)
            }
            CrossoverStrategy::Irr => {
                let (a, b, c) = population.get_all_three_solutions()?;
                inherit_repair_recombination(&self.original, &[&a, &b, &c], seed)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
