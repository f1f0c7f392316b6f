//! Memetic search configuration.
//!
//! [`MemeticSearchParams`] selects the strategies and the initial pool,
//! [`VariablePopulationParams`] controls idle-triggered growth, and
//! [`ReduceParams`] tunes the reduce-solve-combine crossover. Names are kept
//! as strings so that the validation layer can report exactly what the
//! caller wrote.

use crate::graph::ProblemType;
use crate::search::SearchStrategy;

/// Seconds between two throttled progress lines.
pub const DEFAULT_DISPLAY_INTERVAL: f64 = 1.0;

/// Parameters of the reduce-solve-combine crossover.
///
/// # Examples
///
/// ```
/// use u_cnp::memetic::ReduceParams;
///
/// let params = ReduceParams::default().with_beta(0.5);
/// assert_eq!(params.search, "CHNS");
/// assert!((params.beta - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReduceParams {
    /// Local search run on the reduced subproblem.
    pub search: String,

    /// Fraction of the common parent nodes fixed as removed (0.0–1.0).
    pub beta: f64,
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self {
            search: SearchStrategy::Chns.as_str().to_string(),
            beta: 0.9,
        }
    }
}

impl ReduceParams {
    /// Sets the inner search strategy name.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sets the preserved fraction. Out-of-range values are rejected by
    /// validation, not clamped.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }
}

/// Validated reduce parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceSettings {
    pub search: SearchStrategy,
    pub beta: f64,
}

/// Strategy and population parameters for a memetic run.
///
/// # Defaults
///
/// ```
/// use u_cnp::memetic::MemeticSearchParams;
///
/// let params = MemeticSearchParams::default();
/// assert_eq!(params.search, "CHNS");
/// assert!(params.is_problem_reduction);
/// assert_eq!(params.initial_pop_size, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_cnp::memetic::MemeticSearchParams;
///
/// let params = MemeticSearchParams::default()
///     .with_search("BCLS")
///     .with_problem_reduction(false)
///     .with_crossover("IRR")
///     .with_pop_variable(false)
///     .with_initial_pop_size(3);
/// assert_eq!(params.crossover.as_deref(), Some("IRR"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemeticSearchParams {
    /// Local search applied to every offspring.
    pub search: String,

    /// Crossover used when problem reduction is off (`DBX` or `IRR`).
    pub crossover: Option<String>,

    /// Use reduce-solve-combine as the crossover.
    pub is_problem_reduction: bool,

    /// Grow the population when the search stalls.
    pub is_pop_variable: bool,

    /// Number of individuals created before the main loop.
    pub initial_pop_size: usize,

    /// Reduce-solve-combine settings.
    pub reduce_params: ReduceParams,
}

impl Default for MemeticSearchParams {
    fn default() -> Self {
        Self {
            search: SearchStrategy::Chns.as_str().to_string(),
            crossover: None,
            is_problem_reduction: true,
            is_pop_variable: true,
            initial_pop_size: 5,
            reduce_params: ReduceParams::default(),
        }
    }
}

impl MemeticSearchParams {
    /// Defaults with both searches set to the problem type's default
    /// strategy (BCLS for DCNP).
    pub fn for_problem(problem_type: ProblemType) -> Self {
        let search = SearchStrategy::default_for(problem_type).as_str();
        let mut params = Self::default().with_search(search);
        params.reduce_params.search = search.to_string();
        params
    }

    /// Sets the offspring search strategy name.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sets the crossover name used without problem reduction.
    pub fn with_crossover(mut self, crossover: impl Into<String>) -> Self {
        self.crossover = Some(crossover.into());
        self
    }

    /// Enables or disables reduce-solve-combine.
    pub fn with_problem_reduction(mut self, enabled: bool) -> Self {
        self.is_problem_reduction = enabled;
        self
    }

    /// Enables or disables idle-triggered growth.
    pub fn with_pop_variable(mut self, enabled: bool) -> Self {
        self.is_pop_variable = enabled;
        self
    }

    /// Sets the initial population size.
    pub fn with_initial_pop_size(mut self, n: usize) -> Self {
        self.initial_pop_size = n;
        self
    }

    /// Sets the reduce-solve-combine parameters.
    pub fn with_reduce_params(mut self, reduce_params: ReduceParams) -> Self {
        self.reduce_params = reduce_params;
        self
    }

    /// Checks the numeric fields. Strategy names are checked by
    /// [`validate_search_strategy`](super::validate_search_strategy) and
    /// friends, which need the problem type.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_pop_size == 0 {
            return Err("initial_pop_size must be at least 1".into());
        }
        Ok(())
    }
}

/// Idle-triggered population growth.
///
/// ```
/// use u_cnp::memetic::VariablePopulationParams;
///
/// let params = VariablePopulationParams::default().with_max_pop_size(8);
/// assert_eq!(params.max_pop_size, 8);
/// assert_eq!(params.increase_pop_size, 3);
/// assert_eq!(params.max_idle_gens, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VariablePopulationParams {
    /// Upper bound on the population size.
    pub max_pop_size: usize,

    /// Individuals added per growth event.
    pub increase_pop_size: usize,

    /// Idle generations between two growth events.
    pub max_idle_gens: usize,
}

impl Default for VariablePopulationParams {
    fn default() -> Self {
        Self {
            max_pop_size: 20,
            increase_pop_size: 3,
            max_idle_gens: 20,
        }
    }
}

impl VariablePopulationParams {
    /// Sets the population cap.
    pub fn with_max_pop_size(mut self, n: usize) -> Self {
        self.max_pop_size = n;
        self
    }

    /// Sets the growth step.
    pub fn with_increase_pop_size(mut self, n: usize) -> Self {
        self.increase_pop_size = n;
        self
    }

    /// Sets the idle-generation period.
    pub fn with_max_idle_gens(mut self, n: usize) -> Self {
        self.max_idle_gens = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_idle_gens == 0 {
            return Err("max_idle_gens must be at least 1".into());
        }
        if self.max_pop_size == 0 {
            return Err("max_pop_size must be at least 1".into());
        }
        if self.increase_pop_size == 0 {
            return Err("increase_pop_size must be at least 1".into());
        }
        Ok(())
    }
}
