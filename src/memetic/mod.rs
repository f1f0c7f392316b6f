//! Memetic search for CNP and DCNP.
//!
//! A population of local-search optima evolves through crossover and
//! local refinement. Members are replaced by a blend of objective and
//! diversity, and the pool grows when the search stalls.
//!
//! # Key Types
//!
//! - [`MemeticSearchParams`], [`VariablePopulationParams`], [`ReduceParams`]:
//!   configuration with `with_*` builders
//! - [`MemeticSearch`]: validated search, built with [`MemeticSearch::builder`]
//! - [`Population`]: the candidate pool
//! - [`MemeticResult`] and [`Statistics`]: run outcome and per-iteration ledger
//!
//! # Reproducibility
//!
//! A run owns a seed counter that starts at the configured seed and moves
//! forward by one for every crossover and every local search. Two runs with
//! the same instance, parameters and seed make the same calls in the same
//! order.
//!
//! # References
//!
//! - Zhou, Y., Hao, J.-K. & Glover, F. (2019), "Memetic search for
//!   identifying critical nodes in sparse graphs", *IEEE Transactions on
//!   Cybernetics* 49(10)
//! - Moscato (1989), "On Evolution, Search, Optimization, Genetic Algorithms
//!   and Martial Arts"

mod config;
mod population;
mod progress;
mod result;
mod runner;
mod statistics;
mod validation;

pub use config::{
    MemeticSearchParams, ReduceParams, ReduceSettings, VariablePopulationParams, DEFAULT_DISPLAY_INTERVAL,
};
pub use population::{Population, PopulationConfig};
pub use progress::ProgressPrinter;
pub use result::MemeticResult;
pub use runner::{MemeticSearch, MemeticSearchBuilder};
pub use statistics::{IterationStats, Statistics};
pub use validation::{
    validate_crossover_strategy, validate_problem_type, validate_reduce_params, validate_search_strategy,
};
