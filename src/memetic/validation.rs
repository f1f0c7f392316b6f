//! Configuration checks run once before a memetic search is built.
//!
//! Every function here either returns the typed value a string resolves to
//! or a configuration error naming the offending setting.

use super::config::{MemeticSearchParams, ReduceParams, ReduceSettings};
use crate::crossover::CrossoverStrategy;
use crate::error::{CnpError, Result};
use crate::graph::ProblemType;
use crate::search::SearchStrategy;

/// Normalizes a problem type name (`"cnp"`, `" DCNP "`, ...).
///
/// ```
/// use u_cnp::graph::ProblemType;
/// use u_cnp::memetic::validate_problem_type;
///
/// assert_eq!(validate_problem_type("dcnp").unwrap(), ProblemType::Dcnp);
/// assert!(validate_problem_type("MIS").is_err());
/// ```
pub fn validate_problem_type(problem_type: &str) -> Result<ProblemType> {
    problem_type.parse()
}

/// Resolves a search strategy name and checks it against the problem type.
///
/// CNP accepts CBNS, CHNS and DLAS; DCNP accepts only BCLS.
///
/// ```
/// use u_cnp::graph::ProblemType;
/// use u_cnp::memetic::validate_search_strategy;
/// use u_cnp::search::SearchStrategy;
///
/// assert_eq!(
///     validate_search_strategy("bcls", ProblemType::Dcnp).unwrap(),
///     SearchStrategy::Bcls
/// );
/// assert!(validate_search_strategy("BCLS", ProblemType::Cnp).is_err());
/// ```
pub fn validate_search_strategy(search: &str, problem_type: ProblemType) -> Result<SearchStrategy> {
    let strategy: SearchStrategy = search.parse()?;
    if strategy.supports(problem_type) {
        return Ok(strategy);
    }
    let hint = match problem_type {
        ProblemType::Cnp => "use CBNS, CHNS or DLAS",
        ProblemType::Dcnp => "DCNP currently only supports BCLS",
    };
    Err(CnpError::IncompatibleSearchStrategy {
        strategy: strategy.to_string(),
        problem_type: problem_type.to_string(),
        hint: hint.to_string(),
    })
}

/// Resolves the crossover operator for a run.
///
/// With problem reduction on, the operator is always RSC. Otherwise the
/// caller must name DBX (CNP) or IRR (DCNP, fixed population of three).
pub fn validate_crossover_strategy(
    params: &MemeticSearchParams,
    problem_type: ProblemType,
) -> Result<CrossoverStrategy> {
    let strategy = if params.is_problem_reduction {
        CrossoverStrategy::Rsc
    } else {
        let Some(name) = params.crossover.as_deref() else {
            return Err(CnpError::InvalidCrossover(
                "when is_problem_reduction is false, crossover must be explicitly set to DBX or IRR"
                    .into(),
            ));
        };
        let strategy: CrossoverStrategy = name.parse()?;
        if strategy == CrossoverStrategy::Rsc {
            return Err(CnpError::InvalidCrossover(
                "when is_problem_reduction is false, crossover must be DBX or IRR \
                 (RSC is reserved for problem reduction mode)"
                    .into(),
            ));
        }
        strategy
    };

    match strategy {
        CrossoverStrategy::Irr => {
            if problem_type != ProblemType::Dcnp {
                return Err(CnpError::InvalidCrossover(
                    "IRR crossover is only supported for DCNP problems".into(),
                ));
            }
            if params.initial_pop_size != 3 {
                return Err(CnpError::InvalidCrossover(format!(
                    "IRR requires exactly 3 individuals in the population, got initial_pop_size={}",
                    params.initial_pop_size
                )));
            }
            if params.is_pop_variable {
                return Err(CnpError::InvalidCrossover(
                    "IRR requires a fixed population: set is_pop_variable to false".into(),
                ));
            }
        }
        CrossoverStrategy::Dbx => {
            if problem_type != ProblemType::Cnp {
                return Err(CnpError::InvalidCrossover(
                    "DBX crossover is only supported for CNP problems".into(),
                ));
            }
        }
        CrossoverStrategy::Rsc => {}
    }

    Ok(strategy)
}

/// Resolves the reduce-solve-combine parameters.
///
/// ```
/// use u_cnp::graph::ProblemType;
/// use u_cnp::memetic::{validate_reduce_params, ReduceParams};
/// use u_cnp::search::SearchStrategy;
///
/// let settings = validate_reduce_params(&ReduceParams::default(), ProblemType::Cnp).unwrap();
/// assert_eq!(settings.search, SearchStrategy::Chns);
/// assert!((settings.beta - 0.9).abs() < 1e-12);
/// ```
pub fn validate_reduce_params(params: &ReduceParams, problem_type: ProblemType) -> Result<ReduceSettings> {
    let search = validate_search_strategy(&params.search, problem_type)
        .map_err(|e| CnpError::InvalidReduceParams(format!("search: {e}")))?;
    if !(0.0..=1.0).contains(&params.beta) {
        return Err(CnpError::InvalidReduceParams(format!(
            "beta must be in [0, 1], got {}",
            params.beta
        )));
    }
    Ok(ReduceSettings {
        search,
        beta: params.beta,
    })
}

// ============================================================================
// Tests
// ============================================================================
