//! Strategy names and search outcomes.

use std::fmt;
use std::str::FromStr;

use crate::error::CnpError;
use crate::graph::{ProblemType, Solution};

/// The four local-search strategies.
///
/// CBNS, CHNS and DLAS work on CNP graphs; BCLS works on DCNP graphs.
///
/// # Examples
///
/// ```
/// use u_cnp::graph::ProblemType;
/// use u_cnp::search::SearchStrategy;
///
/// let s: SearchStrategy = "chns".parse().unwrap();
/// assert_eq!(s, SearchStrategy::Chns);
/// assert!(s.supports(ProblemType::Cnp));
/// assert!(!s.supports(ProblemType::Dcnp));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Component-based neighbourhood search: age-driven removals.
    Cbns,
    /// Component-based hybrid neighbourhood search: mixes impact-driven
    /// and age-driven removals.
    Chns,
    /// Diversified late-acceptance search.
    Dlas,
    /// Betweenness-centrality local search (DCNP).
    Bcls,
}

impl SearchStrategy {
    /// Upper-case canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Cbns => "CBNS",
            SearchStrategy::Chns => "CHNS",
            SearchStrategy::Dlas => "DLAS",
            SearchStrategy::Bcls => "BCLS",
        }
    }

    /// Returns `true` if this strategy can run on `problem_type` graphs.
    pub fn supports(&self, problem_type: ProblemType) -> bool {
        match problem_type {
            ProblemType::Cnp => !matches!(self, SearchStrategy::Bcls),
            ProblemType::Dcnp => matches!(self, SearchStrategy::Bcls),
        }
    }

    /// Default strategy for a problem type.
    pub fn default_for(problem_type: ProblemType) -> Self {
        match problem_type {
            ProblemType::Cnp => SearchStrategy::Chns,
            ProblemType::Dcnp => SearchStrategy::Bcls,
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = CnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CBNS" => Ok(SearchStrategy::Cbns),
            "CHNS" => Ok(SearchStrategy::Chns),
            "DLAS" => Ok(SearchStrategy::Dlas),
            "BCLS" => Ok(SearchStrategy::Bcls),
            _ => Err(CnpError::InvalidSearchStrategy(s.to_string())),
        }
    }
}

/// Best solution reached by one local-search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Removed nodes.
    pub solution: Solution,
    /// Objective value of `solution`.
    pub obj_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("cbns".parse::<SearchStrategy>().unwrap(), SearchStrategy::Cbns);
        assert_eq!("ChNs".parse::<SearchStrategy>().unwrap(), SearchStrategy::Chns);
        assert_eq!("BCLS".parse::<SearchStrategy>().unwrap(), SearchStrategy::Bcls);
        assert!("TABU".parse::<SearchStrategy>().is_err());
    }

    #[test]
    fn test_support_matrix() {
        for s in [SearchStrategy::Cbns, SearchStrategy::Chns, SearchStrategy::Dlas] {
            assert!(s.supports(ProblemType::Cnp));
            assert!(!s.supports(ProblemType::Dcnp));
        }
        assert!(SearchStrategy::Bcls.supports(ProblemType::Dcnp));
        assert!(!SearchStrategy::Bcls.supports(ProblemType::Cnp));
    }

    #[test]
    fn test_display_round_trips_name() {
        assert_eq!(SearchStrategy::Dlas.to_string(), "DLAS");
    }
}
