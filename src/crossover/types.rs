//! Crossover strategy names.

use std::fmt;
use std::str::FromStr;

use crate::error::CnpError;
use crate::graph::{ProblemType, Solution};

/// The three crossover operators.
///
/// # Examples
///
/// ```
/// use u_cnp::crossover::CrossoverStrategy;
///
/// let c: CrossoverStrategy = "irr".parse().unwrap();
/// assert_eq!(c, CrossoverStrategy::Irr);
/// assert_eq!(c.parents_required(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverStrategy {
    /// Reduce-Solve-Combine.
    Rsc,
    /// Double backbone.
    Dbx,
    /// Inherit-Repair-Recombination.
    Irr,
}

impl CrossoverStrategy {
    /// Upper-case canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossoverStrategy::Rsc => "RSC",
            CrossoverStrategy::Dbx => "DBX",
            CrossoverStrategy::Irr => "IRR",
        }
    }

    /// Number of parents the operator consumes.
    pub fn parents_required(&self) -> usize {
        match self {
            CrossoverStrategy::Rsc | CrossoverStrategy::Dbx => 2,
            CrossoverStrategy::Irr => 3,
        }
    }

    /// Returns `true` if the operator can build offspring for `problem_type`.
    pub fn supports(&self, problem_type: ProblemType) -> bool {
        match self {
            CrossoverStrategy::Rsc => true,
            CrossoverStrategy::Dbx => problem_type == ProblemType::Cnp,
            CrossoverStrategy::Irr => problem_type == ProblemType::Dcnp,
        }
    }
}

impl fmt::Display for CrossoverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossoverStrategy {
    type Err = CnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSC" => Ok(CrossoverStrategy::Rsc),
            "DBX" => Ok(CrossoverStrategy::Dbx),
            "IRR" => Ok(CrossoverStrategy::Irr),
            _ => Err(CnpError::InvalidCrossover(format!(
                "unknown crossover strategy '{s}': expected RSC, DBX or IRR"
            ))),
        }
    }
}

/// Fails with [`CnpError::ParentCount`] unless exactly `expected` parents
/// were given.
pub(crate) fn check_parents(
    operator: &'static str,
    parents: &[&Solution],
    expected: usize,
) -> Result<(), CnpError> {
    if parents.len() == expected {
        Ok(())
    } else {
        Err(CnpError::ParentCount {
            operator,
            expected,
            actual: parents.len(),
        })
    }
}
