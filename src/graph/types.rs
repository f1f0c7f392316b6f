//! Shared graph vocabulary.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CnpError;

/// Node identifier. Nodes are dense indices `0..num_nodes`.
pub type Node = usize;

/// A set of removed nodes.
///
/// Ordered so that iteration (and therefore every seeded decision made
/// while walking a solution) is reproducible.
pub type Solution = BTreeSet<Node>;

/// Which connectivity objective a graph measures.
///
/// # Examples
///
/// ```
/// use u_cnp::graph::ProblemType;
///
/// let pt: ProblemType = "dcnp".parse().unwrap();
/// assert_eq!(pt, ProblemType::Dcnp);
/// assert_eq!(pt.to_string(), "DCNP");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemType {
    /// Critical Node Problem: pairwise connectivity.
    Cnp,
    /// Distance-bounded CNP: pairs within a hop limit.
    Dcnp,
}

impl ProblemType {
    /// Upper-case canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Cnp => "CNP",
            ProblemType::Dcnp => "DCNP",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = CnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CNP" => Ok(ProblemType::Cnp),
            "DCNP" => Ok(ProblemType::Dcnp),
            _ => Err(CnpError::InvalidProblemType(s.to_string())),
        }
    }
}

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`; two empty sets are identical.
pub fn jaccard(a: &Solution, b: &Solution) -> f64 {
    let common = a.intersection(b).count();
    let union = a.len() + b.len() - common;
    if union == 0 {
        1.0
    } else {
        common as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_type_parse() {
        assert_eq!("CNP".parse::<ProblemType>().unwrap(), ProblemType::Cnp);
        assert_eq!(" cnp ".parse::<ProblemType>().unwrap(), ProblemType::Cnp);
        assert_eq!("Dcnp".parse::<ProblemType>().unwrap(), ProblemType::Dcnp);
        assert!("INVALID".parse::<ProblemType>().is_err());
    }

    #[test]
    fn test_jaccard() {
        let a: Solution = [1, 2, 3].into_iter().collect();
        let b: Solution = [2, 3, 4].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
        assert!((jaccard(&a, &a) - 1.0).abs() < 1e-12);
        assert!((jaccard(&Solution::new(), &Solution::new()) - 1.0).abs() < 1e-12);
    }
}
