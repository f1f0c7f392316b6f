//! Error types for u-cnp.
//!
//! Configuration errors are raised eagerly while a search is being built.
//! Structural errors are raised at the call site of an operator that was
//! handed inputs it cannot work with. I/O and parse errors keep the name of
//! the file they came from.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CnpError>;

/// Error type for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum CnpError {
    /// Problem type did not normalize to `CNP` or `DCNP`.
    #[error("invalid problem type '{0}': expected CNP or DCNP")]
    InvalidProblemType(String),

    /// Unknown local-search strategy name.
    #[error("invalid search strategy '{0}': expected one of CBNS, CHNS, DLAS, BCLS")]
    InvalidSearchStrategy(String),

    /// Known strategy paired with a problem type it does not support.
    #[error("{problem_type} problem type does not support {strategy}: {hint}")]
    IncompatibleSearchStrategy {
        strategy: String,
        problem_type: String,
        hint: String,
    },

    /// Crossover choice rejected by validation.
    #[error("invalid crossover configuration: {0}")]
    InvalidCrossover(String),

    /// Reduce parameters rejected by validation.
    #[error("invalid reduce parameters: {0}")]
    InvalidReduceParams(String),

    /// Any other out-of-range argument.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operator received the wrong number of parents.
    #[error("{operator} requires exactly {expected} parents, got {actual}")]
    ParentCount {
        operator: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Population size does not match what the caller needs.
    #[error("population must contain exactly {expected} solutions, found {actual}")]
    PopulationSize { expected: usize, actual: usize },

    /// Selection requested before the population was initialized.
    #[error("population is empty")]
    EmptyPopulation,

    /// Operation invoked on a graph of the wrong problem type.
    #[error("{operation} is not available on a {problem_type} graph")]
    IncompatibleGraph {
        operation: &'static str,
        problem_type: String,
    },

    /// Graph file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Graph file content is malformed.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Building the problem instance from raw data failed.
    #[error("failed to create original graph: {0}")]
    GraphConstruction(#[source] Box<CnpError>),
}

impl CnpError {
    /// Returns `true` for errors raised by the validation layer.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CnpError::InvalidProblemType(_)
                | CnpError::InvalidSearchStrategy(_)
                | CnpError::IncompatibleSearchStrategy { .. }
                | CnpError::InvalidCrossover(_)
                | CnpError::InvalidReduceParams(_)
                | CnpError::InvalidParameter(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompatible_message_names_both_sides() {
        let err = CnpError::IncompatibleSearchStrategy {
            strategy: "BCLS".into(),
            problem_type: "CNP".into(),
            hint: "use CBNS, CHNS or DLAS".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("BCLS"));
        assert!(msg.contains("CNP"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_wrapped_construction_error() {
        let inner = CnpError::InvalidParameter("budget 10 exceeds 4 nodes".into());
        let err = CnpError::GraphConstruction(Box::new(inner));
        assert!(err.to_string().starts_with("failed to create original graph"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_parse_error_has_provenance() {
        let err = CnpError::Parse {
            path: PathBuf::from("graphs/karate.txt"),
            line: 3,
            message: "expected integer".into(),
        };
        assert_eq!(err.to_string(), "graphs/karate.txt:3: expected integer");
    }
}
