//! Outcome of a memetic run.

use std::fmt;

use super::statistics::Statistics;
use crate::graph::Solution;

/// Result of [`MemeticSearch::run`](super::MemeticSearch::run).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemeticResult {
    /// Nodes to remove.
    pub best_solution: Solution,

    /// Objective of `best_solution` (lower is better).
    pub best_obj_value: f64,

    /// Iterations of the main loop.
    pub num_iterations: usize,

    /// Wall-clock seconds for the whole run, initialization included.
    pub runtime: f64,

    /// Seconds from the start of the run until `best_solution` was found.
    pub best_found_at_time: f64,

    /// Per-iteration statistics, when collected.
    pub stats: Option<Statistics>,
}

impl fmt::Display for MemeticResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    Total iterations: {}", self.num_iterations)?;
        writeln!(f, "    Total runtime: {:.2} seconds", self.runtime)?;
        writeln!(f, "    Best objective found: {:.2}", self.best_obj_value)?;
        writeln!(f, "    Nodes in solution: {}", self.best_solution.len())?;
        write!(f, "    Best solution found: {:?}", self.best_solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_summary() {
        let result = MemeticResult {
            best_solution: [3, 7].into_iter().collect(),
            best_obj_value: 12.0,
            num_iterations: 40,
            runtime: 1.234,
            best_found_at_time: 0.5,
            stats: None,
        };
        let text = result.to_string();
        assert!(text.contains("Total iterations: 40"));
        assert!(text.contains("Best objective found: 12.00"));
        assert!(text.contains("Nodes in solution: 2"));
        assert!(text.contains("{3, 7}"));
    }
}
