//! Per-iteration run statistics.

use std::time::Instant;

/// Metrics recorded at the end of one iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// Seconds since the previous entry (or since collection started).
    pub runtime: f64,
    /// Best objective value known after the iteration.
    pub best_obj_value: f64,
    /// Population size after the iteration.
    pub population_size: usize,
    /// Consecutive iterations without a new best.
    pub num_idle_generations: usize,
}

/// Append-only ledger of [`IterationStats`].
///
/// When collection is disabled every call to [`collect`](Statistics::collect)
/// is a no-op.
///
/// # Examples
///
/// ```
/// use u_cnp::memetic::Statistics;
///
/// let mut stats = Statistics::new(true);
/// stats.collect(100.5, 10, 0);
/// stats.collect(98.2, 10, 0);
/// assert_eq!(stats.num_iterations(), 2);
/// assert_eq!(stats.entries()[1].best_obj_value, 98.2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Statistics {
    collect_stats: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    clock: Instant,
    entries: Vec<IterationStats>,
}

impl Statistics {
    /// Starts a ledger; the first entry's runtime is measured from here.
    pub fn new(collect_stats: bool) -> Self {
        Self {
            collect_stats,
            clock: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Returns `true` if entries are being recorded.
    pub fn is_collecting(&self) -> bool {
        self.collect_stats
    }

    /// Records one iteration.
    pub fn collect(&mut self, best_obj_value: f64, population_size: usize, num_idle_generations: usize) {
        if !self.collect_stats {
            return;
        }
        let now = Instant::now();
        let runtime = now.duration_since(self.clock).as_secs_f64();
        self.clock = now;
        self.entries.push(IterationStats {
            runtime,
            best_obj_value,
            population_size,
            num_idle_generations,
        });
    }

    /// Number of recorded iterations.
    pub fn num_iterations(&self) -> usize {
        self.entries.len()
    }

    /// Recorded iterations, oldest first.
    pub fn entries(&self) -> &[IterationStats] {
        &self.entries
    }

    /// Sum of the recorded runtimes.
    pub fn total_runtime(&self) -> f64 {
        self.entries.iter().map(|e| e.runtime).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_records_nothing() {
        let mut stats = Statistics::new(false);
        stats.collect(1.0, 3, 0);
        assert!(!stats.is_collecting());
        assert_eq!(stats.num_iterations(), 0);
        assert!(stats.entries().is_empty());
    }

    #[test]
    fn test_entries_in_order() {
        let mut stats = Statistics::new(true);
        stats.collect(5.0, 3, 0);
        stats.collect(5.0, 3, 1);
        stats.collect(4.0, 6, 0);
        let idle: Vec<usize> = stats.entries().iter().map(|e| e.num_idle_generations).collect();
        assert_eq!(idle, vec![0, 1, 0]);
        assert_eq!(stats.entries()[2].population_size, 6);
        assert!(stats.entries().iter().all(|e| e.runtime >= 0.0));
        assert!(stats.total_runtime() >= 0.0);
    }
}
