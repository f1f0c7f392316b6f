//! Throttled progress lines.
//!
//! Lines go through `tracing::info!` under the `u_cnp::progress` target, so
//! the host's subscriber decides where they end up.

use std::time::Instant;

use tracing::info;

use super::result::MemeticResult;
use super::statistics::Statistics;
use crate::graph::ProblemType;

const TARGET: &str = "u_cnp::progress";

/// Prints run progress at most once per display interval.
#[derive(Debug)]
pub struct ProgressPrinter {
    enabled: bool,
    display_interval: f64,
    last_print: Instant,
    last_printed_iteration: usize,
    current_best: f64,
}

impl ProgressPrinter {
    /// `display_interval` is in seconds.
    pub fn new(enabled: bool, display_interval: f64) -> Self {
        Self {
            enabled,
            display_interval,
            last_print: Instant::now(),
            last_printed_iteration: 0,
            current_best: f64::INFINITY,
        }
    }

    fn due(&self) -> bool {
        self.last_print.elapsed().as_secs_f64() >= self.display_interval
    }

    /// Run banner.
    pub fn start(&mut self, problem_type: ProblemType, budget: usize, seed: u64) {
        if !self.enabled {
            return;
        }
        info!(
            target: TARGET,
            "u-cnp v{}\nSolving an instance with:\n    Problem type: {problem_type}\n    Budget: {budget}\n    Seed: {seed}",
            env!("CARGO_PKG_VERSION"),
        );
        self.current_best = f64::INFINITY;
    }

    pub fn initializing_population(&mut self) {
        if !self.enabled {
            return;
        }
        info!(target: TARGET, "{:-^70}", "Initializing population");
        self.last_print = Instant::now();
    }

    /// Banner and column header of the iteration table.
    pub fn iterations_header(&mut self) {
        if !self.enabled {
            return;
        }
        info!(target: TARGET, "{:-^70}", "Starting Population Iterations");
        info!(target: TARGET, "  Iter        | Time        | Best        | Idle    | PopSize");
        self.last_print = Instant::now();
    }

    /// Prints the latest entry of `stats` if the interval has elapsed.
    /// Nothing is printed when statistics are not being collected.
    pub fn iteration(&mut self, stats: &Statistics) {
        self.print_latest(stats, false);
    }

    fn print_latest(&mut self, stats: &Statistics, force: bool) {
        if !self.enabled || !stats.is_collecting() {
            return;
        }
        let Some(latest) = stats.entries().last() else {
            return;
        };
        if !force && !self.due() {
            return;
        }

        let indicator = if latest.best_obj_value < self.current_best {
            self.current_best = latest.best_obj_value;
            '*'
        } else {
            ' '
        };
        info!(
            target: TARGET,
            "{indicator}Iter {:>5} | Time: {:>6.2}s | Best: {:<10.2} | Idle: {:>4} | PopSize: {:>3}",
            stats.num_iterations(),
            stats.total_runtime(),
            latest.best_obj_value,
            latest.num_idle_generations,
            latest.population_size,
        );
        self.last_print = Instant::now();
        self.last_printed_iteration = stats.num_iterations();
    }

    /// Forces out the last iteration line if it was throttled, then prints
    /// the summary.
    pub fn end(&mut self, result: &MemeticResult) {
        if !self.enabled {
            return;
        }
        if let Some(stats) = &result.stats {
            if stats.num_iterations() > self.last_printed_iteration {
                self.print_latest(stats, true);
            }
        }
        info!(target: TARGET, "{}", "-".repeat(70));
        info!(target: TARGET, "Memetic search finished.\n{result}");
    }
}
