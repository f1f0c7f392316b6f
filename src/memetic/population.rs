//! Candidate pool with fitness-and-diversity replacement.
//!
//! Members are ranked twice, by objective and by mean Jaccard similarity to
//! the rest of the pool, and blended into one fitness score
//! (`0.6 · cost_rank + 0.4 · diversity_rank`, lower is better). After every
//! insertion the member with the worst score leaves, so the pool keeps good
//! solutions without collapsing onto one region.
//!
//! New members always come from the same pipeline: a random feasible start,
//! a local search, and a short perturbation if the result duplicates a
//! member already present. Starts and seeds are drawn serially from the
//! pool's own generator, so a batch gives the same members whether its
//! searches run sequentially or on the rayon pool.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{CnpError, Result};
use crate::graph::{jaccard, Graph, Solution};
use crate::random::create_rng;
use crate::search::{LocalSearch, SearchResult};

/// Weight of the cost rank in the fitness blend.
const COST_WEIGHT: f64 = 0.6;

/// Tournament size used by [`Population::select`].
const TOURNAMENT_SIZE: usize = 2;

/// Perturbation attempts for a duplicate newcomer.
const MAX_DEDUPE_ATTEMPTS: usize = 10;

/// Sizing of a [`Population`].
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationConfig {
    /// Members created by [`Population::initialize`].
    pub initial_pop_size: usize,
    /// Grow when the search stalls.
    pub is_pop_variable: bool,
    /// Upper bound on the size.
    pub max_pop_size: usize,
    /// Members added per growth event.
    pub increase_pop_size: usize,
    /// Idle generations between growth events.
    pub max_idle_gens: usize,
    /// Run the searches of a batch on the rayon pool.
    pub parallel: bool,
}

impl PopulationConfig {
    /// Checks the sizing bounds the pool relies on.
    ///
    /// # Errors
    ///
    /// [`CnpError::InvalidParameter`] for a zero size, step or idle
    /// period, or a variable pool that would start above its cap.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("initial_pop_size", self.initial_pop_size),
            ("max_pop_size", self.max_pop_size),
            ("increase_pop_size", self.increase_pop_size),
            ("max_idle_gens", self.max_idle_gens),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(CnpError::InvalidParameter(format!("{name} must be at least 1")));
        }
        if self.is_pop_variable && self.initial_pop_size > self.max_pop_size {
            return Err(CnpError::InvalidParameter(format!(
                "initial_pop_size {} exceeds max_pop_size {}",
                self.initial_pop_size, self.max_pop_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Member {
    solution: Solution,
    obj_value: f64,
    fitness: f64,
    /// Similarity to every other member, in member order; the entry for
    /// the member itself is unused.
    similarity: Vec<f64>,
}

/// A search start waiting for its local search.
struct Pending {
    graph: Graph,
    seed: u64,
}

/// The memetic candidate pool.
pub struct Population<'a> {
    original: &'a Graph,
    search: &'a LocalSearch,
    config: PopulationConfig,
    members: Vec<Member>,
    rng: StdRng,
}

impl<'a> Population<'a> {
    /// Creates an empty pool. `seed` drives every random choice the pool
    /// makes: starting points, search seeds and tournaments.
    ///
    /// # Errors
    ///
    /// See [`PopulationConfig::validate`].
    pub fn new(original: &'a Graph, search: &'a LocalSearch, config: PopulationConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            original,
            search,
            config,
            members: Vec::new(),
            rng: create_rng(seed),
        })
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Member with the lowest objective.
    pub fn best(&self) -> Option<(&Solution, f64)> {
        self.members
            .iter()
            .min_by(|a, b| a.obj_value.total_cmp(&b.obj_value))
            .map(|m| (&m.solution, m.obj_value))
    }

    /// Refills the pool with `initial_pop_size` fresh members and returns
    /// the best one.
    ///
    /// When `deadline` is set, members are created one at a time and
    /// creation stops as soon as the deadline has passed. The member that
    /// was in progress is still kept, so the pool is never left empty.
    pub fn initialize(&mut self, display: bool, deadline: Option<Instant>) -> Result<(Solution, f64)> {
        self.members.clear();

        match deadline {
            None => self.spawn(self.config.initial_pop_size)?,
            Some(deadline) => {
                for created in 1..=self.config.initial_pop_size {
                    self.spawn(1)?;
                    if Instant::now() >= deadline {
                        if created < self.config.initial_pop_size {
                            warn!(
                                created,
                                requested = self.config.initial_pop_size,
                                "time budget reached during population initialization"
                            );
                        }
                        break;
                    }
                }
            }
        }

        if display {
            info!(size = self.size(), "population initialized");
        }
        let (solution, obj_value) = self.best().ok_or(CnpError::EmptyPopulation)?;
        Ok((solution.clone(), obj_value))
    }

    /// Binary tournament on fitness; returns two parents.
    ///
    /// The second parent is a different member whenever the pool has at
    /// least two; a pool of one yields the same solution twice.
    pub fn select(&mut self) -> Result<(Solution, Solution)> {
        let n = self.members.len();
        if n == 0 {
            return Err(CnpError::EmptyPopulation);
        }
        self.update_fitness();
        let k = TOURNAMENT_SIZE.min(n);

        let first = self.tournament(k, None);
        let second = if n >= 2 { self.tournament(k, Some(first)) } else { first };

        Ok((
            self.members[first].solution.clone(),
            self.members[second].solution.clone(),
        ))
    }

    /// All three members, for the three-parent crossover.
    pub fn get_all_three_solutions(&self) -> Result<(Solution, Solution, Solution)> {
        match self.members.as_slice() {
            [a, b, c] => Ok((a.solution.clone(), b.solution.clone(), c.solution.clone())),
            other => Err(CnpError::PopulationSize {
                expected: 3,
                actual: other.len(),
            }),
        }
    }

    /// Inserts a local-search result, evicts the worst member, and grows or
    /// refreshes the pool when `num_idle_generations` hits a multiple of
    /// `max_idle_gens`.
    ///
    /// Growth adds `increase_pop_size` members but never passes
    /// `max_pop_size`. A pool already at the cap is refreshed instead:
    /// every member but the best is replaced and the size stays put.
    pub fn update(
        &mut self,
        solution: Solution,
        obj_value: f64,
        num_idle_generations: usize,
        display: bool,
    ) -> Result<()> {
        self.add(solution, obj_value);
        self.remove_worst();

        let triggered = self.config.is_pop_variable
            && num_idle_generations > 0
            && num_idle_generations % self.config.max_idle_gens == 0;
        if !triggered {
            return Ok(());
        }

        let size = self.size();
        if size < self.config.max_pop_size {
            let grow = self.config.increase_pop_size.min(self.config.max_pop_size - size);
            if display {
                info!(from = size, to = size + grow, "expanding population after idle generations");
            } else {
                debug!(from = size, to = size + grow, "expanding population");
            }
            self.spawn(grow)
        } else {
            if display {
                info!(size, "refreshing population at size limit");
            } else {
                debug!(size, "refreshing population");
            }
            self.refresh()
        }
    }

    // ---- growth ----

    /// Keeps the best member and regenerates the rest.
    fn refresh(&mut self) -> Result<()> {
        let size = self.size();
        let Some(best) = self
            .members
            .iter()
            .min_by(|a, b| a.obj_value.total_cmp(&b.obj_value))
            .cloned()
        else {
            return Ok(());
        };
        self.members.clear();
        self.add(best.solution, best.obj_value);
        self.spawn(size - 1)
    }

    /// Creates `count` new members.
    fn spawn(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let pending: Vec<Pending> = (0..count)
            .map(|_| Pending {
                graph: self.original.random_feasible_graph(&mut self.rng),
                seed: self.rng.random::<u64>(),
            })
            .collect();

        for (graph, result) in run_searches(self.search, pending, self.config.parallel)? {
            let (solution, obj_value) = self.dedupe(graph, result);
            self.add(solution, obj_value);
        }
        Ok(())
    }

    /// Perturbs `result` until it differs from every member, for at most
    /// [`MAX_DEDUPE_ATTEMPTS`] swaps.
    fn dedupe(&mut self, mut graph: Graph, result: SearchResult) -> (Solution, f64) {
        if !self.contains(&result.solution) {
            return (result.solution, result.obj_value);
        }

        graph.update_by_removed_nodes(&result.solution);
        let mut attempts = 0;
        while self.contains(graph.removed_nodes()) && attempts < MAX_DEDUPE_ATTEMPTS {
            debug!(attempts, "duplicate newcomer, perturbing");
            if let Some(node) = graph.best_node_to_add(&mut self.rng) {
                graph.add_node(node);
            }
            if let Some(node) = graph.random_node_to_remove(&mut self.rng) {
                graph.remove_node(node);
            }
            attempts += 1;
        }
        (graph.removed_nodes().clone(), graph.objective_value() as f64)
    }

    fn contains(&self, solution: &Solution) -> bool {
        self.members.iter().any(|m| &m.solution == solution)
    }

    // ---- replacement ----

    fn add(&mut self, solution: Solution, obj_value: f64) {
        let mut similarity = Vec::with_capacity(self.members.len() + 1);
        for member in &mut self.members {
            let s = jaccard(&member.solution, &solution);
            member.similarity.push(s);
            similarity.push(s);
        }
        similarity.push(1.0);
        self.members.push(Member {
            solution,
            obj_value,
            fitness: 0.0,
            similarity,
        });
    }

    fn remove_worst(&mut self) {
        self.update_fitness();
        let Some(worst) = self
            .members
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.fitness.total_cmp(&b.fitness))
            .map(|(i, _)| i)
        else {
            return;
        };
        self.members.remove(worst);
        for member in &mut self.members {
            member.similarity.remove(worst);
        }
    }

    fn update_fitness(&mut self) {
        let n = self.members.len();
        if n <= 1 {
            if let Some(m) = self.members.first_mut() {
                m.fitness = 0.0;
            }
            return;
        }

        let costs: Vec<f64> = self.members.iter().map(|m| m.obj_value).collect();
        let diversity: Vec<f64> = self
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let total: f64 = m
                    .similarity
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, s)| s)
                    .sum();
                total / (n - 1) as f64
            })
            .collect();

        let cost_ranks = ranks(&costs);
        let diversity_ranks = ranks(&diversity);
        for (i, member) in self.members.iter_mut().enumerate() {
            member.fitness =
                COST_WEIGHT * cost_ranks[i] as f64 + (1.0 - COST_WEIGHT) * diversity_ranks[i] as f64;
        }
    }

    /// Index of the fittest of `k` random members, skipping `exclude`.
    fn tournament(&mut self, k: usize, exclude: Option<usize>) -> usize {
        let n = self.members.len();
        let mut winner: Option<usize> = None;
        for _ in 0..k {
            let candidate = match exclude {
                Some(skip) => {
                    let c = self.rng.random_range(0..n - 1);
                    if c >= skip {
                        c + 1
                    } else {
                        c
                    }
                }
                None => self.rng.random_range(0..n),
            };
            winner = match winner {
                Some(w) if self.members[w].fitness <= self.members[candidate].fitness => Some(w),
                _ => Some(candidate),
            };
        }
        winner.unwrap_or(0)
    }
}

/// 1-based ranks, ascending by value, ties broken by index.
fn ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));
    let mut ranks = vec![0; values.len()];
    for (rank, &i) in order.iter().enumerate() {
        ranks[i] = rank + 1;
    }
    ranks
}

#[cfg(feature = "parallel")]
fn run_searches(search: &LocalSearch, pending: Vec<Pending>, parallel: bool) -> Result<Vec<(Graph, SearchResult)>> {
    if parallel {
        pending
            .into_par_iter()
            .map(|p| search_one(search, p))
            .collect()
    } else {
        pending.into_iter().map(|p| search_one(search, p)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_searches(search: &LocalSearch, pending: Vec<Pending>, _parallel: bool) -> Result<Vec<(Graph, SearchResult)>> {
    pending.into_iter().map(|p| search_one(search, p)).collect()
}

fn search_one(search: &LocalSearch, mut pending: Pending) -> Result<(Graph, SearchResult)> {
    let result = search.run(&mut pending.graph, pending.seed)?;
    Ok((pending.graph, result))
}

// ============================================================================
// Tests
// ============================================================================
