//! Memetic search for the Critical Node Problem.
//!
//! Given an undirected graph and a budget `k`, the Critical Node Problem
//! (CNP) asks for `k` nodes whose removal leaves as few connected node
//! pairs as possible. The distance-based variant (DCNP) only counts pairs
//! joined by a path of at most `hop_distance` edges.
//!
//! - **Graph**: problem data, file readers, and the CNP/DCNP graph
//!   representations with their incremental move primitives.
//! - **Search**: four local searches (CBNS, CHNS, DLAS for CNP; BCLS for
//!   DCNP) that improve one removal set by node swaps.
//! - **Crossover**: reduce-solve-combine (RSC), double backbone (DBX) and
//!   inherit-repair-recombination (IRR).
//! - **Memetic**: the population, validation layer and main loop.
//! - **Stop**: stopping criteria, combinable with OR semantics.
//! - **Model**: a small front end that builds a graph and solves it.
//!
//! # Quick start
//!
//! ```
//! use u_cnp::graph::ProblemData;
//! use u_cnp::memetic::{MemeticSearch, MemeticSearchParams};
//! use u_cnp::stop::MaxIterations;
//!
//! let data = ProblemData::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (1, 5), (3, 6)]);
//! let search = MemeticSearch::builder(&data)
//!     .problem_type("CNP")
//!     .budget(2)
//!     .seed(1)
//!     .params(MemeticSearchParams::default())
//!     .build()
//!     .unwrap();
//! let result = search.run(&mut MaxIterations::new(4).unwrap(), false, false).unwrap();
//! assert_eq!(result.best_solution.len(), 2);
//! ```
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.
//! Progress lines use the `u_cnp::progress` target.

pub mod crossover;
pub mod error;
pub mod graph;
pub mod memetic;
pub mod model;
pub mod random;
pub mod search;
pub mod stop;

pub use error::{CnpError, Result};
pub use graph::{read, ProblemData, ProblemType, Solution};
pub use memetic::{MemeticResult, MemeticSearch, MemeticSearchParams, VariablePopulationParams};
pub use model::Model;
