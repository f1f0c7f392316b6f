//! Crossover operators.
//!
//! Each operator turns parent solutions into an offspring [`Graph`] whose
//! removed set is the starting point for the next local search. All three
//! build their own generator from the seed they are given, so the same
//! parents and seed always give the same offspring.
//!
//! | Operator | Parents | Problem type |
//! |----------|---------|--------------|
//! | [`reduce_solve_combine`] | 2 | CNP, DCNP |
//! | [`double_backbone_crossover`] | 2 | CNP |
//! | [`inherit_repair_recombination`] | 3 | DCNP |
//!
//! [`Graph`]: crate::graph::Graph

mod dbx;
mod irr;
mod rsc;
mod types;

pub use dbx::{double_backbone_crossover, THETA};
pub use irr::{inherit_repair_recombination, P1, P2, TARGET_RATIO};
pub use rsc::reduce_solve_combine;
pub use types::CrossoverStrategy;
