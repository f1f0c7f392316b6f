//! Seeded random number generation.
//!
//! Every stochastic component receives an explicit `u64` seed and builds
//! its own generator from it, so a run is fully determined by its initial
//! seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Picks one element uniformly at random, or `None` for an empty slice.
pub fn pick<T: Copy, R: Rng>(items: &[T], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.random_range(0..items.len())])
    }
}
