//! Uniform random operator selection.

use super::types::OperatorSelector;
use crate::random::{create_rng, rng_from_option};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Selects a candidate uniformly at random.
///
/// Stateless apart from the RNG, which is shared behind a mutex so the
/// selector can be called from many workers at once.
pub struct RandomSelector {
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    /// Creates a selector with a reproducible seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(create_rng(seed)),
        }
    }

    /// Creates a selector seeded from `seed`, or randomly when `None`.
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self {
            rng: Mutex::new(rng_from_option(seed)),
        }
    }
}

impl<G: ?Sized, O: ?Sized> OperatorSelector<G, O> for RandomSelector {
    fn name(&self) -> &str {
        "Random"
    }

    fn select(&self, candidates: &[Arc<O>], _genotype: &G) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        Some(self.rng.lock().random_range(0..candidates.len()))
    }
}
