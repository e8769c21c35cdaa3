//! Injectable randomness for the fault-injection endpoint.

use std::sync::{Mutex, PoisonError};

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource: Send + Sync + 'static {
    fn next_unit(&self) -> f64;
}

/// `fastrand` generator, optionally seeded for reproducible runs.
pub struct SeededRandom {
    rng: Mutex<fastrand::Rng>,
}

impl SeededRandom {
    pub fn new() -> Self {
        SeededRandom {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        SeededRandom {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .f64()
    }
}

/// Always yields the same value. Used to force a branch.
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}
