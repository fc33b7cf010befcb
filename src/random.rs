//! Reproducible per-worker random streams.
//!
//! A [`SeedSource`] holds the master seed of an experiment. Each run asks it
//! for its own [`RandomStream`] by worker index, so concurrent runs never
//! share generator state and the same `(master_seed, worker_index)` pair
//! always yields the same draw sequence.
//!
//! # Examples
//!
//! ```
//! use tsp_ga::random::SeedSource;
//!
//! let seeds = SeedSource::new(42);
//! let mut a = seeds.for_worker(3);
//! let mut b = seeds.for_worker(3);
//! assert_eq!(a.next_int(1000).unwrap(), b.next_int(1000).unwrap());
//! ```

use crate::error::{TspError, TspResult};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// 2^64 / golden ratio, used to spread consecutive worker indices.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Master seed of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSource {
    master_seed: u64,
}

impl SeedSource {
    /// Creates a seed source from an explicit master seed.
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Creates a seed source from OS entropy.
    ///
    /// Read the chosen seed back with [`master_seed`](Self::master_seed)
    /// to reproduce the experiment later.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The master seed.
    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derives the independent stream for `worker_index`.
    pub fn for_worker(&self, worker_index: usize) -> RandomStream {
        RandomStream::from_seed(derive_seed(self.master_seed, worker_index as u64))
    }
}

/// Mixes the master seed with a worker identity.
///
/// Rotations keep the low and high halves of the master seed from being
/// flipped by the same worker bits.
fn derive_seed(master: u64, worker: u64) -> u64 {
    master ^ worker.rotate_left(32) ^ worker.wrapping_mul(GOLDEN_GAMMA).rotate_left(21)
}

/// A seeded generator owned by exactly one run.
///
/// Implements [`RngCore`], so it can be passed anywhere a `R: Rng` is
/// expected.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    /// Creates a stream directly from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[0, bound)`.
    ///
    /// # Errors
    /// [`TspError::InvalidArgument`] if `bound == 0`.
    pub fn next_int(&mut self, bound: usize) -> TspResult<usize> {
        if bound == 0 {
            return Err(TspError::invalid_argument("next_int bound must be positive"));
        }
        Ok(self.rng.random_range(0..bound))
    }

    /// Uniform real in `[0, 1)`.
    pub fn next_real(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
