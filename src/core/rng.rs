//! Deterministic random number generation.
//!
//! The only randomness in a session is the market volatility drawn at
//! settlement. It comes from a seeded `GameRng` so a session can be replayed
//! exactly; independent streams are split off per purpose with
//! [`GameRng::for_context`].
//!
//! ```
//! use rumor_market::core::GameRng;
//!
//! let mut a = GameRng::new(42).for_context("volatility");
//! let mut b = GameRng::new(42).for_context("volatility");
//! assert_eq!(a.gen_range_f64(0.9..=1.1), b.gen_range_f64(0.9..=1.1));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

/// Seeded ChaCha8 generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific purpose.
    ///
    /// The same context always yields the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);

        Self::new(hasher.finish())
    }

    /// Draw uniformly from a closed float interval.
    ///
    /// A degenerate interval (`a..=a`) always yields `a`.
    pub fn gen_range_f64(&mut self, range: RangeInclusive<f64>) -> f64 {
        let (low, high) = range.into_inner();
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
