//! RNG module - the single seedable random source of a session
//!
//! Pool shuffling, threshold sampling and fallback draws all go through one [`SpawnRng`],
//! so the same seed and the same sequence of moves reproduce the same game.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SpawnRng {
    rng: StdRng,
}

impl SpawnRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.rng);
    }

    /// Uniform pick, `None` for an empty slice
    pub fn choose<T: Copy>(&mut self, slice: &[T]) -> Option<T> {
        slice.choose(&mut self.rng).copied()
    }

    /// Uniform sample from the inclusive range; a collapsed or inverted range returns `min`
    pub fn range_f32(&mut self, (min, max): (f32, f32)) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform sample from the inclusive range; a collapsed or inverted range returns `min`
    pub fn range_u32(&mut self, (min, max): (u32, u32)) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

impl Default for SpawnRng {
    fn default() -> Self {
        Self::new(1)
    }
}
