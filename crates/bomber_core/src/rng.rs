//! Seeded pseudo-random number generation.
//!
//! Every randomized decision in the simulation (soft-block placement,
//! loot spawn rolls, loot kind selection) draws from this stream and
//! nothing else, so a whole match is replayable from its seed and the
//! sequence of applied moves.

use serde::{Deserialize, Serialize};

/// Deterministic pseudo-random stream seeded from a `u64`.
///
/// A linear-congruential generator: cheap, portable, and identical on
/// every platform. Not suitable for anything security-related, which
/// is fine here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new stream from an integer seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    /// Next raw value in the stream.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5_DEEC_E66D).wrapping_add(11);
        self.state
    }

    /// Uniform draw in `[0, 1)` with four decimal digits of resolution.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() % 10_000) as f32 / 10_000.0
    }

    /// Uniform integer draw in `[min, max)`.
    pub fn next_range(&mut self, min: i32, max: i32) -> i32 {
        let range = (max - min) as u64;
        if range == 0 {
            return min;
        }
        min + (self.next_u64() % range) as i32
    }
}
