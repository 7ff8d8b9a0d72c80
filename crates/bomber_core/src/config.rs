//! Game configuration.
//!
//! All tunable constants of a match live here: grid dimensions, fuse
//! length, base agent stats, loot odds, throw distance, and the
//! optional test-mode round cap. Defaults match the reference arena
//! (13x11 grid, four agents, 4-round fuse).

use serde::{Deserialize, Serialize};

/// Configuration for a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Seed for world generation and all in-match randomness.
    pub seed: u64,
    /// Probability that an eligible cell becomes a soft block.
    pub soft_density: f32,
    /// Number of agents, spawned at the grid corners (max 4).
    pub agent_count: u8,
    /// Full rounds between bomb placement and detonation.
    pub fuse_rounds: u32,
    /// Starting blast range per agent.
    pub base_range: u32,
    /// Starting concurrent-bomb capacity per agent.
    pub base_bombs: u32,
    /// Probability of loot spawning on a destroyed soft block.
    pub loot_probability: f32,
    /// Maximum cells a carried bomb travels when thrown.
    pub max_throw_distance: u32,
    /// Auto-stop after this many rounds (test mode). `None` = no cap.
    pub max_rounds: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 13,
            height: 11,
            seed: 12345,
            soft_density: 0.5,
            agent_count: 4,
            fuse_rounds: 4,
            base_range: 1,
            base_bombs: 1,
            loot_probability: 0.3,
            max_throw_distance: 3,
            max_rounds: None,
        }
    }
}

impl GameConfig {
    /// Set the world seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set grid dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set soft-block density.
    #[must_use]
    pub fn with_soft_density(mut self, density: f32) -> Self {
        self.soft_density = density.clamp(0.0, 1.0);
        self
    }

    /// Set loot spawn probability.
    #[must_use]
    pub fn with_loot_probability(mut self, probability: f32) -> Self {
        self.loot_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the number of agents (clamped to 1..=4).
    #[must_use]
    pub fn with_agent_count(mut self, count: u8) -> Self {
        self.agent_count = count.clamp(1, 4);
        self
    }

    /// Set the test-mode round cap.
    #[must_use]
    pub const fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_arena() {
        let config = GameConfig::default();
        assert_eq!(config.width, 13);
        assert_eq!(config.height, 11);
        assert_eq!(config.agent_count, 4);
        assert_eq!(config.fuse_rounds, 4);
        assert_eq!(config.base_range, 1);
        assert_eq!(config.base_bombs, 1);
        assert_eq!(config.max_rounds, None);
    }

    #[test]
    fn builders_clamp() {
        let config = GameConfig::default()
            .with_soft_density(1.5)
            .with_agent_count(9);
        assert_eq!(config.soft_density, 1.0);
        assert_eq!(config.agent_count, 4);
    }
}
