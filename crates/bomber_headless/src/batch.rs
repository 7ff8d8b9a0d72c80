//! Batch match runner for seed sweeps.
//!
//! Runs many matches in parallel with rayon, one seed per match, and
//! aggregates outcomes. Each match is self-contained and seeded, so
//! parallel execution cannot perturb results: the batch output for a
//! seed range is identical at any thread count.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use bomber_core::components::AgentId;
use bomber_core::config::GameConfig;
use bomber_core::decision::Decider;

use crate::match_runner::{EndReason, MatchOutcome, MatchRunner};
use crate::strategies::RandomDecider;

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Base match configuration; the seed field is overridden per match.
    pub game: GameConfig,
    /// Number of matches to run.
    pub match_count: u64,
    /// First world seed; matches use sequential seeds from here.
    pub seed_start: u64,
    /// Output directory for results.
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default().with_max_rounds(200),
            match_count: 100,
            seed_start: 1,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl BatchConfig {
    /// Create a config for a match count.
    #[must_use]
    pub fn new(match_count: u64) -> Self {
        Self {
            match_count,
            ..Default::default()
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set the starting seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }
}

/// One match's result within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// World seed the match ran with.
    pub seed: u64,
    /// Outcome of the match.
    pub outcome: MatchOutcome,
    /// Final state hash, for cross-run comparison.
    pub final_hash: u64,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Wins per agent id.
    pub wins: BTreeMap<AgentId, u64>,
    /// Matches that ended with everyone dead.
    pub draws_all_dead: u64,
    /// Matches stopped by the round cap.
    pub round_cap_stops: u64,
    /// Mean match length in rounds.
    pub mean_rounds: f64,
}

impl BatchSummary {
    fn from_records(records: &[MatchRecord]) -> Self {
        let mut summary = Self::default();
        let mut total_rounds = 0u64;
        for record in records {
            total_rounds += u64::from(record.outcome.rounds);
            match record.outcome.reason {
                EndReason::LastAgentStanding => {
                    if let Some(winner) = record.outcome.winner {
                        *summary.wins.entry(winner).or_insert(0) += 1;
                    }
                }
                EndReason::AllDead => summary.draws_all_dead += 1,
                EndReason::RoundCapReached => summary.round_cap_stops += 1,
            }
        }
        if !records.is_empty() {
            summary.mean_rounds = total_rounds as f64 / records.len() as f64;
        }
        summary
    }
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// Per-match records, in seed order.
    pub matches: Vec<MatchRecord>,
    /// Aggregate summary.
    pub summary: BatchSummary,
    /// Total wall-clock runtime.
    pub duration_seconds: f64,
}

impl BatchResults {
    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Controllers for one match: seeded-random walkers derived from the
/// match seed so every match is internally reproducible.
fn seeded_controllers(seed: u64, count: u8) -> Vec<Box<dyn Decider>> {
    (0..u64::from(count))
        .map(|i| Box::new(RandomDecider::new(seed.wrapping_mul(31).wrapping_add(i))) as Box<dyn Decider>)
        .collect()
}

/// Run one seeded match and record its result.
fn run_one(config: &BatchConfig, seed: u64) -> MatchRecord {
    let game = config.game.clone().with_seed(seed);
    let controllers = seeded_controllers(seed, game.agent_count);
    let mut runner = MatchRunner::new(game, controllers);
    // Controllers never produce unknown agent ids here.
    let outcome = runner.run().unwrap_or(MatchOutcome {
        winner: None,
        rounds: 0,
        turns: 0,
        reason: EndReason::RoundCapReached,
    });
    MatchRecord {
        seed,
        outcome,
        final_hash: runner.arena().state_hash(),
    }
}

/// Run a full batch in parallel.
#[must_use]
pub fn run_batch(config: &BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(
        matches = config.match_count,
        seed_start = config.seed_start,
        "starting batch"
    );

    let mut matches: Vec<MatchRecord> = (0..config.match_count)
        .into_par_iter()
        .map(|offset| run_one(config, config.seed_start.wrapping_add(offset)))
        .collect();
    matches.sort_by_key(|r| r.seed);

    let summary = BatchSummary::from_records(&matches);
    info!(?summary, "batch complete");

    BatchResults {
        config: config.clone(),
        matches,
        summary,
        duration_seconds: start.elapsed().as_secs_f64(),
    }
}
