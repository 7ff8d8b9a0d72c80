//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the arena simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Matches must be 100% reproducible from (seed, move sequence) for
//! replay verification and batch analysis. Sources of non-determinism
//! include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The arena stores entities in `Vec`s and iterates insertion order.
//!
//! - **System randomness**: no unseeded randomness anywhere; all rolls
//!   come from the arena's embedded seeded stream.
//!
//! - **Wall-clock time**: rounds are logical, never timed.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual mechanic determinism (worldgen, loot rolls)
//! 2. **Property tests**: random action streams still replay identically
//! 3. **Integration tests**: full scripted matches are reproducible
//! 4. **Parallel tests**: running N matches in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use bomber_core::arena::Arena;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of rounds simulated.
    pub rounds: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic match).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error
    /// message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Match is non-deterministic!\n\
                 Runs: {}\n\
                 Rounds: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.rounds,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel match runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Final state hash from each match.
    pub hashes: Vec<u64>,
    /// Number of rounds each match ran.
    pub rounds: u64,
    /// Number of matches run.
    pub num_runs: usize,
}

impl ParallelRunResult {
    /// Check if all matches produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all matches agreed.
    ///
    /// # Panics
    ///
    /// Panics if matches produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel matches diverged!\n\
                 Matches: {}\n\
                 Rounds: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_runs,
                self.rounds,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `rounds` - Number of rounds to simulate per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one round
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    rounds: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..rounds {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        rounds,
    }
}

/// Advance an arena by one full round: a turn slot per agent, then a
/// bomb update. Agents all stand still; use a custom `step` with
/// [`verify_determinism`] when moves matter.
pub fn idle_round(arena: &mut Arena) {
    for _ in 0..arena.agents().len() {
        arena.next_turn();
    }
    arena.update_bombs();
}

/// Simplified determinism verification for arenas.
///
/// Runs the scenario twice with identical setup and verifies the final
/// state hashes match exactly.
pub fn verify_arena_determinism<F>(setup_fn: F, num_rounds: u64) -> bool
where
    F: Fn() -> Arena,
{
    let result = verify_determinism(
        2,
        num_rounds,
        &setup_fn,
        idle_round,
        Arena::state_hash,
    );
    result.is_deterministic
}

/// Run N matches in parallel using scoped threads and collect final
/// hashes.
///
/// This catches non-determinism that only manifests under thread
/// scheduling variations or memory layout differences.
pub fn run_parallel_matches_scoped<F>(
    setup_fn: F,
    num_runs: usize,
    num_rounds: u64,
) -> ParallelRunResult
where
    F: Fn() -> Arena + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| {
                s.spawn(|| {
                    let mut arena = setup_fn();
                    for _ in 0..num_rounds {
                        idle_round(&mut arena);
                    }
                    arena.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelRunResult {
        hashes,
        rounds: num_rounds,
        num_runs,
    }
}

/// Compare two arena runs round-by-round, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs are deterministic, `Some(round)` if they diverge
/// at that round.
pub fn find_first_divergence<F>(setup_fn: F, num_rounds: u64) -> Option<u64>
where
    F: Fn() -> Arena,
{
    let mut run1 = setup_fn();
    let mut run2 = setup_fn();

    if run1.state_hash() != run2.state_hash() {
        return Some(0);
    }

    for round in 1..=num_rounds {
        idle_round(&mut run1);
        idle_round(&mut run2);

        if run1.state_hash() != run2.state_hash() {
            return Some(round);
        }
    }

    None
}

/// Verify that snapshot encode/decode preserves the observable state.
pub fn verify_snapshot_determinism<F>(setup_fn: F, num_rounds: u64) -> bool
where
    F: Fn() -> Arena,
{
    let mut arena = setup_fn();
    for _ in 0..num_rounds {
        idle_round(&mut arena);
    }

    let snapshot = arena.snapshot();
    let Ok(text) = snapshot.to_ron() else {
        return false;
    };
    match bomber_core::arena::Snapshot::from_ron(&text) {
        Ok(restored) => restored == snapshot,
        Err(_) => false,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of match determinism.
pub mod strategies {
    use bomber_core::components::{Action, Direction};
    use proptest::prelude::*;

    /// Generate any direction, `Stay` included.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::Stay),
        ]
    }

    /// Generate an arbitrary action, weighted towards movement.
    pub fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (arb_direction(), any::<bool>())
                .prop_map(|(direction, drop_bomb)| Action::Move {
                    direction,
                    drop_bomb,
                }),
            1 => Just(Action::Pickup),
            1 => arb_direction().prop_map(|direction| Action::Throw { direction }),
        ]
    }

    /// Generate a stream of actions for a scripted match.
    pub fn arb_action_stream(len: usize) -> impl Strategy<Value = Vec<Action>> {
        prop::collection::vec(arb_action(), len)
    }
}
