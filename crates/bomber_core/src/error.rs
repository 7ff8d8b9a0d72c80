//! Error types for the arena simulation.
//!
//! Rejected player actions are not errors: they are reported as values
//! in [`crate::arena::TurnReport`] and leave the arena unchanged.
//! `GameError` covers caller misuse (unknown agent) and conditions
//! that indicate a programming defect (invariant violations,
//! serialization failures).

use thiserror::Error;

use crate::components::AgentId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all arena simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// No agent with this id exists in the arena.
    #[error("Unknown agent ID: {0}")]
    UnknownAgent(AgentId),

    /// An internal invariant was violated; indicates a defect.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Snapshot or replay encoding/decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Replay file version does not match this build.
    #[error("Replay version mismatch: expected {expected}, got {got}")]
    ReplayVersionMismatch {
        /// Version this build writes.
        expected: u32,
        /// Version found in the file.
        got: u32,
    },

    /// Replay verification failed: the re-simulated final state hash
    /// differs from the recorded one.
    #[error("Replay diverged: recorded hash {recorded}, replayed hash {replayed}")]
    ReplayDiverged {
        /// Hash stored in the replay file.
        recorded: u64,
        /// Hash produced by re-simulation.
        replayed: u64,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
