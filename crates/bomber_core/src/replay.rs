//! Match recording and deterministic playback.
//!
//! A replay stores the match configuration and the per-turn action
//! stream; the world itself is regenerated from the config seed, so
//! the file stays small. Playback re-runs the full simulation and
//! verifies the final state hash, turning any drift between recorder
//! and player into a hard error instead of a silently wrong replay.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::components::{Action, AgentId};
use crate::config::GameConfig;
use crate::error::{GameError, Result};

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// One turn slot in the recorded stream.
///
/// `action` is `None` for a dead agent's slot: the slot still elapses
/// (rounds count every slot) but no decision was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMove {
    /// Turn counter value when the slot was played.
    pub turn: u64,
    /// Agent owning the slot.
    pub agent: AgentId,
    /// The action applied, if the agent was alive.
    pub action: Option<Action>,
}

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Configuration the match was created from.
    pub config: GameConfig,
    /// Per-slot action stream in turn order.
    pub moves: Vec<ReplayMove>,
    /// Round count when the match ended.
    pub final_round: u32,
    /// Final state hash for verification.
    pub final_hash: u64,
}

impl Replay {
    /// Start an empty replay for a match configuration.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            version: REPLAY_VERSION,
            config,
            moves: Vec::new(),
            final_round: 0,
            final_hash: 0,
        }
    }

    /// Record one turn slot.
    pub fn record(&mut self, turn: u64, agent: AgentId, action: Option<Action>) {
        self.moves.push(ReplayMove {
            turn,
            agent,
            action,
        });
    }

    /// Finalize with end-of-match state.
    pub fn finalize(&mut self, final_round: u32, final_hash: u64) {
        self.final_round = final_round;
        self.final_hash = final_hash;
    }

    /// Total number of recorded slots.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Save the replay to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::Serialization(format!("failed to serialize replay: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::InvalidState(format!("failed to write replay file: {e}")))?;
        Ok(())
    }

    /// Load a replay from a file, checking the format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::InvalidState(format!("failed to read replay file: {e}")))?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::Serialization(format!("failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::ReplayVersionMismatch {
                expected: REPLAY_VERSION,
                got: replay.version,
            });
        }

        Ok(replay)
    }

    /// Re-run the recorded match and verify it reaches the recorded
    /// final hash.
    ///
    /// Returns the reconstructed arena on success; diverging from the
    /// recorded hash is [`GameError::ReplayDiverged`].
    pub fn replay(&self) -> Result<Arena> {
        let mut arena = Arena::new(self.config.clone());

        for slot in &self.moves {
            if let Some(action) = slot.action {
                // Rejections are deterministic and were part of the
                // recorded run; only unknown ids are real failures.
                let _ = arena.apply_move(slot.agent, action)?;
            }
            arena.next_turn();
            if arena.current_index() == 0 {
                arena.update_bombs();
            }
        }

        let replayed = arena.state_hash();
        if self.final_hash != 0 && replayed != self.final_hash {
            tracing::error!(
                recorded = self.final_hash,
                replayed,
                "replay diverged from recording"
            );
            return Err(GameError::ReplayDiverged {
                recorded: self.final_hash,
                replayed,
            });
        }

        Ok(arena)
    }
}
