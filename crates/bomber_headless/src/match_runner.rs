//! Drives full matches from decision to detonation.
//!
//! The runner owns one controller per agent slot and advances the
//! arena turn by turn: fetch a decision, apply it, rotate the turn
//! pointer, resolve bombs at every round boundary. Controller failures
//! never abort a match; the failing agent stays put for that turn.

use serde::{Deserialize, Serialize};

use bomber_core::arena::Arena;
use bomber_core::components::AgentId;
use bomber_core::config::GameConfig;
use bomber_core::decision::{Decider, Decision};
use bomber_core::error::Result;
use bomber_core::replay::Replay;

/// Hard round ceiling for matches without a configured cap, so a
/// stalemate between passive controllers still terminates.
const STALEMATE_ROUND_LIMIT: u32 = 10_000;

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Exactly one agent survived.
    LastAgentStanding,
    /// The final blast killed everyone still alive.
    AllDead,
    /// The round cap stopped the match first.
    RoundCapReached,
}

/// Result of one completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Winner, when the match ended with a last agent standing.
    pub winner: Option<AgentId>,
    /// Rounds completed.
    pub rounds: u32,
    /// Turn slots elapsed.
    pub turns: u64,
    /// Why the match stopped.
    pub reason: EndReason,
}

/// Runs one match with one controller per agent slot.
pub struct MatchRunner {
    arena: Arena,
    controllers: Vec<Box<dyn Decider>>,
    replay: Option<Replay>,
}

impl MatchRunner {
    /// Create a runner. `controllers` pairs up with agent slots in
    /// spawn order and must match the configured agent count.
    ///
    /// # Panics
    ///
    /// Panics if the controller count does not match the agent count.
    #[must_use]
    pub fn new(config: GameConfig, controllers: Vec<Box<dyn Decider>>) -> Self {
        assert_eq!(
            controllers.len(),
            config.agent_count as usize,
            "one controller per agent slot"
        );
        Self {
            arena: Arena::new(config),
            controllers,
            replay: None,
        }
    }

    /// Record the match to a replay while running.
    #[must_use]
    pub fn with_recording(mut self) -> Self {
        self.replay = Some(Replay::new(self.arena.config().clone()));
        self
    }

    /// The arena, for inspection mid- or post-match.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Take the recorded replay, if recording was enabled. Finalized
    /// only after [`run`](Self::run) returns.
    pub fn take_replay(&mut self) -> Option<Replay> {
        self.replay.take()
    }

    /// Play the match to completion.
    pub fn run(&mut self) -> Result<MatchOutcome> {
        let cap = self
            .arena
            .config()
            .max_rounds
            .unwrap_or(STALEMATE_ROUND_LIMIT);

        'rounds: while self.arena.round_count() < cap {
            for _ in 0..self.arena.agents().len() {
                self.play_slot()?;
            }
            let events = self.arena.update_bombs();
            if !events.deaths.is_empty() {
                tracing::info!(deaths = ?events.deaths, round = self.arena.round_count(), "casualties");
            }
            if self.arena.is_over() {
                break 'rounds;
            }
        }

        let living = self.arena.living_agents();
        let reason = if living == 1 {
            EndReason::LastAgentStanding
        } else if living == 0 {
            EndReason::AllDead
        } else {
            EndReason::RoundCapReached
        };
        let outcome = MatchOutcome {
            winner: self.arena.winner(),
            rounds: self.arena.round_count(),
            turns: self.arena.turn_count(),
            reason,
        };

        if let Some(replay) = &mut self.replay {
            replay.finalize(self.arena.round_count(), self.arena.state_hash());
        }
        tracing::info!(?outcome, "match finished");
        Ok(outcome)
    }

    /// Play one turn slot: decide, apply, rotate.
    fn play_slot(&mut self) -> Result<()> {
        let slot = self.arena.current_index();
        let agent = self.arena.current_agent_id();

        if self.arena.agent(agent)?.alive {
            let snapshot = self.arena.snapshot();
            let decision = match self.controllers[slot].decide(&snapshot, agent) {
                Ok(decision) => decision,
                Err(err) => {
                    // A broken controller forfeits the turn, nothing more.
                    tracing::warn!(agent, %err, "controller failed, falling back to stay");
                    Decision::fallback()
                }
            };
            if let Some(thought) = &decision.thought {
                tracing::debug!(agent, thought, "controller rationale");
            }
            let report = self.arena.apply_move(agent, decision.action)?;
            tracing::debug!(?report, "move applied");
            if let Some(replay) = &mut self.replay {
                replay.record(self.arena.turn_count(), agent, Some(decision.action));
            }
        } else if let Some(replay) = &mut self.replay {
            replay.record(self.arena.turn_count(), agent, None);
        }

        self.arena.next_turn();
        Ok(())
    }
}
