//! Agent controllers for headless playtesting.
//!
//! Each controller implements [`Decider`] over snapshots: a trivial
//! stayer for baselines, a seeded-random walker for soak runs, a
//! scripted controller driven by (round, agent) keyed moves loaded
//! from RON, and a deliberately failing controller for exercising the
//! fallback path.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bomber_core::arena::Snapshot;
use bomber_core::components::{Action, AgentId, Direction};
use bomber_core::decision::{Decider, Decision, DecisionError};
use bomber_core::grid::CellKind;
use bomber_core::rng::SeededRng;

/// Error type for script loading.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// File not found.
    #[error("Script file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read script file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse script: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Baseline controller: always stays put.
#[derive(Debug, Clone, Copy, Default)]
pub struct StayDecider;

impl Decider for StayDecider {
    fn decide(&mut self, _snapshot: &Snapshot, _agent: AgentId) -> Result<Decision, DecisionError> {
        Ok(Decision::fallback())
    }
}

/// Seeded-random walker for soak testing.
///
/// Prefers steps onto walkable, bomb-free cells and occasionally drops
/// a bomb when capacity allows. All randomness comes from its own
/// seeded stream, so a (seed, match) pair reproduces exactly.
#[derive(Debug, Clone)]
pub struct RandomDecider {
    rng: SeededRng,
}

impl RandomDecider {
    /// Create a walker from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::new(seed),
        }
    }
}

impl Decider for RandomDecider {
    fn decide(&mut self, snapshot: &Snapshot, agent: AgentId) -> Result<Decision, DecisionError> {
        let me = snapshot
            .agent(agent)
            .ok_or_else(|| DecisionError::Failed(format!("agent {agent} not in snapshot")))?;

        let mut options = vec![Direction::Stay];
        for direction in Direction::CARDINAL {
            let (dx, dy) = direction.delta();
            let (x, y) = (me.x + dx, me.y + dy);
            if snapshot.grid.get(x, y) == Some(CellKind::Empty) && snapshot.bomb_at(x, y).is_none()
            {
                options.push(direction);
            }
        }

        let direction = options[self.rng.next_range(0, options.len() as i32) as usize];
        let drop_bomb =
            me.active_bombs < me.max_bombs && self.rng.next_range(0, 4) == 0;

        Ok(Decision::of(Action::Move {
            direction,
            drop_bomb,
        }))
    }
}

/// One scripted move, keyed by round and agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedMove {
    /// Round in which this move fires.
    pub round: u32,
    /// Agent it belongs to.
    pub agent: AgentId,
    /// The action to play.
    pub action: Action,
}

/// Deterministic scripted controller.
///
/// Moves are keyed by (round, agent); any slot without a scripted move
/// stays put. This mirrors how regression scenarios are written: a
/// sparse list of the moves that matter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecider {
    moves: HashMap<(u32, AgentId), Action>,
}

impl ScriptedDecider {
    /// Build from a list of scripted moves. Later duplicates of the
    /// same (round, agent) key win.
    #[must_use]
    pub fn new(moves: impl IntoIterator<Item = ScriptedMove>) -> Self {
        Self {
            moves: moves
                .into_iter()
                .map(|m| ((m.round, m.agent), m.action))
                .collect(),
        }
    }

    /// Load a script from a RON file holding a `Vec<ScriptedMove>`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StrategyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StrategyError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(text: &str) -> Result<Self, StrategyError> {
        let moves: Vec<ScriptedMove> = ron::from_str(text)?;
        Ok(Self::new(moves))
    }

    /// Number of scripted slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Decider for ScriptedDecider {
    fn decide(&mut self, snapshot: &Snapshot, agent: AgentId) -> Result<Decision, DecisionError> {
        let action = self
            .moves
            .get(&(snapshot.round_count, agent))
            .copied()
            .unwrap_or_else(Action::stay);
        Ok(Decision::of(action))
    }
}

/// Controller that always fails, for exercising the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDecider;

impl Decider for FailingDecider {
    fn decide(&mut self, _snapshot: &Snapshot, _agent: AgentId) -> Result<Decision, DecisionError> {
        Err(DecisionError::Failed("controller intentionally down".to_string()))
    }
}
