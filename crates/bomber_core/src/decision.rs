//! The decision seam between the engine and whatever picks moves.
//!
//! Agent controllers see the world only through a [`Snapshot`] and
//! answer with a [`Decision`]. Controllers are fallible: the engine
//! treats any error as "this agent stays put this turn" so one broken
//! controller can never stall a match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::Snapshot;
use crate::components::{Action, AgentId};

/// A controller's answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// The action to apply.
    pub action: Action,
    /// Optional free-text rationale, carried through to logs and
    /// replay records but never interpreted.
    pub thought: Option<String>,
}

impl Decision {
    /// A plain action with no rationale.
    #[must_use]
    pub fn of(action: Action) -> Self {
        Self {
            action,
            thought: None,
        }
    }

    /// The substitute decision used when a controller fails: stay in
    /// place, drop nothing.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            action: Action::stay(),
            thought: None,
        }
    }
}

/// Why a controller failed to produce a decision.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The controller exceeded its time allowance.
    #[error("decision timed out")]
    Timeout,
    /// The controller failed outright.
    #[error("decision failed: {0}")]
    Failed(String),
}

/// Anything that can pick a move for an agent.
///
/// `decide` takes `&mut self` so stateful controllers (scripted
/// sequences, seeded randomness) fit without interior mutability.
pub trait Decider {
    /// Pick a move for `agent` given the current world snapshot.
    fn decide(&mut self, snapshot: &Snapshot, agent: AgentId) -> Result<Decision, DecisionError>;
}
