//! # Bomber Core
//!
//! Deterministic simulation core for the grid-bomber arena.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO (replay file helpers aside)
//! - No system randomness
//! - No wall-clock dependence
//!
//! This separation enables:
//! - Headless batch simulation
//! - Replay systems with hash verification
//! - Determinism testing
//! - Pluggable agent controllers behind the [`decision`] seam
//!
//! ## Crate Structure
//!
//! - [`components`] - Agents, bombs, loot, and action definitions
//! - [`grid`] / [`worldgen`] - Terrain and seeded world generation
//! - [`arena`] - Turn/round state machine and move application
//! - [`bombs`] - Explosion and chain-reaction resolution
//! - [`seed_finder`] - Constrained seed search for curated worlds
//! - [`replay`] - Match recording and verified playback

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod arena;
pub mod bombs;
pub mod components;
pub mod config;
pub mod decision;
pub mod error;
pub mod grid;
pub mod loot;
pub mod replay;
pub mod rng;
pub mod seed_finder;
pub mod worldgen;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::{ActionOutcome, Arena, DropOutcome, RejectReason, Snapshot, TurnReport};
    pub use crate::bombs::RoundEvents;
    pub use crate::components::{
        Action, Agent, AgentId, Bomb, CarriedBomb, Direction, Loot, LootKind,
    };
    pub use crate::config::GameConfig;
    pub use crate::decision::{Decider, Decision, DecisionError};
    pub use crate::error::{GameError, Result};
    pub use crate::grid::{CellKind, Grid};
    pub use crate::replay::Replay;
    pub use crate::rng::SeededRng;
}
