//! The arena: turn/round state machine and entity store.
//!
//! An `Arena` owns the grid, the agents, the placed bombs, and the
//! loot, and exposes the mutating operations that advance simulation
//! time. It is a plain value owned by the caller; there is no global
//! state. Exactly one mutator runs at a time, in the cyclic turn order
//! fixed at initialization.
//!
//! # Determinism
//!
//! All operations are fully deterministic: entity lists are plain
//! `Vec`s iterated in insertion order, all randomness flows through
//! the embedded seeded stream, and the same (seed, move sequence)
//! always reproduces the same match.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::bombs::{self, RoundEvents};
use crate::components::{Action, Agent, AgentId, Bomb, CarriedBomb, Direction, Loot, LootKind};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::grid::{CellKind, Grid};
use crate::loot;
use crate::rng::SeededRng;
use crate::worldgen;

/// Why an action (or the bomb-drop part of one) was rejected.
///
/// Rejections are reported, never fatal: the arena state is unchanged
/// except where the report says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Destination lies outside the grid.
    OffGrid,
    /// Destination is a soft or hard block.
    Terrain,
    /// Destination holds a bomb; bombs block movement.
    Bomb,
    /// The agent is dead and cannot act.
    AgentDead,
    /// Concurrent-bomb capacity is saturated.
    CapacityExceeded,
    /// The carry ability has not been unlocked.
    CannotCarry,
    /// No bomb on the agent's cell to pick up.
    NothingToPickUp,
    /// A bomb is already being carried.
    AlreadyCarrying,
    /// No bomb is being carried.
    NothingCarried,
    /// No free landing cell within throw distance (or the throw had
    /// no direction).
    NoLandingCell,
}

/// Outcome of the bomb-drop part of a move action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropOutcome {
    /// A bomb was placed at the agent's pre-move position.
    Placed,
    /// The drop was rejected; the move itself still proceeds.
    Rejected(RejectReason),
}

/// Outcome of the primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The agent stepped to a new cell.
    Moved {
        /// Destination cell.
        to: (i32, i32),
    },
    /// The agent stayed in place.
    Stayed,
    /// A bomb was lifted off the board.
    PickedUp {
        /// Agent whose capacity slot was freed.
        from_owner: AgentId,
    },
    /// The carried bomb was thrown and landed.
    Threw {
        /// Landing cell.
        landing: (i32, i32),
        /// Whether the projection crossed a grid edge.
        wrapped: bool,
    },
    /// The action was rejected; nothing changed.
    Rejected(RejectReason),
}

/// Report of everything a single applied move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Acting agent.
    pub agent: AgentId,
    /// Outcome of the bomb-drop flag, if the action carried one.
    pub drop: Option<DropOutcome>,
    /// Outcome of the primary action.
    pub outcome: ActionOutcome,
    /// Loot auto-collected at the destination cell.
    pub loot_collected: Option<LootKind>,
}

/// A fully self-contained, serializable view of the arena.
///
/// Round-trips losslessly through RON for logging and replay
/// tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The terrain.
    pub grid: Grid,
    /// All agents, dead ones included.
    pub agents: Vec<Agent>,
    /// Placed bombs.
    pub bombs: Vec<Bomb>,
    /// Loot waiting on the grid.
    pub loot: Vec<Loot>,
    /// Total agent actions applied.
    pub turn_count: u64,
    /// Completed full rounds.
    pub round_count: u32,
    /// Agent whose turn it is.
    pub current_agent_id: AgentId,
}

impl Snapshot {
    /// Encode as RON text.
    pub fn to_ron(&self) -> Result<String> {
        ron::to_string(self).map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Decode from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Find an agent by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Whether any bomb sits on a cell.
    #[must_use]
    pub fn bomb_at(&self, x: i32, y: i32) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.x == x && b.y == y)
    }
}

/// The arena simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    config: GameConfig,
    grid: Grid,
    agents: Vec<Agent>,
    bombs: Vec<Bomb>,
    loot: Vec<Loot>,
    turn_count: u64,
    round_count: u32,
    current_index: usize,
    rng: SeededRng,
}

impl Arena {
    /// Create an arena: generate the world from the config seed and
    /// spawn the agents at their corners.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let grid = worldgen::generate(&config);
        let corners = grid.spawn_corners();
        let agents = (0..config.agent_count)
            .map(|i| {
                let (x, y) = corners[i as usize];
                Agent::new(i + 1, x, y, config.base_range, config.base_bombs)
            })
            .collect();

        // World generation consumed its own stream; in-match rolls get
        // a derived stream so adding generation draws never shifts
        // loot outcomes.
        let rng = SeededRng::new(config.seed ^ 0x6C00_7D15);

        Self {
            config,
            grid,
            agents,
            bombs: Vec::new(),
            loot: Vec::new(),
            turn_count: 0,
            round_count: 0,
            current_index: 0,
            rng,
        }
    }

    /// Inject a pre-armed bomb (test setup). The owner's capacity
    /// slot is consumed so invariants hold.
    #[must_use]
    pub fn with_bomb(mut self, bomb: Bomb) -> Self {
        if let Some(owner) = self.agents.iter_mut().find(|a| a.id == bomb.owner) {
            owner.active_bombs += 1;
            owner.max_bombs = owner.max_bombs.max(owner.active_bombs);
        }
        self.bombs.push(bomb);
        self
    }

    /// Inject a loot item (test setup).
    #[must_use]
    pub fn with_loot(mut self, item: Loot) -> Self {
        self.loot.push(item);
        self
    }

    /// The match configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The terrain grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All agents in spawn order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Placed bombs.
    #[must_use]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Loot currently on the grid.
    #[must_use]
    pub fn loot(&self) -> &[Loot] {
        &self.loot
    }

    /// Total agent actions applied so far.
    #[must_use]
    pub const fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// Completed full rounds.
    #[must_use]
    pub const fn round_count(&self) -> u32 {
        self.round_count
    }

    /// Index of the agent slot whose turn it is.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Id of the agent whose turn it is.
    #[must_use]
    pub fn current_agent_id(&self) -> AgentId {
        self.agents[self.current_index].id
    }

    /// Find an agent by id.
    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or(GameError::UnknownAgent(id))
    }

    /// Find an agent by id, mutably. Intended for test setup.
    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(GameError::UnknownAgent(id))
    }

    /// Agents still alive.
    #[must_use]
    pub fn living_agents(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    /// Whether the match is decided (at most one agent alive).
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.living_agents() <= 1
    }

    /// The last agent standing, if the match is decided that way.
    #[must_use]
    pub fn winner(&self) -> Option<AgentId> {
        if self.living_agents() == 1 {
            self.agents.iter().find(|a| a.alive).map(|a| a.id)
        } else {
            None
        }
    }

    /// Whether the configured round cap has been reached.
    #[must_use]
    pub fn round_cap_reached(&self) -> bool {
        self.config
            .max_rounds
            .is_some_and(|cap| self.round_count >= cap)
    }

    /// Apply one agent's action for its turn.
    ///
    /// Rejections (blocked step, saturated capacity, missing
    /// prerequisites) are reported in the returned [`TurnReport`];
    /// `Err` is reserved for unknown agent ids.
    pub fn apply_move(&mut self, agent_id: AgentId, action: Action) -> Result<TurnReport> {
        let idx = self
            .agents
            .iter()
            .position(|a| a.id == agent_id)
            .ok_or(GameError::UnknownAgent(agent_id))?;

        if !self.agents[idx].alive {
            return Ok(TurnReport {
                agent: agent_id,
                drop: None,
                outcome: ActionOutcome::Rejected(RejectReason::AgentDead),
                loot_collected: None,
            });
        }

        let report = match action {
            Action::Move {
                direction,
                drop_bomb,
            } => {
                // The drop is evaluated first, at the pre-move position.
                let drop = drop_bomb.then(|| self.place_bomb(idx));
                let outcome = self.step(idx, direction);
                let loot_collected = match outcome {
                    ActionOutcome::Moved { .. } | ActionOutcome::Stayed => self.collect_loot(idx),
                    _ => None,
                };
                TurnReport {
                    agent: agent_id,
                    drop,
                    outcome,
                    loot_collected,
                }
            }
            Action::Pickup => TurnReport {
                agent: agent_id,
                drop: None,
                outcome: self.pickup_bomb(idx),
                loot_collected: None,
            },
            Action::Throw { direction } => TurnReport {
                agent: agent_id,
                drop: None,
                outcome: self.throw_bomb(idx, direction),
                loot_collected: None,
            },
        };

        debug_assert!(
            self.check_invariants().is_ok(),
            "arena invariants broken after move: {:?}",
            self.check_invariants()
        );

        Ok(report)
    }

    /// Advance the turn pointer. One round is `agent_count` turns,
    /// whether or not the agents in those slots are alive: dead agents
    /// keep their slot so round accounting stays stable.
    pub fn next_turn(&mut self) {
        self.current_index = (self.current_index + 1) % self.agents.len();
        self.turn_count += 1;
        if self.current_index == 0 {
            self.round_count += 1;
            tracing::debug!(round = self.round_count, "round advanced");
        }
    }

    /// Advance all bomb countdowns and resolve detonations. Call once
    /// per full round, after every agent slot has acted.
    pub fn update_bombs(&mut self) -> RoundEvents {
        for bomb in &mut self.bombs {
            if bomb.stage > 0 {
                bomb.stage -= 1;
            }
        }

        let mut events = bombs::resolve_detonations(
            &mut self.grid,
            &mut self.bombs,
            &mut self.agents,
            &mut self.loot,
            &mut self.rng,
            &self.config,
            self.round_count,
        );
        events.round_cap_reached = self.round_cap_reached();

        debug_assert!(
            self.check_invariants().is_ok(),
            "arena invariants broken after bomb update: {:?}",
            self.check_invariants()
        );

        events
    }

    /// Read-only snapshot of the whole arena.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            agents: self.agents.clone(),
            bombs: self.bombs.clone(),
            loot: self.loot.clone(),
            turn_count: self.turn_count,
            round_count: self.round_count,
            current_agent_id: self.current_agent_id(),
        }
    }

    /// Hash of the dynamic state, for determinism harnesses and
    /// replay verification.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.grid.hash(&mut hasher);
        self.agents.hash(&mut hasher);
        self.bombs.hash(&mut hasher);
        self.loot.hash(&mut hasher);
        self.turn_count.hash(&mut hasher);
        self.round_count.hash(&mut hasher);
        self.current_index.hash(&mut hasher);
        self.rng.hash(&mut hasher);
        hasher.finish()
    }

    /// Verify internal consistency: every agent's `active_bombs` must
    /// equal the number of placed bombs it owns, within capacity.
    ///
    /// A failure here is a programming defect, not a gameplay
    /// condition.
    pub fn check_invariants(&self) -> Result<()> {
        for agent in &self.agents {
            let placed = self.bombs.iter().filter(|b| b.owner == agent.id).count() as u32;
            if placed != agent.active_bombs {
                return Err(GameError::InvariantViolation(format!(
                    "agent {} active_bombs {} but {} placed bombs on board",
                    agent.id, agent.active_bombs, placed
                )));
            }
            if agent.active_bombs > agent.max_bombs {
                return Err(GameError::InvariantViolation(format!(
                    "agent {} active_bombs {} exceeds capacity {}",
                    agent.id, agent.active_bombs, agent.max_bombs
                )));
            }
        }
        Ok(())
    }

    fn place_bomb(&mut self, idx: usize) -> DropOutcome {
        let (x, y) = self.agents[idx].position();
        if self.agents[idx].active_bombs >= self.agents[idx].max_bombs {
            tracing::debug!(agent = self.agents[idx].id, "bomb drop rejected: capacity");
            return DropOutcome::Rejected(RejectReason::CapacityExceeded);
        }
        if self.bomb_at(x, y).is_some() {
            return DropOutcome::Rejected(RejectReason::Bomb);
        }
        let agent = &mut self.agents[idx];
        agent.active_bombs += 1;
        let bomb = Bomb {
            owner: agent.id,
            x,
            y,
            stage: self.config.fuse_rounds,
            range: agent.bomb_range,
        };
        tracing::debug!(agent = agent.id, x, y, range = bomb.range, "bomb placed");
        self.bombs.push(bomb);
        DropOutcome::Placed
    }

    fn step(&mut self, idx: usize, direction: Direction) -> ActionOutcome {
        if direction == Direction::Stay {
            return ActionOutcome::Stayed;
        }
        let (dx, dy) = direction.delta();
        let (x, y) = (self.agents[idx].x + dx, self.agents[idx].y + dy);
        match self.grid.get(x, y) {
            None => ActionOutcome::Rejected(RejectReason::OffGrid),
            Some(CellKind::Soft | CellKind::Hard) => {
                ActionOutcome::Rejected(RejectReason::Terrain)
            }
            Some(CellKind::Empty) => {
                if self.bomb_at(x, y).is_some() {
                    return ActionOutcome::Rejected(RejectReason::Bomb);
                }
                self.agents[idx].x = x;
                self.agents[idx].y = y;
                ActionOutcome::Moved { to: (x, y) }
            }
        }
    }

    fn collect_loot(&mut self, idx: usize) -> Option<LootKind> {
        let pos = self.agents[idx].position();
        let slot = self.loot.iter().position(|l| (l.x, l.y) == pos)?;
        let item = self.loot.remove(slot);
        loot::apply_effect(&mut self.agents[idx], item.kind);
        tracing::info!(
            agent = self.agents[idx].id,
            kind = ?item.kind,
            x = pos.0,
            y = pos.1,
            "loot collected"
        );
        Some(item.kind)
    }

    fn pickup_bomb(&mut self, idx: usize) -> ActionOutcome {
        if !self.agents[idx].can_carry_bombs {
            return ActionOutcome::Rejected(RejectReason::CannotCarry);
        }
        if self.agents[idx].carried_bomb.is_some() {
            return ActionOutcome::Rejected(RejectReason::AlreadyCarrying);
        }
        let pos = self.agents[idx].position();
        let Some(slot) = self.bombs.iter().position(|b| (b.x, b.y) == pos) else {
            return ActionOutcome::Rejected(RejectReason::NothingToPickUp);
        };
        let bomb = self.bombs.remove(slot);
        if let Some(owner) = self.agents.iter_mut().find(|a| a.id == bomb.owner) {
            debug_assert!(owner.active_bombs > 0, "picked-up bomb had no owner slot");
            owner.active_bombs = owner.active_bombs.saturating_sub(1);
        }
        self.agents[idx].carried_bomb = Some(CarriedBomb {
            stage: bomb.stage,
            range: bomb.range,
        });
        tracing::info!(
            agent = self.agents[idx].id,
            from_owner = bomb.owner,
            "bomb picked up"
        );
        ActionOutcome::PickedUp {
            from_owner: bomb.owner,
        }
    }

    fn throw_bomb(&mut self, idx: usize, direction: Direction) -> ActionOutcome {
        let Some(carried) = self.agents[idx].carried_bomb else {
            return ActionOutcome::Rejected(RejectReason::NothingCarried);
        };
        let (dx, dy) = direction.delta();
        if (dx, dy) == (0, 0) {
            return ActionOutcome::Rejected(RejectReason::NoLandingCell);
        }
        // Landing re-occupies a capacity slot; a saturated thrower
        // must wait for one of its bombs to clear.
        if self.agents[idx].active_bombs >= self.agents[idx].max_bombs {
            return ActionOutcome::Rejected(RejectReason::CapacityExceeded);
        }

        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        let (mut x, mut y) = self.agents[idx].position();
        let mut wrapped = false;

        for _ in 0..self.config.max_throw_distance {
            x += dx;
            y += dy;
            // Toroidal edges: the projection wraps to the opposite
            // side instead of stopping at the boundary.
            if x < 0 {
                x = width - 1;
                wrapped = true;
            } else if x >= width {
                x = 0;
                wrapped = true;
            }
            if y < 0 {
                y = height - 1;
                wrapped = true;
            } else if y >= height {
                y = 0;
                wrapped = true;
            }

            if self.grid.get(x, y) == Some(CellKind::Empty) && self.bomb_at(x, y).is_none() {
                let agent = &mut self.agents[idx];
                agent.carried_bomb = None;
                agent.active_bombs += 1;
                let owner = agent.id;
                self.bombs.push(Bomb {
                    owner,
                    x,
                    y,
                    stage: carried.stage,
                    range: carried.range,
                });
                tracing::info!(agent = owner, x, y, wrapped, "bomb thrown");
                return ActionOutcome::Threw {
                    landing: (x, y),
                    wrapped,
                };
            }
        }

        ActionOutcome::Rejected(RejectReason::NoLandingCell)
    }

    fn bomb_at(&self, x: i32, y: i32) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.x == x && b.y == y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_config() -> GameConfig {
        GameConfig::default()
            .with_soft_density(0.0)
            .with_loot_probability(0.0)
    }

    fn open_arena() -> Arena {
        Arena::new(open_config())
    }

    #[test]
    fn new_arena_spawns_agents_at_corners() {
        let arena = Arena::new(GameConfig::default().with_seed(12345));
        let positions: Vec<(AgentId, i32, i32)> =
            arena.agents().iter().map(|a| (a.id, a.x, a.y)).collect();
        assert_eq!(
            positions,
            vec![(1, 0, 0), (2, 12, 0), (3, 0, 10), (4, 12, 10)]
        );
        assert!(arena.agents().iter().all(|a| a.alive));
        assert_eq!(arena.turn_count(), 0);
        assert_eq!(arena.round_count(), 0);
        assert_eq!(arena.current_agent_id(), 1);
    }

    // Concrete scenario: seed 12345, agent 1 at (0,0); down succeeds
    // to (0,1), stay leaves the position unchanged.
    #[test]
    fn seeded_opening_moves() {
        let mut arena = Arena::new(GameConfig::default().with_seed(12345));
        let report = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: false,
                },
            )
            .unwrap();
        assert_eq!(report.outcome, ActionOutcome::Moved { to: (0, 1) });
        assert_eq!(arena.agent(1).unwrap().position(), (0, 1));

        let report = arena.apply_move(1, Action::stay()).unwrap();
        assert_eq!(report.outcome, ActionOutcome::Stayed);
        assert_eq!(arena.agent(1).unwrap().position(), (0, 1));
    }

    #[test]
    fn turn_round_invariant() {
        let mut arena = open_arena();
        let n = arena.agents().len() as u64;
        for k in 1..=37u64 {
            arena.next_turn();
            assert_eq!(arena.round_count() as u64, k / n);
            assert_eq!(arena.current_index() as u64, k % n);
            assert_eq!(arena.turn_count(), k);
        }
    }

    #[test]
    fn dead_agents_still_occupy_turn_slots() {
        let mut arena = open_arena();
        arena.agent_mut(2).unwrap().alive = false;
        let n = arena.agents().len() as u64;
        for _ in 0..n {
            arena.next_turn();
        }
        assert_eq!(arena.round_count(), 1);
    }

    #[test]
    fn moves_blocked_by_grid_edges_and_terrain() {
        let mut arena = Arena::new(GameConfig::default().with_loot_probability(0.0));
        // Agent 1 at (0,0): up and left are off-grid.
        let up = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Up,
                    drop_bomb: false,
                },
            )
            .unwrap();
        assert_eq!(up.outcome, ActionOutcome::Rejected(RejectReason::OffGrid));

        // (1,1) is a hard block; from (1,0) moving down is terrain.
        let mut arena = open_arena();
        assert!(matches!(
            arena
                .apply_move(
                    1,
                    Action::Move {
                        direction: Direction::Right,
                        drop_bomb: false
                    }
                )
                .unwrap()
                .outcome,
            ActionOutcome::Moved { .. }
        ));
        let down = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: false,
                },
            )
            .unwrap();
        assert_eq!(down.outcome, ActionOutcome::Rejected(RejectReason::Terrain));
    }

    #[test]
    fn bombs_block_movement() {
        let mut arena = open_arena();
        // Agent 1 drops at (0,0) and moves down; agent 3 cannot then
        // enter (0,0)... use agent 1 trying to move back up instead.
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        let back = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Up,
                    drop_bomb: false,
                },
            )
            .unwrap();
        assert_eq!(back.outcome, ActionOutcome::Rejected(RejectReason::Bomb));
    }

    #[test]
    fn bomb_capacity_enforced() {
        let mut arena = open_arena();
        let first = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(first.drop, Some(DropOutcome::Placed));
        assert_eq!(arena.agent(1).unwrap().active_bombs, 1);

        let second = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(
            second.drop,
            Some(DropOutcome::Rejected(RejectReason::CapacityExceeded))
        );
        assert_eq!(arena.agent(1).unwrap().active_bombs, 1);
        assert_eq!(arena.bombs().len(), 1);
    }

    #[test]
    fn bomb_captures_owner_range_at_placement() {
        let mut arena = open_arena();
        arena.agent_mut(1).unwrap().bomb_range = 3;
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Stay,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(arena.bombs()[0].range, 3);
        assert_eq!(arena.bombs()[0].stage, 4);
        assert_eq!((arena.bombs()[0].x, arena.bombs()[0].y), (0, 0));

        // Raising the range afterwards does not retrofit the bomb.
        arena.agent_mut(1).unwrap().bomb_range = 5;
        assert_eq!(arena.bombs()[0].range, 3);
    }

    // Concrete scenario: stage-4 bomb is gone after exactly four
    // round updates and kills an unobstructed in-range agent.
    #[test]
    fn fuse_counts_four_rounds() {
        let mut arena = open_arena();
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Stay,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(arena.bombs().len(), 1);

        for round in 1..=3 {
            let events = arena.update_bombs();
            assert!(events.exploded.is_empty(), "early explosion at {round}");
            assert_eq!(arena.bombs().len(), 1);
        }
        let events = arena.update_bombs();
        assert_eq!(events.exploded, vec![(0, 0)]);
        assert!(arena.bombs().is_empty());
        // Agent 1 stood on its own bomb.
        assert_eq!(events.deaths, vec![1]);
        assert!(!arena.agent(1).unwrap().alive);
        assert_eq!(arena.agent(1).unwrap().active_bombs, 0);
    }

    // Concrete scenario: extra_bomb loot raises capacity to two; two
    // placements succeed, a third is rejected until the first bomb
    // explodes.
    #[test]
    fn extra_bomb_loot_expands_capacity() {
        let mut arena = open_arena().with_loot(Loot {
            kind: LootKind::ExtraBomb,
            x: 0,
            y: 1,
            spawned_round: 0,
        });

        let report = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: false,
                },
            )
            .unwrap();
        assert_eq!(report.loot_collected, Some(LootKind::ExtraBomb));
        assert_eq!(arena.agent(1).unwrap().max_bombs, 2);

        // Two placements at distinct cells.
        for direction in [Direction::Down, Direction::Down] {
            let report = arena
                .apply_move(
                    1,
                    Action::Move {
                        direction,
                        drop_bomb: true,
                    },
                )
                .unwrap();
            assert_eq!(report.drop, Some(DropOutcome::Placed));
        }
        assert_eq!(arena.agent(1).unwrap().active_bombs, 2);

        let third = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(
            third.drop,
            Some(DropOutcome::Rejected(RejectReason::CapacityExceeded))
        );

        // Walk clear of both blasts: bombs at (0,1) range 1 and (0,2)
        // range 1; agent ended at (0,4), move further down twice.
        for _ in 0..2 {
            arena
                .apply_move(
                    1,
                    Action::Move {
                        direction: Direction::Down,
                        drop_bomb: false,
                    },
                )
                .unwrap();
        }

        // Both bombs share the same fuse here, so after four rounds
        // both explode and both slots free up.
        for _ in 0..4 {
            arena.update_bombs();
        }
        assert!(arena.agent(1).unwrap().alive);
        assert_eq!(arena.agent(1).unwrap().active_bombs, 0);

        let after = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Stay,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(after.drop, Some(DropOutcome::Placed));
    }

    #[test]
    fn pickup_requires_ability_and_bomb() {
        let mut arena = open_arena();
        let no_ability = arena.apply_move(1, Action::Pickup).unwrap();
        assert_eq!(
            no_ability.outcome,
            ActionOutcome::Rejected(RejectReason::CannotCarry)
        );

        arena.agent_mut(1).unwrap().can_carry_bombs = true;
        let nothing = arena.apply_move(1, Action::Pickup).unwrap();
        assert_eq!(
            nothing.outcome,
            ActionOutcome::Rejected(RejectReason::NothingToPickUp)
        );
    }

    #[test]
    fn pickup_frees_owner_slot_and_transfers_bomb() {
        let mut arena = open_arena();
        arena.agent_mut(2).unwrap().can_carry_bombs = true;
        // Agent 1 drops at (0,0); teleport agent 2 onto the bomb cell
        // (test setup only).
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        {
            let a2 = arena.agent_mut(2).unwrap();
            a2.x = 0;
            a2.y = 0;
        }

        let report = arena.apply_move(2, Action::Pickup).unwrap();
        assert_eq!(report.outcome, ActionOutcome::PickedUp { from_owner: 1 });
        assert!(arena.bombs().is_empty());
        assert_eq!(arena.agent(1).unwrap().active_bombs, 0);
        let carried = arena.agent(2).unwrap().carried_bomb.unwrap();
        assert_eq!(carried.stage, 4);
        assert_eq!(carried.range, 1);

        // A second pickup has nothing to grab.
        let again = arena.apply_move(2, Action::Pickup).unwrap();
        assert_eq!(
            again.outcome,
            ActionOutcome::Rejected(RejectReason::NothingToPickUp)
        );
    }

    #[test]
    fn throw_requires_carried_bomb() {
        let mut arena = open_arena();
        let report = arena
            .apply_move(
                1,
                Action::Throw {
                    direction: Direction::Right,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Rejected(RejectReason::NothingCarried)
        );
    }

    #[test]
    fn throw_lands_on_first_free_cell() {
        let mut arena = open_arena();
        {
            let a1 = arena.agent_mut(1).unwrap();
            a1.carried_bomb = Some(CarriedBomb { stage: 2, range: 1 });
            a1.x = 4;
            a1.y = 0;
        }
        let report = arena
            .apply_move(
                1,
                Action::Throw {
                    direction: Direction::Right,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Threw {
                landing: (5, 0),
                wrapped: false
            }
        );
        assert_eq!(arena.agent(1).unwrap().active_bombs, 1);
        assert!(arena.agent(1).unwrap().carried_bomb.is_none());
        assert_eq!(arena.bombs()[0].stage, 2);
    }

    // Concrete scenario: a throw from the rightmost column wraps to
    // column zero of the same row.
    #[test]
    fn throw_wraps_right_edge() {
        let mut arena = open_arena();
        {
            let a2 = arena.agent_mut(2).unwrap();
            a2.carried_bomb = Some(CarriedBomb { stage: 3, range: 1 });
        }
        // Agent 2 spawns at (12, 0), the rightmost column.
        let report = arena
            .apply_move(
                2,
                Action::Throw {
                    direction: Direction::Right,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Threw {
                landing: (0, 0),
                wrapped: true
            }
        );
        // Same row, leftmost column... except (0,0) hosts agent 1,
        // which does not block. The bomb must be on-grid.
        assert_eq!((arena.bombs()[0].x, arena.bombs()[0].y), (0, 0));
    }

    #[test]
    fn throw_wraps_all_four_edges() {
        let cases = [
            // (start, direction, expected landing)
            ((12, 4), Direction::Right, (0, 4)),
            ((0, 4), Direction::Left, (12, 4)),
            ((4, 0), Direction::Up, (4, 10)),
            ((4, 10), Direction::Down, (4, 0)),
        ];
        for ((sx, sy), direction, expected) in cases {
            let mut arena = open_arena();
            {
                let a1 = arena.agent_mut(1).unwrap();
                a1.x = sx;
                a1.y = sy;
                a1.carried_bomb = Some(CarriedBomb { stage: 4, range: 1 });
            }
            let report = arena.apply_move(1, Action::Throw { direction }).unwrap();
            assert_eq!(
                report.outcome,
                ActionOutcome::Threw {
                    landing: expected,
                    wrapped: true
                },
                "direction {direction:?} from ({sx},{sy})"
            );
        }
    }

    #[test]
    fn throw_skips_blocked_cells() {
        let mut arena = open_arena();
        {
            let a1 = arena.agent_mut(1).unwrap();
            a1.x = 4;
            a1.y = 0;
            a1.carried_bomb = Some(CarriedBomb { stage: 4, range: 1 });
        }
        // Another bomb sits on the first cell; the throw flies past it.
        let mut arena = arena.with_bomb(Bomb {
            owner: 2,
            x: 5,
            y: 0,
            stage: 4,
            range: 1,
        });
        let report = arena
            .apply_move(
                1,
                Action::Throw {
                    direction: Direction::Right,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Threw {
                landing: (6, 0),
                wrapped: false
            }
        );
    }

    #[test]
    fn throw_with_no_landing_cell_is_rejected() {
        let mut arena = open_arena();
        {
            let a1 = arena.agent_mut(1).unwrap();
            a1.x = 0;
            a1.y = 0;
            a1.carried_bomb = Some(CarriedBomb { stage: 4, range: 1 });
        }
        // Wall off the three throwable cells to the right.
        // (1,0), (2,0), (3,0) soft-blocked via a fresh grid is not
        // possible through the public API, so use stay-direction which
        // has no landing cell by definition.
        let report = arena
            .apply_move(
                1,
                Action::Throw {
                    direction: Direction::Stay,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Rejected(RejectReason::NoLandingCell)
        );
        assert!(arena.agent(1).unwrap().carried_bomb.is_some());
    }

    #[test]
    fn dead_agent_actions_are_rejected() {
        let mut arena = open_arena();
        arena.agent_mut(1).unwrap().alive = false;
        let report = arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Rejected(RejectReason::AgentDead)
        );
        assert!(report.drop.is_none());
        assert!(arena.bombs().is_empty());
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut arena = open_arena();
        assert!(matches!(
            arena.apply_move(99, Action::stay()),
            Err(GameError::UnknownAgent(99))
        ));
    }

    #[test]
    fn snapshot_roundtrips_through_ron() {
        let mut arena = Arena::new(GameConfig::default().with_seed(4242));
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        arena.next_turn();

        let snapshot = arena.snapshot();
        let text = snapshot.to_ron().unwrap();
        let restored = Snapshot::from_ron(&text).unwrap();
        assert_eq!(snapshot, restored);
        assert_eq!(restored.turn_count, 1);
        assert!(restored.bomb_at(0, 0).is_some());
    }

    #[test]
    fn snapshot_reflects_counters_and_current_agent() {
        let mut arena = open_arena();
        for _ in 0..5 {
            arena.next_turn();
        }
        let snapshot = arena.snapshot();
        assert_eq!(snapshot.turn_count, 5);
        assert_eq!(snapshot.round_count, 1);
        assert_eq!(snapshot.current_agent_id, 2);
    }

    #[test]
    fn round_cap_raises_event() {
        let mut arena = Arena::new(open_config().with_max_rounds(2));
        for _ in 0..arena.agents().len() {
            arena.next_turn();
        }
        assert!(!arena.update_bombs().round_cap_reached);
        for _ in 0..arena.agents().len() {
            arena.next_turn();
        }
        assert!(arena.update_bombs().round_cap_reached);
        assert!(arena.round_cap_reached());
    }

    #[test]
    fn invariants_hold_through_a_busy_sequence() {
        let mut arena = open_arena();
        arena
            .apply_move(
                1,
                Action::Move {
                    direction: Direction::Down,
                    drop_bomb: true,
                },
            )
            .unwrap();
        arena
            .apply_move(
                2,
                Action::Move {
                    direction: Direction::Left,
                    drop_bomb: true,
                },
            )
            .unwrap();
        for _ in 0..4 {
            for _ in 0..arena.agents().len() {
                arena.next_turn();
            }
            arena.update_bombs();
        }
        arena.check_invariants().unwrap();
    }
}
