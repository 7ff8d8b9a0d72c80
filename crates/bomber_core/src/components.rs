//! Entity definitions: agents, bombs, loot, and the action variants
//! that drive them.

use serde::{Deserialize, Serialize};

/// Identifier of a turn-taking agent. Agents are numbered from 1.
pub type AgentId = u8;

/// One of the four cardinal directions, or standing still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Decreasing y.
    Up,
    /// Increasing y.
    Down,
    /// Decreasing x.
    Left,
    /// Increasing x.
    Right,
    /// No movement.
    Stay,
}

impl Direction {
    /// Unit offset for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Stay => (0, 0),
        }
    }

    /// The four moving directions, in blast-walk order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// A single agent's action for its turn.
///
/// An exhaustive tagged variant: there are no optional fields to probe
/// at runtime, and adding a variant forces every dispatch site to
/// handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Step in a direction, optionally dropping a bomb at the
    /// pre-move position first.
    Move {
        /// Where to step (`Stay` to remain in place).
        direction: Direction,
        /// Drop a bomb before moving.
        drop_bomb: bool,
    },
    /// Pick up a bomb from the agent's own cell (requires the carry
    /// ability from loot).
    Pickup,
    /// Throw the carried bomb.
    Throw {
        /// Throw direction (must be a moving direction; `Stay` is
        /// rejected as having no landing cell).
        direction: Direction,
    },
}

impl Action {
    /// The default safe action: stand still, no bomb.
    #[must_use]
    pub const fn stay() -> Self {
        Action::Move {
            direction: Direction::Stay,
            drop_bomb: false,
        }
    }
}

/// A bomb held off-board by a carrying agent.
///
/// The remaining fuse and captured range survive the pickup; the
/// board position does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarriedBomb {
    /// Remaining countdown in rounds.
    pub stage: u32,
    /// Blast range captured at original placement time.
    pub range: u32,
}

/// A turn-taking participant controlling one on-grid character.
///
/// Agents are created once at arena initialization and are never
/// removed, only marked dead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    /// Agent identity, 1-based.
    pub id: AgentId,
    /// Column position.
    pub x: i32,
    /// Row position.
    pub y: i32,
    /// Alive flag. Dead agents keep their turn slot but act no more.
    pub alive: bool,
    /// Blast distance of newly placed bombs.
    pub bomb_range: u32,
    /// Concurrent-bomb capacity.
    pub max_bombs: u32,
    /// Bombs currently placed on the board by this agent.
    pub active_bombs: u32,
    /// Whether the carry/throw ability has been unlocked by loot.
    pub can_carry_bombs: bool,
    /// Bomb currently carried, if any. Invisible to the board.
    pub carried_bomb: Option<CarriedBomb>,
}

impl Agent {
    /// Create a live agent at a spawn position with base stats.
    #[must_use]
    pub fn new(id: AgentId, x: i32, y: i32, base_range: u32, base_bombs: u32) -> Self {
        Self {
            id,
            x,
            y,
            alive: true,
            bomb_range: base_range,
            max_bombs: base_bombs,
            active_bombs: 0,
            can_carry_bombs: false,
            carried_bomb: None,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// A placed bomb ticking down on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bomb {
    /// Agent whose capacity slot this bomb consumes.
    pub owner: AgentId,
    /// Column position.
    pub x: i32,
    /// Row position.
    pub y: i32,
    /// Rounds until detonation. Decrements once per full round;
    /// detonates at zero (or early via chain reaction).
    pub stage: u32,
    /// Blast distance, captured from the owner at placement time.
    pub range: u32,
}

/// Kinds of loot dropped by destroyed soft blocks.
///
/// A closed enumeration: effect application is a single exhaustive
/// dispatch in [`crate::loot`], statically checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootKind {
    /// Permanently raises the collector's blast range by one.
    FlashRadius,
    /// Permanently raises the collector's bomb capacity by one.
    ExtraBomb,
    /// Unlocks the carry/throw ability.
    BombPickup,
}

/// A loot item waiting on the grid.
///
/// Collected the instant an agent's position matches its cell; no
/// explicit action required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loot {
    /// What this loot grants.
    pub kind: LootKind,
    /// Column position.
    pub x: i32,
    /// Row position.
    pub y: i32,
    /// Round in which this loot appeared.
    pub spawned_round: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
        assert_eq!(Direction::Stay.delta(), (0, 0));
    }

    #[test]
    fn action_roundtrips_through_text() {
        let actions = [
            Action::Move {
                direction: Direction::Right,
                drop_bomb: true,
            },
            Action::Pickup,
            Action::Throw {
                direction: Direction::Left,
            },
            Action::stay(),
        ];
        for action in actions {
            let text = ron::to_string(&action).unwrap();
            let back: Action = ron::from_str(&text).unwrap();
            assert_eq!(back, action);
        }
    }

    #[test]
    fn new_agent_has_base_stats() {
        let agent = Agent::new(1, 0, 0, 1, 1);
        assert!(agent.alive);
        assert_eq!(agent.bomb_range, 1);
        assert_eq!(agent.max_bombs, 1);
        assert_eq!(agent.active_bombs, 0);
        assert!(!agent.can_carry_bombs);
        assert!(agent.carried_bomb.is_none());
    }
}
