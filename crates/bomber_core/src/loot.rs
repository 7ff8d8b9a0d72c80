//! Loot spawning and effect application.
//!
//! Soft blocks destroyed by a blast probabilistically drop loot; an
//! agent collects loot the instant it stands on its cell. Effects are
//! permanent stat or capability changes on the collecting agent,
//! dispatched exhaustively over the closed [`LootKind`] enum.

use crate::components::{Agent, Loot, LootKind};
use crate::rng::SeededRng;

/// All loot kinds in draw order. The spawn roll indexes into this.
const KINDS: [LootKind; 3] = [LootKind::FlashRadius, LootKind::ExtraBomb, LootKind::BombPickup];

/// Roll for a loot drop at a destroyed soft cell.
///
/// One draw against `probability` decides the drop, a second picks the
/// kind uniformly. Both draws come from the arena's seeded stream, so
/// loot placement replays exactly.
pub fn roll_spawn(
    rng: &mut SeededRng,
    probability: f32,
    x: i32,
    y: i32,
    round: u32,
) -> Option<Loot> {
    if rng.next_f32() >= probability {
        return None;
    }
    let kind = KINDS[rng.next_range(0, KINDS.len() as i32) as usize];
    Some(Loot {
        kind,
        x,
        y,
        spawned_round: round,
    })
}

/// Apply a collected loot effect to an agent.
pub fn apply_effect(agent: &mut Agent, kind: LootKind) {
    match kind {
        LootKind::FlashRadius => agent.bomb_range += 1,
        LootKind::ExtraBomb => agent.max_bombs += 1,
        LootKind::BombPickup => agent.can_carry_bombs = true,
    }
    tracing::debug!(
        agent = agent.id,
        ?kind,
        bomb_range = agent.bomb_range,
        max_bombs = agent.max_bombs,
        can_carry = agent.can_carry_bombs,
        "loot effect applied"
    );
}
