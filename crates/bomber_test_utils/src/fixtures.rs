//! Test fixtures and helpers.
//!
//! Pre-built arenas and entity configurations for consistent testing.

use bomber_core::arena::Arena;
use bomber_core::components::{AgentId, Bomb, Loot, LootKind};
use bomber_core::config::GameConfig;

/// Config for an arena with no soft blocks and no loot drops: only the
/// fixed hard-block pattern obstructs movement, so paths are easy to
/// reason about in tests.
#[must_use]
pub fn open_config(seed: u64) -> GameConfig {
    GameConfig::default()
        .with_seed(seed)
        .with_soft_density(0.0)
        .with_loot_probability(0.0)
}

/// Arena with no soft blocks and no loot drops.
#[must_use]
pub fn open_arena(seed: u64) -> Arena {
    Arena::new(open_config(seed))
}

/// Open arena with one pre-armed bomb injected.
#[must_use]
pub fn arena_with_bomb(seed: u64, owner: AgentId, x: i32, y: i32, stage: u32, range: u32) -> Arena {
    open_arena(seed).with_bomb(Bomb {
        owner,
        x,
        y,
        stage,
        range,
    })
}

/// Open arena with one loot item placed.
#[must_use]
pub fn arena_with_loot(seed: u64, kind: LootKind, x: i32, y: i32) -> Arena {
    open_arena(seed).with_loot(Loot {
        kind,
        x,
        y,
        spawned_round: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::grid::CellKind;

    #[test]
    fn open_arena_has_no_soft_blocks() {
        let arena = open_arena(42);
        assert_eq!(arena.grid().count(CellKind::Soft), 0);
        assert_eq!(arena.grid().count(CellKind::Hard), 30);
    }

    #[test]
    fn injected_bomb_consumes_owner_slot() {
        let arena = arena_with_bomb(42, 1, 5, 5, 3, 2);
        assert_eq!(arena.bombs().len(), 1);
        assert_eq!(arena.agent(1).unwrap().active_bombs, 1);
        arena.check_invariants().unwrap();
    }

    #[test]
    fn injected_loot_is_on_the_grid() {
        let arena = arena_with_loot(42, LootKind::FlashRadius, 2, 2);
        assert_eq!(arena.loot().len(), 1);
    }
}
