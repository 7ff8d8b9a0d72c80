//! Explosion and chain-reaction resolution.
//!
//! Detonation is driven by an explicit work-queue of bombs pending
//! detonation with a visited-set guard, so overlapping blasts and
//! mutual triggers never recurse unboundedly. Soft-block conversions
//! and loot rolls are scheduled during the walk and applied after the
//! whole pass: a blast never travels through terrain destroyed in the
//! same tick, even by a chained bomb.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::components::{Agent, AgentId, Bomb, Direction, Loot};
use crate::config::GameConfig;
use crate::grid::{CellKind, Grid};
use crate::loot;
use crate::rng::SeededRng;

/// Everything that happened during one bomb-update pass.
///
/// Explosion cells are transient: they exist for rendering and
/// lethality checks during this round only and are not arena state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundEvents {
    /// Origins of bombs that detonated this round.
    pub exploded: Vec<(i32, i32)>,
    /// Every cell touched by a blast, deduplicated.
    pub explosion_cells: Vec<(i32, i32)>,
    /// Soft cells converted to empty floor.
    pub destroyed_cells: Vec<(i32, i32)>,
    /// Agents killed this round, each listed exactly once.
    pub deaths: Vec<AgentId>,
    /// Loot spawned on destroyed cells.
    pub loot_spawned: Vec<Loot>,
    /// Pre-existing loot caught in a blast and removed.
    pub loot_destroyed: Vec<Loot>,
    /// The configured round cap has been reached; the match should
    /// auto-stop.
    pub round_cap_reached: bool,
}

/// Detonate every bomb at stage zero, chaining into bombs whose cells
/// a blast reaches. Mutates grid, bombs, agents, and loot in place.
pub(crate) fn resolve_detonations(
    grid: &mut Grid,
    bombs: &mut Vec<Bomb>,
    agents: &mut [Agent],
    loot_items: &mut Vec<Loot>,
    rng: &mut SeededRng,
    config: &GameConfig,
    round: u32,
) -> RoundEvents {
    let mut events = RoundEvents::default();

    let mut queue: VecDeque<usize> = bombs
        .iter()
        .enumerate()
        .filter(|(_, b)| b.stage == 0)
        .map(|(i, _)| i)
        .collect();
    if queue.is_empty() {
        return events;
    }

    let mut detonated = vec![false; bombs.len()];
    let mut marked: Vec<(i32, i32)> = Vec::new();
    let mut destroyed: Vec<(i32, i32)> = Vec::new();

    while let Some(i) = queue.pop_front() {
        if detonated[i] {
            continue;
        }
        detonated[i] = true;
        let (ox, oy, range) = (bombs[i].x, bombs[i].y, bombs[i].range);
        events.exploded.push((ox, oy));
        mark(&mut marked, (ox, oy));

        for direction in Direction::CARDINAL {
            let (dx, dy) = direction.delta();
            for step in 1..=range as i32 {
                let (x, y) = (ox + dx * step, oy + dy * step);
                match grid.get(x, y) {
                    // Blasts stop at the boundary; only thrown bombs wrap.
                    None | Some(CellKind::Hard) => break,
                    Some(CellKind::Soft) => {
                        mark(&mut marked, (x, y));
                        if !destroyed.contains(&(x, y)) {
                            destroyed.push((x, y));
                        }
                        break;
                    }
                    Some(CellKind::Empty) => {
                        mark(&mut marked, (x, y));
                        // A bomb in the path is chain-triggered; the
                        // blast itself keeps traveling.
                        for (j, other) in bombs.iter().enumerate() {
                            if !detonated[j] && other.x == x && other.y == y {
                                queue.push_back(j);
                            }
                        }
                    }
                }
            }
        }
    }

    // Free capacity slots and remove detonated bombs.
    for (i, bomb) in bombs.iter().enumerate() {
        if detonated[i] {
            if let Some(owner) = agents.iter_mut().find(|a| a.id == bomb.owner) {
                debug_assert!(owner.active_bombs > 0, "bomb owner slot already free");
                owner.active_bombs = owner.active_bombs.saturating_sub(1);
            }
        }
    }
    let mut keep = detonated.iter().map(|&d| !d);
    bombs.retain(|_| keep.next().unwrap_or(true));

    // Lethality: one death per agent regardless of overlapping blasts.
    for agent in agents.iter_mut() {
        if agent.alive && marked.contains(&agent.position()) {
            agent.alive = false;
            events.deaths.push(agent.id);
            tracing::info!(agent = agent.id, x = agent.x, y = agent.y, "agent killed by blast");
        }
    }

    // Loot caught in a blast burns before new loot appears.
    let mut surviving = Vec::with_capacity(loot_items.len());
    for item in loot_items.drain(..) {
        if marked.contains(&(item.x, item.y)) {
            events.loot_destroyed.push(item);
        } else {
            surviving.push(item);
        }
    }
    *loot_items = surviving;

    // Apply scheduled terrain conversions, rolling loot per destroyed
    // cell in discovery order.
    for &(x, y) in &destroyed {
        grid.set(x, y, CellKind::Empty);
        if let Some(item) = loot::roll_spawn(rng, config.loot_probability, x, y, round) {
            tracing::debug!(kind = ?item.kind, x, y, "loot spawned");
            loot_items.push(item.clone());
            events.loot_spawned.push(item);
        }
    }

    events.explosion_cells = marked;
    events.destroyed_cells = destroyed;

    tracing::debug!(
        exploded = events.exploded.len(),
        cells = events.explosion_cells.len(),
        deaths = events.deaths.len(),
        "detonation pass complete"
    );

    events
}

fn mark(marked: &mut Vec<(i32, i32)>, cell: (i32, i32)) {
    if !marked.contains(&cell) {
        marked.push(cell);
    }
}
