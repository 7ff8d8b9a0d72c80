//! ASCII rendering of arena snapshots for terminal inspection.
//!
//! One character per cell: `#` hard block, `+` soft block, `.` floor,
//! `*` bomb, `?` loot, digits for living agents (dead agents are not
//! drawn). Agents draw over bombs so a bomb under its owner is hidden
//! for that frame.

use bomber_core::arena::Snapshot;

/// Render a snapshot as a multi-line ASCII board with a status line.
#[must_use]
pub fn render(snapshot: &Snapshot) -> String {
    let width = snapshot.grid.width() as i32;
    let height = snapshot.grid.height() as i32;
    let mut out = String::with_capacity(((width + 1) * height) as usize + 64);

    for y in 0..height {
        for x in 0..width {
            out.push(cell_char(snapshot, x, y));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "round {} turn {} next: agent {}\n",
        snapshot.round_count, snapshot.turn_count, snapshot.current_agent_id
    ));
    out
}

fn cell_char(snapshot: &Snapshot, x: i32, y: i32) -> char {
    if let Some(agent) = snapshot
        .agents
        .iter()
        .find(|a| a.alive && a.position() == (x, y))
    {
        return char::from_digit(u32::from(agent.id), 10).unwrap_or('@');
    }
    if snapshot.bomb_at(x, y).is_some() {
        return '*';
    }
    if snapshot.loot.iter().any(|l| (l.x, l.y) == (x, y)) {
        return '?';
    }
    match snapshot.grid.get(x, y) {
        Some(bomber_core::grid::CellKind::Hard) => '#',
        Some(bomber_core::grid::CellKind::Soft) => '+',
        _ => '.',
    }
}
