//! Procedural world generation.
//!
//! Builds the initial terrain from a seed: the fixed hard-block parity
//! pattern first, then seeded soft-block placement at a configured
//! density, with the four corner safe zones forced empty so every
//! agent has at least one legal opening move.
//!
//! Generation is pure generate-from-seed: identical seeds produce
//! byte-identical grids across invocations and processes, and the
//! generator never retries. Non-uniqueness across different seeds is
//! accepted (and astronomically unlikely).

use crate::config::GameConfig;
use crate::grid::{CellKind, Grid};
use crate::rng::SeededRng;

/// Generate the initial grid for a match configuration.
#[must_use]
pub fn generate(config: &GameConfig) -> Grid {
    let mut rng = SeededRng::new(config.seed);
    let mut grid = Grid::new(config.width, config.height);

    // Fixed hard obstacles where both coordinates are odd.
    for y in 0..config.height as i32 {
        for x in 0..config.width as i32 {
            if x % 2 == 1 && y % 2 == 1 {
                grid.set(x, y, CellKind::Hard);
            }
        }
    }

    let safe: Vec<(i32, i32)> = grid.safe_zone_cells();

    // Seeded soft blocks everywhere else, row-major draw order so the
    // RNG stream consumption is fixed.
    for y in 0..config.height as i32 {
        for x in 0..config.width as i32 {
            if grid.get(x, y) != Some(CellKind::Empty) {
                continue;
            }
            if safe.contains(&(x, y)) {
                continue;
            }
            if rng.next_f32() < config.soft_density {
                grid.set(x, y, CellKind::Soft);
            }
        }
    }

    tracing::debug!(
        seed = config.seed,
        soft = grid.count(CellKind::Soft),
        hard = grid.count(CellKind::Hard),
        "world generated"
    );

    grid
}
