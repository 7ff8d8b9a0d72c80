//! The arena grid: a fixed-size rectangular field of cells.
//!
//! Cell kinds follow the classic layout: indestructible hard blocks at
//! the odd/odd parity positions, destructible soft blocks scattered by
//! the world generator, and empty floor everywhere else. Grid
//! dimensions never change for the lifetime of an arena.

use serde::{Deserialize, Serialize};

/// Kind of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Walkable floor.
    #[default]
    Empty,
    /// Destructible terrain. Blocks movement and blasts; a blast
    /// destroys it and stops.
    Soft,
    /// Indestructible terrain. Blocks movement and blasts outright.
    Hard,
}

impl CellKind {
    /// Whether an agent or a thrown bomb can occupy this cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, CellKind::Empty)
    }
}

/// Fixed-size rectangular grid, row-major storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Create an all-empty grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; (width * height) as usize],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` lies on the grid.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as u32 * self.width + x as u32) as usize
    }

    /// Cell kind at `(x, y)`, or `None` off-grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<CellKind> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Set the cell at `(x, y)`. Off-grid writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, kind: CellKind) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = kind;
        }
    }

    /// Count cells of a given kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Iterate all cells with coordinates, row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, CellKind)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &c)| {
            let x = (i as u32 % self.width) as i32;
            let y = (i as u32 / self.width) as i32;
            (x, y, c)
        })
    }

    /// The four spawn corners in agent order: top-left, top-right,
    /// bottom-left, bottom-right.
    #[must_use]
    pub fn spawn_corners(&self) -> [(i32, i32); 4] {
        let w = self.width as i32 - 1;
        let h = self.height as i32 - 1;
        [(0, 0), (w, 0), (0, h), (w, h)]
    }

    /// Cells forced empty around each spawn corner: the corner itself
    /// plus its two orthogonal neighbors.
    #[must_use]
    pub fn safe_zone_cells(&self) -> Vec<(i32, i32)> {
        let mut cells = Vec::with_capacity(12);
        for (cx, cy) in self.spawn_corners() {
            let dx = if cx == 0 { 1 } else { -1 };
            let dy = if cy == 0 { 1 } else { -1 };
            cells.push((cx, cy));
            cells.push((cx + dx, cy));
            cells.push((cx, cy + dy));
        }
        cells
    }
}
