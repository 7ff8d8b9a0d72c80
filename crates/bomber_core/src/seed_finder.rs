//! Constrained seed search for curating test worlds.
//!
//! A pure generate-and-test scan: generate a candidate world per seed,
//! summarize it, keep the seeds whose summaries satisfy the caller's
//! bounds. No backtracking, no wall-clock dependence; results depend
//! only on the seed enumeration order. Exhaustion yields an empty
//! list, never an error.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::grid::{CellKind, Grid};
use crate::worldgen;

/// Summary statistics of a generated world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSummary {
    /// Number of destructible soft blocks.
    pub soft_blocks: usize,
    /// Number of indestructible hard blocks.
    pub hard_blocks: usize,
    /// Number of empty floor cells.
    pub empty_cells: usize,
    /// Size of the largest 4-connected cluster of soft blocks.
    pub largest_cluster: usize,
    /// Whether the grid's center region is free of soft blocks.
    pub open_center: bool,
}

impl WorldSummary {
    /// Compute summary statistics for a grid.
    #[must_use]
    pub fn of(grid: &Grid) -> Self {
        Self {
            soft_blocks: grid.count(CellKind::Soft),
            hard_blocks: grid.count(CellKind::Hard),
            empty_cells: grid.count(CellKind::Empty),
            largest_cluster: largest_soft_cluster(grid),
            open_center: center_is_open(grid),
        }
    }
}

/// Bounds a candidate world must satisfy. Unset bounds always pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedCriteria {
    /// Minimum soft-block count.
    pub min_soft_blocks: Option<usize>,
    /// Maximum soft-block count.
    pub max_soft_blocks: Option<usize>,
    /// Minimum size of the largest soft-block cluster.
    pub min_cluster_size: Option<usize>,
    /// Require an open center region.
    pub open_center: bool,
}

impl SeedCriteria {
    /// Whether a summary satisfies all set bounds.
    #[must_use]
    pub fn matches(&self, summary: &WorldSummary) -> bool {
        if let Some(min) = self.min_soft_blocks {
            if summary.soft_blocks < min {
                return false;
            }
        }
        if let Some(max) = self.max_soft_blocks {
            if summary.soft_blocks > max {
                return false;
            }
        }
        if let Some(min) = self.min_cluster_size {
            if summary.largest_cluster < min {
                return false;
            }
        }
        if self.open_center && !summary.open_center {
            return false;
        }
        true
    }
}

/// Search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderOptions {
    /// Candidate seeds to try before giving up.
    pub max_attempts: u64,
    /// Stop after this many matching seeds.
    pub max_results: usize,
    /// First seed to try; candidates are sequential from here.
    pub start_seed: u64,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            max_attempts: 1000,
            max_results: 1,
            start_seed: 1,
        }
    }
}

/// A seed accepted by the search, with its world summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedHit {
    /// The accepted seed.
    pub seed: u64,
    /// Summary of the world it generates.
    pub summary: WorldSummary,
}

/// Scan candidate seeds and return those whose worlds satisfy the
/// criteria, up to `max_results`.
#[must_use]
pub fn find_seeds(
    config: &GameConfig,
    criteria: &SeedCriteria,
    options: &FinderOptions,
) -> Vec<SeedHit> {
    let mut hits = Vec::new();
    for offset in 0..options.max_attempts {
        let seed = options.start_seed.wrapping_add(offset);
        let grid = worldgen::generate(&config.clone().with_seed(seed));
        let summary = WorldSummary::of(&grid);
        if criteria.matches(&summary) {
            tracing::debug!(seed, ?summary, "seed accepted");
            hits.push(SeedHit { seed, summary });
            if hits.len() >= options.max_results {
                break;
            }
        }
    }
    hits
}

/// Find one seed suitable for broad mechanics testing: a healthy
/// amount of destructible terrain, at least one sizable cluster, and
/// an open center.
#[must_use]
pub fn find_comprehensive_seed(config: &GameConfig, max_attempts: u64) -> Option<SeedHit> {
    let criteria = SeedCriteria {
        min_soft_blocks: Some(35),
        max_soft_blocks: Some(60),
        min_cluster_size: Some(4),
        open_center: true,
    };
    let options = FinderOptions {
        max_attempts,
        max_results: 1,
        start_seed: 1,
    };
    find_seeds(config, &criteria, &options).into_iter().next()
}

/// Size of the largest 4-connected component of soft blocks.
fn largest_soft_cluster(grid: &Grid) -> usize {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut seen = vec![false; (width * height) as usize];
    let mut largest = 0;

    for (sx, sy, cell) in grid.iter_cells() {
        if cell != CellKind::Soft || seen[(sy * width + sx) as usize] {
            continue;
        }
        // Flood fill from this soft block.
        let mut size = 0;
        let mut stack = vec![(sx, sy)];
        seen[(sy * width + sx) as usize] = true;
        while let Some((x, y)) = stack.pop() {
            size += 1;
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let (nx, ny) = (x + dx, y + dy);
                if grid.get(nx, ny) == Some(CellKind::Soft) && !seen[(ny * width + nx) as usize] {
                    seen[(ny * width + nx) as usize] = true;
                    stack.push((nx, ny));
                }
            }
        }
        largest = largest.max(size);
    }
    largest
}

/// Whether the center cell and its orthogonal neighbors hold no soft
/// blocks. Hard parity blocks are allowed; they are part of every
/// world.
fn center_is_open(grid: &Grid) -> bool {
    let cx = grid.width() as i32 / 2;
    let cy = grid.height() as i32 / 2;
    for (dx, dy) in [(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)] {
        if grid.get(cx + dx, cy + dy) == Some(CellKind::Soft) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn summary_of_empty_grid() {
        let grid = Grid::new(13, 11);
        let summary = WorldSummary::of(&grid);
        assert_eq!(summary.soft_blocks, 0);
        assert_eq!(summary.largest_cluster, 0);
        assert!(summary.open_center);
    }

    #[test]
    fn cluster_size_counts_connected_blocks() {
        let mut grid = Grid::new(13, 11);
        // L-shaped cluster of 4 plus an isolated block.
        grid.set(2, 2, CellKind::Soft);
        grid.set(2, 3, CellKind::Soft);
        grid.set(2, 4, CellKind::Soft);
        grid.set(3, 4, CellKind::Soft);
        grid.set(8, 8, CellKind::Soft);
        let summary = WorldSummary::of(&grid);
        assert_eq!(summary.soft_blocks, 5);
        assert_eq!(summary.largest_cluster, 4);
    }

    #[test]
    fn diagonal_blocks_are_not_connected() {
        let mut grid = Grid::new(13, 11);
        grid.set(2, 2, CellKind::Soft);
        grid.set(3, 3, CellKind::Soft);
        assert_eq!(WorldSummary::of(&grid).largest_cluster, 1);
    }

    #[test]
    fn center_detection() {
        let mut grid = Grid::new(13, 11);
        assert!(center_is_open(&grid));
        grid.set(6, 5, CellKind::Soft);
        assert!(!center_is_open(&grid));
    }

    #[test]
    fn finder_returns_matching_seeds() {
        let config = GameConfig::default();
        let criteria = SeedCriteria {
            min_soft_blocks: Some(30),
            max_soft_blocks: Some(70),
            ..Default::default()
        };
        let options = FinderOptions {
            max_attempts: 50,
            max_results: 3,
            start_seed: 1,
        };
        let hits = find_seeds(&config, &criteria, &options);
        assert!(!hits.is_empty());
        assert!(hits.len() <= 3);
        for hit in &hits {
            assert!((30..=70).contains(&hit.summary.soft_blocks));
            // Re-generating the seed must reproduce the summary.
            let grid = worldgen::generate(&config.clone().with_seed(hit.seed));
            assert_eq!(WorldSummary::of(&grid), hit.summary);
        }
    }

    #[test]
    fn exhaustion_returns_empty_not_error() {
        let config = GameConfig::default();
        let criteria = SeedCriteria {
            // Impossible: more soft blocks than cells.
            min_soft_blocks: Some(1000),
            ..Default::default()
        };
        let options = FinderOptions {
            max_attempts: 20,
            max_results: 1,
            start_seed: 1,
        };
        assert!(find_seeds(&config, &criteria, &options).is_empty());
    }

    #[test]
    fn finder_is_deterministic() {
        let config = GameConfig::default();
        let criteria = SeedCriteria {
            min_soft_blocks: Some(40),
            ..Default::default()
        };
        let options = FinderOptions::default();
        let a = find_seeds(&config, &criteria, &options);
        let b = find_seeds(&config, &criteria, &options);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.seed, y.seed);
            assert_eq!(x.summary, y.summary);
        }
    }
}
