//! Grid representation with cached live-neighbor counts

use crate::error::{LifeError, LifeResult};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moore-neighborhood offsets as `(dx, dy)`, clockwise from the top
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// How neighbor coordinates behave at the grid edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Cells outside the grid are dead and never updated
    Bounded,
    /// Opposite edges are adjacent (torus)
    Wrap,
}

impl Topology {
    pub fn from_wrap(wrap: bool) -> Self {
        if wrap {
            Topology::Wrap
        } else {
            Topology::Bounded
        }
    }

    /// Shift `coord` by a single-step `delta` along an axis of size `extent`.
    ///
    /// Wrapping is a single step to the opposite edge, which matches modulo
    /// arithmetic only because offsets are always within ±1.
    #[inline]
    pub fn shift(self, coord: usize, delta: isize, extent: usize) -> Option<usize> {
        let shifted = coord as isize + delta;
        let extent = extent as isize;
        match self {
            Topology::Bounded => (0..extent).contains(&shifted).then_some(shifted as usize),
            Topology::Wrap if extent == 0 => None,
            Topology::Wrap if shifted >= extent => Some(0),
            Topology::Wrap if shifted < 0 => Some(extent as usize - 1),
            Topology::Wrap => Some(shifted as usize),
        }
    }
}

/// Iterate the in-range Moore neighbors of `(x, y)` under `topology`.
///
/// Under wrap a coordinate may appear more than once on grids narrower than
/// three cells; each appearance counts as a separate neighbor.
pub fn neighbor_coords(
    x: usize,
    y: usize,
    columns: usize,
    rows: usize,
    topology: Topology,
) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        Some((
            topology.shift(x, dx, columns)?,
            topology.shift(y, dy, rows)?,
        ))
    })
}

/// A single grid cell: its state and the cached count of live neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub alive: bool,
    pub live_neighbors: u8,
}

impl Cell {
    /// Whether the cell could possibly change state next generation
    #[inline]
    pub fn is_candidate(&self) -> bool {
        self.alive || self.live_neighbors > 0
    }
}

/// Rectangular cell buffer addressed by `(x, y)` = `(column, row)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub topology: Topology,
    pub(crate) cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(columns: usize, rows: usize, topology: Topology) -> Self {
        Self {
            columns,
            rows,
            topology,
            cells: vec![Cell::default(); columns * rows],
        }
    }

    /// Create a grid with the given cells alive and neighbor counts derived
    /// by a full recount under `topology`
    pub fn from_alive_cells<I>(
        columns: usize,
        rows: usize,
        topology: Topology,
        alive: I,
    ) -> LifeResult<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new(columns, rows, topology);
        for (x, y) in alive {
            if !grid.contains(x, y) {
                return Err(LifeError::InvalidConfig(format!(
                    "cell ({}, {}) outside {}x{} grid",
                    x, y, columns, rows
                )));
            }
            grid.set_alive(x, y, true);
        }
        grid.recount_neighbors(topology);
        Ok(grid)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.columns && y < self.rows
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.columns + x
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.contains(x, y).then(|| self.cells[self.index(x, y)])
    }

    /// Alive flag at `(x, y)`; out-of-range cells are dead
    #[inline]
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.contains(x, y) && self.cells[self.index(x, y)].alive
    }

    /// Set the alive flag without touching any neighbor count
    pub(crate) fn set_alive(&mut self, x: usize, y: usize, alive: bool) {
        let idx = self.index(x, y);
        self.cells[idx].alive = alive;
    }

    /// Add `delta` to the cached count of every neighbor of `(x, y)`
    pub(crate) fn shift_neighbor_counts(&mut self, x: usize, y: usize, delta: i8) {
        for (nx, ny) in neighbor_coords(x, y, self.columns, self.rows, self.topology) {
            let idx = self.index(nx, ny);
            let count = &mut self.cells[idx].live_neighbors;
            debug_assert!(count.checked_add_signed(delta).is_some());
            *count = count.wrapping_add_signed(delta);
        }
    }

    /// Count live neighbors of `(x, y)` by inspecting them directly
    pub fn count_live_neighbors(&self, x: usize, y: usize, topology: Topology) -> u8 {
        neighbor_coords(x, y, self.columns, self.rows, topology)
            .filter(|&(nx, ny)| self.cells[self.index(nx, ny)].alive)
            .count() as u8
    }

    /// Recompute every cached neighbor count from the alive flags.
    ///
    /// This is the only O(rows × columns) pass over counts.
    pub fn recount_neighbors(&mut self, topology: Topology) {
        let counts: Vec<u8> = iproduct!(0..self.rows, 0..self.columns)
            .map(|(y, x)| self.count_live_neighbors(x, y, topology))
            .collect();
        for (cell, count) in self.cells.iter_mut().zip(counts) {
            cell.live_neighbors = count;
        }
    }

    /// Iterate `(x, y, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (idx % self.columns, idx / self.columns, cell))
    }

    /// All live cell coordinates in row-major order
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, cell)| cell.alive)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.alive)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.columns {
                let symbol = if self.is_alive(x, y) { '*' } else { '.' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
