//! Incremental simulation engine
//!
//! The engine keeps two owned grid buffers. During a generation every
//! transition decision reads `current` and every write lands in `next`, so
//! cells can be processed one at a time in any order while still updating
//! simultaneously. Only cells on the change list are looked at: any cell that
//! is dead with no live neighbors cannot change, so it is never visited.

use super::{neighbor_coords, Cell, Grid, GridFactory, RuleSet};
use crate::config::Config;
use crate::error::LifeResult;
use itertools::Itertools;
use log::{debug, trace};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Live cells grouped by column, for renderers.
///
/// The engine's own transitions never read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliveIndex {
    columns: BTreeMap<usize, BTreeSet<usize>>,
}

impl AliveIndex {
    fn from_grid(grid: &Grid) -> Self {
        let mut index = Self::default();
        for (x, y) in grid.living_cells() {
            index.insert(x, y);
        }
        index
    }

    fn insert(&mut self, x: usize, y: usize) {
        self.columns.entry(x).or_default().insert(y);
    }

    fn remove(&mut self, x: usize, y: usize) {
        if let Some(rows) = self.columns.get_mut(&x) {
            rows.remove(&y);
            if rows.is_empty() {
                self.columns.remove(&x);
            }
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.columns.get(&x).is_some_and(|rows| rows.contains(&y))
    }

    /// Rows alive in column `x`
    pub fn rows_in(&self, x: usize) -> Option<&BTreeSet<usize>> {
        self.columns.get(&x)
    }

    /// Iterate `(column, rows)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> {
        self.columns.iter().map(|(&x, rows)| (x, rows))
    }

    /// Iterate every live `(x, y)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns
            .iter()
            .flat_map(|(&x, rows)| rows.iter().map(move |&y| (x, y)))
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Life simulation driven by a change list
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    current: Grid,
    next: Grid,
    /// Cell indices to evaluate this generation, without duplicates
    change_list: Vec<usize>,
    next_change_list: Vec<usize>,
    /// Marks indices already in `next_change_list`
    scheduled: Vec<bool>,
    alive_index: AliveIndex,
    rules: RuleSet,
    resolution: usize,
    iteration: u64,
}

impl SimulationEngine {
    /// Build the initial grid from `config` and wrap it
    pub fn new(config: &Config) -> LifeResult<Self> {
        let factory = GridFactory::new(config);
        let pattern = factory.load_pattern()?;
        let grid = factory.build_with(pattern.as_ref())?;
        let rules = config.effective_rules(pattern.as_ref());
        debug!(
            "Engine ready: {}x{} grid, rules {}, {:?}",
            grid.columns, grid.rows, rules, grid.topology
        );
        Ok(Self::from_grid(grid, rules, config.resolution()))
    }

    /// Wrap an existing grid whose neighbor counts are already correct
    pub fn from_grid(grid: Grid, rules: RuleSet, resolution: usize) -> Self {
        let cell_count = grid.columns * grid.rows;
        let mut engine = Self {
            next: grid.clone(),
            alive_index: AliveIndex::from_grid(&grid),
            current: grid,
            change_list: Vec::new(),
            next_change_list: Vec::new(),
            scheduled: vec![false; cell_count],
            rules,
            resolution,
            iteration: 0,
        };
        engine.rebuild_change_list();
        engine
    }

    /// Advance the simulation by one generation
    pub fn advance(&mut self) {
        self.next_change_list.clear();

        let candidates = std::mem::take(&mut self.change_list);
        for &idx in &candidates {
            self.process_cell(idx);
        }

        // `next` only differs from `current` at scheduled indices, so copying
        // those back after the swap makes the scratch buffer a full copy again.
        std::mem::swap(&mut self.current, &mut self.next);
        for &idx in &self.next_change_list {
            self.scheduled[idx] = false;
            self.next.cells[idx] = self.current.cells[idx];
        }

        self.change_list = std::mem::replace(&mut self.next_change_list, candidates);
        self.iteration += 1;
        trace!(
            "Generation {}: {} candidates, population {}",
            self.iteration,
            self.change_list.len(),
            self.alive_index.len()
        );
    }

    /// Advance `generations` times
    pub fn run(&mut self, generations: usize) {
        for _ in 0..generations {
            self.advance();
        }
    }

    /// Flip a cell directly, ignoring the rules.
    ///
    /// Returns `false` and does nothing when `(x, y)` is off the grid. The
    /// change list is rebuilt with a full scan afterwards.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> bool {
        if !self.current.contains(x, y) {
            debug!("Ignoring toggle outside grid at ({}, {})", x, y);
            return false;
        }

        let alive = !self.current.is_alive(x, y);
        let delta = if alive { 1 } else { -1 };
        for grid in [&mut self.current, &mut self.next] {
            grid.set_alive(x, y, alive);
            grid.shift_neighbor_counts(x, y, delta);
        }

        if alive {
            self.alive_index.insert(x, y);
        } else {
            self.alive_index.remove(x, y);
        }

        self.rebuild_change_list();
        true
    }

    /// Apply the rules to one cell and propagate any change to its neighbors
    fn process_cell(&mut self, idx: usize) {
        let Cell {
            alive,
            live_neighbors,
        } = self.current.cells[idx];

        let born = !alive && self.rules.born(live_neighbors);
        let dies = alive && !self.rules.survives(live_neighbors);
        if !born && !dies {
            return;
        }

        self.next.cells[idx].alive = born;
        self.schedule(idx);

        let (x, y) = self.current.coords(idx);
        if born {
            self.alive_index.insert(x, y);
        } else {
            self.alive_index.remove(x, y);
        }
        self.update_neighbors(x, y, if born { 1 } else { -1 });
    }

    fn update_neighbors(&mut self, x: usize, y: usize, delta: i8) {
        let (columns, rows, topology) = (self.next.columns, self.next.rows, self.next.topology);
        for (nx, ny) in neighbor_coords(x, y, columns, rows, topology) {
            let idx = self.next.index(nx, ny);
            let count = &mut self.next.cells[idx].live_neighbors;
            debug_assert!(count.checked_add_signed(delta).is_some());
            *count = count.wrapping_add_signed(delta);
            self.schedule(idx);
        }
    }

    /// Add `idx` to the next change list at most once per generation
    #[inline]
    fn schedule(&mut self, idx: usize) {
        if !self.scheduled[idx] {
            self.scheduled[idx] = true;
            self.next_change_list.push(idx);
        }
    }

    fn rebuild_change_list(&mut self) {
        self.change_list = self
            .current
            .cells
            .iter()
            .positions(Cell::is_candidate)
            .collect();
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.current.cell(x, y)
    }

    pub fn alive_index(&self) -> &AliveIndex {
        &self.alive_index
    }

    pub fn iteration_count(&self) -> u64 {
        self.iteration
    }

    pub fn population(&self) -> usize {
        self.alive_index.len()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rows(&self) -> usize {
        self.current.rows
    }

    pub fn columns(&self) -> usize {
        self.current.columns
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of cells queued for the next generation
    pub fn change_list_len(&self) -> usize {
        self.change_list.len()
    }

    /// Cell under a pixel position, for mouse input
    pub fn cell_at_pixel(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        if !(px >= 0.0 && py >= 0.0) {
            return None;
        }
        let x = (px / self.resolution as f64) as usize;
        let y = (py / self.resolution as f64) as usize;
        self.current.contains(x, y).then_some((x, y))
    }
}
