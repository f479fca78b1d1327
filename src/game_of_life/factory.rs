//! Initial grid construction

use super::{Grid, Pattern, Topology};
use crate::config::Config;
use crate::error::{LifeError, LifeResult};
use log::debug;

/// Builds the starting grid for a configuration
pub struct GridFactory<'a> {
    config: &'a Config,
}

impl<'a> GridFactory<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Parse the configured pattern, if there is one
    pub fn load_pattern(&self) -> LifeResult<Option<Pattern>> {
        self.config.pattern().map(|source| source.load()).transpose()
    }

    /// Load the configured pattern and build the grid around it
    pub fn build(&self) -> LifeResult<Grid> {
        let pattern = self.load_pattern()?;
        self.build_with(pattern.as_ref())
    }

    /// Build the grid, centering `pattern` on it when given.
    ///
    /// Neighbor counts are computed once over the whole grid after placement,
    /// with cells beyond the edge treated as dead. The pattern's margin keeps
    /// live cells off the edge, so this agrees with the toroidal count too.
    pub fn build_with(&self, pattern: Option<&Pattern>) -> LifeResult<Grid> {
        let columns = self.config.columns();
        let rows = self.config.rows();
        let mut grid = Grid::new(columns, rows, self.config.topology());

        if let Some(pattern) = pattern {
            if pattern.width > columns || pattern.height > rows {
                return Err(LifeError::PatternTooLarge {
                    pattern_width: pattern.width,
                    pattern_height: pattern.height,
                    columns,
                    rows,
                });
            }

            let buffer = pattern.stamp();
            let (x_start, y_start) = centered_origin(columns, rows, pattern.width, pattern.height);
            debug!(
                "Placing {}x{} pattern at ({}, {}) on {}x{} grid",
                pattern.width, pattern.height, x_start, y_start, columns, rows
            );
            for (x, y, cell) in buffer.iter() {
                grid.set_alive(x_start + x, y_start + y, cell.alive);
            }
        }

        grid.recount_neighbors(Topology::Bounded);
        Ok(grid)
    }
}

/// Top-left corner that centers a `width`×`height` box, truncating
pub fn centered_origin(
    columns: usize,
    rows: usize,
    width: usize,
    height: usize,
) -> (usize, usize) {
    (columns / 2 - width / 2, rows / 2 - height / 2)
}
