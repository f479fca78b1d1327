//! Life 1.05 pattern parsing
//!
//! A pattern file is a sequence of blocks. Each block starts with a
//! `#P <x> <y>` header giving its top-left offset and continues with rows of
//! `*` (alive) and `.` (dead) until a blank line or the next header. All
//! blocks are merged into one sparse map keyed by absolute coordinates.

use super::{Grid, RuleSet, Topology};
use crate::error::{LifeError, LifeResult};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed pattern together with the bounding box it needs when stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Bounding box width, including a one-cell margin on each side
    pub width: usize,
    /// Bounding box height, including a one-cell margin on each side
    pub height: usize,
    /// Added to an absolute x to get a buffer column
    pub x_offset: i64,
    /// Added to an absolute y to get a buffer row
    pub y_offset: i64,
    /// Every cell named by a block row, keyed by absolute `(x, y)`
    pub blocks: BTreeMap<(i64, i64), bool>,
    /// `#D` description lines
    pub description: Vec<String>,
    /// Rule named by `#R` or `#N`, if any
    pub rule: Option<RuleSet>,
}

impl Pattern {
    /// Absolute coordinates of every live cell
    pub fn alive_cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.blocks
            .iter()
            .filter(|(_, &alive)| alive)
            .map(|(&coords, _)| coords)
    }

    /// Translate absolute pattern coordinates into buffer coordinates
    pub fn to_buffer(&self, x: i64, y: i64) -> (usize, usize) {
        ((x + self.x_offset) as usize, (y + self.y_offset) as usize)
    }

    /// Stamp the live cells into a fresh buffer of exactly the bounding box.
    ///
    /// Neighbor counts in the buffer are left at zero.
    pub fn stamp(&self) -> Grid {
        let mut buffer = Grid::new(self.width, self.height, Topology::Bounded);
        for (x, y) in self.alive_cells() {
            let (bx, by) = self.to_buffer(x, y);
            buffer.set_alive(bx, by, true);
        }
        buffer
    }
}

/// Where the next row of cells goes
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Nothing seen yet; a bare row opens an implicit block at the origin
    Start,
    InBlock { x: i64, y: i64 },
    /// A blank line ended the last block
    Closed,
}

/// Parser for the Life 1.05 text format
pub struct PatternParser;

impl PatternParser {
    /// Read and parse a pattern file
    pub fn load<P: AsRef<Path>>(path: P) -> LifeResult<Pattern> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LifeError::PatternSource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse pattern text
    pub fn parse(content: &str) -> LifeResult<Pattern> {
        let mut blocks = BTreeMap::new();
        let mut description = Vec::new();
        let mut rule = None;
        let mut cursor = Cursor::Start;

        for (line_idx, raw) in content.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                if let Cursor::InBlock { .. } = cursor {
                    cursor = Cursor::Closed;
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("#P") {
                let (x, y) = parse_header(rest, line_no)?;
                cursor = Cursor::InBlock { x, y };
            } else if let Some(rest) = line.strip_prefix("#R") {
                let parsed = RuleSet::parse(rest)
                    .map_err(|e| LifeError::malformed_pattern(line_no, e.to_string()))?;
                rule = Some(parsed);
            } else if line.starts_with("#N") {
                rule = Some(RuleSet::conway());
            } else if let Some(rest) = line.strip_prefix("#D") {
                description.push(rest.trim().to_string());
            } else if line.starts_with('#') {
                debug!("Ignoring pattern line {}: {}", line_no, line);
            } else if line.chars().all(|c| c == '*' || c == '.') {
                let (x, y) = match cursor {
                    Cursor::Start => (0, 0),
                    Cursor::InBlock { x, y } => (x, y),
                    Cursor::Closed => {
                        warn!("Ignoring row outside any block at line {}", line_no);
                        continue;
                    }
                };
                for (col, state) in line.chars().enumerate() {
                    let cell_x = x.checked_add(col as i64).ok_or_else(|| {
                        LifeError::malformed_pattern(line_no, "cell coordinate overflows")
                    })?;
                    *blocks.entry((cell_x, y)).or_insert(false) |= state == '*';
                }
                let next_y = y.checked_add(1).ok_or_else(|| {
                    LifeError::malformed_pattern(line_no, "cell coordinate overflows")
                })?;
                cursor = Cursor::InBlock { x, y: next_y };
            } else {
                warn!("Ignoring unrecognised pattern line {}: {}", line_no, line);
            }
        }

        let line_count = content.lines().count();
        let (min_x, max_x, min_y, max_y) = bounds(&blocks).ok_or_else(|| {
            LifeError::malformed_pattern(line_count, "pattern contains no cell rows")
        })?;

        let width = padded_extent(min_x, max_x, line_count)?;
        let height = padded_extent(min_y, max_y, line_count)?;
        let x_offset = 1i64
            .checked_sub(min_x)
            .ok_or_else(|| LifeError::malformed_pattern(line_count, "pattern offset overflows"))?;
        let y_offset = 1i64
            .checked_sub(min_y)
            .ok_or_else(|| LifeError::malformed_pattern(line_count, "pattern offset overflows"))?;

        debug!(
            "Parsed pattern: {} cells, bounding box {}x{}, offset ({}, {})",
            blocks.len(),
            width,
            height,
            x_offset,
            y_offset
        );

        Ok(Pattern {
            width,
            height,
            x_offset,
            y_offset,
            blocks,
            description,
            rule,
        })
    }
}

fn parse_header(rest: &str, line_no: usize) -> LifeResult<(i64, i64)> {
    let mut fields = rest.split_whitespace();
    let mut coordinate = |axis: &str| -> LifeResult<i64> {
        let field = fields.next().ok_or_else(|| {
            LifeError::malformed_pattern(line_no, format!("#P header is missing {}", axis))
        })?;
        field.parse::<i64>().map_err(|_| {
            LifeError::malformed_pattern(
                line_no,
                format!("#P {} coordinate '{}' is not an integer", axis, field),
            )
        })
    };
    let x = coordinate("x")?;
    let y = coordinate("y")?;
    if let Some(extra) = fields.next() {
        return Err(LifeError::malformed_pattern(
            line_no,
            format!("unexpected '{}' after #P coordinates", extra),
        ));
    }
    Ok((x, y))
}

fn bounds(blocks: &BTreeMap<(i64, i64), bool>) -> Option<(i64, i64, i64, i64)> {
    blocks.keys().fold(None, |acc, &(x, y)| match acc {
        None => Some((x, x, y, y)),
        Some((min_x, max_x, min_y, max_y)) => {
            Some((min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y)))
        }
    })
}

/// Cells spanned from `min` to `max` inclusive, plus a margin cell each side
fn padded_extent(min: i64, max: i64, line_no: usize) -> LifeResult<usize> {
    usize::try_from(max.abs_diff(min))
        .ok()
        .and_then(|span| span.checked_add(3))
        .ok_or_else(|| LifeError::malformed_pattern(line_no, "pattern is too wide"))
}
