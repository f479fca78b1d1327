//! Display and output formatting utilities

use crate::game_of_life::{Grid, SimulationEngine};
use serde::Serialize;

/// Text renderings of grids and engine state
pub struct GridFormatter;

impl GridFormatter {
    /// One character per cell
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity(grid.rows * (grid.columns * 3 + 1));
        for y in 0..grid.rows {
            for x in 0..grid.columns {
                output.push(if grid.is_alive(x, y) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Cached neighbor counts, with live cells marked by brackets
    pub fn format_neighbor_counts(grid: &Grid) -> String {
        let mut output = String::new();
        for y in 0..grid.rows {
            for x in 0..grid.columns {
                if let Some(cell) = grid.cell(x, y) {
                    if cell.alive {
                        output.push_str(&format!("[{}]", cell.live_neighbors));
                    } else {
                        output.push_str(&format!(" {} ", cell.live_neighbors));
                    }
                }
            }
            output.push('\n');
        }
        output
    }

    /// Grid with column and row numbers
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for x in 0..grid.columns {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for y in 0..grid.rows {
            output.push_str(&format!("{:2} ", y));
            for x in 0..grid.columns {
                output.push_str(if grid.is_alive(x, y) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line status for an engine
    pub fn format_status(engine: &SimulationEngine) -> String {
        format!(
            "Generation {} | {}x{} | rules {} | population {} | candidates {}",
            engine.iteration_count(),
            engine.columns(),
            engine.rows(),
            engine.rules(),
            engine.population(),
            engine.change_list_len()
        )
    }

    /// Machine-readable snapshot of an engine
    pub fn summary(engine: &SimulationEngine) -> EngineSummary {
        EngineSummary {
            generation: engine.iteration_count(),
            columns: engine.columns(),
            rows: engine.rows(),
            rules: engine.rules().to_string(),
            population: engine.population(),
            alive: engine.alive_index().cells().collect(),
        }
    }
}

/// Serializable snapshot of an engine's state
#[derive(Debug, Clone, Serialize)]
pub struct EngineSummary {
    pub generation: u64,
    pub columns: usize,
    pub rows: usize,
    pub rules: String,
    pub population: usize,
    pub alive: Vec<(usize, usize)>,
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Wrap text in an ANSI color when the terminal allows it
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Cyan)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::{RuleSet, Topology};

    fn blinker() -> Grid {
        Grid::from_alive_cells(3, 3, Topology::Bounded, [(0, 1), (1, 1), (2, 1)]).unwrap()
    }

    #[test]
    fn test_grid_formatting() {
        let grid = blinker();
        assert_eq!(GridFormatter::format_grid_compact(&grid), "···\n███\n···\n");

        let with_coords = GridFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 1 ██████"));
    }

    #[test]
    fn test_neighbor_count_formatting() {
        let counts = GridFormatter::format_neighbor_counts(&blinker());
        assert_eq!(counts.lines().next().unwrap(), " 2  3  2 ");
        assert_eq!(counts.lines().nth(1).unwrap(), "[1][2][1]");
    }

    #[test]
    fn test_summary() {
        let engine = SimulationEngine::from_grid(blinker(), RuleSet::conway(), 10);
        let summary = GridFormatter::summary(&engine);
        assert_eq!(summary.population, 3);
        assert_eq!(summary.alive, vec![(0, 1), (1, 1), (2, 1)]);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"rules\":\"23/3\""));
        assert!(GridFormatter::format_status(&engine).contains("population 3"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
    }
}
