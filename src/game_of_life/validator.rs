//! Cross-checking the incremental engine against the full-grid reference

use super::{Grid, ReferenceStepper, SimulationEngine};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// One cell where the engine and the reference disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub generation: u64,
    pub cell_position: (usize, usize),
    pub engine_alive: bool,
    pub reference_alive: bool,
    pub engine_neighbors: u8,
    pub reference_neighbors: u8,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {} cell ({}, {}): engine {}/{} vs reference {}/{}",
            self.generation,
            self.cell_position.0,
            self.cell_position.1,
            state_name(self.engine_alive),
            self.engine_neighbors,
            state_name(self.reference_alive),
            self.reference_neighbors
        )
    }
}

fn state_name(alive: bool) -> &'static str {
    if alive {
        "alive"
    } else {
        "dead"
    }
}

/// Outcome of a verification run
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub generations_checked: usize,
    pub final_population: usize,
    pub discrepancies: Vec<Discrepancy>,
    pub engine_time: Duration,
    pub reference_time: Duration,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Report:")?;
        writeln!(f, "  Generations checked: {}", self.generations_checked)?;
        writeln!(f, "  Final population: {}", self.final_population)?;
        writeln!(
            f,
            "  Engine time: {:.3}ms, reference time: {:.3}ms",
            self.engine_time.as_secs_f64() * 1000.0,
            self.reference_time.as_secs_f64() * 1000.0
        )?;
        writeln!(f, "  Discrepancies: {}", self.discrepancies.len())?;
        for discrepancy in self.discrepancies.iter().take(5) {
            writeln!(f, "    {}", discrepancy)?;
        }
        if self.discrepancies.len() > 5 {
            writeln!(f, "    ... and {} more", self.discrepancies.len() - 5)?;
        }
        Ok(())
    }
}

/// Steps an engine and the reference side by side
pub struct EngineValidator;

impl EngineValidator {
    /// Compare every cell, including the neighbor count the engine should hold
    /// under the grid's topology
    pub fn compare(engine: &SimulationEngine, reference: &Grid) -> Vec<Discrepancy> {
        let grid = engine.grid();
        grid.iter()
            .filter_map(|(x, y, cell)| {
                let expected_alive = reference.is_alive(x, y);
                let expected_neighbors = reference.count_live_neighbors(x, y, reference.topology);
                let matches =
                    cell.alive == expected_alive && cell.live_neighbors == expected_neighbors;
                (!matches).then(|| Discrepancy {
                    generation: engine.iteration_count(),
                    cell_position: (x, y),
                    engine_alive: cell.alive,
                    reference_alive: expected_alive,
                    engine_neighbors: cell.live_neighbors,
                    reference_neighbors: expected_neighbors,
                })
            })
            .collect()
    }

    /// Run `generations` steps on `engine`, comparing after each one.
    ///
    /// Stops at the first generation with any discrepancy.
    pub fn verify(engine: &mut SimulationEngine, generations: usize) -> VerificationReport {
        let mut reference = engine.grid().clone();
        let mut discrepancies = Self::compare(engine, &reference);
        let mut engine_time = Duration::ZERO;
        let mut reference_time = Duration::ZERO;
        let mut generations_checked = 0;

        while discrepancies.is_empty() && generations_checked < generations {
            let started = Instant::now();
            engine.advance();
            engine_time += started.elapsed();

            let started = Instant::now();
            reference = ReferenceStepper::evolve(&reference, engine.rules());
            reference_time += started.elapsed();

            generations_checked += 1;
            discrepancies = Self::compare(engine, &reference);
        }

        VerificationReport {
            generations_checked,
            final_population: engine.population(),
            discrepancies,
            engine_time,
            reference_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::{RuleSet, Topology};

    #[test]
    fn test_consistent_run() {
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let grid = Grid::from_alive_cells(8, 8, Topology::Wrap, glider).unwrap();
        let mut engine = SimulationEngine::from_grid(grid, RuleSet::conway(), 1);

        let report = EngineValidator::verify(&mut engine, 40);
        assert!(report.is_consistent(), "{}", report);
        assert_eq!(report.generations_checked, 40);
        assert_eq!(report.final_population, 5);
    }

    #[test]
    fn test_detects_stale_counts() {
        // Counts computed without wrap while the engine wraps
        let mut grid = Grid::from_alive_cells(4, 4, Topology::Wrap, [(0, 0)]).unwrap();
        grid.recount_neighbors(Topology::Bounded);

        let engine = SimulationEngine::from_grid(grid.clone(), RuleSet::conway(), 1);
        let mut reference = grid;
        reference.recount_neighbors(Topology::Wrap);
        let discrepancies = EngineValidator::compare(&engine, &reference);
        assert!(!discrepancies.is_empty());
        assert!(discrepancies.iter().all(|d| !d.engine_alive && d.reference_neighbors == 1));
        assert!(discrepancies[0].to_string().contains("generation 0"));
    }
}
