//! Benchmark comparing the incremental engine against a full-grid rescan
//!
//! Seeds an acorn in the middle of increasingly large grids and times how
//! long each stepper needs for the same number of generations. The acorn
//! stays small relative to the grid, so the incremental engine should pull
//! further ahead as the grid grows.

use anyhow::{Context, Result};
use incremental_life::{
    game_of_life::{ReferenceStepper, SimulationEngine},
    Config, PatternSource, RuleSet,
};
use std::time::{Duration, Instant};

const ACORN: &str = "#Life 1.05\n#P -3 -1\n.*.....\n...*...\n**..***\n";

#[derive(Debug, Clone)]
struct BenchmarkResult {
    columns: usize,
    rows: usize,
    generations: usize,
    incremental_times: Vec<Duration>,
    reference_times: Vec<Duration>,
    final_population: usize,
    consistent: bool,
}

impl BenchmarkResult {
    fn new(columns: usize, rows: usize, generations: usize) -> Self {
        Self {
            columns,
            rows,
            generations,
            incremental_times: Vec::new(),
            reference_times: Vec::new(),
            final_population: 0,
            consistent: true,
        }
    }

    fn average(times: &[Duration]) -> Duration {
        if times.is_empty() {
            return Duration::ZERO;
        }
        times.iter().sum::<Duration>() / times.len() as u32
    }

    fn format_time(duration: Duration) -> String {
        format!("{:.3}s", duration.as_secs_f64())
    }

    fn speedup(&self) -> f64 {
        let incremental = Self::average(&self.incremental_times).as_secs_f64();
        if incremental == 0.0 {
            return f64::INFINITY;
        }
        Self::average(&self.reference_times).as_secs_f64() / incremental
    }

    fn display(&self) -> String {
        format!(
            "  {}x{} grid, {} generations:\n    Incremental: {} | Reference: {} | Speedup: {:.1}x | Population: {} | Match: {}",
            self.columns,
            self.rows,
            self.generations,
            Self::format_time(Self::average(&self.incremental_times)),
            Self::format_time(Self::average(&self.reference_times)),
            self.speedup(),
            self.final_population,
            if self.consistent { "✅" } else { "❌" }
        )
    }
}

struct BenchmarkSuite {
    results: Vec<BenchmarkResult>,
    generations: usize,
    runs_per_size: usize,
}

impl BenchmarkSuite {
    fn new(generations: usize, runs_per_size: usize) -> Self {
        Self {
            results: Vec::new(),
            generations,
            runs_per_size,
        }
    }

    fn run(&mut self, sizes: &[usize]) -> Result<()> {
        for &cells in sizes {
            println!("Benchmarking {}x{} grid...", cells, cells);
            let result = self.benchmark_size(cells)?;
            println!("{}", result.display());
            self.results.push(result);
        }
        Ok(())
    }

    fn benchmark_size(&self, cells: usize) -> Result<BenchmarkResult> {
        let config = Config::new(cells, cells, 1)
            .context("Failed to build benchmark config")?
            .with_pattern(PatternSource::Text(ACORN.to_string()));
        let mut result = BenchmarkResult::new(cells, cells, self.generations);

        for _ in 0..self.runs_per_size {
            let mut engine =
                SimulationEngine::new(&config).context("Failed to build simulation")?;
            let seed = engine.grid().clone();

            let start = Instant::now();
            engine.run(self.generations);
            result.incremental_times.push(start.elapsed());

            let start = Instant::now();
            let reference =
                ReferenceStepper::evolve_generations(seed, &RuleSet::conway(), self.generations);
            result.reference_times.push(start.elapsed());

            result.final_population = engine.population();
            result.consistent &= engine.grid() == &reference;
        }

        Ok(result)
    }

    fn print_summary(&self) {
        println!("\nSummary");
        println!("=======");
        for result in &self.results {
            println!(
                "  {:>5}x{:<5} {:>8.1}x faster",
                result.columns,
                result.rows,
                result.speedup()
            );
        }
        if self.results.iter().any(|r| !r.consistent) {
            println!("\n❌ Engine and reference disagreed on at least one grid");
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut suite = BenchmarkSuite::new(200, 3);
    suite.run(&[64, 256, 512, 1024])?;
    suite.print_summary();

    Ok(())
}
