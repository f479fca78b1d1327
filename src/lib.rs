//! Incremental Game of Life
//!
//! This library simulates life-like cellular automata on a bounded grid with
//! configurable birth/survival rules and optional toroidal wraparound. Each
//! generation only revisits cells that are alive or next to a live cell,
//! using cached per-cell neighbor counts that are updated as cells change.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod utils;

pub use config::{Config, PatternSource, Settings};
pub use error::{LifeError, LifeResult};
pub use game_of_life::{FrameScheduler, RuleSet, SimulationEngine};

use anyhow::Result;

/// Build an engine from settings and run it for `generations` steps,
/// honoring the configured frame rate
pub fn simulate(settings: &Settings, generations: usize) -> Result<SimulationEngine> {
    let config = settings.resolve()?;
    let mut engine = SimulationEngine::new(&config)?;
    FrameScheduler::from_config(&config).run(&mut engine, generations);
    Ok(engine)
}
