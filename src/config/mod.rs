//! Configuration management for the simulation

pub mod settings;
pub mod simulation;

pub use settings::{CliOverrides, GridSettings, Settings};
pub use simulation::{Config, PatternSource};
