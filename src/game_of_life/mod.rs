//! Game of Life core functionality

pub mod engine;
pub mod factory;
pub mod grid;
pub mod io;
pub mod pattern;
pub mod rules;
pub mod scheduler;
pub mod validator;

pub use engine::{AliveIndex, SimulationEngine};
pub use factory::GridFactory;
pub use grid::{neighbor_coords, Cell, Grid, Topology, NEIGHBOR_OFFSETS};
pub use io::{create_example_patterns, grid_to_pattern, save_grid_as_pattern};
pub use pattern::{Pattern, PatternParser};
pub use rules::{ReferenceStepper, RuleSet};
pub use scheduler::FrameScheduler;
pub use validator::{Discrepancy, EngineValidator, VerificationReport};
