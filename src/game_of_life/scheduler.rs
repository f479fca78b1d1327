//! Rate limiting for generation steps

use super::SimulationEngine;
use crate::config::Config;
use log::trace;
use std::time::{Duration, Instant};

/// Wraps `advance()` and sleeps off whatever is left of the target period.
///
/// Sleeping blocks the calling thread only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    period: Option<Duration>,
}

impl FrameScheduler {
    pub fn new(period: Option<Duration>) -> Self {
        Self { period }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.frame_period())
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Advance one generation, then wait until the period has elapsed.
    ///
    /// Returns the time spent inside `advance()` itself.
    pub fn tick(&self, engine: &mut SimulationEngine) -> Duration {
        let started = Instant::now();
        engine.advance();
        let elapsed = started.elapsed();

        if let Some(remaining) = self.period.and_then(|period| period.checked_sub(elapsed)) {
            trace!("Generation took {:?}, sleeping {:?}", elapsed, remaining);
            std::thread::sleep(remaining);
        }
        elapsed
    }

    /// Tick `generations` times
    pub fn run(&self, engine: &mut SimulationEngine, generations: usize) {
        for _ in 0..generations {
            self.tick(engine);
        }
    }
}
