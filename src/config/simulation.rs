//! Immutable configuration handed to the engine at construction

use crate::error::{LifeError, LifeResult};
use crate::game_of_life::{Pattern, PatternParser, RuleSet, Topology};
use std::path::PathBuf;
use std::time::Duration;

/// Where a seed pattern comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    File(PathBuf),
    Text(String),
}

impl PatternSource {
    pub fn load(&self) -> LifeResult<Pattern> {
        match self {
            PatternSource::File(path) => PatternParser::load(path),
            PatternSource::Text(text) => PatternParser::parse(text),
        }
    }
}

/// Period of one frame at `rate` generations per second.
///
/// Rates so small that the period does not fit in a `Duration` are rejected.
pub fn period_for_rate(rate: f64) -> LifeResult<Duration> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(LifeError::InvalidConfig(format!(
            "frame rate must be a positive number, got {}",
            rate
        )));
    }
    Duration::try_from_secs_f64(1.0 / rate).map_err(|e| {
        LifeError::InvalidConfig(format!("frame rate {} is too small: {}", rate, e))
    })
}

/// Simulation configuration.
///
/// Built once with the `with_*` methods and never mutated after it is passed
/// to the engine. `resolution` is the cell size in pixels and only serves to
/// derive the row and column counts.
#[derive(Debug, Clone)]
pub struct Config {
    width: usize,
    height: usize,
    resolution: usize,
    topology: Topology,
    rules: Option<RuleSet>,
    pattern: Option<PatternSource>,
    frame_period: Option<Duration>,
}

impl Config {
    pub fn new(width: usize, height: usize, resolution: usize) -> LifeResult<Self> {
        if resolution == 0 {
            return Err(LifeError::InvalidConfig(
                "resolution must be positive".to_string(),
            ));
        }
        if width / resolution == 0 || height / resolution == 0 {
            return Err(LifeError::InvalidConfig(format!(
                "{}x{} surface at resolution {} has no cells",
                width, height, resolution
            )));
        }
        Ok(Self {
            width,
            height,
            resolution,
            topology: Topology::Wrap,
            rules: None,
            pattern: None,
            frame_period: None,
        })
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.topology = Topology::from_wrap(wrap);
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_pattern(mut self, pattern: PatternSource) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Throttle to `rate` generations per second
    pub fn with_frame_rate(mut self, rate: f64) -> LifeResult<Self> {
        self.frame_period = Some(period_for_rate(rate)?);
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn rows(&self) -> usize {
        self.height / self.resolution
    }

    pub fn columns(&self) -> usize {
        self.width / self.resolution
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn wrap(&self) -> bool {
        self.topology == Topology::Wrap
    }

    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }

    pub fn pattern(&self) -> Option<&PatternSource> {
        self.pattern.as_ref()
    }

    pub fn frame_period(&self) -> Option<Duration> {
        self.frame_period
    }

    /// Rules in effect: explicit rules, then the pattern's own, then Conway
    pub fn effective_rules(&self, pattern: Option<&Pattern>) -> RuleSet {
        self.rules
            .or_else(|| pattern.and_then(|p| p.rule))
            .unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            resolution: 10,
            topology: Topology::Wrap,
            rules: None,
            pattern: None,
            frame_period: None,
        }
    }
}
