//! YAML settings file for the simulation host

use super::simulation::period_for_rate;
use super::{Config, PatternSource};
use crate::game_of_life::RuleSet;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridSettings,
    /// Rule string such as `23/3`; falls back to the pattern's `#R` line
    pub rules: Option<String>,
    /// Life 1.05 pattern file to center on the grid
    pub pattern: Option<PathBuf>,
    /// Target generations per second; unthrottled when absent
    pub frame_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub width: usize,
    pub height: usize,
    pub resolution: usize,
    pub wrap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                width: 800,
                height: 800,
                resolution: 10,
                wrap: true,
            },
            rules: None,
            pattern: None,
            frame_rate: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.resolution == 0 {
            anyhow::bail!("Resolution must be positive");
        }

        if self.grid.width < self.grid.resolution || self.grid.height < self.grid.resolution {
            anyhow::bail!(
                "Surface {}x{} is smaller than one {}px cell",
                self.grid.width,
                self.grid.height,
                self.grid.resolution
            );
        }

        if let Some(rules) = &self.rules {
            RuleSet::parse(rules).context("Invalid rules")?;
        }

        if let Some(rate) = self.frame_rate {
            period_for_rate(rate).context("Invalid frame rate")?;
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.exists() {
                anyhow::bail!("Pattern file does not exist: {}", pattern.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.grid.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.grid.height = height;
        }
        if let Some(resolution) = cli_overrides.resolution {
            self.grid.resolution = resolution;
        }
        if let Some(wrap) = cli_overrides.wrap {
            self.grid.wrap = wrap;
        }
        if let Some(ref rules) = cli_overrides.rules {
            self.rules = Some(rules.clone());
        }
        if let Some(ref pattern) = cli_overrides.pattern {
            self.pattern = Some(pattern.clone());
        }
        if let Some(rate) = cli_overrides.frame_rate {
            self.frame_rate = Some(rate);
        }
    }

    /// Build the immutable engine configuration
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::new(self.grid.width, self.grid.height, self.grid.resolution)?
            .with_wrap(self.grid.wrap);
        if let Some(rules) = &self.rules {
            config = config.with_rules(RuleSet::parse(rules)?);
        }
        if let Some(pattern) = &self.pattern {
            config = config.with_pattern(PatternSource::File(pattern.clone()));
        }
        if let Some(rate) = self.frame_rate {
            config = config.with_frame_rate(rate)?;
        }
        Ok(config)
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub resolution: Option<usize>,
    pub wrap: Option<bool>,
    pub rules: Option<String>,
    pub pattern: Option<PathBuf>,
    pub frame_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.rules = Some("23/36".to_string());
        settings.frame_rate = Some(30.0);
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_optional_fields_may_be_omitted() {
        let yaml = "grid:\n  width: 50\n  height: 50\n  resolution: 10\n  wrap: false\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.rules, None);
        assert_eq!(settings.pattern, None);

        let config = settings.resolve().unwrap();
        assert_eq!(config.rows(), 5);
        assert!(!config.wrap());
        assert_eq!(config.frame_period(), None);
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.rules = Some("23-3".to_string());
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.grid.resolution = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.frame_rate = Some(-1.0);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.frame_rate = Some(1e-300);
        assert!(settings.validate().is_err());
        assert!(settings.resolve().is_err());

        let mut settings = Settings::default();
        settings.pattern = Some(PathBuf::from("does/not/exist.lif"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            width: Some(100),
            wrap: Some(false),
            rules: Some("B36/S23".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.grid.width, 100);
        assert_eq!(settings.grid.height, 800);
        assert!(!settings.grid.wrap);

        let config = settings.resolve().unwrap();
        assert_eq!(config.columns(), 10);
        assert_eq!(config.rules().unwrap().birth_counts(), vec![3, 6]);
    }
}
