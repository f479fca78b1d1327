//! Error taxonomy for engine construction and pattern loading

use std::path::PathBuf;

/// Failures surfaced while building a simulation.
///
/// All of these happen at setup time. Nothing in the generation loop can fail.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("Malformed rule string '{rule}': {reason}")]
    MalformedRule { rule: String, reason: String },

    #[error("Failed to read pattern source {}: {source}", .path.display())]
    PatternSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed pattern at line {line}: {reason}")]
    MalformedPattern { line: usize, reason: String },

    #[error(
        "Pattern bounding box {pattern_width}x{pattern_height} does not fit in {columns}x{rows} grid"
    )]
    PatternTooLarge {
        pattern_width: usize,
        pattern_height: usize,
        columns: usize,
        rows: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LifeError {
    pub(crate) fn malformed_rule(rule: &str, reason: impl Into<String>) -> Self {
        LifeError::MalformedRule {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_pattern(line: usize, reason: impl Into<String>) -> Self {
        LifeError::MalformedPattern {
            line,
            reason: reason.into(),
        }
    }
}

pub type LifeResult<T> = std::result::Result<T, LifeError>;
