//! Merge configuration

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

/// External tool locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// ffprobe executable
    pub ffprobe: String,

    /// ffmpeg executable
    pub ffmpeg: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

/// One point of a compand transfer curve, in dB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompandPoint {
    pub input_db: f64,
    pub output_db: f64,
}

impl CompandPoint {
    pub const fn new(input_db: f64, output_db: f64) -> Self {
        Self {
            input_db,
            output_db,
        }
    }
}

/// Ducking parameters for added tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuckingConfig {
    /// Transfer curve applied to the new track before it triggers ducking
    pub compand_points: Vec<CompandPoint>,

    /// Input gain applied to the original audio in the compressor
    pub level_in: f64,

    /// Compressor threshold (linear, 0..1)
    pub threshold: f64,

    /// Compressor attack in milliseconds
    pub attack_ms: f64,

    /// Compressor release in milliseconds
    pub release_ms: f64,
}

impl Default for DuckingConfig {
    fn default() -> Self {
        Self {
            // Gate below -20 dB, pass through from -18 dB upwards.
            compand_points: vec![
                CompandPoint::new(-20.0, -600.0),
                CompandPoint::new(-18.0, -18.0),
            ],
            level_in: 0.3,
            threshold: 0.1,
            attack_ms: 50.0,
            release_ms: 2500.0,
        }
    }
}

/// What to do when one new track matches several existing streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateLanguagePolicy {
    /// Replace every matching stream with the same new track
    #[default]
    Broadcast,
    /// Refuse to plan
    Reject,
}

/// Planner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub duplicate_language_policy: DuplicateLanguagePolicy,
}

/// Output file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Appended to the video's file stem to name the output
    pub suffix: String,

    /// Overwrite an existing output file
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "-out".to_string(),
            overwrite: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "dubmerge=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete configuration for a merge run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    pub tools: ToolConfig,
    pub ducking: DuckingConfig,
    pub planner: PlannerConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl MergeConfig {
    /// Check values that would otherwise produce a broken command
    pub fn validate(&self) -> Result<()> {
        if self.tools.ffprobe.trim().is_empty() || self.tools.ffmpeg.trim().is_empty() {
            return Err(MergeError::Config("tool paths must not be empty".to_string()));
        }
        if self.output.suffix.is_empty() {
            return Err(MergeError::Config(
                "output suffix must not be empty, or the input would be overwritten".to_string(),
            ));
        }
        if self.ducking.compand_points.len() < 2 {
            return Err(MergeError::Config(
                "compand curve needs at least two points".to_string(),
            ));
        }
        if self.ducking.attack_ms <= 0.0 || self.ducking.release_ms <= 0.0 {
            return Err(MergeError::Config(
                "attack and release must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MergeConfig::default();
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
        assert_eq!(config.output.suffix, "-out");
        assert_eq!(config.ducking.release_ms, 2500.0);
        assert_eq!(
            config.planner.duplicate_language_policy,
            DuplicateLanguagePolicy::Broadcast
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let config = MergeConfig {
            output: OutputConfig {
                suffix: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_short_curve() {
        let mut config = MergeConfig::default();
        config.ducking.compand_points.truncate(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attack() {
        let mut config = MergeConfig::default();
        config.ducking.attack_ms = 0.0;
        assert!(config.validate().is_err());
    }
}
