//! Configuration file support
//!
//! Loads merge configuration from TOML files. Every section is optional;
//! missing values fall back to the defaults in [`MergeConfig`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{
    CompandPoint, DuplicateLanguagePolicy, LogFormat, LoggingConfig, MergeConfig, OutputConfig,
    PlannerConfig, ToolConfig,
};
use crate::error::{MergeError, Result};

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// External tool paths
    pub tools: Option<ToolSettings>,
    /// Ducking parameters
    pub ducking: Option<DuckingSettings>,
    /// Planner settings
    pub planner: Option<PlannerSettings>,
    /// Output naming
    pub output: Option<OutputSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    pub ffprobe: Option<String>,
    pub ffmpeg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckingSettings {
    /// Compand curve as `[[input_db, output_db], ...]`
    pub compand_points: Option<Vec<[f64; 2]>>,
    pub level_in: Option<f64>,
    pub threshold: Option<f64>,
    pub attack_ms: Option<f64>,
    pub release_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// "broadcast" or "reject"
    pub duplicate_language_policy: Option<DuplicateLanguagePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub suffix: Option<String>,
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. "dubmerge=debug"
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| {
            MergeError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| MergeError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = MergeConfig::default();
        Self {
            tools: Some(ToolSettings {
                ffprobe: Some(defaults.tools.ffprobe),
                ffmpeg: Some(defaults.tools.ffmpeg),
            }),
            ducking: Some(DuckingSettings {
                compand_points: Some(
                    defaults
                        .ducking
                        .compand_points
                        .iter()
                        .map(|p| [p.input_db, p.output_db])
                        .collect(),
                ),
                level_in: Some(defaults.ducking.level_in),
                threshold: Some(defaults.ducking.threshold),
                attack_ms: Some(defaults.ducking.attack_ms),
                release_ms: Some(defaults.ducking.release_ms),
            }),
            planner: Some(PlannerSettings {
                duplicate_language_policy: Some(defaults.planner.duplicate_language_policy),
            }),
            output: Some(OutputSettings {
                suffix: Some(defaults.output.suffix),
                overwrite: Some(defaults.output.overwrite),
            }),
            logging: Some(LoggingSettings {
                level: Some(defaults.logging.level),
                format: Some(defaults.logging.format),
            }),
        }
    }

    /// Convert to MergeConfig
    pub fn into_merge_config(self) -> MergeConfig {
        let defaults = MergeConfig::default();

        let tools = match self.tools {
            Some(t) => ToolConfig {
                ffprobe: t.ffprobe.unwrap_or(defaults.tools.ffprobe),
                ffmpeg: t.ffmpeg.unwrap_or(defaults.tools.ffmpeg),
            },
            None => defaults.tools,
        };

        let mut ducking = defaults.ducking;
        if let Some(d) = self.ducking {
            if let Some(points) = d.compand_points {
                ducking.compand_points = points
                    .into_iter()
                    .map(|[input_db, output_db]| CompandPoint::new(input_db, output_db))
                    .collect();
            }
            ducking.level_in = d.level_in.unwrap_or(ducking.level_in);
            ducking.threshold = d.threshold.unwrap_or(ducking.threshold);
            ducking.attack_ms = d.attack_ms.unwrap_or(ducking.attack_ms);
            ducking.release_ms = d.release_ms.unwrap_or(ducking.release_ms);
        }

        let planner = PlannerConfig {
            duplicate_language_policy: self
                .planner
                .and_then(|p| p.duplicate_language_policy)
                .unwrap_or(defaults.planner.duplicate_language_policy),
        };

        let output = match self.output {
            Some(o) => OutputConfig {
                suffix: o.suffix.unwrap_or(defaults.output.suffix),
                overwrite: o.overwrite.unwrap_or(defaults.output.overwrite),
            },
            None => defaults.output,
        };

        let logging = match self.logging {
            Some(l) => LoggingConfig {
                level: l.level.unwrap_or(defaults.logging.level),
                format: l.format.unwrap_or(defaults.logging.format),
            },
            None => defaults.logging,
        };

        MergeConfig {
            tools,
            ducking,
            planner,
            output,
            logging,
        }
    }
}

/// Load the config at `path`, falling back to the defaults.
///
/// A missing file is only an error when the path was named explicitly.
/// The error comes back alongside the defaults so the caller can report it
/// once logging is up.
pub fn load_or_default(path: &Path, explicit: bool) -> (MergeConfig, Option<MergeError>) {
    if !explicit && !path.exists() {
        return (MergeConfig::default(), None);
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => (cf.into_merge_config(), None),
        Err(e) => (MergeConfig::default(), Some(e)),
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_matches_defaults() {
        let config = ConfigFile::default_config().into_merge_config();
        assert_eq!(config, MergeConfig::default());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.into_merge_config(), MergeConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[ducking]
release_ms = 1200.0
compand_points = [[-30.0, -90.0], [-24.0, -24.0]]

[planner]
duplicate_language_policy = "reject"

[output]
suffix = "-dub"
"#
        )
        .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_merge_config();
        assert_eq!(config.ducking.release_ms, 1200.0);
        assert_eq!(config.ducking.attack_ms, 50.0);
        assert_eq!(
            config.ducking.compand_points,
            vec![CompandPoint::new(-30.0, -90.0), CompandPoint::new(-24.0, -24.0)]
        );
        assert_eq!(
            config.planner.duplicate_language_policy,
            DuplicateLanguagePolicy::Reject
        );
        assert_eq!(config.output.suffix, "-dub");
        assert!(config.output.overwrite);
        assert_eq!(config.tools, ToolConfig::default());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[planner]\nduplicate_language_policy = \"maybe\"").unwrap();
        assert!(matches!(
            ConfigFile::from_file(temp_file.path()),
            Err(MergeError::Config(_))
        ));
    }

    #[test]
    fn test_missing_default_path_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, err) = load_or_default(&dir.path().join("dubmerge.toml"), false);
        assert_eq!(config, MergeConfig::default());
        assert!(err.is_none());
    }

    #[test]
    fn test_missing_explicit_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (config, err) = load_or_default(&dir.path().join("nope.toml"), true);
        assert_eq!(config, MergeConfig::default());
        assert!(matches!(err, Some(MergeError::Io(_))));
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\nsuffix = \"-dub\"").unwrap();
        for explicit in [true, false] {
            let (config, err) = load_or_default(temp_file.path(), explicit);
            assert!(err.is_none());
            assert_eq!(config.output.suffix, "-dub");
        }

        let mut bad = NamedTempFile::new().unwrap();
        writeln!(bad, "[output\n").unwrap();
        let (config, err) = load_or_default(bad.path(), false);
        assert_eq!(config, MergeConfig::default());
        assert!(matches!(err, Some(MergeError::Config(_))));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap().into_merge_config();
        assert_eq!(loaded.output.suffix, "-out");
    }
}
