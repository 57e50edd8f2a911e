//! TOML-based run configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level run configuration parsed from TOML.
///
/// All fields have defaults matching the baseline dataset run. Load from
/// TOML with [`RunConfig::from_toml_file`] or use [`RunConfig::baseline`]
/// for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Profile synthesis and simulation-horizon parameters.
    pub run: RunSettings,
    /// Engine connection parameters.
    pub engine: EngineSettings,
    /// Artifact locations.
    pub output: OutputSettings,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Profile synthesis and simulation-horizon parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Master random seed for profile synthesis.
    pub seed: u64,
    /// Number of timesteps per simulated day.
    pub steps_per_day: usize,
    /// Number of days to simulate.
    pub days: usize,
    /// Path of the circuit master file, passed to the engine's redirect
    /// directive. The engine resolves relative paths on its side.
    pub circuit_path: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            steps_per_day: 96,
            days: 7,
            circuit_path: "ckt5-src/Master_ckt5.dss".to_string(),
        }
    }
}

/// Engine connection parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// TCP endpoint of the engine's line-protocol text interface.
    pub endpoint: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8845".to_string(),
        }
    }
}

/// Artifact locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Directory the three artifacts are written into (created if absent).
    pub dir: String,
    /// File name of the injected-profile table.
    pub profile_file: String,
    /// File name of the measured-voltage table.
    pub voltage_file: String,
    /// File name of the metadata table.
    pub metadata_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            profile_file: "load_profile.csv".to_string(),
            voltage_file: "load_voltage.csv".to_string(),
            metadata_file: "metadata.csv".to_string(),
        }
    }
}

impl OutputSettings {
    /// Path of the injected-profile artifact.
    pub fn profile_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.profile_file)
    }

    /// Path of the measured-voltage artifact.
    pub fn voltage_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.voltage_file)
    }

    /// Path of the metadata artifact.
    pub fn metadata_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.metadata_file)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"run.circuit_path"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl RunConfig {
    /// Returns the baseline configuration: the original ckt5 dataset run
    /// (seed 1337, 96 steps/day over 7 days).
    pub fn baseline() -> Self {
        Self {
            run: RunSettings::default(),
            engine: EngineSettings::default(),
            output: OutputSettings::default(),
        }
    }

    /// Total timestep count of the simulation horizon.
    ///
    /// Zero is a valid degenerate horizon: profiles and tables come out
    /// empty but with correct headers.
    pub fn timestep_count(&self) -> usize {
        self.run.steps_per_day * self.run.days
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.run.circuit_path.is_empty() {
            errors.push(ConfigError {
                field: "run.circuit_path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.engine.endpoint.is_empty() {
            errors.push(ConfigError {
                field: "engine.endpoint".into(),
                message: "must not be empty".into(),
            });
        }

        let out = &self.output;
        if out.dir.is_empty() {
            errors.push(ConfigError {
                field: "output.dir".into(),
                message: "must not be empty".into(),
            });
        }
        for (field, name) in [
            ("output.profile_file", &out.profile_file),
            ("output.voltage_file", &out.voltage_file),
            ("output.metadata_file", &out.metadata_file),
        ] {
            if name.is_empty() {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must not be empty".into(),
                });
            }
        }

        errors
    }
}
