// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `benchtrack.{toml,yaml,json}` in the working directory, or an explicit file
//! 3. Environment variables prefixed `BENCHTRACK__`, with `__` between keys
//!    (e.g. `BENCHTRACK__DETECTOR__THRESHOLD=0.05`)
//!
//! A `.env` file is loaded into the environment first, if present.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "benchtrack";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BENCHTRACK";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Source could not be read or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Values were read but are out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Regression detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Number of trailing prior points the baseline is computed from (K).
    pub window: usize,
    /// Relative change that counts as a regression or improvement.
    pub threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window: 1,
            threshold: 0.1,
        }
    }
}

impl DetectorConfig {
    /// Create a config with the given window and threshold.
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.window == 0 {
            return Err(SettingsError::Invalid(
                "detector.window must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "detector.threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Where the dashboard data file lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path of the dashboard data file (`data.js` or plain JSON).
    pub data_file: PathBuf,
    /// Suite name used when exporting entries.
    pub suite: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl ServerSettings {
    /// `host:port` string for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// All benchtrack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Regression detection
    pub detector: DetectorConfig,
    /// Data file
    pub storage: StorageSettings,
    /// HTTP service
    pub server: ServerSettings,
    /// Logging
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    ///
    /// When `path` is given the file must exist; otherwise the default file
    /// name is tried and silently skipped if absent.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let _ = dotenvy::dotenv();

        let builder = Config::builder()
            .set_default("detector.window", 1_i64)?
            .set_default("detector.threshold", 0.1)?
            .set_default("storage.data_file", "benchmark-data/data.js")?
            .set_default("storage.suite", "Benchmark")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.detector.validate()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
