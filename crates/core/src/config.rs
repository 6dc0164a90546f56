// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller and logging configuration
//!
//! Settings are plain TOML; durations use humantime notation (`"2s"`, `"250ms"`).
//!
//! ```toml
//! [controller]
//! unit_id = "ca-app-pub-3940256099942544/1033173712"
//! grace_period = "2s"
//! reload_debounce = "500ms"
//!
//! [logging]
//! filter = "preload=debug"
//! file = "/var/log/preload.log"
//! ```

use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How long a show request waits for a not-yet-ready resource
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(2000);

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a single resource lifecycle controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Identifies which resource the provider should create
    pub unit_id: String,
    #[serde(with = "humantime_serde", default = "default_grace_period")]
    pub grace_period: Duration,
    /// Debounce window for automatic reloads; reloads are immediate when unset
    #[serde(with = "humantime_serde", default)]
    pub reload_debounce: Option<Duration>,
}

fn default_grace_period() -> Duration {
    DEFAULT_GRACE_PERIOD
}

impl ControllerConfig {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            grace_period: DEFAULT_GRACE_PERIOD,
            reload_debounce: None,
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_reload_debounce(mut self, window: Duration) -> Self {
        self.reload_debounce = Some(window);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_id.trim().is_empty() {
            return Err(ConfigError::Invalid("unit_id must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Top-level settings file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub controller: ControllerConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl Settings {
    /// Parse and validate settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.controller.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
