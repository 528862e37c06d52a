// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration
//!
//! Loaded from an optional `racelight.toml`; every field has a default so an
//! empty or missing file yields a working setup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "racelight.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the race status API
    pub openf1_url: String,
    /// Base URL of the lights API
    pub lifx_url: String,

    /// How often the delay queue is evaluated
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// How long executed actions are retained for inspection
    #[serde(with = "humantime_serde")]
    pub retention: Duration,
    /// Broadcast delay used when none has been saved
    #[serde(with = "humantime_serde")]
    pub default_delay: Duration,

    /// Track status poll interval while a session is live
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
    /// Session liveness check interval
    #[serde(with = "humantime_serde")]
    pub session_interval: Duration,
    /// Device list refresh interval while connected
    #[serde(with = "humantime_serde")]
    pub device_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub status_cache: Duration,
    #[serde(with = "humantime_serde")]
    pub session_cache: Duration,
    #[serde(with = "humantime_serde")]
    pub status_timeout: Duration,

    /// Retries for server errors from the lights API
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `n * retry_base_delay`
    #[serde(with = "humantime_serde")]
    pub retry_base_delay: Duration,
    /// Wait between a pulse and the steady state
    #[serde(with = "humantime_serde")]
    pub pulse_settle: Duration,
    #[serde(with = "humantime_serde")]
    pub lights_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openf1_url: "https://api.openf1.org/v1".to_string(),
            lifx_url: "https://api.lifx.com/v1".to_string(),
            tick_interval: Duration::from_millis(100),
            retention: Duration::from_secs(60),
            default_delay: Duration::from_secs(5),
            status_interval: Duration::from_secs(2),
            session_interval: Duration::from_secs(30),
            device_interval: Duration::from_secs(30),
            status_cache: Duration::from_secs(2),
            session_cache: Duration::from_secs(30),
            status_timeout: Duration::from_secs(5),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            pulse_settle: Duration::from_secs(3),
            lights_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Parse config from TOML text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load `racelight.toml` from a directory, falling back to defaults
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::load(&dir.join(CONFIG_FILE))
    }

    /// Load config from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Config with short intervals for tests
    pub fn for_testing() -> Self {
        Self {
            tick_interval: Duration::from_millis(10),
            retry_base_delay: Duration::from_millis(10),
            pulse_settle: Duration::from_millis(10),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
