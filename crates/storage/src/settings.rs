// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client settings file
//!
//! Holds the lights API token, the selected device ids, and the broadcast
//! delay. The file is unversioned and rewritten whole on every update.

use racelight_core::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lights API token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub selected_devices: BTreeSet<String>,
    /// Broadcast delay in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_delay: Option<f64>,
}

impl Settings {
    /// Saved delay, or `default` when unset or not a usable duration
    pub fn delay_or(&self, default: Duration) -> Duration {
        self.broadcast_delay
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(default)
    }

    pub fn selector(&self) -> Selector {
        Selector::from_devices(&self.selected_devices)
    }

    /// Token with surrounding whitespace removed; empty counts as unset
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// JSON file-backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `settings.json` inside a directory
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file with `settings`
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Load, modify, and save in one step. Returns the saved settings.
    pub fn update<F>(&self, f: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load()?;
        f(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    /// Forget the stored token after it was rejected
    pub fn clear_token(&self) -> Result<(), SettingsError> {
        self.update(|s| s.token = None)?;
        tracing::info!(path = %self.path.display(), "cleared stored token");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
