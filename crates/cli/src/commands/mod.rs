// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod delay;
pub mod devices;
pub mod flag;
pub mod run;
pub mod status;
pub mod token;

use crate::error::RlError;
use anyhow::{Context as _, Result};
use racelight_adapters::{LifxAdapter, TracedLightsAdapter};
use racelight_core::Config;
use racelight_engine::{LightController, SinkError};
use racelight_storage::{Settings, SettingsStore};
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const HOME_ENV: &str = "RACELIGHT_HOME";

/// Resolve the config directory: flag, then `$RACELIGHT_HOME`, then the
/// platform config dir
pub fn config_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|d| d.join("racelight"))
        .ok_or_else(|| RlError::no_config_dir().into())
}

/// Everything a command needs from disk
pub struct Context {
    pub dir: PathBuf,
    pub config: Config,
    pub settings: SettingsStore,
}

impl Context {
    pub fn load(dir: PathBuf) -> Result<Self> {
        let config = Config::load_dir(&dir)
            .with_context(|| format!("loading config from {}", dir.display()))?;
        Ok(Self {
            settings: SettingsStore::in_dir(&dir),
            config,
            dir,
        })
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Ok(self.settings.load()?)
    }

    /// Light controller connected with the stored token
    pub fn light_controller(
        &self,
        settings: &Settings,
    ) -> Result<LightController<TracedLightsAdapter<LifxAdapter>>> {
        let token = settings.token().ok_or_else(RlError::no_token)?;
        let adapter = LifxAdapter::new(&self.config.lifx_url, self.config.lights_timeout)?;
        let controller = LightController::new(TracedLightsAdapter::new(adapter), &self.config);
        controller.initialize(token).map_err(RlError::lights)?;
        Ok(controller)
    }

    /// Turn a lights failure into a user error, dropping a rejected token
    pub fn lights_failed(&self, err: SinkError) -> anyhow::Error {
        if err == SinkError::InvalidToken {
            if let Err(e) = self.settings.clear_token() {
                tracing::warn!(error = %e, "failed to clear rejected token");
            }
        }
        RlError::lights(err).into()
    }
}
