// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op lights adapter for dry runs.

use super::{LightInfo, LightsAdapter, LightsError};
use async_trait::async_trait;
use racelight_core::{LightState, PulseEffect, Selector};

/// Lights adapter that accepts every command and changes nothing.
///
/// Used by `run --dry-run` so the schedule can be watched in the logs
/// without touching real devices.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLightsAdapter;

impl NoOpLightsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LightsAdapter for NoOpLightsAdapter {
    async fn list_lights(&self, _token: &str) -> Result<Vec<LightInfo>, LightsError> {
        Ok(Vec::new())
    }

    async fn set_state(
        &self,
        _token: &str,
        _selector: &Selector,
        _state: &LightState,
    ) -> Result<(), LightsError> {
        Ok(())
    }

    async fn pulse(
        &self,
        _token: &str,
        _selector: &Selector,
        _effect: &PulseEffect,
    ) -> Result<(), LightsError> {
        Ok(())
    }
}
