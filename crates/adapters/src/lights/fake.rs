// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lights adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LightInfo, LightsAdapter, LightsError};
use async_trait::async_trait;
use racelight_core::{LightState, PulseEffect, Selector};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded lights command
#[derive(Debug, Clone, PartialEq)]
pub enum LightsCall {
    ListLights {
        token: String,
    },
    SetState {
        token: String,
        selector: Selector,
        state: LightState,
    },
    Pulse {
        token: String,
        selector: Selector,
        effect: PulseEffect,
    },
}

impl LightsCall {
    pub fn is_pulse(&self) -> bool {
        matches!(self, LightsCall::Pulse { .. })
    }

    pub fn is_set_state(&self) -> bool {
        matches!(self, LightsCall::SetState { .. })
    }
}

#[derive(Default)]
struct FakeLightsState {
    calls: Vec<LightsCall>,
    lights: Vec<LightInfo>,
    /// Outcomes for upcoming commands; empty means success
    results: VecDeque<Result<(), LightsError>>,
    latency: Option<Duration>,
}

/// Fake lights adapter that records every command
#[derive(Clone, Default)]
pub struct FakeLightsAdapter {
    state: Arc<Mutex<FakeLightsState>>,
}

impl FakeLightsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeLightsState) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Devices returned by `list_lights`
    pub fn set_lights(&self, lights: Vec<LightInfo>) {
        self.with_state(|s| s.lights = lights);
    }

    /// Queue the outcome of the next command
    pub fn push_result(&self, result: Result<(), LightsError>) {
        self.with_state(|s| s.results.push_back(result));
    }

    /// Fail the next command with an HTTP status
    pub fn fail_next(&self, status: u16) {
        self.push_result(Err(LightsError::status(status, "scripted failure")));
    }

    /// Delay every command by this much
    pub fn set_latency(&self, latency: Duration) {
        self.with_state(|s| s.latency = Some(latency));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LightsCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Recorded set-state and pulse commands, ignoring device listings
    pub fn commands(&self) -> Vec<LightsCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, LightsCall::ListLights { .. }))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.with_state(|s| s.calls.clear());
    }

    async fn record(&self, call: LightsCall) -> Result<(), LightsError> {
        let (latency, result) = self.with_state(|s| {
            s.calls.push(call);
            (s.latency, s.results.pop_front().unwrap_or(Ok(())))
        });
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        result
    }
}

#[async_trait]
impl LightsAdapter for FakeLightsAdapter {
    async fn list_lights(&self, token: &str) -> Result<Vec<LightInfo>, LightsError> {
        self.record(LightsCall::ListLights {
            token: token.to_string(),
        })
        .await?;
        Ok(self.with_state(|s| s.lights.clone()))
    }

    async fn set_state(
        &self,
        token: &str,
        selector: &Selector,
        state: &LightState,
    ) -> Result<(), LightsError> {
        self.record(LightsCall::SetState {
            token: token.to_string(),
            selector: selector.clone(),
            state: state.clone(),
        })
        .await
    }

    async fn pulse(
        &self,
        token: &str,
        selector: &Selector,
        effect: &PulseEffect,
    ) -> Result<(), LightsError> {
        self.record(LightsCall::Pulse {
            token: token.to_string(),
            selector: selector.clone(),
            effect: effect.clone(),
        })
        .await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
