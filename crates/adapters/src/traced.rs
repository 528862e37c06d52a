// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::lights::{LightInfo, LightsAdapter, LightsError};
use crate::status::{SessionInfo, StatusAdapter, StatusError, TrackStatusRecord};
use async_trait::async_trait;
use racelight_core::{LightState, PulseEffect, Selector};
use tracing::Instrument;

/// Wrapper that adds tracing to any StatusAdapter
#[derive(Clone)]
pub struct TracedStatusAdapter<S> {
    inner: S,
}

impl<S> TracedStatusAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StatusAdapter> StatusAdapter for TracedStatusAdapter<S> {
    async fn track_status(&self) -> Result<Vec<TrackStatusRecord>, StatusError> {
        let start = std::time::Instant::now();
        let result = self
            .inner
            .track_status()
            .instrument(tracing::debug_span!("status.track_status"))
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(records) => tracing::debug!(
                count = records.len(),
                latest = records.first().map(|r| r.status.0),
                elapsed_ms,
                "track status fetched"
            ),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "track status fetch failed"),
        }

        result
    }

    async fn sessions(&self) -> Result<Vec<SessionInfo>, StatusError> {
        let start = std::time::Instant::now();
        let result = self
            .inner
            .sessions()
            .instrument(tracing::debug_span!("status.sessions"))
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(sessions) => tracing::debug!(count = sessions.len(), elapsed_ms, "sessions fetched"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "session fetch failed"),
        }

        result
    }
}

/// Wrapper that adds tracing to any LightsAdapter
#[derive(Clone)]
pub struct TracedLightsAdapter<L> {
    inner: L,
}

impl<L> TracedLightsAdapter<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: LightsAdapter> LightsAdapter for TracedLightsAdapter<L> {
    async fn list_lights(&self, token: &str) -> Result<Vec<LightInfo>, LightsError> {
        let result = self
            .inner
            .list_lights(token)
            .instrument(tracing::debug_span!("lights.list"))
            .await;

        match &result {
            Ok(lights) => tracing::debug!(count = lights.len(), "lights listed"),
            Err(e) => tracing::warn!(error = %e, "list lights failed"),
        }

        result
    }

    async fn set_state(
        &self,
        token: &str,
        selector: &Selector,
        state: &LightState,
    ) -> Result<(), LightsError> {
        let span = tracing::info_span!("lights.set_state", %selector);

        async {
            // Precondition: something to address
            if selector.is_empty() {
                tracing::error!("empty selector");
                return Err(LightsError::status(400, "no devices selected"));
            }

            tracing::info!(power = ?state.power, color = ?state.color.map(|c| c.to_string()), "sending");
            let start = std::time::Instant::now();
            let result = self.inner.set_state(token, selector, state).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "state applied"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "set state failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn pulse(
        &self,
        token: &str,
        selector: &Selector,
        effect: &PulseEffect,
    ) -> Result<(), LightsError> {
        let span = tracing::info_span!("lights.pulse", %selector);

        async {
            if selector.is_empty() {
                tracing::error!("empty selector");
                return Err(LightsError::status(400, "no devices selected"));
            }

            tracing::info!(
                color = %effect.color,
                cycles = effect.cycles,
                period = effect.period,
                "sending"
            );
            let start = std::time::Instant::now();
            let result = self.inner.pulse(token, selector, effect).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "pulse started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "pulse failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
