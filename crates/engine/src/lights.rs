// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Light controller: turns flags into device commands
//!
//! Owns the API token and the retry policy. Server errors are retried with
//! linear backoff; a rejected token disconnects the controller until a new
//! one is supplied.

use crate::error::SinkError;
use racelight_adapters::{LightInfo, LightsAdapter, LightsError};
use racelight_core::{Config, Flag, LightState, PulseEffect, Scene, Selector};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

pub struct LightController<L> {
    adapter: L,
    token: Mutex<Option<String>>,
    max_retries: u32,
    retry_base_delay: Duration,
    pulse_settle: Duration,
}

impl<L: LightsAdapter> LightController<L> {
    pub fn new(adapter: L, config: &Config) -> Self {
        Self {
            adapter,
            token: Mutex::new(None),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            pulse_settle: config.pulse_settle,
        }
    }

    /// Connect with an API token
    pub fn initialize(&self, token: &str) -> Result<(), SinkError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SinkError::Validation(
                "LIFX API token is required".to_string(),
            ));
        }
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        tracing::info!("lights controller initialized");
        Ok(())
    }

    pub fn disconnect(&self) {
        let previous = self.token.lock().unwrap_or_else(|e| e.into_inner()).take();
        if previous.is_some() {
            tracing::info!("lights controller disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn token(&self) -> Result<String, SinkError> {
        self.token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(SinkError::NotInitialized)
    }

    /// Linear backoff, saturating for absurd configured bases
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX)
    }

    /// Run one API call under the retry and auth policy
    async fn call<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T, SinkError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, LightsError>>,
    {
        let token = self.token()?;
        let mut attempt = 0;

        loop {
            let err = match f(token.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) => SinkError::from(e),
            };

            if err == SinkError::InvalidToken {
                tracing::warn!(op, "token rejected, disconnecting");
                self.disconnect();
                return Err(err);
            }
            if !err.is_retryable() || attempt >= self.max_retries {
                return Err(err);
            }

            attempt += 1;
            let backoff = self.backoff(attempt);
            tracing::warn!(
                op,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "retrying lights command"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    /// Devices visible to the current token
    pub async fn list_lights(&self) -> Result<Vec<LightInfo>, SinkError> {
        let adapter = &self.adapter;
        self.call("list_lights", move |token| async move {
            adapter.list_lights(&token).await
        })
        .await
    }

    pub async fn set_state(&self, selector: &Selector, state: &LightState) -> Result<(), SinkError> {
        let adapter = &self.adapter;
        self.call("set_state", move |token| async move {
            adapter.set_state(&token, selector, state).await
        })
        .await
    }

    pub async fn pulse(&self, selector: &Selector, effect: &PulseEffect) -> Result<(), SinkError> {
        let adapter = &self.adapter;
        self.call("pulse", move |token| async move {
            adapter.pulse(&token, selector, effect).await
        })
        .await
    }

    /// Show a flag on the selected lights.
    ///
    /// Flags with a pulse flash first, settle, then hold the steady state. A
    /// failed pulse skips the steady state.
    pub async fn apply_flag(&self, selector: &Selector, flag: Flag) -> Result<(), SinkError> {
        if selector.is_empty() {
            return Err(SinkError::Validation("No lights selected".to_string()));
        }

        let scene = Scene::for_flag(flag);
        tracing::info!(%flag, %selector, "applying flag");

        if let Some(pulse) = &scene.pulse {
            self.pulse(selector, pulse).await?;
            tokio::time::sleep(self.pulse_settle).await;
        }
        self.set_state(selector, &scene.steady).await
    }

    pub async fn set_red_flag(&self, selector: &Selector) -> Result<(), SinkError> {
        self.apply_flag(selector, Flag::Red).await
    }

    pub async fn set_safety_car(&self, selector: &Selector) -> Result<(), SinkError> {
        self.apply_flag(selector, Flag::Safety).await
    }

    pub async fn set_checkered_flag(&self, selector: &Selector) -> Result<(), SinkError> {
        self.apply_flag(selector, Flag::Checkered).await
    }
}

#[cfg(test)]
#[path = "lights_tests.rs"]
mod tests;
