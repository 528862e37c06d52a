// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Smart light adapters

mod lifx;
mod noop;

pub use lifx::LifxAdapter;
pub use noop::NoOpLightsAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLightsAdapter, LightsCall};

use async_trait::async_trait;
use racelight_core::{LightState, PulseEffect, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the lights API, classified by transport outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LightsError {
    /// No response was received
    #[error("unable to reach the lights API: {0}")]
    Network(String),
    /// The API answered with a non-success status
    #[error("lights API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid lights API response: {0}")]
    Decode(String),
}

impl LightsError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        LightsError::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, if the API responded
    pub fn http_status(&self) -> Option<u16> {
        match self {
            LightsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A device on the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightInfo {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub power: String,
    #[serde(default)]
    pub brightness: f64,
}

impl std::fmt::Display for LightInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<16} {:<24} {:<4} {}",
            self.id,
            self.label,
            self.power,
            if self.connected { "online" } else { "offline" }
        )
    }
}

/// Remote command surface of the lights API
#[async_trait]
pub trait LightsAdapter: Clone + Send + Sync + 'static {
    /// List every device the token can see
    async fn list_lights(&self, token: &str) -> Result<Vec<LightInfo>, LightsError>;

    /// Set power, color, brightness and transition for the selected devices
    async fn set_state(
        &self,
        token: &str,
        selector: &Selector,
        state: &LightState,
    ) -> Result<(), LightsError>;

    /// Run a pulse effect on the selected devices
    async fn pulse(
        &self,
        token: &str,
        selector: &Selector,
        effect: &PulseEffect,
    ) -> Result<(), LightsError>;
}
