// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use racelight_adapters::{LightsError, StatusError};
use thiserror::Error;

/// Errors from polling the race status feed
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl PollError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PollError::Status(StatusError::RateLimited))
    }
}

/// Errors from driving the lights
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// No token, or the last one was rejected
    #[error("LIFX client not initialized")]
    NotInitialized,
    #[error("Invalid LIFX API token")]
    InvalidToken,
    #[error("Rate limit exceeded. Please try again in a few seconds.")]
    RateLimited,
    #[error("{0}")]
    Validation(String),
    #[error("LIFX server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
    #[error("Failed to communicate with LIFX: {0}")]
    Network(String),
}

impl SinkError {
    /// Only server-side failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Server { .. })
    }
}

impl From<LightsError> for SinkError {
    fn from(err: LightsError) -> Self {
        match err {
            LightsError::Status { status: 401, .. } => SinkError::InvalidToken,
            LightsError::Status { status: 429, .. } => SinkError::RateLimited,
            LightsError::Status { status, message } if status >= 500 => {
                SinkError::Server { status, message }
            }
            LightsError::Status { message, .. } => SinkError::Validation(message),
            LightsError::Network(message) => SinkError::Network(message),
            LightsError::Decode(message) => SinkError::Validation(message),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
