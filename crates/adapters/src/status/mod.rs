// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race status feed adapters

mod openf1;

pub use openf1::OpenF1Adapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusAdapter;

use async_trait::async_trait;
use racelight_core::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the race status feed
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Rate limit exceeded. Please try again in a few seconds.")]
    RateLimited,
    #[error("race status request timed out")]
    Timeout,
    #[error("failed to fetch track status: HTTP {status}")]
    Http { status: u16 },
    #[error("failed to fetch track status: {0}")]
    Network(String),
    #[error("invalid race status response: {0}")]
    Decode(String),
}

/// One entry of the track status feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStatusRecord {
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl TrackStatusRecord {
    pub fn new(code: i64) -> Self {
        Self {
            status: StatusCode(code),
            message: None,
            date: None,
        }
    }

    /// Record assumed when the feed returns nothing
    pub fn all_clear() -> Self {
        Self {
            status: StatusCode::ALL_CLEAR,
            message: None,
            date: None,
        }
    }
}

/// One entry of the session feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub session_key: Option<u64>,
    pub session_name: Option<String>,
    pub date_start: Option<String>,
}

/// Source of race control data
#[async_trait]
pub trait StatusAdapter: Clone + Send + Sync + 'static {
    /// Fetch track status records, most relevant first
    async fn track_status(&self) -> Result<Vec<TrackStatusRecord>, StatusError>;

    /// Fetch live sessions; non-empty means a session is running
    async fn sessions(&self) -> Result<Vec<SessionInfo>, StatusError>;
}
