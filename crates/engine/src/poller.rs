// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race status poller with response caching and change detection

use crate::error::PollError;
use racelight_adapters::{StatusAdapter, TrackStatusRecord};
use racelight_core::{Clock, Config, Flag, StatusCode};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// The current track status, translated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackStatus {
    pub code: StatusCode,
    pub flag: Flag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<TrackStatusRecord> for TrackStatus {
    fn from(record: TrackStatusRecord) -> Self {
        Self {
            flag: record.status.flag(),
            code: record.status,
            message: record.message,
        }
    }
}

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

struct PollerState {
    status: Option<Cached<TrackStatus>>,
    session: Option<Cached<bool>>,
    last_session: bool,
    last_flag: Flag,
}

/// Polls the status feed on behalf of the sync loops
pub struct StatusPoller<S, C> {
    adapter: S,
    clock: C,
    status_ttl: Duration,
    session_ttl: Duration,
    state: Mutex<PollerState>,
}

impl<S: StatusAdapter, C: Clock> StatusPoller<S, C> {
    pub fn new(adapter: S, clock: C, config: &Config) -> Self {
        Self {
            adapter,
            clock,
            status_ttl: config.status_cache,
            session_ttl: config.session_cache,
            state: Mutex::new(PollerState {
                status: None,
                session: None,
                last_session: false,
                last_flag: Flag::Green,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fresh<T: Clone>(&self, cached: &Option<Cached<T>>, ttl: Duration) -> Option<T> {
        cached
            .as_ref()
            .filter(|c| self.clock.since(c.fetched_at) < ttl)
            .map(|c| c.value.clone())
    }

    /// Current track status; an empty feed means all clear
    pub async fn fetch_status(&self) -> Result<TrackStatus, PollError> {
        let cached = self.fresh(&self.lock().status, self.status_ttl);
        if let Some(status) = cached {
            return Ok(status);
        }

        // Stamp before the request so a slow fetch does not stretch the cadence
        let requested_at = self.clock.now();
        let records = self.adapter.track_status().await?;
        let status = TrackStatus::from(
            records
                .into_iter()
                .next()
                .unwrap_or_else(TrackStatusRecord::all_clear),
        );

        self.lock().status = Some(Cached {
            value: status.clone(),
            fetched_at: requested_at,
        });
        Ok(status)
    }

    /// Whether a session is live. Errors fall back to the last known answer.
    pub async fn fetch_session_active(&self) -> bool {
        let (cached, last) = {
            let state = self.lock();
            (self.fresh(&state.session, self.session_ttl), state.last_session)
        };
        if let Some(active) = cached {
            return active;
        }

        let requested_at = self.clock.now();
        match self.adapter.sessions().await {
            Ok(sessions) => {
                let active = !sessions.is_empty();
                let mut state = self.lock();
                state.session = Some(Cached {
                    value: active,
                    fetched_at: requested_at,
                });
                state.last_session = active;
                active
            }
            Err(e) => {
                tracing::warn!(error = %e, fallback = last, "session check failed");
                last
            }
        }
    }

    /// Fetch the status and report the flag only when it differs from the
    /// last one observed
    pub async fn poll_flag(&self) -> Result<Option<Flag>, PollError> {
        let status = self.fetch_status().await?;
        let mut state = self.lock();
        if status.flag == state.last_flag {
            return Ok(None);
        }
        tracing::info!(
            from = %state.last_flag,
            to = %status.flag,
            code = status.code.0,
            "track status changed"
        );
        state.last_flag = status.flag;
        Ok(Some(status.flag))
    }

    pub fn last_flag(&self) -> Flag {
        self.lock().last_flag
    }

    /// Last successfully observed session state
    pub fn last_session_active(&self) -> bool {
        self.lock().last_session
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
