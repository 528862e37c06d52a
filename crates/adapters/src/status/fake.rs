// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake status adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionInfo, StatusAdapter, StatusError, TrackStatusRecord};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeStatusState {
    records: Vec<TrackStatusRecord>,
    sessions: Vec<SessionInfo>,
    status_failures: VecDeque<StatusError>,
    session_failures: VecDeque<StatusError>,
    status_calls: usize,
    session_calls: usize,
}

/// Scriptable race status feed
#[derive(Clone, Default)]
pub struct FakeStatusAdapter {
    state: Arc<Mutex<FakeStatusState>>,
}

impl FakeStatusAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeStatusState) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Report a single record with the given code
    pub fn set_status(&self, code: i64) {
        self.set_records(vec![TrackStatusRecord::new(code)]);
    }

    pub fn set_records(&self, records: Vec<TrackStatusRecord>) {
        self.with_state(|s| s.records = records);
    }

    /// Report one live session, or none
    pub fn set_live(&self, live: bool) {
        self.with_state(|s| {
            s.sessions = if live {
                vec![SessionInfo {
                    session_key: Some(1),
                    session_name: Some("Race".to_string()),
                    date_start: None,
                }]
            } else {
                Vec::new()
            }
        });
    }

    /// Fail the next track status call
    pub fn fail_next_status(&self, error: StatusError) {
        self.with_state(|s| s.status_failures.push_back(error));
    }

    /// Fail the next session call
    pub fn fail_next_session(&self, error: StatusError) {
        self.with_state(|s| s.session_failures.push_back(error));
    }

    pub fn status_calls(&self) -> usize {
        self.with_state(|s| s.status_calls)
    }

    pub fn session_calls(&self) -> usize {
        self.with_state(|s| s.session_calls)
    }
}

#[async_trait]
impl StatusAdapter for FakeStatusAdapter {
    async fn track_status(&self) -> Result<Vec<TrackStatusRecord>, StatusError> {
        self.with_state(|s| {
            s.status_calls += 1;
            match s.status_failures.pop_front() {
                Some(err) => Err(err),
                None => Ok(s.records.clone()),
            }
        })
    }

    async fn sessions(&self) -> Result<Vec<SessionInfo>, StatusError> {
        self.with_state(|s| {
            s.session_calls += 1;
            match s.session_failures.pop_front() {
                Some(err) => Err(err),
                None => Ok(s.sessions.clone()),
            }
        })
    }
}
