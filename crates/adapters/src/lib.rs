// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the race status feed and the lights API

pub mod lights;
pub mod status;
pub mod traced;

pub use lights::{LifxAdapter, LightInfo, LightsAdapter, LightsError, NoOpLightsAdapter};
pub use status::{OpenF1Adapter, SessionInfo, StatusAdapter, StatusError, TrackStatusRecord};
pub use traced::{TracedLightsAdapter, TracedStatusAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use lights::{FakeLightsAdapter, LightsCall};
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusAdapter;

/// User-Agent sent with every outbound request
pub const USER_AGENT: &str = concat!("racelight/", env!("CARGO_PKG_VERSION"));
