// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! racelight-core: domain types for syncing smart lights with race control
//!
//! This crate provides:
//! - Clock and id abstractions for deterministic tests
//! - Semantic flags and the track status code mapping
//! - Light scenes (colors, steady states, pulse effects) per flag
//! - The delayed, coalescing action queue state machine
//! - Runtime configuration

pub mod clock;
pub mod config;
pub mod delay;
pub mod flag;
pub mod id;
pub mod light;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError};
pub use delay::{ActionCategory, DelayQueue, DelayedAction, DueAction, QueueOutcome};
pub use flag::{translate_status, Flag, ParseFlagError, StatusCode};
pub use id::{ActionId, IdGen, SequentialIdGen, UuidIdGen};
pub use light::{Hsbk, LightState, Power, PulseEffect, Scene, Selector};
