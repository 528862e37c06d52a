// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! racelight runtime: delayed actions, status polling and light control

mod delay;
mod error;
mod lights;
mod poller;
mod sync;

pub use delay::{DelayService, Effect, EffectError, ErrorSink, LogErrorSink};
pub use error::{PollError, SinkError};
pub use lights::LightController;
pub use poller::{StatusPoller, TrackStatus};
pub use sync::{FlagSync, SyncDeps};
