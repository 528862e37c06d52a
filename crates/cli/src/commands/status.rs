// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot race status check

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::{Context as _, Result};
use clap::Args;
use racelight_adapters::{OpenF1Adapter, TracedStatusAdapter};
use racelight_core::{Flag, SystemClock};
use racelight_engine::StatusPoller;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct StatusArgs {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct StatusReport {
    session_active: bool,
    flag: Flag,
    code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    delay_secs: f64,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = if self.session_active { "live" } else { "none" };
        writeln!(f, "Session: {}", session)?;
        write!(f, "Flag:    {} (code {})", self.flag, self.code)?;
        if let Some(message) = &self.message {
            write!(f, " {}", message)?;
        }
        writeln!(f)?;
        write!(f, "Delay:   {}s", self.delay_secs)
    }
}

pub async fn handle(args: StatusArgs, ctx: &Context) -> Result<()> {
    let settings = ctx.load_settings()?;
    let adapter = OpenF1Adapter::new(&ctx.config.openf1_url, ctx.config.status_timeout)?;
    let poller = StatusPoller::new(TracedStatusAdapter::new(adapter), SystemClock, &ctx.config);

    let session_active = poller.fetch_session_active().await;
    let status = poller
        .fetch_status()
        .await
        .context("fetching track status")?;

    let report = StatusReport {
        session_active,
        flag: status.flag,
        code: status.code.0,
        message: status.message,
        delay_secs: settings.delay_or(ctx.config.default_delay).as_secs_f64(),
    };
    output::print(&report, args.format);
    Ok(())
}
