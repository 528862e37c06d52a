// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Show a flag on the lights right away

use super::Context;
use crate::error::RlError;
use anyhow::Result;
use clap::Args;
use racelight_core::Flag;

#[derive(Args)]
pub struct FlagArgs {
    /// green, yellow, red, safety or checkered
    pub flag: Flag,
}

/// Apply a flag now, skipping the broadcast delay
pub async fn handle(args: FlagArgs, ctx: &Context) -> Result<()> {
    let settings = ctx.load_settings()?;
    let selector = settings.selector();
    if selector.is_empty() {
        return Err(RlError::no_devices().into());
    }

    let controller = ctx.light_controller(&settings)?;
    controller
        .apply_flag(&selector, args.flag)
        .await
        .map_err(|e| ctx.lights_failed(e))?;

    println!("Showing {} flag on {}", args.flag, selector);
    Ok(())
}
