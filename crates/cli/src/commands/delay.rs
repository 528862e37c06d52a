// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broadcast delay settings

use super::Context;
use crate::error::RlError;
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

/// Longest delay accepted, in seconds
pub const MAX_DELAY_SECS: f64 = 60.0;

#[derive(Args)]
pub struct DelayArgs {
    #[command(subcommand)]
    pub command: DelayCommand,
}

#[derive(Subcommand)]
pub enum DelayCommand {
    /// Set the delay in seconds (0-60)
    Set {
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },
    /// Use a typical delay for how you watch
    Preset {
        #[arg(value_enum)]
        preset: Preset,
    },
    /// Show the current delay
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    /// Cable or satellite TV
    Cable,
    /// Streaming services
    Streaming,
    /// F1 TV
    F1tv,
}

impl Preset {
    pub fn seconds(self) -> f64 {
        match self {
            Preset::Cable => 5.0,
            Preset::Streaming => 20.0,
            Preset::F1tv => 30.0,
        }
    }
}

/// Validate a delay from the command line
pub fn validate(seconds: f64) -> Result<f64, RlError> {
    if seconds.is_finite() && (0.0..=MAX_DELAY_SECS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(RlError::delay_out_of_range(seconds))
    }
}

pub fn handle(args: DelayArgs, ctx: &Context) -> Result<()> {
    let seconds = match args.command {
        DelayCommand::Set { seconds } => validate(seconds)?,
        DelayCommand::Preset { preset } => preset.seconds(),
        DelayCommand::Show => {
            let settings = ctx.load_settings()?;
            let delay = settings.delay_or(ctx.config.default_delay);
            match settings.broadcast_delay {
                Some(_) => println!("Broadcast delay: {}s", delay.as_secs_f64()),
                None => println!("Broadcast delay: {}s (default)", delay.as_secs_f64()),
            }
            return Ok(());
        }
    };

    ctx.settings.update(|s| s.broadcast_delay = Some(seconds))?;
    println!("Broadcast delay set to {}s", seconds);
    Ok(())
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
