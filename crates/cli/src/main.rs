// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! racelight - race control flags on your smart lights

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{delay, devices, flag, run, status, token, Context};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::RlError;

#[derive(Parser)]
#[command(
    name = "racelight",
    version,
    about = "racelight - Mirror race control flags on LIFX lights"
)]
struct Cli {
    /// Directory holding settings.json and racelight.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the race and drive the lights until interrupted
    Run(run::RunArgs),
    /// Show session and track status
    Status(status::StatusArgs),
    /// Manage the LIFX API token
    Token(token::TokenArgs),
    /// Choose which lights show flags
    Devices(devices::DevicesArgs),
    /// Configure the broadcast delay
    Delay(delay::DelayArgs),
    /// Show a flag on the lights now
    Flag(flag::FlagArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<RlError>() {
                Some(err) => eprint!("{}", err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Only the long-running command logs at info by default
    let level = match cli.command {
        Commands::Run(_) => "info",
        _ => "warn",
    };
    let _log_guard = logging::setup(level, cli.log_file.as_deref())?;

    let ctx = Context::load(commands::config_dir(cli.config_dir)?)?;

    match cli.command {
        Commands::Run(args) => run::handle(args, &ctx).await,
        Commands::Status(args) => status::handle(args, &ctx).await,
        Commands::Token(args) => token::handle(args, &ctx),
        Commands::Devices(args) => devices::handle(args, &ctx).await,
        Commands::Delay(args) => delay::handle(args, &ctx),
        Commands::Flag(args) => flag::handle(args, &ctx).await,
    }
}
