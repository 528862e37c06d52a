// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Light selection

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Subcommand)]
pub enum DevicesCommand {
    /// List lights on the LIFX account
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Add lights to the selection
    Select {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove lights from the selection
    Deselect {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Deselect every light
    Clear,
    /// Show the selected lights
    Show,
}

pub async fn handle(args: DevicesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DevicesCommand::List { format } => {
            let settings = ctx.load_settings()?;
            let controller = ctx.light_controller(&settings)?;
            let lights = controller
                .list_lights()
                .await
                .map_err(|e| ctx.lights_failed(e))?;
            output::print_list(&lights, format, "No lights found");
        }
        DevicesCommand::Select { ids } => {
            let settings = ctx.settings.update(|s| {
                s.selected_devices
                    .extend(ids.iter().map(|id| id.trim().to_string()).filter(|id| !id.is_empty()))
            })?;
            println!("Selected: {}", settings.selector());
        }
        DevicesCommand::Deselect { ids } => {
            let settings = ctx.settings.update(|s| {
                for id in &ids {
                    s.selected_devices.remove(id.trim());
                }
            })?;
            show(&settings);
        }
        DevicesCommand::Clear => {
            ctx.settings.update(|s| s.selected_devices.clear())?;
            println!("No lights selected");
        }
        DevicesCommand::Show => show(&ctx.load_settings()?),
    }
    Ok(())
}

fn show(settings: &racelight_storage::Settings) {
    if settings.selected_devices.is_empty() {
        println!("No lights selected");
    } else {
        for id in &settings.selected_devices {
            println!("{}", id);
        }
    }
}
