// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LIFX token management

use super::Context;
use crate::error::RlError;
use crate::output::mask;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Save a LIFX personal access token
    Set {
        /// Token from cloud.lifx.com
        token: String,
    },
    /// Remove the saved token
    Clear,
    /// Show the saved token, masked
    Show,
}

pub fn handle(args: TokenArgs, ctx: &Context) -> Result<()> {
    match args.command {
        TokenCommand::Set { token } => {
            let token = token.trim().to_string();
            if token.is_empty() {
                return Err(RlError::new("Token must not be empty")
                    .with_suggestion("Create one at https://cloud.lifx.com/settings")
                    .into());
            }
            ctx.settings.update(|s| s.token = Some(token))?;
            println!("Token saved");
        }
        TokenCommand::Clear => {
            ctx.settings.clear_token()?;
            println!("Token cleared");
        }
        TokenCommand::Show => match ctx.load_settings()?.token() {
            Some(token) => println!("{}", mask(token)),
            None => println!("No token set"),
        },
    }
    Ok(())
}
