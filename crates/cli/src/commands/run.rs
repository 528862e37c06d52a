// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground sync: follow race control and drive the lights

use super::Context;
use anyhow::Result;
use clap::Args;
use racelight_adapters::{
    LifxAdapter, LightsAdapter, NoOpLightsAdapter, OpenF1Adapter, TracedLightsAdapter,
    TracedStatusAdapter,
};
use racelight_core::{SystemClock, UuidIdGen};
use racelight_engine::{FlagSync, SyncDeps};
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[derive(Args)]
pub struct RunArgs {
    /// Follow the race without sending commands to the lights
    #[arg(long)]
    dry_run: bool,
}

pub async fn handle(args: RunArgs, ctx: &Context) -> Result<()> {
    if args.dry_run {
        info!("dry run: light commands will not be sent");
        run_sync(ctx, NoOpLightsAdapter::new()).await
    } else {
        let lights = LifxAdapter::new(&ctx.config.lifx_url, ctx.config.lights_timeout)?;
        run_sync(ctx, lights).await
    }
}

async fn run_sync<L: LightsAdapter>(ctx: &Context, lights: L) -> Result<()> {
    let status = OpenF1Adapter::new(&ctx.config.openf1_url, ctx.config.status_timeout)?;

    let sync = FlagSync::new(
        SyncDeps {
            status: TracedStatusAdapter::new(status),
            lights: TracedLightsAdapter::new(lights),
            clock: SystemClock,
            ids: UuidIdGen,
            settings: ctx.settings.clone(),
        },
        ctx.config.clone(),
    );

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    sync.start()?;
    if !sync.lights().is_connected() {
        warn!("no LIFX token saved; following the race without driving lights");
    }
    info!(config_dir = %ctx.dir.display(), "racelight running, press Ctrl-C to stop");

    let mut banner_check = tokio::time::interval(Duration::from_secs(1));
    let mut shown_error: Option<String> = None;

    loop {
        tokio::select! {
            _ = banner_check.tick() => {
                let current = sync.last_error();
                if current != shown_error {
                    match &current {
                        Some(message) => error!(%message, "sync error"),
                        None => info!("sync recovered"),
                    }
                    shown_error = current;
                }
            }

            // Reload settings on SIGHUP
            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading settings");
                if let Err(e) = sync.reload_settings() {
                    error!(error = %e, "failed to reload settings");
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    sync.shutdown().await;
    Ok(())
}
