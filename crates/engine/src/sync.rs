// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flag sync: wires the poller, the delay service and the lights together
//!
//! Three independent loops run until shutdown: session liveness, track
//! status (only while a session is live) and a device health refresh.
//! Status changes are queued on the delay service so the lights follow the
//! broadcast rather than the live feed.

use crate::delay::{DelayService, LogErrorSink};
use crate::error::SinkError;
use crate::lights::LightController;
use crate::poller::StatusPoller;
use racelight_adapters::{LightInfo, LightsAdapter, StatusAdapter};
use racelight_core::{ActionCategory, ActionId, Clock, Config, Flag, IdGen, Selector};
use racelight_storage::{Settings, SettingsError, SettingsStore};
use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Adapter and store dependencies
pub struct SyncDeps<S, L, C, I> {
    pub status: S,
    pub lights: L,
    pub clock: C,
    pub ids: I,
    pub settings: SettingsStore,
}

/// Most recent failure per source; cleared by the next success from the
/// same source
#[derive(Default)]
struct Banner {
    poll: Option<String>,
    lights: Option<String>,
}

struct Reporter {
    banner: Mutex<Banner>,
    settings: SettingsStore,
}

impl Reporter {
    fn lights_result<T>(&self, result: &Result<T, SinkError>) {
        let message = match result {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        };
        locked(&self.banner).lights = message;

        if let Err(SinkError::InvalidToken) = result {
            if let Err(e) = self.settings.clear_token() {
                tracing::error!(error = %e, "failed to clear rejected token");
            }
        }
    }

    fn poll_result(&self, message: Option<String>) {
        locked(&self.banner).poll = message;
    }

    fn last_error(&self) -> Option<String> {
        let banner = locked(&self.banner);
        banner.lights.clone().or_else(|| banner.poll.clone())
    }
}

struct Inner<S, L, C: Clock, I: IdGen> {
    config: Config,
    delay: DelayService<C, I>,
    poller: StatusPoller<S, C>,
    lights: Arc<LightController<L>>,
    reporter: Arc<Reporter>,
    selector: Mutex<Selector>,
    devices: Mutex<Vec<LightInfo>>,
    session_active: AtomicBool,
    /// Flag as of the broadcast, after the delay
    shown: Arc<Mutex<Flag>>,
}

impl<S, L, C, I> Inner<S, L, C, I>
where
    S: StatusAdapter,
    L: LightsAdapter,
    C: Clock,
    I: IdGen,
{
    fn apply_settings(&self, settings: &Settings) {
        self.delay
            .set_delay(settings.delay_or(self.config.default_delay));
        *locked(&self.selector) = settings.selector();

        match settings.token() {
            Some(token) => {
                if let Err(e) = self.lights.initialize(token) {
                    tracing::warn!(error = %e, "stored token rejected");
                }
            }
            None => self.lights.disconnect(),
        }
    }

    async fn check_session(&self) {
        let active = self.poller.fetch_session_active().await;
        let was = self.session_active.swap(active, Ordering::SeqCst);
        if active != was {
            tracing::info!(active, "session state changed");
        }
    }

    async fn check_status(&self) {
        if !self.session_active.load(Ordering::SeqCst) {
            return;
        }
        match self.poller.poll_flag().await {
            Ok(change) => {
                self.reporter.poll_result(None);
                if let Some(flag) = change {
                    self.on_flag_change(flag);
                }
            }
            Err(e) => {
                // The feed throttles bursts; the next tick retries
                if e.is_rate_limited() {
                    tracing::debug!(error = %e, "track status poll rate limited");
                } else {
                    tracing::warn!(error = %e, "track status poll failed");
                }
                self.reporter.poll_result(Some(e.to_string()));
            }
        }
    }

    fn on_flag_change(&self, flag: Flag) {
        let shown = Arc::clone(&self.shown);
        self.delay
            .queue_action(ActionCategory::Status, move || async move {
                *locked(&shown) = flag;
                tracing::info!(%flag, "broadcast flag");
                Ok::<(), Infallible>(())
            });

        self.queue_flag(flag);
    }

    fn queue_flag(&self, flag: Flag) -> Option<ActionId> {
        if !self.lights.is_connected() {
            tracing::debug!(%flag, "lights not connected, not queueing");
            return None;
        }
        let selector = locked(&self.selector).clone();
        if selector.is_empty() {
            tracing::debug!(%flag, "no lights selected, not queueing");
            return None;
        }

        let lights = Arc::clone(&self.lights);
        let reporter = Arc::clone(&self.reporter);
        let id = self
            .delay
            .queue_action(ActionCategory::Flag, move || async move {
                let result = lights.apply_flag(&selector, flag).await;
                reporter.lights_result(&result);
                result
            });
        Some(id)
    }

    async fn refresh_devices(&self) {
        if !self.lights.is_connected() {
            return;
        }
        let result = self.lights.list_lights().await;
        self.reporter.lights_result(&result);

        match result {
            Ok(devices) => {
                let selector = locked(&self.selector).clone();
                let selected: Vec<&str> = selector.as_str().split(',').collect();
                for device in &devices {
                    if selected.contains(&device.id.as_str()) && !device.connected {
                        tracing::warn!(device = %device.id, label = %device.label, "selected light offline");
                    }
                }
                *locked(&self.devices) = devices;
            }
            Err(e) => tracing::warn!(error = %e, "device refresh failed"),
        }
    }
}

/// Running sync between race control and the lights
pub struct FlagSync<S, L, C: Clock, I: IdGen> {
    inner: Arc<Inner<S, L, C, I>>,
    settings: SettingsStore,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S, L, C, I> FlagSync<S, L, C, I>
where
    S: StatusAdapter,
    L: LightsAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(deps: SyncDeps<S, L, C, I>, config: Config) -> Self {
        let (shutdown, _) = watch::channel(false);
        let inner = Inner {
            delay: DelayService::from_config(&config, deps.clock.clone(), deps.ids),
            poller: StatusPoller::new(deps.status, deps.clock, &config),
            lights: Arc::new(LightController::new(deps.lights, &config)),
            reporter: Arc::new(Reporter {
                banner: Mutex::new(Banner::default()),
                settings: deps.settings.clone(),
            }),
            selector: Mutex::new(Selector::default()),
            devices: Mutex::new(Vec::new()),
            session_active: AtomicBool::new(false),
            shown: Arc::new(Mutex::new(Flag::Green)),
            config,
        };

        Self {
            inner: Arc::new(inner),
            settings: deps.settings,
            shutdown,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Load settings and start every loop on the current runtime.
    /// A second call while running is a no-op.
    pub fn start(&self) -> Result<(), SettingsError> {
        if self.is_running() {
            tracing::debug!("flag sync already running");
            return Ok(());
        }
        let settings = self.settings.load()?;
        self.inner.apply_settings(&settings);

        let config = &self.inner.config;
        self.inner.delay.start(config, LogErrorSink);

        self.spawn_every("session", config.session_interval, |inner| async move {
            inner.check_session().await
        });
        self.spawn_every("status", config.status_interval, |inner| async move {
            inner.check_status().await
        });
        self.spawn_every("devices", config.device_interval, |inner| async move {
            inner.refresh_devices().await
        });

        tracing::info!(
            delay_ms = self.inner.delay.delay().as_millis() as u64,
            connected = self.inner.lights.is_connected(),
            selector = %self.selector(),
            "flag sync started"
        );
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !locked(&self.tasks).is_empty()
    }

    fn spawn_every<F, Fut>(&self, name: &'static str, period: Duration, tick: F)
    where
        F: Fn(Arc<Inner<S, L, C, I>>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let mut shutdown = self.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => tick(Arc::clone(&inner)).await,
                    _ = shutdown.changed() => break,
                }
            }
            tracing::debug!(task = name, "sync loop stopped");
        });
        locked(&self.tasks).push(handle);
    }

    /// Re-read settings: delay, selection and token take effect immediately
    pub fn reload_settings(&self) -> Result<(), SettingsError> {
        let settings = self.settings.load()?;
        self.inner.apply_settings(&settings);
        tracing::info!(
            delay_ms = self.inner.delay.delay().as_millis() as u64,
            selector = %self.selector(),
            connected = self.inner.lights.is_connected(),
            "settings reloaded"
        );
        Ok(())
    }

    /// Stop all loops, wait for them, and drop anything still pending
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let tasks: Vec<_> = locked(&self.tasks).drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "sync loop ended abnormally");
            }
        }
        self.inner.delay.shutdown().await;
        self.inner.delay.clear_pending_actions();
        tracing::info!("flag sync stopped");
    }

    /// One session liveness check
    pub async fn check_session(&self) {
        self.inner.check_session().await
    }

    /// One status poll; queues actions on a flag change
    pub async fn check_status(&self) {
        self.inner.check_status().await
    }

    /// One device list refresh
    pub async fn refresh_devices(&self) {
        self.inner.refresh_devices().await
    }

    pub fn delay(&self) -> &DelayService<C, I> {
        &self.inner.delay
    }

    pub fn poller(&self) -> &StatusPoller<S, C> {
        &self.inner.poller
    }

    pub fn lights(&self) -> &LightController<L> {
        &self.inner.lights
    }

    pub fn selector(&self) -> Selector {
        locked(&self.inner.selector).clone()
    }

    pub fn devices(&self) -> Vec<LightInfo> {
        locked(&self.inner.devices).clone()
    }

    pub fn session_active(&self) -> bool {
        self.inner.session_active.load(Ordering::SeqCst)
    }

    /// The flag the broadcast is currently showing
    pub fn shown_flag(&self) -> Flag {
        *locked(&self.inner.shown)
    }

    /// Error to surface until a later success clears it
    pub fn last_error(&self) -> Option<String> {
        self.inner.reporter.last_error()
    }
}

impl<S, L, C: Clock, I: IdGen> Drop for FlagSync<S, L, C, I> {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(|e| e.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
