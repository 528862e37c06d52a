// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delay service: runs the delay queue against real time
//!
//! The queue itself lives in core and knows nothing about tokio. This module
//! shares it behind a mutex, evaluates it on a fixed tick, and spawns due
//! effects as detached tasks so a slow effect never stalls the loop.

use racelight_core::{
    ActionCategory, ActionId, Clock, Config, DelayQueue, DelayedAction, DueAction, IdGen,
    QueueOutcome,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Failure reported by an effect
pub type EffectError = Box<dyn std::error::Error + Send + Sync>;

type EffectFuture = Pin<Box<dyn Future<Output = Result<(), EffectError>> + Send>>;

/// Deferred work held by the queue; runs at most once
pub struct Effect(Box<dyn FnOnce() -> EffectFuture + Send>);

impl Effect {
    pub fn new<F, Fut, E>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<EffectError>,
    {
        Effect(Box::new(move || -> EffectFuture {
            Box::pin(async move { f().await.map_err(Into::into) })
        }))
    }

    fn run(self) -> EffectFuture {
        (self.0)()
    }
}

/// Receives failures from executed effects
pub trait ErrorSink: Send + Sync + 'static {
    fn report(&self, action: &DelayedAction, error: &EffectError);
}

impl<F> ErrorSink for F
where
    F: Fn(&DelayedAction, &EffectError) + Send + Sync + 'static,
{
    fn report(&self, action: &DelayedAction, error: &EffectError) {
        self(action, error)
    }
}

/// Default sink: log and move on
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, action: &DelayedAction, error: &EffectError) {
        tracing::error!(
            action_id = %action.id,
            category = %action.category,
            error = %error,
            "delayed action failed"
        );
    }
}

struct Shared<C, I> {
    queue: Mutex<DelayQueue<Effect>>,
    clock: C,
    ids: I,
    sink: Mutex<Arc<dyn ErrorSink>>,
    handle: Mutex<Option<Handle>>,
}

impl<C: Clock, I: IdGen> Shared<C, I> {
    fn lock(&self) -> std::sync::MutexGuard<'_, DelayQueue<Effect>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spawner(&self) -> Option<Handle> {
        Handle::try_current().ok().or_else(|| {
            self.handle
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        })
    }

    fn process_due(&self) -> usize {
        // Without a runtime nothing could run the effects, so leave them queued
        let Some(handle) = self.spawner() else {
            tracing::debug!("no runtime available, skipping delay pass");
            return 0;
        };

        let due = {
            let mut queue = self.lock();
            let now = self.clock.now();
            queue.take_due(now)
        };

        let count = due.len();
        for DueAction { action, effect } in due {
            let sink = Arc::clone(&self.sink.lock().unwrap_or_else(|e| e.into_inner()));
            tracing::info!(
                action_id = %action.id,
                category = %action.category,
                "executing delayed action"
            );
            handle.spawn(async move {
                if let Err(e) = effect.run().await {
                    sink.report(&action, &e);
                }
            });
        }
        count
    }
}

struct TickTask {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Holds actions for the broadcast delay, then fires them
pub struct DelayService<C: Clock, I: IdGen> {
    shared: Arc<Shared<C, I>>,
    task: Mutex<Option<TickTask>>,
}

impl<C: Clock, I: IdGen> DelayService<C, I> {
    pub fn new(delay: Duration, retention: Duration, clock: C, ids: I) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(DelayQueue::new(delay, retention)),
                clock,
                ids,
                sink: Mutex::new(Arc::new(LogErrorSink)),
                handle: Mutex::new(None),
            }),
            task: Mutex::new(None),
        }
    }

    /// Service using the configured default delay and retention window
    pub fn from_config(config: &Config, clock: C, ids: I) -> Self {
        Self::new(config.default_delay, config.retention, clock, ids)
    }

    pub fn delay(&self) -> Duration {
        self.shared.lock().delay()
    }

    /// Change the delay for every pending action, then evaluate immediately
    pub fn set_delay(&self, delay: Duration) {
        let previous = {
            let mut queue = self.shared.lock();
            let previous = queue.delay();
            queue.set_delay(delay);
            previous
        };
        tracing::info!(
            delay_ms = delay.as_millis() as u64,
            previous_ms = previous.as_millis() as u64,
            "broadcast delay changed"
        );
        self.shared.process_due();
    }

    /// Queue an effect, replacing any pending action in the same category.
    ///
    /// The replaced effect is dropped without running. The new effect never
    /// runs synchronously, even with a zero delay.
    pub fn queue_action<F, Fut, E>(&self, category: ActionCategory, effect: F) -> ActionId
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<EffectError>,
    {
        let id = self.shared.ids.next();
        let outcome = {
            let mut queue = self.shared.lock();
            let now = self.shared.clock.now();
            queue.queue(id, category, Effect::new(effect), now)
        };

        match &outcome {
            QueueOutcome::Queued { id } => {
                tracing::debug!(action_id = %id, %category, "action queued")
            }
            QueueOutcome::Replaced { id, replaced } => tracing::debug!(
                action_id = %id,
                replaced = %replaced,
                %category,
                "action replaced"
            ),
        }
        outcome.id().clone()
    }

    /// Actions that have not fired, in queue order
    pub fn pending_actions(&self) -> Vec<DelayedAction> {
        self.shared.lock().pending()
    }

    /// Every retained action, including recently executed ones
    pub fn actions(&self) -> Vec<DelayedAction> {
        self.shared.lock().actions()
    }

    /// Drop all actions; pending effects never run
    pub fn clear_pending_actions(&self) {
        let dropped = self.shared.lock().clear();
        if dropped > 0 {
            tracing::info!(dropped, "pending actions cleared");
        }
    }

    /// Run one evaluation pass. Returns how many effects were spawned.
    pub fn process_due(&self) -> usize {
        self.shared.process_due()
    }

    /// Start the tick loop on the current runtime
    pub fn start(&self, config: &Config, sink: impl ErrorSink) {
        *self.shared.sink.lock().unwrap_or_else(|e| e.into_inner()) = Arc::new(sink);
        *self.shared.handle.lock().unwrap_or_else(|e| e.into_inner()) = Handle::try_current().ok();

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.is_some() {
            tracing::warn!("delay tick loop already running");
            return;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);
        let tick = config.tick_interval;

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::debug!(tick_ms = tick.as_millis() as u64, "delay tick loop started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        shared.process_due();
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::debug!("delay tick loop stopped");
        });

        *task = Some(TickTask { shutdown, join });
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Stop the tick loop and wait for it to exit
    pub async fn shutdown(&self) {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(TickTask { shutdown, join }) = task {
            let _ = shutdown.send(true);
            if let Err(e) = join.await {
                tracing::warn!(error = %e, "delay tick loop ended abnormally");
            }
        }
    }
}

impl<C: Clock, I: IdGen> Drop for DelayService<C, I> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            task.join.abort();
        }
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
