// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delayed, coalescing action queue
//!
//! Holds deferred work until a process-wide delay has elapsed since it was
//! queued. Each category holds at most one pending action: queueing again
//! replaces the pending one, whose effect is dropped and never returned.
//!
//! The queue is a pure state machine. Callers pass the current time in and
//! receive due effects out; running them is the caller's job.

use crate::id::ActionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Coalescing key for queued actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    /// Light changes driven by the race flag
    Flag,
    /// Session status changes
    Status,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Flag => write!(f, "flag"),
            ActionCategory::Status => write!(f, "status"),
        }
    }
}

/// Metadata for a unit of deferred work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedAction {
    pub id: ActionId,
    pub category: ActionCategory,
    pub enqueued_at: Instant,
    /// Set once by the queue when the action comes due; never cleared
    pub executed: bool,
}

/// An action that came due, with the effect to run
#[derive(Debug)]
pub struct DueAction<E> {
    pub action: DelayedAction,
    pub effect: E,
}

/// Result of queueing an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued { id: ActionId },
    /// A pending action in the same category was dropped unexecuted
    Replaced { id: ActionId, replaced: ActionId },
}

impl QueueOutcome {
    pub fn id(&self) -> &ActionId {
        match self {
            QueueOutcome::Queued { id } | QueueOutcome::Replaced { id, .. } => id,
        }
    }
}

#[derive(Debug)]
struct Entry<E> {
    action: DelayedAction,
    /// Taken when the action fires
    effect: Option<E>,
}

/// Pending and recently executed actions, in insertion order
#[derive(Debug)]
pub struct DelayQueue<E> {
    delay: Duration,
    retention: Duration,
    entries: Vec<Entry<E>>,
}

impl<E> DelayQueue<E> {
    pub fn new(delay: Duration, retention: Duration) -> Self {
        Self {
            delay,
            retention,
            entries: Vec::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. Applies to every pending action, not only new ones.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    #[cfg(test)]
    pub(crate) fn retention(&self) -> Duration {
        self.retention
    }

    /// Queue an effect, replacing any pending action in the same category
    pub fn queue(
        &mut self,
        id: ActionId,
        category: ActionCategory,
        effect: E,
        now: Instant,
    ) -> QueueOutcome {
        let replaced = self
            .entries
            .iter()
            .position(|e| !e.action.executed && e.action.category == category)
            .map(|idx| self.entries.remove(idx).action.id);

        self.entries.push(Entry {
            action: DelayedAction {
                id: id.clone(),
                category,
                enqueued_at: now,
                executed: false,
            },
            effect: Some(effect),
        });

        match replaced {
            Some(replaced) => QueueOutcome::Replaced { id, replaced },
            None => QueueOutcome::Queued { id },
        }
    }

    /// When the action may fire under the current delay
    #[cfg(test)]
    pub(crate) fn deadline(&self, action: &DelayedAction) -> Option<Instant> {
        action.enqueued_at.checked_add(self.delay)
    }

    /// Whether a pending action may fire at `now`
    #[cfg(test)]
    pub(crate) fn is_due(&self, action: &DelayedAction, now: Instant) -> bool {
        !action.executed && self.deadline(action).is_some_and(|deadline| now >= deadline)
    }

    /// Time left before a pending action fires
    #[cfg(test)]
    pub(crate) fn remaining(&self, action: &DelayedAction, now: Instant) -> Duration {
        match self.deadline(action) {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::MAX,
        }
    }

    /// One evaluation pass: mark due actions executed, hand back their
    /// effects, then purge executed actions past the retention window.
    pub fn take_due(&mut self, now: Instant) -> Vec<DueAction<E>> {
        let delay = self.delay;
        let mut due = Vec::new();

        for entry in &mut self.entries {
            if entry.action.executed {
                continue;
            }
            let ready = entry
                .action
                .enqueued_at
                .checked_add(delay)
                .is_some_and(|deadline| now >= deadline);
            if !ready {
                continue;
            }
            entry.action.executed = true;
            if let Some(effect) = entry.effect.take() {
                due.push(DueAction {
                    action: entry.action.clone(),
                    effect,
                });
            }
        }

        self.purge(now);
        due
    }

    /// Drop executed actions at least `retention` old. Returns how many went.
    pub fn purge(&mut self, now: Instant) -> usize {
        let retention = self.retention;
        let before = self.entries.len();
        self.entries.retain(|e| {
            !e.action.executed || now.saturating_duration_since(e.action.enqueued_at) < retention
        });
        before - self.entries.len()
    }

    /// Snapshot of actions that have not fired
    pub fn pending(&self) -> Vec<DelayedAction> {
        self.entries
            .iter()
            .filter(|e| !e.action.executed)
            .map(|e| e.action.clone())
            .collect()
    }

    /// The pending action for a category, if any
    #[cfg(test)]
    pub(crate) fn pending_for(&self, category: ActionCategory) -> Option<&DelayedAction> {
        self.entries
            .iter()
            .map(|e| &e.action)
            .find(|a| !a.executed && a.category == category)
    }

    /// Snapshot of every retained action, executed or not
    pub fn actions(&self) -> Vec<DelayedAction> {
        self.entries.iter().map(|e| e.action.clone()).collect()
    }

    /// Earliest deadline among pending actions
    #[cfg(test)]
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|e| !e.action.executed)
            .filter_map(|e| self.deadline(&e.action))
            .min()
    }

    /// Drop everything; pending effects are discarded without running
    pub fn clear(&mut self) -> usize {
        let pending = self.entries.iter().filter(|e| !e.action.executed).count();
        self.entries.clear();
        pending
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
