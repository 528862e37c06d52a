// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use racelight_core::{FakeClock, SequentialIdGen};
use tokio::sync::mpsc;

type Service = DelayService<FakeClock, SequentialIdGen>;

fn service(delay_secs: u64) -> (Service, FakeClock) {
    let clock = FakeClock::new();
    let service = DelayService::new(
        Duration::from_secs(delay_secs),
        Duration::from_secs(60),
        clock.clone(),
        SequentialIdGen::default(),
    );
    (service, clock)
}

/// Queue an effect that reports `label` when it runs
fn queue(
    service: &Service,
    category: ActionCategory,
    label: &'static str,
    tx: &mpsc::UnboundedSender<&'static str>,
) -> ActionId {
    let tx = tx.clone();
    service.queue_action(category, move || async move {
        let _ = tx.send(label);
        Ok::<(), EffectError>(())
    })
}

/// Let spawned effects run to completion
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<&'static str>) -> Vec<&'static str> {
    let mut out = Vec::new();
    while let Ok(label) = rx.try_recv() {
        out.push(label);
    }
    out
}

#[tokio::test]
async fn action_waits_for_the_full_delay() {
    let (service, clock) = service(5);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "red", &tx);

    clock.advance_millis(4_999);
    assert_eq!(service.process_due(), 0);
    settle().await;
    assert!(drain(&mut rx).is_empty());

    clock.advance_millis(1);
    assert_eq!(service.process_due(), 1);
    settle().await;
    assert_eq!(drain(&mut rx), vec!["red"]);
}

#[tokio::test]
async fn same_category_coalesces_to_latest() {
    let (service, clock) = service(5);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let first = queue(&service, ActionCategory::Flag, "yellow", &tx);
    clock.advance_secs(1);
    let second = queue(&service, ActionCategory::Flag, "red", &tx);

    let pending = service.pending_actions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second);
    assert_ne!(first, second);

    clock.advance_secs(10);
    service.process_due();
    settle().await;
    assert_eq!(drain(&mut rx), vec!["red"]);
}

#[tokio::test]
async fn categories_fire_independently() {
    let (service, clock) = service(5);
    let (tx, mut rx) = mpsc::unbounded_channel();

    queue(&service, ActionCategory::Flag, "flag", &tx);
    queue(&service, ActionCategory::Status, "status", &tx);
    assert_eq!(service.pending_actions().len(), 2);

    clock.advance_secs(5);
    assert_eq!(service.process_due(), 2);
    settle().await;

    let mut fired = drain(&mut rx);
    fired.sort();
    assert_eq!(fired, vec!["flag", "status"]);
}

#[tokio::test]
async fn longer_delay_applies_to_pending_actions() {
    let (service, clock) = service(5);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "red", &tx);

    clock.advance_secs(3);
    service.set_delay(Duration::from_secs(30));
    assert_eq!(service.delay(), Duration::from_secs(30));

    clock.advance_secs(2);
    assert_eq!(service.process_due(), 0);

    clock.advance_secs(24);
    assert_eq!(service.process_due(), 0);

    clock.advance_secs(1);
    assert_eq!(service.process_due(), 1);
    settle().await;
    assert_eq!(drain(&mut rx), vec!["red"]);
}

#[tokio::test]
async fn shorter_delay_fires_without_waiting_for_a_tick() {
    let (service, clock) = service(30);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "safety", &tx);

    clock.advance_secs(10);
    service.set_delay(Duration::from_secs(5));
    settle().await;

    assert_eq!(drain(&mut rx), vec!["safety"]);
    assert!(service.pending_actions().is_empty());
}

#[tokio::test]
async fn reduced_delay_still_honors_remaining_time() {
    let (service, clock) = service(30);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "safety", &tx);

    clock.advance_secs(2);
    service.set_delay(Duration::from_secs(5));
    settle().await;
    assert!(drain(&mut rx).is_empty());

    clock.advance_secs(3);
    service.process_due();
    settle().await;
    assert_eq!(drain(&mut rx), vec!["safety"]);
}

#[tokio::test]
async fn zero_delay_never_runs_inline() {
    let (service, _clock) = service(0);
    let (tx, mut rx) = mpsc::unbounded_channel();

    queue(&service, ActionCategory::Flag, "green", &tx);
    assert!(rx.try_recv().is_err());

    service.process_due();
    settle().await;
    assert_eq!(drain(&mut rx), vec!["green"]);
}

#[tokio::test]
async fn cleared_actions_never_fire() {
    let (service, clock) = service(5);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "red", &tx);
    queue(&service, ActionCategory::Status, "status", &tx);

    service.clear_pending_actions();
    assert!(service.pending_actions().is_empty());
    assert!(service.actions().is_empty());

    clock.advance_secs(10);
    assert_eq!(service.process_due(), 0);
    settle().await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn executed_actions_are_retained_then_purged() {
    let (service, clock) = service(5);
    let (tx, _rx) = mpsc::unbounded_channel();
    let id = queue(&service, ActionCategory::Flag, "red", &tx);

    clock.advance_secs(5);
    service.process_due();

    assert!(service.pending_actions().is_empty());
    let actions = service.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id, id);
    assert!(actions[0].executed);

    // Retention is measured from enqueue time
    clock.advance_secs(54);
    service.process_due();
    assert_eq!(service.actions().len(), 1);

    clock.advance_secs(1);
    service.process_due();
    assert!(service.actions().is_empty());
}

#[tokio::test]
async fn executed_action_runs_only_once() {
    let (service, clock) = service(1);
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&service, ActionCategory::Flag, "red", &tx);

    clock.advance_secs(1);
    assert_eq!(service.process_due(), 1);
    clock.advance_secs(1);
    assert_eq!(service.process_due(), 0);
    settle().await;
    assert_eq!(drain(&mut rx), vec!["red"]);
}

#[tokio::test]
async fn tick_loop_fires_and_reports_failures() {
    let (service, clock) = service(5);
    let failures: Arc<Mutex<Vec<(ActionId, String)>>> = Arc::default();
    let recorded = Arc::clone(&failures);

    service.start(
        &Config::for_testing(),
        move |action: &DelayedAction, error: &EffectError| {
            recorded
                .lock()
                .unwrap()
                .push((action.id.clone(), error.to_string()));
        },
    );
    assert!(service.is_running());

    let id = service.queue_action(ActionCategory::Flag, || async {
        Err::<(), EffectError>("lights unreachable".into())
    });

    clock.advance_secs(5);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let failures = failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(id, "lights unreachable".to_string())]);
    assert!(service.pending_actions().is_empty());

    service.shutdown().await;
    assert!(!service.is_running());
}

#[tokio::test]
async fn failing_effect_does_not_stop_the_loop() {
    let (service, clock) = service(1);
    let (tx, mut rx) = mpsc::unbounded_channel();
    service.start(&Config::for_testing(), |_: &DelayedAction, _: &EffectError| {});

    service.queue_action(ActionCategory::Status, || async {
        Err::<(), EffectError>("boom".into())
    });
    queue(&service, ActionCategory::Flag, "green", &tx);

    clock.advance_secs(1);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(drain(&mut rx), vec!["green"]);
    service.shutdown().await;
}

#[tokio::test]
async fn nothing_fires_after_shutdown() {
    let (service, clock) = service(1);
    let (tx, mut rx) = mpsc::unbounded_channel();
    service.start(&Config::for_testing(), LogErrorSink);
    service.shutdown().await;

    queue(&service, ActionCategory::Flag, "red", &tx);
    clock.advance_secs(2);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(drain(&mut rx).is_empty());
    assert_eq!(service.pending_actions().len(), 1);
}

#[test]
fn pass_without_runtime_leaves_actions_queued() {
    let (service, clock) = service(0);
    service.queue_action(ActionCategory::Flag, || async { Ok::<(), EffectError>(()) });

    clock.advance_secs(1);
    assert_eq!(service.process_due(), 0);
    assert_eq!(service.pending_actions().len(), 1);
}
