// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::id::{IdGen, SequentialIdGen};

const RETENTION: Duration = Duration::from_secs(60);

fn make_queue(delay_secs: u64) -> DelayQueue<&'static str> {
    DelayQueue::new(Duration::from_secs(delay_secs), RETENTION)
}

fn fired(due: Vec<DueAction<&'static str>>) -> Vec<&'static str> {
    due.into_iter().map(|d| d.effect).collect()
}

#[test]
fn new_queue_is_empty() {
    let queue = make_queue(5);
    assert!(queue.is_empty());
    assert!(queue.pending().is_empty());
    assert_eq!(queue.delay(), Duration::from_secs(5));
    assert_eq!(queue.retention(), RETENTION);
}

#[test]
fn queued_action_waits_for_delay() {
    let clock = FakeClock::new();
    let mut queue = make_queue(5);

    let outcome = queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());
    assert_eq!(outcome, QueueOutcome::Queued { id: ActionId::from("a") });

    clock.advance_millis(4_900);
    assert!(queue.take_due(clock.now()).is_empty());
    assert_eq!(queue.pending().len(), 1);

    clock.advance_millis(100);
    assert_eq!(fired(queue.take_due(clock.now())), vec!["a"]);
    assert!(queue.pending().is_empty());
}

#[test]
fn action_fires_exactly_once() {
    let clock = FakeClock::new();
    let mut queue = make_queue(1);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());

    clock.advance_secs(1);
    assert_eq!(queue.take_due(clock.now()).len(), 1);

    clock.advance_secs(1);
    assert!(queue.take_due(clock.now()).is_empty());
    let actions = queue.actions();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].executed);
}

#[test]
fn same_category_replaces_pending_action() {
    let clock = FakeClock::new();
    let mut queue = make_queue(5);

    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());
    clock.advance_secs(1);
    let outcome = queue.queue(ActionId::from("b"), ActionCategory::Flag, "b", clock.now());

    assert_eq!(
        outcome,
        QueueOutcome::Replaced {
            id: ActionId::from("b"),
            replaced: ActionId::from("a"),
        }
    );
    assert_eq!(queue.pending().len(), 1);
    assert_eq!(queue.pending()[0].id, ActionId::from("b"));

    clock.advance_secs(10);
    assert_eq!(fired(queue.take_due(clock.now())), vec!["b"]);
}

#[test]
fn replacement_restarts_the_wait() {
    let clock = FakeClock::new();
    let mut queue = make_queue(5);

    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());
    clock.advance_secs(4);
    queue.queue(ActionId::from("b"), ActionCategory::Flag, "b", clock.now());

    // "a" would have been due here
    clock.advance_secs(1);
    assert!(queue.take_due(clock.now()).is_empty());

    clock.advance_secs(4);
    assert_eq!(fired(queue.take_due(clock.now())), vec!["b"]);
}

#[test]
fn executed_action_is_not_replaced() {
    let clock = FakeClock::new();
    let mut queue = make_queue(1);

    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());
    clock.advance_secs(1);
    queue.take_due(clock.now());

    let outcome = queue.queue(ActionId::from("b"), ActionCategory::Flag, "b", clock.now());
    assert!(matches!(outcome, QueueOutcome::Queued { .. }));
    assert_eq!(queue.len(), 2);
}

#[test]
fn categories_do_not_coalesce_with_each_other() {
    let clock = FakeClock::new();
    let mut queue = make_queue(2);

    queue.queue(ActionId::from("f"), ActionCategory::Flag, "flag", clock.now());
    queue.queue(ActionId::from("s"), ActionCategory::Status, "status", clock.now());
    assert_eq!(queue.pending().len(), 2);

    clock.advance_secs(2);
    let mut effects = fired(queue.take_due(clock.now()));
    effects.sort();
    assert_eq!(effects, vec!["flag", "status"]);
}

#[test]
fn pending_preserves_insertion_order() {
    let clock = FakeClock::new();
    let mut queue = make_queue(5);

    queue.queue(ActionId::from("f1"), ActionCategory::Flag, "f1", clock.now());
    queue.queue(ActionId::from("s1"), ActionCategory::Status, "s1", clock.now());
    queue.queue(ActionId::from("f2"), ActionCategory::Flag, "f2", clock.now());

    let ids: Vec<_> = queue.pending().into_iter().map(|a| a.id.0).collect();
    assert_eq!(ids, vec!["s1", "f2"]);
}

#[test]
fn raising_delay_extends_pending_wait() {
    let clock = FakeClock::new();
    let mut queue = make_queue(5);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());

    clock.advance_secs(3);
    queue.set_delay(Duration::from_secs(30));

    clock.advance_secs(2);
    assert!(queue.take_due(clock.now()).is_empty());

    clock.advance_secs(25);
    assert_eq!(fired(queue.take_due(clock.now())), vec!["a"]);
}

#[test]
fn lowering_delay_makes_pending_action_overdue() {
    let clock = FakeClock::new();
    let mut queue = make_queue(30);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());

    clock.advance_secs(2);
    queue.set_delay(Duration::from_secs(5));
    assert!(queue.take_due(clock.now()).is_empty());

    clock.advance_secs(3);
    assert_eq!(fired(queue.take_due(clock.now())), vec!["a"]);
}

#[test]
fn lowering_delay_to_zero_fires_everything_pending() {
    let clock = FakeClock::new();
    let mut queue = make_queue(30);
    queue.queue(ActionId::from("f"), ActionCategory::Flag, "flag", clock.now());
    queue.queue(ActionId::from("s"), ActionCategory::Status, "status", clock.now());

    queue.set_delay(Duration::ZERO);
    assert_eq!(queue.take_due(clock.now()).len(), 2);
}

#[test]
fn executed_actions_purged_after_retention() {
    let clock = FakeClock::new();
    let mut queue = make_queue(1);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());

    clock.advance_secs(1);
    queue.take_due(clock.now());
    assert!(queue.pending().is_empty());
    assert_eq!(queue.actions().len(), 1);

    clock.advance_secs(58);
    assert_eq!(queue.purge(clock.now()), 0);
    assert_eq!(queue.actions().len(), 1);

    clock.advance_secs(2);
    queue.take_due(clock.now());
    assert!(queue.actions().is_empty());
}

#[test]
fn purge_never_drops_pending_actions() {
    let clock = FakeClock::new();
    let mut queue = make_queue(600);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());

    clock.advance_secs(120);
    assert_eq!(queue.purge(clock.now()), 0);
    assert_eq!(queue.pending().len(), 1);
}

#[test]
fn clear_discards_pending_effects() {
    let clock = FakeClock::new();
    let mut queue = make_queue(1);
    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", clock.now());
    queue.queue(ActionId::from("b"), ActionCategory::Status, "b", clock.now());

    assert_eq!(queue.clear(), 2);

    clock.advance_secs(5);
    assert!(queue.take_due(clock.now()).is_empty());
    assert!(queue.is_empty());
}

#[test]
fn next_deadline_tracks_current_delay() {
    let clock = FakeClock::new();
    let start = clock.now();
    let mut queue = make_queue(5);
    assert_eq!(queue.next_deadline(), None);

    queue.queue(ActionId::from("a"), ActionCategory::Flag, "a", start);
    assert_eq!(queue.next_deadline(), Some(start + Duration::from_secs(5)));

    queue.set_delay(Duration::from_secs(20));
    assert_eq!(queue.next_deadline(), Some(start + Duration::from_secs(20)));

    let pending = queue.pending_for(ActionCategory::Flag).unwrap().clone();
    clock.advance_secs(8);
    assert_eq!(queue.remaining(&pending, clock.now()), Duration::from_secs(12));
    assert!(!queue.is_due(&pending, clock.now()));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Queue(bool),
        Advance(u64),
        SetDelay(u64),
        Tick,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<bool>().prop_map(Op::Queue),
            (0u64..5_000).prop_map(Op::Advance),
            (0u64..10_000).prop_map(Op::SetDelay),
            Just(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_pending_per_category(ops in proptest::collection::vec(arb_op(), 1..60)) {
            let clock = FakeClock::new();
            let id_gen = SequentialIdGen::new("p");
            let mut queue: DelayQueue<ActionId> = DelayQueue::new(Duration::from_secs(1), RETENTION);
            let mut fired = Vec::new();
            let mut replaced = Vec::new();

            for op in ops {
                match op {
                    Op::Queue(is_flag) => {
                        let category = if is_flag { ActionCategory::Flag } else { ActionCategory::Status };
                        let id = id_gen.next();
                        if let QueueOutcome::Replaced { replaced: old, .. } =
                            queue.queue(id.clone(), category, id, clock.now())
                        {
                            replaced.push(old);
                        }
                    }
                    Op::Advance(ms) => clock.advance_millis(ms),
                    Op::SetDelay(ms) => queue.set_delay(Duration::from_millis(ms)),
                    Op::Tick => fired.extend(queue.take_due(clock.now()).into_iter().map(|d| d.effect)),
                }

                let pending = queue.pending();
                for category in [ActionCategory::Flag, ActionCategory::Status] {
                    prop_assert!(pending.iter().filter(|a| a.category == category).count() <= 1);
                }
            }

            // Replaced effects never fire, and nothing fires twice
            for id in &replaced {
                prop_assert!(!fired.contains(id));
            }
            let mut unique = fired.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), fired.len());
        }
    }
}
