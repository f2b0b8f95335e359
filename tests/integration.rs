//! Integration tests for the notification center.

use notification_center::{
    CenterConfig, CenterEvent, DropReason, NotificationCenter, NotificationKind, SubscriptionFilter,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn test_center() -> NotificationCenter {
    let center = NotificationCenter::new(CenterConfig::without_generator()).unwrap();
    center.start().unwrap();
    center
}

// --- Realistic Workflow Tests ---

#[test]
fn test_admin_dashboard_workflow() {
    let center = test_center();

    let registration = center
        .add_notification(
            NotificationKind::Success,
            "New Student Registration",
            "A new student has registered for admission.",
            Some("/students/pending".to_string()),
        )
        .unwrap();
    let enrollment = center
        .add_notification(
            NotificationKind::Warning,
            "Course Enrollment Full",
            "CS101 course has reached maximum capacity.",
            None,
        )
        .unwrap();
    center
        .add_notification(
            NotificationKind::Error,
            "Payment Failed",
            "Card declined for student ID: 2024017.",
            None,
        )
        .unwrap();

    assert_eq!(center.unread_count().unwrap(), 3);

    // Panel click
    center.mark_as_read(enrollment.id).unwrap();
    assert_eq!(center.unread_count().unwrap(), 2);

    // Dismiss
    center.remove_notification(registration.id).unwrap();
    let remaining: Vec<_> = center
        .notifications()
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(remaining, vec!["Payment Failed", "Course Enrollment Full"]);
    assert_eq!(center.unread_count().unwrap(), 1);

    let summary = center.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.unread, 1);
    assert_eq!(summary.unread_by_kind.get(&NotificationKind::Error), Some(&1));

    center.mark_all_as_read().unwrap();
    assert_eq!(center.unread_count().unwrap(), 0);
    assert!(center.unread().unwrap().is_empty());

    center.clear_all().unwrap();
    assert!(center.notifications().unwrap().is_empty());
}

#[test]
fn test_newest_first_ordering() {
    let center = test_center();

    let a = center
        .add_notification(NotificationKind::Info, "A", "first", None)
        .unwrap();
    let b = center
        .add_notification(NotificationKind::Info, "B", "second", None)
        .unwrap();

    let ids: Vec<_> = center
        .notifications()
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[test]
fn test_mark_as_read_is_idempotent() {
    let center = test_center();
    let n = center
        .add_notification(NotificationKind::Info, "A", "m", None)
        .unwrap();
    center
        .add_notification(NotificationKind::Info, "B", "m", None)
        .unwrap();

    center.mark_as_read(n.id).unwrap();
    let once = center.notifications().unwrap();

    center.mark_as_read(n.id).unwrap();
    let twice = center.notifications().unwrap();

    assert_eq!(once, twice);
    assert_eq!(center.unread_count().unwrap(), 1);
}

#[test]
fn test_mark_all_then_add_leaves_one_unread() {
    let center = test_center();
    for i in 0..5 {
        center
            .add_notification(NotificationKind::Info, format!("n{}", i), "m", None)
            .unwrap();
    }

    center.mark_all_as_read().unwrap();
    center
        .add_notification(NotificationKind::Warning, "late", "m", None)
        .unwrap();

    assert_eq!(center.unread_count().unwrap(), 1);
}

#[test]
fn test_removed_id_never_reappears() {
    let center = test_center();
    let a = center
        .add_notification(NotificationKind::Info, "A", "m", None)
        .unwrap();
    center
        .add_notification(NotificationKind::Info, "B", "m", None)
        .unwrap();

    center.remove_notification(a.id).unwrap();

    assert!(center
        .notifications()
        .unwrap()
        .iter()
        .all(|n| n.id != a.id));
    assert_eq!(center.unread_count().unwrap(), 1);

    // Later additions get fresh ids
    let c = center
        .add_notification(NotificationKind::Info, "C", "m", None)
        .unwrap();
    assert_ne!(c.id, a.id);
}

#[test]
fn test_clear_all_from_any_state() {
    let center = test_center();
    let a = center
        .add_notification(NotificationKind::Info, "A", "m", None)
        .unwrap();
    center
        .add_notification(NotificationKind::Error, "B", "m", None)
        .unwrap();
    center.mark_as_read(a.id).unwrap();

    center.clear_all().unwrap();

    assert_eq!(center.notifications().unwrap().len(), 0);
    assert_eq!(center.unread_count().unwrap(), 0);
}

// --- Subscription Tests ---

#[test]
fn test_subscriber_sees_snapshot_then_mutations_in_order() {
    let center = test_center();
    let existing = center
        .add_notification(NotificationKind::Info, "Existing", "m", None)
        .unwrap();

    let handle = center.subscribe(SubscriptionFilter::all()).unwrap();

    let added = center
        .add_notification(NotificationKind::Warning, "New", "m", None)
        .unwrap();
    center.mark_as_read(existing.id).unwrap();
    center.mark_all_as_read().unwrap();
    center.remove_notification(added.id).unwrap();
    center.clear_all().unwrap();

    let events = handle.drain();
    assert_eq!(events.len(), 6);

    match &events[0] {
        CenterEvent::Snapshot {
            notifications,
            unread_count,
        } => {
            assert_eq!(notifications.len(), 1);
            assert_eq!(*unread_count, 1);
        }
        other => panic!("Expected Snapshot, got {:?}", other),
    }
    assert!(matches!(
        &events[1],
        CenterEvent::Added { notification, unread_count: 2 } if notification.id == added.id
    ));
    assert_eq!(
        events[2],
        CenterEvent::Read {
            id: existing.id,
            unread_count: 1
        }
    );
    assert_eq!(
        events[3],
        CenterEvent::AllRead {
            marked: 1,
            unread_count: 0
        }
    );
    assert_eq!(
        events[4],
        CenterEvent::Removed {
            id: added.id,
            unread_count: 0
        }
    );
    assert_eq!(
        events[5],
        CenterEvent::Cleared {
            removed: 1,
            unread_count: 0
        }
    );
}

#[test]
fn test_kind_filtered_subscriber() {
    let center = test_center();
    let handle = center
        .subscribe(SubscriptionFilter::kinds(vec![NotificationKind::Error]))
        .unwrap();

    center
        .add_notification(NotificationKind::Info, "quiet", "m", None)
        .unwrap();
    center
        .add_notification(NotificationKind::Error, "loud", "m", None)
        .unwrap();

    let events = handle.drain();
    let titles: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            CenterEvent::Added { notification, .. } => Some(notification.title.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["loud"]);
}

#[test]
fn test_kind_filtered_subscriber_still_sees_state_changes() {
    let center = test_center();
    let handle = center
        .subscribe(SubscriptionFilter::kinds(vec![NotificationKind::Error]))
        .unwrap();

    let outage = center
        .add_notification(NotificationKind::Error, "Portal Down", "m", None)
        .unwrap();
    let info = center
        .add_notification(NotificationKind::Info, "Newsletter", "m", None)
        .unwrap();
    center.mark_as_read(outage.id).unwrap();
    center.remove_notification(info.id).unwrap();
    center.clear_all().unwrap();

    let events = handle.drain();
    assert_eq!(events.len(), 5);
    assert!(matches!(events[0], CenterEvent::Snapshot { .. }));
    assert!(matches!(
        &events[1],
        CenterEvent::Added { notification, unread_count: 1 } if notification.id == outage.id
    ));
    assert_eq!(
        events[2],
        CenterEvent::Read {
            id: outage.id,
            unread_count: 1
        }
    );
    assert_eq!(
        events[3],
        CenterEvent::Removed {
            id: info.id,
            unread_count: 0
        }
    );
    assert_eq!(
        events[4],
        CenterEvent::Cleared {
            removed: 1,
            unread_count: 0
        }
    );
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let center = test_center();
    let handle = center.subscribe(SubscriptionFilter::all()).unwrap();
    center.unsubscribe(handle.id);

    center
        .add_notification(NotificationKind::Info, "A", "m", None)
        .unwrap();

    let events = handle.drain();
    assert!(events
        .iter()
        .all(|e| !matches!(e, CenterEvent::Added { .. })));
    assert_eq!(center.subscription_count(), 0);
}

// --- Concurrency Tests ---

#[test]
fn test_concurrent_consumers_stay_consistent() {
    let center = Arc::new(test_center());
    let handle = center.subscribe(SubscriptionFilter::all()).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let center = Arc::clone(&center);
            thread::spawn(move || {
                for i in 0..50 {
                    let n = center
                        .add_notification(
                            NotificationKind::Info,
                            format!("w{}-{}", w, i),
                            "m",
                            None,
                        )
                        .unwrap();
                    if i % 2 == 0 {
                        center.mark_as_read(n.id).unwrap();
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(center.notifications().unwrap().len(), 200);
    assert_eq!(center.unread_count().unwrap(), 100);

    // Unread counts on events never skip backwards relative to the event stream.
    let mut expected = 0usize;
    for event in handle.drain() {
        match event {
            CenterEvent::Added { unread_count, .. } => {
                expected += 1;
                assert_eq!(unread_count, expected);
            }
            CenterEvent::Read { unread_count, .. } => {
                expected -= 1;
                assert_eq!(unread_count, expected);
            }
            _ => {}
        }
    }
    assert_eq!(expected, 100);
}

// --- Feed Lifecycle Tests ---

#[test]
fn test_feed_delivers_and_stops_on_shutdown() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut config = CenterConfig::default();
    config.generator.tick_interval_ms = 5;
    config.generator.arrival_probability = 1.0;
    config.generator.seed = Some(11);

    let center = NotificationCenter::new(config).unwrap();
    center.start().unwrap();
    assert!(center.is_feed_running());

    let handle = center.subscribe(SubscriptionFilter::all()).unwrap();
    let first = loop {
        match handle.recv_timeout(Duration::from_secs(5)).unwrap() {
            CenterEvent::Added { notification, .. } => break notification,
            _ => continue,
        }
    };
    assert!(!first.read);

    center.shutdown();
    assert!(!center.is_feed_running());

    let after = handle.drain();
    assert_eq!(
        after.last(),
        Some(&CenterEvent::Dropped {
            reason: DropReason::Shutdown
        })
    );

    thread::sleep(Duration::from_millis(50));
    assert!(handle.drain().is_empty());
}

#[test]
fn test_double_start_does_not_double_feed() {
    let mut config = CenterConfig::default();
    config.generator.tick_interval_ms = 60_000;

    let center = NotificationCenter::new(config).unwrap();
    center.start().unwrap();
    center.start().unwrap();
    assert!(center.is_feed_running());

    center.shutdown();
    assert!(!center.is_feed_running());
}

#[test]
fn test_independent_centers_share_nothing() {
    let a = test_center();
    let b = test_center();

    a.add_notification(NotificationKind::Info, "only in a", "m", None)
        .unwrap();

    assert_eq!(a.unread_count().unwrap(), 1);
    assert_eq!(b.unread_count().unwrap(), 0);
}

// --- Property Tests ---

#[derive(Clone, Debug)]
enum Op {
    Add,
    MarkRead(usize),
    MarkAll,
    Remove(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Add),
        3 => (0usize..32).prop_map(Op::MarkRead),
        1 => Just(Op::MarkAll),
        2 => (0usize..32).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_unread_count_matches_records(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let center = test_center();
        let mut issued = Vec::new();

        for op in ops {
            match op {
                Op::Add => {
                    let n = center
                        .add_notification(NotificationKind::Info, "t", "m", None)
                        .unwrap();
                    issued.push(n.id);
                }
                Op::MarkRead(i) => {
                    if let Some(id) = issued.get(i) {
                        center.mark_as_read(*id).unwrap();
                    }
                }
                Op::MarkAll => {
                    center.mark_all_as_read().unwrap();
                }
                Op::Remove(i) => {
                    if let Some(id) = issued.get(i) {
                        center.remove_notification(*id).unwrap();
                    }
                }
                Op::Clear => {
                    center.clear_all().unwrap();
                }
            }

            let notifications = center.notifications().unwrap();
            let unread = notifications.iter().filter(|n| !n.read).count();
            let reported = center.unread_count().unwrap();
            prop_assert_eq!(reported, unread);
            prop_assert!(reported <= notifications.len());
        }

        let ids: Vec<_> = center.notifications().unwrap().into_iter().map(|n| n.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted.dedup();
        prop_assert_eq!(ids, sorted);
    }
}
