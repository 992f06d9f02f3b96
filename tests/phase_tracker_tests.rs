use std::sync::Arc;
use std::thread;

use stagescope::telemetry::{CounterTable, PhaseState, PhaseTracker, COUNTER_DUMP_LIMIT};

#[test]
fn test_increment_creates_at_one() {
    let mut table = CounterTable::new();
    assert_eq!(table.increment("inline"), 1);
    assert_eq!(table.increment("inline"), 2);
    assert_eq!(table.get("inline"), Some(2));
    assert_eq!(table.get("missing"), None);
}

#[test]
fn test_top_orders_by_count_then_insertion() {
    let mut table = CounterTable::new();
    for id in ["b", "a", "c", "a", "c", "d"] {
        table.increment(id);
    }
    // a=2, c=2, b=1, d=1 ; a inserted before c, b before d
    assert_eq!(
        table.top(10),
        vec![
            ("a".to_string(), 2),
            ("c".to_string(), 2),
            ("b".to_string(), 1),
            ("d".to_string(), 1),
        ]
    );
}

#[test]
fn test_drain_caps_and_clears() {
    let mut table = CounterTable::new();
    for i in 0..40 {
        for _ in 0..=i {
            table.increment(&format!("c{}", i));
        }
    }
    let dumped = table.drain_top(COUNTER_DUMP_LIMIT);
    assert_eq!(dumped.len(), 25);
    assert_eq!(dumped[0], ("c39".to_string(), 40));
    assert_eq!(dumped[24], ("c15".to_string(), 16));
    assert!(table.is_empty());

    assert_eq!(table.increment("c39"), 1);
}

#[test]
fn test_first_transition_closes_nothing() {
    let tracker = PhaseTracker::new();
    let t = tracker.transition(Some("parse"));
    assert_eq!(t.closed, None);
    assert!(t.counters.is_empty());
    assert_eq!(t.started.as_deref(), Some("parse"));
    assert_eq!(tracker.current().as_deref(), Some("parse"));
}

#[test]
fn test_switch_closes_previous_and_drains() {
    let tracker = PhaseTracker::new();
    tracker.transition(Some("parse"));
    tracker.count("token");
    tracker.count("token");

    let t = tracker.transition(Some("bind"));
    assert_eq!(t.closed.as_ref().map(|c| c.name.as_str()), Some("parse"));
    assert_eq!(t.counters, vec![("token".to_string(), 2)]);
    assert_eq!(tracker.counters_len(), 0);
    assert_eq!(tracker.current().as_deref(), Some("bind"));
}

#[test]
fn test_ending_returns_to_no_phase_but_still_drains() {
    let tracker = PhaseTracker::new();
    tracker.count("orphan");
    let t = tracker.transition(None);
    assert_eq!(t.closed, None);
    assert_eq!(t.counters, vec![("orphan".to_string(), 1)]);
    assert_eq!(tracker.state(), PhaseState::NoPhase);
}

#[test]
fn test_transition_report_runs_under_lock() {
    let tracker = Arc::new(PhaseTracker::new());
    tracker.transition(Some("parse"));
    tracker.count("token");

    let closed = tracker.transition_with(Some("bind"), |t| {
        // A count from another thread must wait until the report is done.
        let other = tracker.clone();
        let pending = thread::spawn(move || other.count("late"));
        thread::sleep(std::time::Duration::from_millis(20));
        assert!(!pending.is_finished());
        (t.closed.map(|c| c.name), pending)
    });

    assert_eq!(closed.0.as_deref(), Some("parse"));
    closed.1.join().unwrap();
    assert_eq!(tracker.counter("late"), Some(1));
    assert_eq!(tracker.counter("token"), None);
}

#[test]
fn test_concurrent_counts_are_not_lost() {
    let tracker = Arc::new(PhaseTracker::new());
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let tracker = tracker.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    tracker.count("visit");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(tracker.counter("visit"), Some(8_000));
}
