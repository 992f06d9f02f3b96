use std::cell::RefCell;
use std::time::Duration;

use stagescope::telemetry::{DurationDestination, ScopedDurationTracker};

#[derive(Default)]
struct Collector {
    reports: RefCell<Vec<(String, String, Duration)>>,
    fail: bool,
}

impl DurationDestination for Collector {
    type Error = String;

    fn report_elapsed(&self, name: &str, source: &str, elapsed: Duration) -> Result<(), String> {
        self.reports.borrow_mut().push((name.to_string(), source.to_string(), elapsed));
        if self.fail { Err("sink down".to_string()) } else { Ok(()) }
    }
}

#[test]
fn test_release_twice_reports_once() {
    let dest = Collector::default();
    let mut tracker = ScopedDurationTracker::new(&dest, "parse", "Parser");
    assert!(!tracker.is_empty());
    assert_eq!(tracker.name(), Some("parse"));

    tracker.release().unwrap();
    assert!(tracker.is_empty());
    tracker.release().unwrap();
    drop(tracker);

    let reports = dest.reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "parse");
    assert_eq!(reports[0].1, "Parser");
}

#[test]
fn test_empty_tracker_never_reports() {
    let dest = Collector::default();
    let mut tracker = ScopedDurationTracker::empty(&dest);
    assert!(tracker.is_empty());
    assert_eq!(tracker.name(), None);
    assert_eq!(tracker.elapsed(), None);
    tracker.release().unwrap();
    drop(tracker);
    assert!(dest.reports.borrow().is_empty());
}

#[test]
fn test_drop_reports_on_early_return() {
    fn stage(dest: &Collector) -> Result<(), String> {
        let _scope = ScopedDurationTracker::new(dest, "lower", "");
        let checked: Result<(), String> = Err("type error".to_string());
        checked?;
        Ok(())
    }

    let dest = Collector::default();
    assert!(stage(&dest).is_err());
    assert_eq!(dest.reports.borrow().len(), 1);
}

#[test]
fn test_failed_report_still_empties_tracker() {
    let dest = Collector { fail: true, ..Default::default() };
    let mut tracker = ScopedDurationTracker::new(&dest, "emit", "");
    assert!(tracker.release().is_err());
    assert!(tracker.is_empty());
    drop(tracker);
    assert_eq!(dest.reports.borrow().len(), 1);
}
