use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Where a released tracker sends its elapsed time. Each destination picks
/// its own unit.
pub trait DurationDestination {
    type Error: fmt::Display;

    fn report_elapsed(&self, name: &str, source: &str, elapsed: Duration) -> Result<(), Self::Error>;
}

#[derive(Debug)]
struct ActiveScope {
    name: String,
    source: String,
    start: Instant,
}

/// Measures the time between its creation and its first release.
///
/// Release is idempotent: the first call reports and leaves the tracker
/// empty, later calls do nothing. Dropping the tracker releases it, so every
/// exit path out of the owning scope (return, `?`, unwind) reports once.
#[must_use = "dropping the tracker immediately reports a near-zero duration"]
pub struct ScopedDurationTracker<'a, D: DurationDestination + ?Sized> {
    destination: &'a D,
    scope: Option<ActiveScope>,
}

impl<'a, D: DurationDestination + ?Sized> ScopedDurationTracker<'a, D> {
    pub fn new(destination: &'a D, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            destination,
            scope: Some(ActiveScope {
                name: name.into(),
                source: source.into(),
                start: Instant::now(),
            }),
        }
    }

    /// A tracker that never reports.
    pub fn empty(destination: &'a D) -> Self {
        Self { destination, scope: None }
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.scope.as_ref().map(|s| s.name.as_str())
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.scope.as_ref().map(|s| s.start.elapsed())
    }

    pub fn release(&mut self) -> Result<(), D::Error> {
        // Take first: the tracker is empty afterwards even if the report fails.
        match self.scope.take() {
            Some(scope) => {
                let elapsed = scope.start.elapsed();
                self.destination.report_elapsed(&scope.name, &scope.source, elapsed)
            }
            None => Ok(()),
        }
    }
}

impl<D: DurationDestination + ?Sized> Drop for ScopedDurationTracker<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            debug!("Discarded duration report failure on drop: {}", e);
        }
    }
}

impl<D: DurationDestination + ?Sized> fmt::Debug for ScopedDurationTracker<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedDurationTracker")
            .field("scope", &self.scope)
            .finish()
    }
}
