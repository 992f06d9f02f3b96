use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::event::{MetricSample, TelemetryEvent};
use super::observer::{Observer, ObserverError};
use super::scope::{DurationDestination, ScopedDurationTracker};

/// Fans out events, metrics and errors to the observers of one compilation
/// context.
///
/// Dispatch walks an immutable snapshot of the subscriber list, so a
/// concurrent `subscribe` never changes an in-flight pass.
pub struct ObserverHub {
    id: Uuid,
    observers: RwLock<Arc<Vec<Arc<dyn Observer>>>>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            observers: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Appends `observer`. The same observer may be added more than once and
    /// is then notified once per subscription.
    pub fn subscribe(&self, observer: Arc<dyn Observer>) {
        let mut guard = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(observer);
        *guard = Arc::new(next);
        debug!(context = %self.id, "Observer subscribed ({} total)", guard.len());
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn snapshot(&self) -> Arc<Vec<Arc<dyn Observer>>> {
        self.observers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Stops at the first failing observer and returns its error.
    pub fn track_event(&self, name: &str) -> Result<(), ObserverError> {
        let event = TelemetryEvent::Named(name.to_string());
        for observer in self.snapshot().iter() {
            observer.on_next(&event)?;
        }
        Ok(())
    }

    /// Same ordering and failure rules as [`ObserverHub::track_event`].
    pub fn track_metric(&self, name: &str, value: f64) -> Result<(), ObserverError> {
        let event = TelemetryEvent::Metric(MetricSample {
            name: name.to_string(),
            value,
        });
        for observer in self.snapshot().iter() {
            observer.on_next(&event)?;
        }
        Ok(())
    }

    pub fn track_exception(&self, error: &anyhow::Error) -> Result<(), ObserverError> {
        for observer in self.snapshot().iter() {
            observer.on_error(error)?;
        }
        Ok(())
    }

    /// Every observer is notified, whatever the earlier ones returned.
    pub fn track_on_completed(&self) {
        for (index, observer) in self.snapshot().iter().enumerate() {
            if let Err(e) = observer.on_completed() {
                debug!(context = %self.id, "Observer #{} failed on completion: {}", index, e);
            }
        }
    }

    /// Starts a tracker that reports elapsed seconds through `track_metric`.
    pub fn start_metric(&self, name: &str) -> ScopedDurationTracker<'_, Self> {
        ScopedDurationTracker::new(self, name, "")
    }
}

impl Default for ObserverHub {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationDestination for ObserverHub {
    type Error = ObserverError;

    fn report_elapsed(&self, name: &str, _source: &str, elapsed: Duration) -> Result<(), ObserverError> {
        self.track_metric(name, elapsed.as_secs_f64())
    }
}

impl std::fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHub")
            .field("id", &self.id)
            .field("observers", &self.len())
            .finish()
    }
}
