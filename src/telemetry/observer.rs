use thiserror::Error;
use tracing::{info, warn};

use super::event::TelemetryEvent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObserverError {
    #[error("observer rejected notification: {0}")]
    Rejected(String),
    #[error("observer is closed")]
    Closed,
}

/// External subscriber of a compilation context.
///
/// Handlers should not fail from `on_next` / `on_error`: a failure there stops
/// delivery to the observers subscribed after this one for that call.
/// `on_completed` failures are isolated per observer.
pub trait Observer: Send + Sync {
    fn on_next(&self, event: &TelemetryEvent) -> Result<(), ObserverError>;
    fn on_error(&self, error: &anyhow::Error) -> Result<(), ObserverError>;
    fn on_completed(&self) -> Result<(), ObserverError>;
}

/// Forwards every notification to `tracing`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Observer for TracingObserver {
    fn on_next(&self, event: &TelemetryEvent) -> Result<(), ObserverError> {
        match event {
            TelemetryEvent::Named(name) => info!(observer = %self.label, "event {}", name),
            TelemetryEvent::Metric(sample) => {
                info!(observer = %self.label, "metric {} = {:.6}", sample.name, sample.value)
            }
        }
        Ok(())
    }

    fn on_error(&self, error: &anyhow::Error) -> Result<(), ObserverError> {
        warn!(observer = %self.label, "pipeline error: {:#}", error);
        Ok(())
    }

    fn on_completed(&self) -> Result<(), ObserverError> {
        info!(observer = %self.label, "completed");
        Ok(())
    }
}
