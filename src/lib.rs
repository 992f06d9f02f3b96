pub mod config;
pub mod telemetry;

pub use config::TelemetryConfig;
pub use telemetry::{ObserverHub, ScopedDurationTracker, StructuredEventEmitter};
