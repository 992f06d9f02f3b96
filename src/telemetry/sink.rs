use tracing::{debug, error, info, warn, Level};

use super::event::{StructuredEvent, TraceLevel};

/// Process-level source label attached to every structured event.
pub const EVENT_SOURCE_NAME: &str = "Stagescope";

/// Best-effort line sink. Implementations swallow their own failures.
pub trait TraceSink: Send + Sync {
    fn write_line(&self, level: TraceLevel, line: &str);
}

/// Best-effort structured event channel.
pub trait EventChannel: Send + Sync {
    fn is_enabled(&self, event: &StructuredEvent) -> bool;
    fn emit(&self, event: &StructuredEvent);
}

/// Trace lines as `tracing` events on target `stagescope::trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn write_line(&self, level: TraceLevel, line: &str) {
        match level {
            TraceLevel::Trace => debug!(target: "stagescope::trace", "{}", line),
            TraceLevel::Info => info!(target: "stagescope::trace", "{}", line),
            TraceLevel::Error => error!(target: "stagescope::trace", "{}", line),
        }
    }
}

/// Structured events as `tracing` events on target `stagescope::events`,
/// payload rendered as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingChannel;

impl EventChannel for TracingChannel {
    fn is_enabled(&self, event: &StructuredEvent) -> bool {
        match event {
            StructuredEvent::Error { .. } => tracing::enabled!(target: "stagescope::events", Level::ERROR),
            _ => tracing::enabled!(target: "stagescope::events", Level::INFO),
        }
    }

    fn emit(&self, event: &StructuredEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                warn!("Structured event not serializable: {}", e);
                return;
            }
        };
        match event {
            StructuredEvent::Error { .. } => error!(
                target: "stagescope::events",
                event_id = event.id(),
                source_name = EVENT_SOURCE_NAME,
                "{}",
                payload
            ),
            _ => info!(
                target: "stagescope::events",
                event_id = event.id(),
                source_name = EVENT_SOURCE_NAME,
                "{}",
                payload
            ),
        }
    }
}
