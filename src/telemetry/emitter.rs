use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::TelemetryConfig;

use super::event::{StructuredEvent, TraceLevel};
use super::phase::PhaseTracker;
use super::recorder::TelemetryRecorder;
use super::scope::{DurationDestination, ScopedDurationTracker};
use super::sink::{EventChannel, TraceSink, TracingChannel, TracingSink};

/// Source label for phase durations and phase announcements.
pub const PHASE_SOURCE: &str = "Phase";

pub const COUNTER_DUMP_HEADER: &str = "Counters:";

static GLOBAL: OnceLock<StructuredEventEmitter> = OnceLock::new();

/// Structured logger with phase profiling and diagnostic counters.
///
/// One instance per process is reachable through [`StructuredEventEmitter::global`];
/// call sites should take `&StructuredEventEmitter` so tests can inject their
/// own instance built with [`StructuredEventEmitter::new`].
///
/// When instrumentation is off, counters, phases and structured events are
/// skipped. The trace lines written by `log_information`, `log_error` and
/// elapsed-duration reports are always written.
pub struct StructuredEventEmitter {
    instrumented: AtomicBool,
    phases: PhaseTracker,
    sink: Arc<dyn TraceSink>,
    channel: Arc<dyn EventChannel>,
}

impl StructuredEventEmitter {
    /// Built on first access from the environment, then reused for the life
    /// of the process.
    pub fn global() -> &'static StructuredEventEmitter {
        GLOBAL.get_or_init(|| {
            let config = TelemetryConfig::from_env();
            Self::new(&config, Arc::new(TracingSink), Arc::new(TracingChannel))
        })
    }

    pub fn new(config: &TelemetryConfig, sink: Arc<dyn TraceSink>, channel: Arc<dyn EventChannel>) -> Self {
        Self {
            instrumented: AtomicBool::new(config.instrumentation),
            phases: PhaseTracker::new(),
            sink,
            channel,
        }
    }

    /// An emitter writing both trace lines and structured events into one recorder.
    pub fn recording(config: &TelemetryConfig) -> (Self, Arc<TelemetryRecorder>) {
        let recorder = Arc::new(TelemetryRecorder::with_capacity(config.record_capacity));
        let emitter = Self::new(config, recorder.clone(), recorder.clone());
        (emitter, recorder)
    }

    pub fn is_instrumented(&self) -> bool {
        self.instrumented.load(Ordering::Relaxed)
    }

    pub fn set_instrumented(&self, enabled: bool) {
        self.instrumented.store(enabled, Ordering::Relaxed);
    }

    pub fn phases(&self) -> &PhaseTracker {
        &self.phases
    }

    pub fn count(&self, id: &str) {
        if !self.is_instrumented() {
            return;
        }
        self.phases.count(id);
    }

    /// Crosses a phase boundary. `None` ends the current phase without
    /// starting another; the counters are dumped and cleared either way.
    pub fn start_phase(&self, name: Option<&str>) {
        if !self.is_instrumented() {
            return;
        }

        // Report while the tracker is still locked: a concurrent boundary
        // cannot split this phase's close, dump and announcement.
        self.phases.transition_with(name, |transition| {
            if let Some(closed) = transition.closed {
                self.report_elapsed_ms(PHASE_SOURCE, &closed.name, closed.elapsed);
            }

            if !transition.counters.is_empty() {
                self.sink.write_line(TraceLevel::Trace, &format_counter_dump(&transition.counters));
            }

            if let Some(started) = transition.started {
                self.log_information(PHASE_SOURCE, &format!("Phase: {}", started));
            }
        });
    }

    pub fn end_phase(&self) {
        self.start_phase(None);
    }

    pub fn log_information(&self, source: &str, message: &str) {
        self.emit(StructuredEvent::Informational {
            source: source.to_string(),
            message: message.to_string(),
        });
        self.sink.write_line(TraceLevel::Info, message);
    }

    pub fn log_error(&self, source: &str, message: &str) {
        self.emit(StructuredEvent::Error {
            source: source.to_string(),
            message: message.to_string(),
        });
        self.sink.write_line(TraceLevel::Error, message);
    }

    pub fn track_metric(&self, source: &str, message: &str, count: u64, units: &str) {
        if !self.is_instrumented() {
            return;
        }
        self.emit(StructuredEvent::Metric {
            source: source.to_string(),
            message: format!("{} - {}{} ({})", message, count, units, source),
            count,
            units: units.to_string(),
        });
    }

    /// Starts a tracker that reports elapsed milliseconds on release.
    pub fn start_metric(&self, source: &str, message: &str) -> ScopedDurationTracker<'_, Self> {
        ScopedDurationTracker::new(self, message, source)
    }

    fn report_elapsed_ms(&self, source: &str, message: &str, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.sink.write_line(TraceLevel::Trace, &format!("{}: {} ms", message, elapsed_ms));
        self.track_metric(source, message, elapsed_ms, "ms");
    }

    fn emit(&self, event: StructuredEvent) {
        if self.is_instrumented() && self.channel.is_enabled(&event) {
            self.channel.emit(&event);
        }
    }
}

/// `Counters:` header followed by one `  "{id}": {count}` line per entry,
/// written as a single trace line.
fn format_counter_dump(counters: &[(String, u64)]) -> String {
    let mut dump = String::from(COUNTER_DUMP_HEADER);
    for (id, count) in counters {
        dump.push_str(&format!("\n  \"{}\": {}", id, count));
    }
    dump
}

impl DurationDestination for StructuredEventEmitter {
    type Error = Infallible;

    fn report_elapsed(&self, name: &str, source: &str, elapsed: Duration) -> Result<(), Infallible> {
        self.report_elapsed_ms(source, name, elapsed);
        Ok(())
    }
}

impl std::fmt::Debug for StructuredEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredEventEmitter")
            .field("instrumented", &self.is_instrumented())
            .field("phase", &self.phases.current())
            .finish()
    }
}
