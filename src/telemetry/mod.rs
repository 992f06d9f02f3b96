//! Pipeline telemetry: observer fan-out, scoped durations, phase profiling.
//!
//! # SIDE-CHANNEL INVARIANT
//! Nothing here may change the outcome of a compilation. Observer failures
//! surface only as return values of the non-completion dispatch calls;
//! sinks and channels are best-effort and never fail their caller.

pub mod counters;
pub mod emitter;
pub mod event;
pub mod hub;
pub mod metrics;
pub mod observer;
pub mod phase;
pub mod recorder;
pub mod scope;
pub mod sink;

pub use counters::{CounterTable, COUNTER_DUMP_LIMIT};
pub use emitter::{StructuredEventEmitter, COUNTER_DUMP_HEADER, PHASE_SOURCE};
pub use event::{MetricSample, StructuredEvent, TelemetryEvent, TraceLevel};
pub use hub::ObserverHub;
pub use observer::{Observer, ObserverError, TracingObserver};
pub use phase::{PhaseState, PhaseTracker, PhaseTransition};
pub use recorder::{TelemetryRecord, TelemetryRecorder};
pub use scope::{DurationDestination, ScopedDurationTracker};
pub use sink::{EventChannel, TraceSink, TracingChannel, TracingSink, EVENT_SOURCE_NAME};
