use std::collections::VecDeque;

use super::event::{StructuredEvent, TraceLevel};
use super::recorder::TelemetryRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub trace: TraceStats,
    pub structured: StructuredStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub trace_lines: u64,
    pub info_lines: u64,
    pub error_lines: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredStats {
    pub metrics: u64,
    pub informational: u64,
    pub errors: u64,
    /// Sum of every metric reported in "ms".
    pub total_ms: u64,
    pub avg_ms: f64,
}

pub fn compute_snapshot(records: &VecDeque<TelemetryRecord>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut timed = 0u64;

    for record in records {
        match record {
            TelemetryRecord::Trace { level, .. } => match level {
                TraceLevel::Trace => snap.trace.trace_lines += 1,
                TraceLevel::Info => snap.trace.info_lines += 1,
                TraceLevel::Error => snap.trace.error_lines += 1,
            },
            TelemetryRecord::Structured(event) => match event {
                StructuredEvent::Metric { count, units, .. } => {
                    snap.structured.metrics += 1;
                    if units == "ms" {
                        snap.structured.total_ms += count;
                        timed += 1;
                    }
                }
                StructuredEvent::Informational { .. } => snap.structured.informational += 1,
                StructuredEvent::Error { .. } => snap.structured.errors += 1,
            },
        }
    }

    if timed > 0 {
        snap.structured.avg_ms = snap.structured.total_ms as f64 / timed as f64;
    }

    snap
}
