use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::event::{StructuredEvent, TraceLevel};
use super::metrics::{compute_snapshot, TelemetrySnapshot};
use super::sink::{EventChannel, TraceSink};

const MAX_RECORDS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryRecord {
    Trace { level: TraceLevel, line: String },
    Structured(StructuredEvent),
}

/// In-memory trace sink and structured channel. Keeps the most recent
/// records, oldest evicted first.
#[derive(Debug)]
pub struct TelemetryRecorder {
    capacity: usize,
    buffer: Mutex<VecDeque<TelemetryRecord>>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECORDS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: Mutex::new(VecDeque::with_capacity(capacity.min(MAX_RECORDS))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<TelemetryRecord>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, record: TelemetryRecord) {
        let mut buffer = self.lock();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(record);
    }

    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn trace_lines(&self, level: TraceLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|record| match record {
                TelemetryRecord::Trace { level: l, line } if *l == level => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn structured(&self) -> Vec<StructuredEvent> {
        self.lock()
            .iter()
            .filter_map(|record| match record {
                TelemetryRecord::Structured(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.lock())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for TelemetryRecorder {
    fn write_line(&self, level: TraceLevel, line: &str) {
        self.record(TelemetryRecord::Trace {
            level,
            line: line.to_string(),
        });
    }
}

impl EventChannel for TelemetryRecorder {
    fn is_enabled(&self, _event: &StructuredEvent) -> bool {
        true
    }

    fn emit(&self, event: &StructuredEvent) {
        self.record(TelemetryRecord::Structured(event.clone()));
    }
}
