use serde::{Serialize, Deserialize};

/// Payload delivered to an observer's `on_next`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// Opaque named event, e.g. "parse.started".
    Named(String),
    Metric(MetricSample),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
}

impl TelemetryEvent {
    pub fn name(&self) -> &str {
        match self {
            TelemetryEvent::Named(name) => name,
            TelemetryEvent::Metric(sample) => &sample.name,
        }
    }
}

/// Structured channel events. The numeric ids are fixed and shared with
/// whatever consumes the channel downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredEvent {
    Metric {
        source: String,
        message: String,
        count: u64,
        units: String,
    },
    Informational {
        source: String,
        message: String,
    },
    Error {
        source: String,
        message: String,
    },
}

pub const METRIC_EVENT_ID: u16 = 1;
pub const INFORMATIONAL_EVENT_ID: u16 = 2;
pub const ERROR_EVENT_ID: u16 = 3;

impl StructuredEvent {
    pub fn id(&self) -> u16 {
        match self {
            StructuredEvent::Metric { .. } => METRIC_EVENT_ID,
            StructuredEvent::Informational { .. } => INFORMATIONAL_EVENT_ID,
            StructuredEvent::Error { .. } => ERROR_EVENT_ID,
        }
    }
}

/// Line-oriented trace channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceLevel {
    Trace,
    Info,
    Error,
}
