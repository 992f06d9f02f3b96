use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::counters::{CounterTable, COUNTER_DUMP_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseState {
    NoPhase,
    InPhase { name: String, start: Instant },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedPhase {
    pub name: String,
    pub elapsed: Duration,
}

/// Everything one boundary crossing produced, for the caller to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTransition {
    pub closed: Option<ClosedPhase>,
    pub counters: Vec<(String, u64)>,
    pub started: Option<String>,
}

#[derive(Debug)]
struct PhaseBook {
    state: PhaseState,
    counters: CounterTable,
}

/// Active phase plus its counters, behind one lock.
///
/// A phase switch (close, dump, clear, activate) happens in a single critical
/// section, so no increment lands between the dump and the clear.
#[derive(Debug)]
pub struct PhaseTracker {
    book: Mutex<PhaseBook>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            book: Mutex::new(PhaseBook {
                state: PhaseState::NoPhase,
                counters: CounterTable::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PhaseBook> {
        // Telemetry must keep working after a panic elsewhere.
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self, id: &str) -> u64 {
        self.lock().counters.increment(id)
    }

    pub fn counter(&self, id: &str) -> Option<u64> {
        self.lock().counters.get(id)
    }

    pub fn counters_len(&self) -> usize {
        self.lock().counters.len()
    }

    pub fn current(&self) -> Option<String> {
        match &self.lock().state {
            PhaseState::NoPhase => None,
            PhaseState::InPhase { name, .. } => Some(name.clone()),
        }
    }

    pub fn state(&self) -> PhaseState {
        self.lock().state.clone()
    }

    /// Closes the active phase, drains the counters and activates `next`.
    /// `None` ends phase tracking until the next named transition.
    pub fn transition(&self, next: Option<&str>) -> PhaseTransition {
        self.transition_with(next, |transition| transition)
    }

    /// Like [`PhaseTracker::transition`], but `report` runs before the lock is
    /// released, so the output of concurrent boundaries never interleaves.
    /// `report` must not call back into this tracker.
    pub fn transition_with<R>(&self, next: Option<&str>, report: impl FnOnce(PhaseTransition) -> R) -> R {
        let mut book = self.lock();

        let closed = match std::mem::replace(&mut book.state, PhaseState::NoPhase) {
            PhaseState::InPhase { name, start } => Some(ClosedPhase {
                name,
                elapsed: start.elapsed(),
            }),
            PhaseState::NoPhase => None,
        };

        let counters = if book.counters.is_empty() {
            Vec::new()
        } else {
            book.counters.drain_top(COUNTER_DUMP_LIMIT)
        };

        if let Some(name) = next {
            book.state = PhaseState::InPhase {
                name: name.to_string(),
                start: Instant::now(),
            };
        }

        report(PhaseTransition {
            closed,
            counters,
            started: next.map(str::to_string),
        })
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
