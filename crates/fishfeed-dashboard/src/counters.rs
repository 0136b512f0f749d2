//! Request counters shared by the HTML and JSON surfaces.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestCounters {
    pub calculations: AtomicU64,
    pub predictions: AtomicU64,
    pub not_found: AtomicU64,
    pub bad_requests: AtomicU64,
    pub model_unavailable: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub calculations: u64,
    pub predictions: u64,
    pub not_found: u64,
    pub bad_requests: u64,
    pub model_unavailable: u64,
}

impl RequestCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            calculations: self.calculations.load(Ordering::Relaxed),
            predictions: self.predictions.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            bad_requests: self.bad_requests.load(Ordering::Relaxed),
            model_unavailable: self.model_unavailable.load(Ordering::Relaxed),
        }
    }
}
