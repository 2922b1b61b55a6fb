//! Logging setup and per-run fetch counters

use crate::worker::FetchOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout carries only the result line. The filter is
/// read from `RUST_LOG` and defaults to warnings.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Outcome counters shared by all workers of a run
#[derive(Debug, Default)]
pub struct FetchStats {
    digested: AtomicU64,
    status_errors: AtomicU64,
    timeouts: AtomicU64,
    transport_errors: AtomicU64,
    body_errors: AtomicU64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &FetchOutcome) {
        let (counter, name) = match outcome {
            FetchOutcome::Digest(_) => (&self.digested, "digested"),
            FetchOutcome::Status(_) => (&self.status_errors, "status_errors"),
            FetchOutcome::Timeout => (&self.timeouts, "timeouts"),
            FetchOutcome::Unknown => (&self.transport_errors, "transport_errors"),
            FetchOutcome::Body(_) => (&self.body_errors, "body_errors"),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = name, "Metric incremented");
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            digested: self.digested.load(Ordering::Relaxed),
            status_errors: self.status_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            body_errors: self.body_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub digested: u64,
    pub status_errors: u64,
    pub timeouts: u64,
    pub transport_errors: u64,
    pub body_errors: u64,
}

impl StatsSnapshot {
    pub fn failed(&self) -> u64 {
        self.status_errors + self.timeouts + self.transport_errors + self.body_errors
    }

    pub fn total(&self) -> u64 {
        self.digested + self.failed()
    }
}
