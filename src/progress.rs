//! # Progress — Atomic Search Progress Counters
//!
//! Thread-safe progress tracking shared between the search workers and the
//! background status reporter. Counters are plain atomics so the workers
//! never contend on a lock just to bump a statistic; `found` is additionally
//! incremented under the claim lock as part of accepting a prime, so it can
//! never run ahead of the results actually delivered.
//!
//! A dedicated reporter thread logs tested count, found count and rate every
//! 10 seconds while a long search is running, and shuts down cleanly via the
//! `shutdown` flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(10);

pub struct Progress {
    /// Candidates that reached the Miller–Rabin test.
    pub tested: AtomicU64,
    /// Primes accepted and assigned an index.
    pub found: AtomicU64,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Spawn the background reporter thread. It wakes every interval, logs
    /// current throughput, and exits once `stop` has been called.
    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(REPORT_INTERVAL);
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.log_status();
        })
    }

    pub fn log_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            tested,
            found,
            rate = format_args!("{:.1}/s", rate),
            elapsed = format_args!("{:.1}s", elapsed.as_secs_f64()),
            "search progress"
        );
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
