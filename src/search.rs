//! # Search — Concurrent Probable-Prime Search Coordinator
//!
//! Fans candidate generation and Miller–Rabin testing out across a pool of
//! long-running workers, assigns each accepted prime a stable sequential
//! index, and stops every worker once the requested count is reached.
//!
//! ## Claim Protocol
//!
//! The only shared mutable state is the `(next_index, cancelled)` pair inside
//! `ClaimState`, guarded by one mutex. Generation and testing happen entirely
//! outside the lock; a worker takes the lock only to claim an index for a
//! prime it has already verified. Under the lock it re-checks cancellation
//! (a prime arriving after the target is filled is discarded), assigns the
//! index, reports the result while still holding the lock — so delivery
//! order is exactly claim order — and sets the cancellation flag when the
//! incremented counter passes the target.
//!
//! An `AtomicBool` mirrors the cancelled field for cheap polling outside the
//! lock. It is only ever written while the lock is held, so the pair can
//! never disagree in a way a claim could observe.
//!
//! ## Cancellation
//!
//! Cooperative: workers poll the flag before generating and again before
//! claiming; there is no preemption, so a worker mid-test finishes that one
//! test before noticing. That wastes at most one test per worker after the
//! target is reached, which is bounded and harmless.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rug::Integer;
use tracing::debug;

use crate::candidate::CandidateSource;
use crate::miller_rabin::{self, is_probably_prime};
use crate::progress::Progress;
use crate::Reporter;

/// Search parameters, validated before any worker launches.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Candidate bit length. Must be a multiple of 8 and at least 32.
    pub bits: u32,
    /// Number of primes to find. Must be at least 1.
    pub count: u64,
    /// Miller–Rabin rounds per candidate.
    pub mr_rounds: u32,
    /// Worker count; 0 means the rayon pool width.
    pub workers: usize,
}

impl SearchConfig {
    pub fn new(bits: u32, count: u64) -> Self {
        SearchConfig {
            bits,
            count,
            mr_rounds: miller_rabin::DEFAULT_ROUNDS,
            workers: 0,
        }
    }

    /// Reject invalid parameters before the search starts. These are the
    /// only fatal errors in the engine; everything after validation either
    /// produces `count` primes or keeps searching.
    pub fn validate(&self) -> Result<()> {
        if self.bits < 32 || self.bits % 8 != 0 {
            bail!(
                "bit length must be a multiple of 8 and at least 32, got {}",
                self.bits
            );
        }
        if self.count < 1 {
            bail!("prime count must be at least 1");
        }
        if self.mr_rounds < 1 {
            bail!("Miller-Rabin rounds must be at least 1");
        }
        Ok(())
    }
}

/// Outcome of a completed search.
#[derive(Clone, Debug)]
pub struct SearchSummary {
    /// Primes found (always equals the requested count).
    pub found: u64,
    /// Candidates that reached the Miller–Rabin test.
    pub tested: u64,
    /// Wall-clock duration of the search.
    pub elapsed: Duration,
}

/// Index counter and cancellation flag, always mutated together under the
/// coordinator's lock.
struct ClaimState {
    /// Next index to assign; starts at 1.
    next_index: u64,
    cancelled: bool,
}

struct Coordinator {
    claims: Mutex<ClaimState>,
    /// Mirror of `ClaimState::cancelled` for lock-free polling.
    cancelled: AtomicBool,
}

impl Coordinator {
    fn new() -> Self {
        Coordinator {
            claims: Mutex::new(ClaimState {
                next_index: 1,
                cancelled: false,
            }),
            cancelled: AtomicBool::new(false),
        }
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// One worker: generate, filter, test, claim — until cancellation.
    fn run_worker(
        &self,
        worker_id: usize,
        config: &SearchConfig,
        reporter: &dyn Reporter,
        progress: &Progress,
    ) {
        let mut source = CandidateSource::new(config.bits);
        let mut witness_rng = ChaCha8Rng::from_entropy();
        let mut claimed = 0u64;

        while !self.is_cancelled() {
            // Rejected draws are routine; just draw again
            let Some(candidate) = source.generate() else {
                continue;
            };
            progress.tested.fetch_add(1, Ordering::Relaxed);
            if !is_probably_prime(&candidate, config.mr_rounds, &mut witness_rng) {
                continue;
            }
            if !self.claim_and_report(&candidate, config.count, reporter, progress) {
                break;
            }
            claimed += 1;
        }
        debug!(worker_id, claimed, "worker exiting");
    }

    /// Claim the next index for a verified prime. Returns false if the
    /// search was already cancelled (the candidate is discarded).
    fn claim_and_report(
        &self,
        candidate: &Integer,
        count: u64,
        reporter: &dyn Reporter,
        progress: &Progress,
    ) -> bool {
        let mut claims = self.claims.lock().unwrap();
        if claims.cancelled {
            return false;
        }
        let index = claims.next_index;
        claims.next_index += 1;
        progress.found.fetch_add(1, Ordering::Relaxed);
        // Report under the lock: delivery order must match claim order
        reporter.report(index, candidate);
        if claims.next_index > count {
            claims.cancelled = true;
            self.cancelled.store(true, Ordering::Relaxed);
        }
        true
    }
}

/// Find `config.count` probable primes of `config.bits` bits, delivering
/// each `(index, value)` pair to `reporter` in claim order. Returns once all
/// workers have observed cancellation and exited.
pub fn search(config: &SearchConfig, reporter: &dyn Reporter) -> Result<SearchSummary> {
    let progress = Progress::new();
    search_with_progress(config, reporter, &progress)
}

/// Like [`search`], but updating shared progress counters so a caller can
/// run a background status reporter while the search is live.
pub fn search_with_progress(
    config: &SearchConfig,
    reporter: &dyn Reporter,
    progress: &Arc<Progress>,
) -> Result<SearchSummary> {
    config.validate()?;

    let workers = if config.workers == 0 {
        rayon::current_num_threads()
    } else {
        config.workers
    };
    debug!(
        workers,
        bits = config.bits,
        count = config.count,
        mr_rounds = config.mr_rounds,
        "starting search"
    );

    let start = Instant::now();
    let coordinator = Coordinator::new();
    let coordinator = &coordinator;
    rayon::scope(|s| {
        for worker_id in 0..workers {
            let progress = Arc::clone(progress);
            s.spawn(move |_| coordinator.run_worker(worker_id, config, reporter, &progress));
        }
    });

    let found = {
        let claims = coordinator.claims.lock().unwrap();
        claims.next_index - 1
    };
    Ok(SearchSummary {
        found,
        tested: progress.tested.load(Ordering::Relaxed),
        elapsed: start.elapsed(),
    })
}

/// Reporter that buffers results in memory, in delivery order. Used by the
/// test suites and by callers that want the primes as a `Vec` afterwards.
#[derive(Default)]
pub struct CollectingReporter {
    results: Mutex<Vec<(u64, Integer)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results in the order they were delivered.
    pub fn into_results(self) -> Vec<(u64, Integer)> {
        self.results.into_inner().unwrap()
    }

    pub fn results(&self) -> Vec<(u64, Integer)> {
        self.results.lock().unwrap().clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, index: u64, value: &Integer) {
        self.results.lock().unwrap().push((index, value.clone()));
    }
}
