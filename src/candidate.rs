//! # Candidate — Random Candidate Generation
//!
//! Produces random odd integers of a requested bit width for the search
//! workers, with a cheap trial-division filter applied before the expensive
//! Miller–Rabin test. Generation is expected to fail often (roughly 80% of
//! uniform draws have a factor below 100), so rejection is signaled with
//! `None` rather than an error, and the worker simply draws again. Keeping
//! the retry loop in the worker rather than here bounds the latency of each
//! call and lets the worker interleave cancellation checks between attempts.
//!
//! Candidate bytes come from the operating system CSPRNG (`OsRng`). Each
//! worker owns its own `CandidateSource`, so generation never blocks on a
//! shared random handle.

use rand::rngs::OsRng;
use rand::RngCore;
use rug::integer::Order;
use rug::Integer;

use crate::has_small_factor;

/// Interpret `bytes` as an unsigned big-endian integer and apply the
/// trial-division pre-filter. Returns `None` if the value is even or has
/// a factor in the small-prime table (unless it *is* that small prime).
pub fn candidate_from_bytes(bytes: &[u8]) -> Option<Integer> {
    let num = Integer::from_digits(bytes, Order::Msf);
    if has_small_factor(&num) {
        None
    } else {
        Some(num)
    }
}

/// Per-worker candidate generator for a fixed bit length.
///
/// Holds a reusable byte buffer of `bits / 8` bytes refilled from the OS
/// CSPRNG on each call. Created once per worker and reused for every attempt.
pub struct CandidateSource {
    buf: Vec<u8>,
}

impl CandidateSource {
    /// Create a source for `bits`-bit candidates. `bits` must be a positive
    /// multiple of 8 (enforced upstream by `SearchConfig::validate`).
    pub fn new(bits: u32) -> Self {
        debug_assert!(bits >= 8 && bits % 8 == 0, "bit length must be a multiple of 8");
        CandidateSource {
            buf: vec![0u8; (bits / 8) as usize],
        }
    }

    /// Draw one candidate. Returns `None` when the draw is rejected by the
    /// pre-filter; the caller re-invokes to try again.
    pub fn generate(&mut self) -> Option<Integer> {
        OsRng.fill_bytes(&mut self.buf);
        candidate_from_bytes(&self.buf)
    }

    /// The bit width this source was configured for.
    pub fn bits(&self) -> u32 {
        self.buf.len() as u32 * 8
    }
}
