//! Property-based tests for primegen's core invariants.
//!
//! These tests use the `proptest` framework to verify invariants across
//! thousands of randomly generated inputs. Unlike example-based tests that
//! check specific known values, property tests express universal truths that
//! must hold for all valid inputs, making them excellent at finding edge cases.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! # Testing strategy
//!
//! - **Miller–Rabin**: agreement with GMP's primality test, totality over
//!   arbitrary inputs.
//! - **Candidate generation**: bit-length bound, filter soundness (a rejected
//!   draw really has a small factor, an accepted one really doesn't).
//! - **Search**: index completeness under concurrency — exactly the indices
//!   {1..count}, in delivery order, every value a probable prime.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rug::integer::IsPrime;
use rug::Integer;

use primegen::candidate::candidate_from_bytes;
use primegen::miller_rabin::is_probably_prime;
use primegen::search::{search, CollectingReporter, SearchConfig};

proptest! {
    /// Our Miller–Rabin must agree with GMP's for arbitrary u64 inputs.
    /// GMP with 25 rounds is effectively ground truth at this size, and 10
    /// rounds of ours leave a disagreement probability below 4^-10 per case.
    #[test]
    fn prop_miller_rabin_agrees_with_gmp(n in any::<u64>()) {
        let n = Integer::from(n);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let got = is_probably_prime(&n, 10, &mut rng);
        let expected = n.is_probably_prime(25) != IsPrime::No;
        prop_assert_eq!(got, expected, "disagreement with GMP at n={}", n);
    }

    /// The test is total: no input, prime or not, may panic.
    #[test]
    fn prop_miller_rabin_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
        let n = Integer::from_digits(&bytes, rug::integer::Order::Msf);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let _ = is_probably_prime(&n, 5, &mut rng);
    }

    /// An accepted candidate fits the byte width it was drawn from, is odd,
    /// and has no factor in the trial-division table; a rejected one really
    /// is even or small-factor divisible.
    #[test]
    fn prop_candidate_filter_is_sound(bytes in proptest::collection::vec(any::<u8>(), 4..32)) {
        let decoded = Integer::from_digits(&bytes, rug::integer::Order::Msf);
        match candidate_from_bytes(&bytes) {
            Some(n) => {
                prop_assert_eq!(&n, &decoded);
                prop_assert!(n.significant_bits() as usize <= bytes.len() * 8);
                prop_assert!(!primegen::has_small_factor(&n));
            }
            None => {
                prop_assert!(primegen::has_small_factor(&decoded));
            }
        }
    }

    /// Primes reported by a search pass an independent Miller–Rabin check
    /// and carry exactly the indices {1..count} in delivery order.
    #[test]
    fn prop_search_index_completeness(
        count in 1u64..4,
        workers in 1usize..6,
    ) {
        let mut config = SearchConfig::new(32, count);
        config.workers = workers;
        let reporter = CollectingReporter::new();
        let summary = search(&config, &reporter).unwrap();
        prop_assert_eq!(summary.found, count);

        let results = reporter.into_results();
        let indices: Vec<u64> = results.iter().map(|(i, _)| *i).collect();
        let expected: Vec<u64> = (1..=count).collect();
        prop_assert_eq!(indices, expected);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for (_, value) in &results {
            prop_assert!(value.significant_bits() <= 32);
            prop_assert!(is_probably_prime(value, 10, &mut rng), "{} not prime", value);
        }
    }
}

proptest! {
    // Searches spawn real worker pools; keep the case count moderate.
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Larger bit lengths: the completeness property is independent of the
    /// candidate width.
    #[test]
    fn prop_search_completeness_other_widths(
        bits_factor in 4u32..9, // 32..64 bits in steps of 8
        count in 1u64..3,
    ) {
        let config = SearchConfig::new(bits_factor * 8, count);
        let reporter = CollectingReporter::new();
        let summary = search(&config, &reporter).unwrap();
        prop_assert_eq!(summary.found, count);
        let indices: Vec<u64> = reporter.into_results().iter().map(|(i, _)| *i).collect();
        let expected: Vec<u64> = (1..=count).collect();
        prop_assert_eq!(indices, expected);
    }
}
