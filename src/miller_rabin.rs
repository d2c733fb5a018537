//! # Miller–Rabin — Probabilistic Primality Testing
//!
//! Classic Miller–Rabin over `rug::Integer`: write n−1 = d·2^r with d odd,
//! then for each round pick a random witness a in [2, n−2] and check the
//! sequence a^d, a^(2d), ..., a^(2^(r−1)·d) mod n. A composite n survives
//! one round with probability at most 1/4, so `rounds` iterations bound the
//! false-positive probability by 4^−rounds (the default of 10 gives roughly
//! one in a million).
//!
//! Witnesses are sampled by drawing the candidate's byte length from the
//! caller's RNG and redrawing until the value lands in [2, n−2]. Witness
//! quality does not need to be cryptographic, but each worker passes its own
//! independently seeded generator so concurrent workers never share a
//! sequence.
//!
//! ## References
//!
//! - Gary L. Miller, "Riemann's Hypothesis and Tests for Primality",
//!   Journal of Computer and System Sciences, 13(3):300–317, 1976.
//! - Michael O. Rabin, "Probabilistic Algorithm for Testing Primality",
//!   Journal of Number Theory, 12(1):128–138, 1980.

use rand::RngCore;
use rug::integer::Order;
use rug::Integer;

/// Default number of Miller–Rabin rounds. Error probability ≤ 4^−10.
pub const DEFAULT_ROUNDS: u32 = 10;

/// Draw a witness uniformly from [2, n−2] by sampling n's byte length and
/// redrawing out-of-range values.
fn draw_witness<R: RngCore>(rng: &mut R, buf: &mut [u8], n_minus_2: &Integer) -> Integer {
    loop {
        rng.fill_bytes(buf);
        let a = Integer::from_digits(buf, Order::Msf);
        if a >= 2u32 && a <= *n_minus_2 {
            return a;
        }
    }
}

/// Miller–Rabin probable-prime test with `rounds` random witnesses.
///
/// Total over all non-negative n: 0 and 1 are composite, 2 and 3 prime,
/// other evens composite. Returns true if n passes every round (probable
/// prime), false as soon as any round proves n composite.
pub fn is_probably_prime<R: RngCore>(n: &Integer, rounds: u32, rng: &mut R) -> bool {
    if *n < 2u32 {
        return false;
    }
    if *n == 2u32 || *n == 3u32 {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = d * 2^r with d odd
    let n_minus_1 = Integer::from(n - 1u32);
    let r = n_minus_1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n_minus_1 >> r);

    let n_minus_2 = Integer::from(n - 2u32);
    let num_bytes = n.significant_bits().div_ceil(8) as usize;
    let mut buf = vec![0u8; num_bytes];

    'rounds: for _ in 0..rounds {
        let a = draw_witness(rng, &mut buf, &n_minus_2);
        // Exponent d is positive, so pow_mod cannot fail
        let mut x = a
            .pow_mod(&d, n)
            .expect("pow_mod with positive exponent is infallible");
        if x == 1u32 || x == n_minus_1 {
            continue 'rounds;
        }
        for _ in 1..r {
            x = x.square() % n;
            if x == 1u32 {
                // A nontrivial square root of 1 exists — n is composite
                return false;
            }
            if x == n_minus_1 {
                continue 'rounds;
            }
        }
        // Never reached n−1: composite
        return false;
    }
    true
}
