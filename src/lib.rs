pub mod candidate;
pub mod miller_rabin;
pub mod progress;
pub mod search;

use rug::Integer;

/// Trait for result sinks. The search engine hands each accepted prime to a
/// reporter as `(index, value)`, in the order indices are claimed. The console
/// reporter in the binary prints them; tests collect them.
pub trait Reporter: Send + Sync {
    fn report(&self, index: u64, value: &Integer);
}

/// Small primes below 100 for trial division pre-filter.
pub const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Quick check if n is divisible by any small prime.
/// Returns true if n is definitely composite (has a small factor).
/// Returns false if n might be prime (passed trial division).
pub fn has_small_factor(n: &Integer) -> bool {
    for &p in &SMALL_PRIMES {
        if n.is_divisible_u(p) {
            // If n equals the small prime itself, it's prime, not composite
            return n > &Integer::from(p);
        }
    }
    false
}
