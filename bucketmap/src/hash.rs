//! Fibonacci hashing and bucket count planning
//!
//! Keys are multiplied by an odd constant close to `2^64 / φ` and the top
//! bits of the product select the bucket. Sequential or clustered keys end
//! up spread over the whole domain, and the domain size is always a power
//! of two so no division is needed.

use crate::Error;

/// Odd multiplier nearest to `2^64` divided by the golden ratio
pub const MULTIPLIER: u64 = 11_400_714_819_323_198_485;

/// Number of bits in the hashed word
const WORD_BITS: u32 = u64::BITS;

/// Hash a 64-bit key into the range `0 .. 2^domain_bits`.
///
/// A domain of zero bits maps every key to zero.
///
/// # Panics
///
/// Panics if `domain_bits` is larger than 64.
#[inline(always)]
pub fn fibonacci_hash(key: u64, domain_bits: u32) -> u64 {
    assert!(domain_bits <= WORD_BITS);
    match domain_bits {
        0 => 0,
        bits => key.wrapping_mul(MULTIPLIER) >> (WORD_BITS - bits),
    }
}

/// Pick the bucket for a table key in a table of `2^domain_bits` buckets.
///
/// The key is sign-extended to 64 bits before hashing.
#[inline(always)]
pub fn bucket_index(key: i32, domain_bits: u32) -> usize {
    fibonacci_hash(i64::from(key) as u64, domain_bits) as usize
}

/// Choose a power-of-two bucket count for `expected_capacity` entries.
///
/// Returns the bucket count and its base 2 logarithm. The count is the
/// smallest power of two holding `max(expected_capacity, 1) * oversize`.
pub(crate) fn plan_buckets(
    expected_capacity: usize,
    oversize: usize,
) -> Result<(usize, u32), Error> {
    if oversize == 0 {
        return Err(Error::OversizeFactor);
    }
    let count = expected_capacity
        .max(1)
        .checked_mul(oversize)
        .and_then(usize::checked_next_power_of_two)
        .ok_or(Error::CapacityOverflow)?;
    Ok((count, count.trailing_zeros()))
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::{bucket_index, fibonacci_hash, plan_buckets};
    use crate::Error;

    #[test]
    fn one_bit_domain_is_balanced() {
        let total = 1000_u64;
        let mut diff = 0_i64;
        for key in 0..total {
            match fibonacci_hash(key, 1) {
                0 => diff -= 1,
                1 => diff += 1,
                other => panic!("hashed {} outside the domain: {}", key, other),
            }
        }
        assert!(diff.unsigned_abs() <= total / 4, "skewed by {}", diff);
    }

    #[test]
    fn stays_inside_domain() {
        for bits in 0..=16 {
            for key in -500..500 {
                assert!(bucket_index(key, bits) < (1 << bits));
            }
        }
        assert_eq!(fibonacci_hash(u64::MAX, 0), 0);
        assert_eq!(fibonacci_hash(1, 64), super::MULTIPLIER);
    }

    #[test]
    fn negative_keys_are_sign_extended() {
        assert_eq!(bucket_index(-1, 10), fibonacci_hash(u64::MAX, 10) as usize);
        assert_eq!(
            bucket_index(i32::MIN, 20),
            fibonacci_hash(0xffff_ffff_8000_0000, 20) as usize
        );
    }

    #[test]
    fn bucket_planning() {
        assert_eq!(plan_buckets(0, 2).unwrap(), (2, 1));
        assert_eq!(plan_buckets(1, 2).unwrap(), (2, 1));
        assert_eq!(plan_buckets(10, 2).unwrap(), (32, 5));
        assert_eq!(plan_buckets(20, 2).unwrap(), (64, 6));
        assert_eq!(plan_buckets(16, 2).unwrap(), (32, 5));
        assert_eq!(plan_buckets(16, 1).unwrap(), (16, 4));
        assert!(matches!(plan_buckets(10, 0), Err(Error::OversizeFactor)));
        assert!(matches!(
            plan_buckets(usize::MAX, 2),
            Err(Error::CapacityOverflow)
        ));
    }
}
