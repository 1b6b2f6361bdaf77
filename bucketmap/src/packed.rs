//! Packing one key/value pair into a single 64-bit word
//!
//! Buckets store entries as [`PackedEntry`] so that a whole pair fits in one
//! slot. The key occupies the upper 32 bits and the value the lower 32 bits,
//! both as the unsigned bit pattern of their signed input.

/// Pack a key and value into one word, key in the upper half.
#[inline(always)]
pub fn encode(key: i32, value: i32) -> u64 {
    (u64::from(key as u32) << 32) | u64::from(value as u32)
}

/// Recover the key from a word built by [`encode()`].
#[inline(always)]
pub fn decode_key(word: u64) -> i32 {
    (word >> 32) as u32 as i32
}

/// Recover the value from a word built by [`encode()`].
#[inline(always)]
pub fn decode_value(word: u64) -> i32 {
    word as u32 as i32
}

/// One key/value entry as stored inside a bucket
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PackedEntry(u64);

impl PackedEntry {
    /// Pack a new entry.
    #[inline(always)]
    pub fn new(key: i32, value: i32) -> Self {
        Self(encode(key, value))
    }

    /// Wrap a word previously returned by [`Self::into_inner()`].
    #[inline(always)]
    pub fn from_inner(word: u64) -> Self {
        Self(word)
    }

    /// Unwrap the packed word.
    #[inline(always)]
    pub fn into_inner(self) -> u64 {
        self.0
    }

    /// The entry's key.
    #[inline(always)]
    pub fn key(self) -> i32 {
        decode_key(self.0)
    }

    /// The entry's value.
    #[inline(always)]
    pub fn value(self) -> i32 {
        decode_value(self.0)
    }
}

#[cfg(test)]
mod test {
    use super::{decode_key, decode_value, encode, PackedEntry};

    #[test]
    fn pairs_survive_packing() {
        let pairs = [
            (0, 0),
            (1, 22),
            (99, -32),
            (-64, 4),
            (i32::MIN, i32::MIN),
            (i32::MIN, i32::MAX),
            (i32::MAX, i32::MIN),
            (i32::MAX, i32::MAX),
        ];
        for (key, value) in pairs {
            let word = encode(key, value);
            assert_eq!((decode_key(word), decode_value(word)), (key, value));

            let entry = PackedEntry::from_inner(PackedEntry::new(key, value).into_inner());
            assert_eq!((entry.key(), entry.value()), (key, value));
        }
    }

    #[test]
    fn layout_is_key_high_value_low() {
        assert_eq!(encode(1, 2), 0x0000_0001_0000_0002);
        assert_eq!(encode(-1, 0), 0xffff_ffff_0000_0000);
        assert_eq!(encode(0, -1), 0x0000_0000_ffff_ffff);
        assert_eq!(encode(i32::MIN, i32::MAX), 0x8000_0000_7fff_ffff);
    }
}
