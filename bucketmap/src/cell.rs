//! Untyped 64-bit storage slot
//!
//! A [`Cell`] holds one machine word in one of three interpretations. The
//! variant is recorded, so a reader asking for the wrong interpretation gets
//! `None` instead of reinterpreting bits.

/// One word of storage: an address, an unsigned word, or a signed word
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Cell {
    /// A memory address. Never dereferenced by this crate.
    Address(usize),
    /// An unsigned 64-bit word.
    Unsigned(u64),
    /// A signed 64-bit word.
    Signed(i64),
}

impl Cell {
    /// Store the address of a pointer.
    ///
    /// Only the address is kept, so the cell has no lifetime tie to
    /// the pointee and the caller stays responsible for its validity.
    #[inline(always)]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self::Address(ptr as usize)
    }

    /// Recover a pointer, if this cell holds an address.
    #[inline(always)]
    pub fn as_ptr<T>(self) -> Option<*const T> {
        match self {
            Self::Address(addr) => Some(addr as *const T),
            _ => None,
        }
    }

    /// Get the unsigned word, if this cell holds one.
    #[inline(always)]
    pub fn as_unsigned(self) -> Option<u64> {
        match self {
            Self::Unsigned(word) => Some(word),
            _ => None,
        }
    }

    /// Get the signed word, if this cell holds one.
    #[inline(always)]
    pub fn as_signed(self) -> Option<i64> {
        match self {
            Self::Signed(word) => Some(word),
            _ => None,
        }
    }
}

impl From<u64> for Cell {
    #[inline(always)]
    fn from(word: u64) -> Self {
        Self::Unsigned(word)
    }
}

impl From<i64> for Cell {
    #[inline(always)]
    fn from(word: i64) -> Self {
        Self::Signed(word)
    }
}
