//! Error types for the `bucketmap` crate

use std::collections::TryReserveError;

/// Errors that can occur while sizing or growing table storage
///
/// Truncated lookups and erasing absent keys are not errors; see
/// [`crate::HashTable::get()`] and [`crate::HashTable::erase()`].
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The allocator could not provide memory for a bucket array or
    /// for a bucket's backing buffer.
    ///
    /// Tables and sequences are left unchanged when this is returned.
    #[error("failed to allocate table storage: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// A capacity computation exceeded the range of `usize`.
    ///
    /// This happens for absurd expected capacities, or when a single
    /// bucket would need to double past the address space.
    #[error("requested capacity is too large to represent")]
    CapacityOverflow,

    /// A [`crate::HashTableBuilder`] was configured with an oversize
    /// factor of zero, which would plan for no buckets at all.
    #[error("oversize factor must be at least 1")]
    OversizeFactor,
}
