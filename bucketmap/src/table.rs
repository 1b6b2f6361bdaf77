//! Multi-value hash table over packed key/value buckets
//!
//! The table is an array of [`Vector`] buckets. A key's bucket is chosen with
//! [`hash::bucket_index()`] over the top bits of a Fibonacci hash, and each
//! entry is stored as one [`PackedEntry`] word in that bucket.
//!
//! The bucket count is planned once at construction from the expected number
//! of entries and never changes afterwards. Inserting far beyond the plan
//! still works, but every bucket chain gets longer in proportion.

use crate::hash::{self, plan_buckets};
use crate::packed::PackedEntry;
use crate::vector::{self, Vector};
use crate::Error;

/// Default ratio of buckets to expected entries, rounded up to a power of two
pub const OVERSIZE_FACTOR: usize = 2;

/// Default requested capacity of each bucket's sequence
pub const BUCKET_CAPACITY: usize = 4;

/// Hash table from `i32` keys to any number of `i32` values each
///
/// Duplicate keys are kept: every [`Self::put()`] adds a new entry. Lookups
/// write all values stored under a key into a caller-provided buffer and
/// report the true number of matches, which may be larger than the buffer.
///
/// Values under one key come back in a stable order between mutations, but
/// that order is not insertion order and [`Self::erase()`] may reorder the
/// remaining entries of a bucket.
///
/// The table has a single owner and is not internally synchronized. To share
/// it between threads, wrap the whole table in one [`std::sync::Mutex`].
#[derive(Debug)]
pub struct HashTable {
    /// Total number of entries across all buckets
    element_count: usize,
    /// Base 2 logarithm of `buckets.len()`
    bucket_count_log2: u32,
    /// One sequence of packed entries per bucket
    buckets: Box<[Vector<PackedEntry>]>,
    /// Set once we have logged that the table outgrew its bucket plan
    overload_reported: bool,
}

impl HashTable {
    /// Make a new table sized for `expected_capacity` entries, using the
    /// default options.
    ///
    /// Equivalent to `HashTableBuilder::new().build(expected_capacity)`.
    pub fn new(expected_capacity: usize) -> Result<Self, Error> {
        HashTableBuilder::new().build(expected_capacity)
    }

    /// Start a [`HashTableBuilder`] to customize table sizing.
    pub fn builder() -> HashTableBuilder {
        HashTableBuilder::new()
    }

    /// The bucket a key belongs to.
    #[inline(always)]
    fn bucket(&self, key: i32) -> &Vector<PackedEntry> {
        &self.buckets[hash::bucket_index(key, self.bucket_count_log2)]
    }

    /// Mutable access to the bucket a key belongs to.
    #[inline(always)]
    fn bucket_mut(&mut self, key: i32) -> &mut Vector<PackedEntry> {
        &mut self.buckets[hash::bucket_index(key, self.bucket_count_log2)]
    }

    /// Insert one `(key, value)` entry.
    ///
    /// Existing entries for `key` are kept, including ones with the same
    /// value. Fails only if the bucket needs to grow and allocation fails,
    /// in which case the table is unchanged.
    pub fn put(&mut self, key: i32, value: i32) -> Result<(), Error> {
        self.bucket_mut(key).push(PackedEntry::new(key, value))?;
        self.element_count += 1;
        if !self.overload_reported && self.element_count > self.buckets.len() {
            self.overload_reported = true;
            log::warn!(
                "hash table holds {} entries in {} buckets; bucket count is fixed, so chains will keep growing",
                self.element_count,
                self.buckets.len()
            );
        }
        Ok(())
    }

    /// Iterate over all values stored under `key`.
    ///
    /// Yields values in the same order [`Self::get()`] writes them.
    pub fn values(&self, key: i32) -> impl Iterator<Item = i32> + '_ {
        self.bucket(key)
            .iter()
            .filter(move |entry| entry.key() == key)
            .map(PackedEntry::value)
    }

    /// Look up the values stored under `key`.
    ///
    /// Writes up to `out.len()` values to the front of `out` and returns the
    /// total number of matching entries. If that number exceeds `out.len()`,
    /// the result was truncated: calling again with a buffer at least that
    /// long returns the complete set in the same order, as long as the
    /// table was not modified in between.
    pub fn get(&self, key: i32, out: &mut [i32]) -> usize {
        let mut matched = 0;
        for value in self.values(key) {
            if let Some(slot) = out.get_mut(matched) {
                *slot = value;
            }
            matched += 1;
        }
        matched
    }

    /// Check whether any entry exists for `key`.
    pub fn contains_key(&self, key: i32) -> bool {
        self.values(key).next().is_some()
    }

    /// Remove every entry stored under `key`.
    ///
    /// Returns the number of entries removed, zero if the key was absent.
    /// Removal moves the last entry of the bucket into each vacated slot,
    /// so the order of other entries in the same bucket may change.
    pub fn erase(&mut self, key: i32) -> usize {
        let bucket = self.bucket_mut(key);
        let mut removed = 0;
        let mut item = 0;
        while let Some(entry) = bucket.get(item) {
            if entry.key() == key {
                // The entry swapped into `item` hasn't been checked yet
                let _ = bucket.swap_remove(item);
                removed += 1;
            } else {
                item += 1;
            }
        }
        self.element_count -= removed;
        if removed > 0 {
            log::trace!("erased {} entries for key {}", removed, key);
        }
        removed
    }

    /// Number of entries in the table, counting duplicates.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.element_count
    }

    /// Check whether the table holds no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.element_count == 0
    }

    /// Number of buckets, fixed at construction.
    #[inline(always)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.element_count as f64 / self.buckets.len() as f64
    }

    /// Length of the longest bucket chain.
    pub fn max_bucket_len(&self) -> usize {
        self.buckets.iter().map(Vector::len).max().unwrap_or(0)
    }

    /// Release the table and all bucket storage.
    ///
    /// Dropping the table does the same; this form just makes the end of
    /// the table's lifetime explicit at the call site.
    pub fn free(self) {
        log::debug!(
            "freeing hash table with {} entries in {} buckets",
            self.element_count,
            self.buckets.len()
        );
    }
}

/// A builder for [`HashTable`] instances with custom sizing
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HashTableBuilder {
    /// Buckets planned per expected entry
    oversize_factor: usize,
    /// Requested capacity for each bucket at construction
    bucket_capacity: usize,
}

impl Default for HashTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashTableBuilder {
    /// Create a new [`HashTableBuilder`] with default settings.
    ///
    /// Immediately calling [`Self::build()`] would be equivalent to using
    /// [`HashTable::new()`].
    pub fn new() -> Self {
        Self {
            oversize_factor: OVERSIZE_FACTOR,
            bucket_capacity: BUCKET_CAPACITY,
        }
    }

    /// Plan this many buckets per expected entry before rounding up to a
    /// power of two.
    ///
    /// Larger factors trade memory for shorter chains. Zero is rejected
    /// by [`Self::build()`].
    pub fn oversize_factor(&mut self, factor: usize) -> &mut Self {
        self.oversize_factor = factor;
        self
    }

    /// Select the capacity each bucket is created with.
    ///
    /// With zero, buckets allocate nothing until their first entry.
    pub fn bucket_capacity(&mut self, capacity: usize) -> &mut Self {
        self.bucket_capacity = capacity;
        self
    }

    /// Build an empty [`HashTable`] sized for `expected_capacity` entries.
    ///
    /// Every bucket is constructed up front. Fails with
    /// [`Error::OutOfMemory`] if that allocation fails, or with
    /// [`Error::CapacityOverflow`] if the bucket count can't be represented.
    pub fn build(&self, expected_capacity: usize) -> Result<HashTable, Error> {
        let (bucket_count, bucket_count_log2) =
            plan_buckets(expected_capacity, self.oversize_factor)?;

        let mut buckets = Vec::new();
        vector::reserve_exact(&mut buckets, bucket_count)?;
        for _ in 0..bucket_count {
            buckets.push(Vector::new(self.bucket_capacity)?);
        }

        log::debug!(
            "new hash table for {} expected entries: {} buckets of capacity {}",
            expected_capacity,
            bucket_count,
            self.bucket_capacity
        );
        Ok(HashTable {
            element_count: 0,
            bucket_count_log2,
            buckets: buckets.into_boxed_slice(),
            overload_reported: false,
        })
    }
}
