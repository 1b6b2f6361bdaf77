//! Growable sequence backing each hash table bucket
//!
//! Each bucket owns one [`Vector`]: a contiguous buffer of `Copy` items with
//! power-of-two capacity that doubles when full and never shrinks. Compared to
//! a plain [`Vec`], this gives us exact control over the growth schedule and
//! reports allocation failure as an [`Error`] instead of aborting.
//!
//! A sequence created with capacity zero holds no allocation at all until
//! the first push.

use crate::Error;
use std::fmt;
use std::mem;

/// Smallest non-zero capacity of a [`Vector`]
pub const MIN_CAPACITY: usize = 4;

/// Contiguous doubling sequence of `Copy` items
pub struct Vector<T: Copy> {
    /// Stored items; always has room for `capacity` of them
    items: Vec<T>,
    /// Number of slots reserved, zero or a power of two
    capacity: usize,
}

/// Reserve room in `items` for exactly `capacity` elements in total.
///
/// Sizes whose byte layout can't be represented are reported as
/// [`Error::CapacityOverflow`]. Only a real allocator failure becomes
/// [`Error::OutOfMemory`].
pub(crate) fn reserve_exact<T>(items: &mut Vec<T>, capacity: usize) -> Result<(), Error> {
    let bytes = capacity
        .checked_mul(mem::size_of::<T>())
        .ok_or(Error::CapacityOverflow)?;
    if bytes > isize::MAX.unsigned_abs() {
        return Err(Error::CapacityOverflow);
    }
    items.try_reserve_exact(capacity.saturating_sub(items.len()))?;
    Ok(())
}

impl<T: Copy> Vector<T> {
    /// Create a sequence with room for at least `requested_capacity` items.
    ///
    /// A request of zero allocates nothing. Anything else is rounded up to
    /// a power of two no smaller than [`MIN_CAPACITY`].
    pub fn new(requested_capacity: usize) -> Result<Self, Error> {
        if requested_capacity == 0 {
            return Ok(Self::default());
        }
        let capacity = requested_capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or(Error::CapacityOverflow)?;
        let mut items = Vec::new();
        reserve_exact(&mut items, capacity)?;
        Ok(Self { items, capacity })
    }

    /// Number of items currently stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the sequence holds no items.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of slots reserved, zero or a power of two.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// View the stored items.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over copies of the stored items, front to back.
    #[inline(always)]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, T>> {
        self.items.iter().copied()
    }

    /// Append an item, doubling capacity first if the sequence is full.
    ///
    /// On allocation failure the sequence is unchanged.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Error> {
        if self.items.len() == self.capacity {
            self.grow()?;
        }
        self.items.push(value);
        Ok(())
    }

    /// Double the reserved capacity, or reserve [`MIN_CAPACITY`] if empty.
    #[cold]
    fn grow(&mut self) -> Result<(), Error> {
        let capacity = match self.capacity {
            0 => MIN_CAPACITY,
            n => n.checked_mul(2).ok_or(Error::CapacityOverflow)?,
        };
        reserve_exact(&mut self.items, capacity)?;
        self.capacity = capacity;
        Ok(())
    }

    /// Remove and return the last item, or `None` if empty.
    ///
    /// Capacity is kept.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Look up the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline(always)]
    pub fn index(&self, index: usize) -> T {
        assert!(
            index < self.len(),
            "index {} out of range for sequence of length {}",
            index,
            self.len()
        );
        self.items[index]
    }

    /// Look up the item at `index`, if it exists.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).copied()
    }

    /// Exchange two items in place.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(
            a < self.len() && b < self.len(),
            "swap ({}, {}) out of range for sequence of length {}",
            a,
            b,
            self.len()
        );
        self.items.swap(a, b);
    }

    /// Remove the item at `index` by moving the last item into its place.
    ///
    /// This is O(1) and does not preserve order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len(),
            "swap_remove index {} out of range for sequence of length {}",
            index,
            self.len()
        );
        self.items.swap_remove(index)
    }
}

impl<T: Copy> Default for Vector<T> {
    /// An empty sequence with no allocation.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::Vector;
    use crate::{Cell, Error};

    #[test]
    fn lazy_from_empty() {
        let mut vec = Vector::<Cell>::new(0).unwrap();
        assert_eq!(vec.capacity(), 0);
        vec.push(Cell::from(50_u64)).unwrap();
        assert_eq!(vec.capacity(), 4);
        assert_eq!(vec.len(), 1);
        assert_eq!(vec.pop().and_then(Cell::as_unsigned), Some(50));
        assert!(vec.is_empty());
        assert_eq!(vec.pop(), None);
    }

    #[test]
    fn capacity_rounding() {
        assert_eq!(Vector::<u64>::new(1).unwrap().capacity(), 4);
        assert_eq!(Vector::<u64>::new(3).unwrap().capacity(), 4);
        assert_eq!(Vector::<u64>::new(5).unwrap().capacity(), 8);
        assert_eq!(Vector::<u64>::new(64).unwrap().capacity(), 64);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_requests_overflow() {
        assert!(matches!(
            Vector::<u64>::new(usize::MAX),
            Err(Error::CapacityOverflow)
        ));
        assert!(matches!(
            Vector::<u64>::new(1 << 60),
            Err(Error::CapacityOverflow)
        ));
        assert!(matches!(
            Vector::<Cell>::new(usize::MAX / 2 + 2),
            Err(Error::CapacityOverflow)
        ));
    }

    #[test]
    fn push_and_pop() {
        let mut vec = Vector::new(3).unwrap();
        assert_eq!(vec.capacity(), 4);

        for num in 0..20_i64 {
            vec.push(Cell::from(-num)).unwrap();
            assert_eq!(vec.index(num as usize).as_signed(), Some(-num));
        }
        assert_eq!(vec.len(), 20);
        assert_eq!(vec.capacity(), 32);

        while let Some(cell) = vec.pop() {
            let expected = -(vec.len() as i64);
            assert_eq!(cell.as_signed(), Some(expected));
        }
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 32);
    }

    #[test]
    fn swap_then_pop() {
        let mut vec = Vector::new(3).unwrap();
        for word in [56_u64, 57, 58] {
            vec.push(Cell::from(word)).unwrap();
        }
        vec.swap(1, 2);
        assert_eq!(vec.pop().and_then(Cell::as_unsigned), Some(57));
        assert_eq!(vec.index(0).as_unsigned(), Some(56));
        assert_eq!(vec.index(1).as_unsigned(), Some(58));
        assert_eq!(vec.len(), 2);
    }

    #[test]
    fn swap_remove_moves_last() {
        let mut vec = Vector::new(0).unwrap();
        for word in [1_u64, 2, 3, 4] {
            vec.push(word).unwrap();
        }
        assert_eq!(vec.swap_remove(1), 2);
        assert_eq!(vec.as_slice(), &[1, 4, 3]);
        assert_eq!(vec.swap_remove(2), 3);
        assert_eq!(vec.as_slice(), &[1, 4]);
        assert_eq!(vec.swap_remove(0), 1);
        assert_eq!(vec.swap_remove(0), 4);
        assert!(vec.is_empty());
    }

    #[test]
    fn checked_get() {
        let mut vec = Vector::new(4).unwrap();
        vec.push(9_u64).unwrap();
        assert_eq!(vec.get(0), Some(9));
        assert_eq!(vec.get(1), None);
        assert_eq!(format!("{:?}", vec), "[9]");
    }

    #[test]
    #[should_panic]
    fn index_past_len() {
        let mut vec = Vector::new(8).unwrap();
        vec.push(1_u64).unwrap();
        let _ = vec.index(1);
    }

    #[test]
    #[should_panic]
    fn swap_past_len() {
        let mut vec = Vector::new(8).unwrap();
        vec.push(1_u64).unwrap();
        vec.swap(0, 1);
    }
}
