//! Pool traits and the fixed-capacity slot arena backing ring nodes.
//!
//! A pool hands out stable indices: an index stays valid until the slot is
//! explicitly removed, so link-based structures can store indices instead of
//! pointers and splice in O(1).
//!
//! Insertion is split by capacity model:
//!
//! ```text
//! Pool<T>              - base: get, get_mut, remove
//!     ├── BoundedPool<T>    - fixed capacity, try_insert -> Result
//!     └── UnboundedPool<T>  - growable, insert -> Idx (infallible)
//! ```
//!
//! [`SlotPool`] is the bounded implementation in this crate; `slab::Slab`
//! implements [`UnboundedPool`] behind the `slab` feature.

use core::fmt;
use core::mem;

use crate::Index;

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** get and remove
/// - **Slot reuse**: removed slots may be handed out again by later inserts
pub trait Pool<T> {
    /// Index type for this pool.
    type Index: Index;

    /// Returns a reference to the value at `idx`, if occupied.
    fn get(&self, idx: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `idx`, if occupied.
    fn get_mut(&mut self, idx: Self::Index) -> Option<&mut T>;

    /// Removes and returns the value at `idx`, if occupied.
    fn remove(&mut self, idx: Self::Index) -> Option<T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `idx` must be valid and occupied.
    unsafe fn get_unchecked(&self, idx: Self::Index) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `idx` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, idx: Self::Index) -> &mut T;
}

/// Fixed-capacity pool with fallible insertion.
pub trait BoundedPool<T>: Pool<T> {
    /// Inserts a value, returning its stable index.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if every slot is occupied.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>>;
}

/// Growable pool with infallible insertion.
pub trait UnboundedPool<T>: Pool<T> {
    /// Inserts a value, returning its stable index.
    fn insert(&mut self, value: T) -> Self::Index;
}

/// Error returned when a fixed-capacity pool has no free slot.
///
/// Carries the rejected value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// SlotPool - fixed capacity, free-list slot reuse
// =============================================================================

enum Slot<T, Idx> {
    /// Free slot, linking to the next free slot (or `Idx::NONE`).
    Vacant(Idx),
    Occupied(T),
}

/// Fixed-capacity slot arena with a LIFO free-list.
///
/// All slots are allocated up front; inserts and removes never reallocate, so
/// references handed out between operations stay at stable addresses for the
/// pool's lifetime and indices are never silently invalidated.
///
/// # Example
///
/// ```
/// use ringlist::{BoundedPool, Pool, SlotPool};
///
/// let mut pool: SlotPool<u64> = SlotPool::with_capacity(16);
///
/// let idx = pool.try_insert(42).unwrap();
/// assert_eq!(pool.get(idx), Some(&42));
///
/// assert_eq!(pool.remove(idx), Some(42));
/// assert_eq!(pool.get(idx), None);
/// ```
pub struct SlotPool<T, Idx: Index = u32> {
    slots: Vec<Slot<T, Idx>>,
    free_head: Idx,
    len: usize,
}

impl<T, Idx: Index> SlotPool<T, Idx> {
    /// Creates a pool with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or does not fit below the index type's
    /// sentinel value.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity < Idx::NONE.as_usize(),
            "capacity exceeds index type maximum"
        );

        // Free-list threads every slot, top of stack at slot 0.
        let mut slots = Vec::with_capacity(capacity);
        for i in 0..capacity {
            let next = if i + 1 == capacity {
                Idx::NONE
            } else {
                Idx::from_usize(i + 1)
            };
            slots.push(Slot::Vacant(next));
        }

        Self {
            slots,
            free_head: Idx::from_usize(0),
            len: 0,
        }
    }

    /// Returns the total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }
}

impl<T, Idx: Index> Pool<T> for SlotPool<T, Idx> {
    type Index = Idx;

    #[inline]
    fn get(&self, idx: Idx) -> Option<&T> {
        match self.slots.get(idx.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, idx: Idx) -> Option<&mut T> {
        match self.slots.get_mut(idx.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn remove(&mut self, idx: Idx) -> Option<T> {
        let slot = self.slots.get_mut(idx.as_usize())?;
        if matches!(slot, Slot::Vacant(_)) {
            return None;
        }

        let prev_free = self.free_head;
        match mem::replace(slot, Slot::Vacant(prev_free)) {
            Slot::Occupied(value) => {
                self.free_head = idx;
                self.len -= 1;
                Some(value)
            }
            // Occupancy checked above.
            Slot::Vacant(_) => unreachable!(),
        }
    }

    #[inline]
    unsafe fn get_unchecked(&self, idx: Idx) -> &T {
        debug_assert!(idx.as_usize() < self.slots.len());
        // Safety: caller guarantees idx is valid and occupied
        match unsafe { self.slots.get_unchecked(idx.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, idx: Idx) -> &mut T {
        debug_assert!(idx.as_usize() < self.slots.len());
        // Safety: caller guarantees idx is valid and occupied
        match unsafe { self.slots.get_unchecked_mut(idx.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unsafe { core::hint::unreachable_unchecked() },
        }
    }
}

impl<T, Idx: Index> BoundedPool<T> for SlotPool<T, Idx> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Idx, Full<T>> {
        let idx = self.free_head;
        if idx.is_none() {
            return Err(Full(value));
        }

        // Safety: free_head always references a vacant in-bounds slot
        let slot = unsafe { self.slots.get_unchecked_mut(idx.as_usize()) };
        match mem::replace(slot, Slot::Occupied(value)) {
            Slot::Vacant(next_free) => self.free_head = next_free,
            Slot::Occupied(_) => unreachable!("free-list pointed at occupied slot"),
        }

        self.len += 1;
        Ok(idx)
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Pool<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn get(&self, idx: usize) -> Option<&T> {
        self.get(idx)
    }

    #[inline]
    fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.get_mut(idx)
    }

    #[inline]
    fn remove(&mut self, idx: usize) -> Option<T> {
        self.try_remove(idx)
    }

    #[inline]
    unsafe fn get_unchecked(&self, idx: usize) -> &T {
        unsafe { self.get(idx).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, idx: usize) -> &mut T {
        unsafe { self.get_mut(idx).unwrap_unchecked() }
    }
}

#[cfg(feature = "slab")]
impl<T> UnboundedPool<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        self.insert(value)
    }
}
