//! OwnedQueue - a circular queue that owns its pool.

use crate::queue::Iter;
use crate::{Full, Index, Queue, QueuePool, SlotPool};

/// A circular queue that owns its node pool.
///
/// This is a convenience wrapper around [`Queue`] + [`SlotPool`] for the
/// common case of one queue with private storage. Teardown is automatic:
/// dropping the wrapper drops the pool and with it every node, sentinel
/// included.
///
/// Operations that need several queues over one pool (moving elements between
/// queues, [`Queue::merge_sorted`]) live on [`Queue`]; use the split API for
/// those.
///
/// # Example
///
/// ```
/// use ringlist::OwnedQueue;
///
/// let mut queue: OwnedQueue = OwnedQueue::with_capacity(16);
///
/// queue.push_back(b"c").unwrap();
/// queue.push_back(b"a").unwrap();
/// queue.push_back(b"b").unwrap();
///
/// queue.sort(false);
/// let values: Vec<_> = queue.iter().collect();
/// assert_eq!(values, [b"a", b"b", b"c"]);
/// ```
pub struct OwnedQueue<Idx: Index = u32> {
    pool: QueuePool<Idx>,
    queue: Queue<Idx>,
}

impl<Idx: Index> OwnedQueue<Idx> {
    /// Creates an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        // One extra slot for the sentinel.
        let mut pool = SlotPool::with_capacity(capacity + 1);
        let queue = Queue::try_new(&mut pool).expect("fresh pool has a free slot");
        Self { pool, queue }
    }

    /// Returns the number of elements. O(n), by traversal.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len(&self.pool)
    }

    /// Returns `true` if the queue holds no elements. O(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty(&self.pool)
    }

    /// Returns how many elements the pool can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity() - 1
    }

    /// Duplicates `value` in as the new first element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(..))` if the pool is exhausted.
    #[inline]
    pub fn push_front(&mut self, value: &[u8]) -> Result<Idx, Full<Box<[u8]>>> {
        self.queue.try_push_front(&mut self.pool, value)
    }

    /// Duplicates `value` in as the new last element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(..))` if the pool is exhausted.
    #[inline]
    pub fn push_back(&mut self, value: &[u8]) -> Result<Idx, Full<Box<[u8]>>> {
        self.queue.try_push_back(&mut self.pool, value)
    }

    /// Removes the first element, transferring its payload out.
    #[inline]
    pub fn pop_front(&mut self) -> Option<Box<[u8]>> {
        self.queue.pop_front(&mut self.pool)
    }

    /// Removes the last element, transferring its payload out.
    #[inline]
    pub fn pop_back(&mut self) -> Option<Box<[u8]>> {
        self.queue.pop_back(&mut self.pool)
    }

    /// [`pop_front`](OwnedQueue::pop_front) with a truncating, NUL-terminated
    /// copy into `buf`.
    #[inline]
    pub fn pop_front_into(&mut self, buf: &mut [u8]) -> Option<Box<[u8]>> {
        self.queue.pop_front_into(&mut self.pool, buf)
    }

    /// [`pop_back`](OwnedQueue::pop_back) with a truncating, NUL-terminated
    /// copy into `buf`.
    #[inline]
    pub fn pop_back_into(&mut self, buf: &mut [u8]) -> Option<Box<[u8]>> {
        self.queue.pop_back_into(&mut self.pool, buf)
    }

    /// Returns the first element's payload.
    #[inline]
    pub fn front(&self) -> Option<&[u8]> {
        self.queue.front(&self.pool)
    }

    /// Returns the last element's payload.
    #[inline]
    pub fn back(&self) -> Option<&[u8]> {
        self.queue.back(&self.pool)
    }

    /// Returns the payload at `idx`.
    #[inline]
    pub fn value(&self, idx: Idx) -> Option<&[u8]> {
        self.queue.value(&self.pool, idx)
    }

    /// Returns a double-ended iterator over payloads, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, QueuePool<Idx>, Idx> {
        self.queue.iter(&self.pool)
    }

    /// Releases every element, keeping the queue usable.
    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear(&mut self.pool);
    }

    /// Reverses the queue in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.queue.reverse(&mut self.pool);
    }

    /// Reverses each full block of `k` elements in place.
    #[inline]
    pub fn reverse_chunks(&mut self, k: usize) {
        self.queue.reverse_chunks(&mut self.pool, k);
    }

    /// Exchanges each consecutive pair of elements.
    #[inline]
    pub fn swap_pairs(&mut self) {
        self.queue.swap_pairs(&mut self.pool);
    }

    /// Removes and releases the structural middle element.
    #[inline]
    pub fn remove_middle(&mut self) -> bool {
        self.queue.remove_middle(&mut self.pool)
    }

    /// Removes every run of adjacent equal payloads.
    #[inline]
    pub fn purge_duplicates(&mut self) -> bool {
        self.queue.purge_duplicates(&mut self.pool)
    }

    /// Keeps only elements with no strictly smaller payload to their right.
    #[inline]
    pub fn retain_ascending(&mut self) -> usize {
        self.queue.retain_ascending(&mut self.pool)
    }

    /// Keeps only elements with no strictly greater payload to their right.
    #[inline]
    pub fn retain_descending(&mut self) -> usize {
        self.queue.retain_descending(&mut self.pool)
    }

    /// Sorts by lexicographic byte comparison; stable.
    #[inline]
    pub fn sort(&mut self, descend: bool) {
        self.queue.sort(&mut self.pool, descend);
    }

    /// Splits the wrapper into its pool and queue handle.
    pub fn into_parts(self) -> (QueuePool<Idx>, Queue<Idx>) {
        (self.pool, self.queue)
    }
}

impl<Idx: Index> core::fmt::Debug for OwnedQueue<Idx> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OwnedQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_roundtrip() {
        let mut queue: OwnedQueue = OwnedQueue::with_capacity(8);
        queue.push_back(b"a").unwrap();
        queue.push_back(b"b").unwrap();
        queue.push_front(b"c").unwrap();

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.front(), Some(b"c".as_slice()));
        assert_eq!(queue.back(), Some(b"b".as_slice()));

        assert_eq!(queue.pop_front().as_deref(), Some(b"c".as_slice()));
        assert_eq!(queue.pop_back().as_deref(), Some(b"b".as_slice()));
        assert_eq!(queue.pop_front().as_deref(), Some(b"a".as_slice()));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn capacity_is_honored() {
        let mut queue: OwnedQueue = OwnedQueue::with_capacity(2);
        assert_eq!(queue.capacity(), 2);

        queue.push_back(b"1").unwrap();
        queue.push_back(b"2").unwrap();
        let err = queue.push_back(b"3").unwrap_err();
        assert_eq!(&*err.into_inner(), b"3");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn transforms_delegate() {
        let mut queue: OwnedQueue = OwnedQueue::with_capacity(8);
        for v in [b"c", b"a", b"b"] {
            queue.push_back(v).unwrap();
        }

        queue.sort(false);
        let sorted: Vec<_> = queue.iter().collect();
        assert_eq!(sorted, [b"a", b"b", b"c"]);

        queue.reverse();
        let reversed: Vec<_> = queue.iter().collect();
        assert_eq!(reversed, [b"c", b"b", b"a"]);

        assert!(queue.remove_middle());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn clear_then_reuse() {
        let mut queue: OwnedQueue = OwnedQueue::with_capacity(4);
        queue.push_back(b"x").unwrap();
        queue.clear();
        assert!(queue.is_empty());

        queue.push_back(b"y").unwrap();
        assert_eq!(queue.front(), Some(b"y".as_slice()));
    }

    #[test]
    fn into_parts_keeps_state() {
        let mut queue: OwnedQueue = OwnedQueue::with_capacity(4);
        queue.push_back(b"kept").unwrap();

        let (pool, handle) = queue.into_parts();
        assert_eq!(handle.len(&pool), 1);
        assert_eq!(handle.front(&pool), Some(b"kept".as_slice()));
    }
}
