//! Sentinel-anchored circular queue over pool storage.
//!
//! Nodes live in a user-provided pool; the queue handle holds nothing but the
//! index of its sentinel node. The sentinel is a real node whose payload is
//! empty and never observed: it closes the ring, so the empty/non-empty and
//! head/tail boundary cases need no special-casing anywhere in the splice code.
//!
//! # Ring Invariant
//!
//! At every externally observable point the structure is a simple cycle:
//! `node(n.next).prev == n` and `node(n.prev).next == n` for every node,
//! sentinel included. An empty queue's sentinel links to itself. Operations may
//! break this transiently mid-splice but restore it before returning.
//!
//! # Pool Invariant
//!
//! A queue must always be used with the pool it was created in, and an index
//! passed to an accessor must belong to this queue. This is the caller's
//! responsibility (same discipline as the `slab` crate); mixing pools or queues
//! corrupts links.
//!
//! # Example
//!
//! ```
//! use ringlist::{Queue, QueuePool};
//!
//! let mut pool: QueuePool = QueuePool::with_capacity(16);
//! let mut queue: Queue = Queue::try_new(&mut pool).unwrap();
//!
//! queue.try_push_back(&mut pool, b"alpha").unwrap();
//! queue.try_push_back(&mut pool, b"beta").unwrap();
//! queue.try_push_front(&mut pool, b"gamma").unwrap();
//!
//! assert_eq!(queue.len(&pool), 3);
//! assert_eq!(queue.front(&pool), Some(b"gamma".as_slice()));
//!
//! let popped = queue.pop_front(&mut pool).unwrap();
//! assert_eq!(&*popped, b"gamma");
//!
//! queue.destroy(&mut pool);
//! assert!(pool.is_empty());
//! ```

use core::mem;

use crate::{BoundedPool, Full, Index, Pool, SlotPool, UnboundedPool};

/// Type alias for a bounded pool of queue nodes.
pub type QueuePool<Idx = u32> = SlotPool<Node<Idx>, Idx>;

/// Type alias for an unbounded pool of queue nodes backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabQueuePool = slab::Slab<Node<usize>>;

/// A node in the ring: one owned bytestring plus its two embedded links.
///
/// Users interact with payloads through the queue's accessors; the link fields
/// are an implementation detail.
#[derive(Debug)]
pub struct Node<Idx: Index = u32> {
    pub(crate) value: Box<[u8]>,
    pub(crate) prev: Idx,
    pub(crate) next: Idx,
}

impl<Idx: Index> Node<Idx> {
    /// Creates an unlinked node owning a copy of `value`.
    #[inline]
    fn new(value: &[u8]) -> Self {
        Self {
            value: Box::from(value),
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Creates an unlinked sentinel node. Its payload stays empty and is never
    /// handed out.
    #[inline]
    fn sentinel() -> Self {
        Self {
            value: Box::default(),
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Returns the node's payload.
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// A circular queue handle: the index of its sentinel node.
///
/// The handle owns the elements linked into its ring (they are released by
/// [`clear`](Queue::clear)/[`destroy`](Queue::destroy) or transferred out by
/// the pop operations) but stores no element data and no cached length itself.
#[derive(Debug)]
pub struct Queue<Idx: Index = u32> {
    sentinel: Idx,
}

// =============================================================================
// Construction
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    /// Creates an empty queue, allocating its sentinel from a bounded pool.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(()))` if the pool has no free slot. Nothing is
    /// mutated on failure.
    pub fn try_new<S>(pool: &mut S) -> Result<Self, Full<()>>
    where
        S: BoundedPool<Node<Idx>, Index = Idx>,
    {
        let sentinel = pool.try_insert(Node::sentinel()).map_err(|_| Full(()))?;
        // Safety: just inserted
        let node = unsafe { pool.get_unchecked_mut(sentinel) };
        node.prev = sentinel;
        node.next = sentinel;
        Ok(Self { sentinel })
    }

    /// Creates an empty queue, allocating its sentinel from an unbounded pool.
    pub fn new<S>(pool: &mut S) -> Self
    where
        S: UnboundedPool<Node<Idx>, Index = Idx>,
    {
        let sentinel = pool.insert(Node::sentinel());
        // Safety: just inserted
        let node = unsafe { pool.get_unchecked_mut(sentinel) };
        node.prev = sentinel;
        node.next = sentinel;
        Self { sentinel }
    }
}

// =============================================================================
// Link primitives
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    #[inline]
    pub(crate) fn next_of<S>(&self, pool: &S, idx: Idx) -> Idx
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: idx comes from ring traversal, always live
        unsafe { pool.get_unchecked(idx) }.next
    }

    #[inline]
    pub(crate) fn prev_of<S>(&self, pool: &S, idx: Idx) -> Idx
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: idx comes from ring traversal, always live
        unsafe { pool.get_unchecked(idx) }.prev
    }

    /// Splices `idx` between two adjacent ring nodes.
    #[inline]
    pub(crate) fn link_between<S>(&mut self, pool: &mut S, idx: Idx, prev: Idx, next: Idx)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: idx was just inserted; prev/next are live ring nodes
        {
            let node = unsafe { pool.get_unchecked_mut(idx) };
            node.prev = prev;
            node.next = next;
        }
        unsafe { pool.get_unchecked_mut(prev) }.next = idx;
        unsafe { pool.get_unchecked_mut(next) }.prev = idx;
    }

    /// Unlinks `idx` from the ring. The node's own links go stale; callers
    /// either release it or relink it immediately.
    #[inline]
    pub(crate) fn unlink_node<S>(&mut self, pool: &mut S, idx: Idx)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: idx is a live ring node, so are its neighbors
        let (prev, next) = {
            let node = unsafe { pool.get_unchecked(idx) };
            (node.prev, node.next)
        };
        unsafe { pool.get_unchecked_mut(prev) }.next = next;
        unsafe { pool.get_unchecked_mut(next) }.prev = prev;
    }

    /// Unlinks `idx` and releases its slot, returning the payload.
    #[inline]
    pub(crate) fn release<S>(&mut self, pool: &mut S, idx: Idx) -> Box<[u8]>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        self.unlink_node(pool, idx);
        match pool.remove(idx) {
            Some(node) => node.value,
            None => unreachable!("ring node missing from pool"),
        }
    }
}

// =============================================================================
// Size and access
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    /// Returns `true` if the queue holds no elements. O(1).
    #[inline]
    pub fn is_empty<S>(&self, pool: &S) -> bool
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        self.next_of(pool, self.sentinel) == self.sentinel
    }

    /// Returns `true` if the queue holds exactly one element.
    #[inline]
    pub(crate) fn is_singleton<S>(&self, pool: &S) -> bool
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let first = self.next_of(pool, self.sentinel);
        first != self.sentinel && self.next_of(pool, first) == self.sentinel
    }

    /// Counts the elements by full traversal. O(n) — the handle caches
    /// nothing.
    pub fn len<S>(&self, pool: &S) -> usize
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let mut count = 0;
        let mut cur = self.next_of(pool, self.sentinel);
        while cur != self.sentinel {
            count += 1;
            cur = self.next_of(pool, cur);
        }
        count
    }

    /// Returns the first element's payload.
    #[inline]
    pub fn front<'a, S>(&self, pool: &'a S) -> Option<&'a [u8]>
    where
        S: Pool<Node<Idx>, Index = Idx>,
        Idx: 'a,
    {
        let first = self.next_of(pool, self.sentinel);
        if first == self.sentinel {
            None
        } else {
            // Safety: first is a live ring node
            Some(&*unsafe { pool.get_unchecked(first) }.value)
        }
    }

    /// Returns the last element's payload.
    #[inline]
    pub fn back<'a, S>(&self, pool: &'a S) -> Option<&'a [u8]>
    where
        S: Pool<Node<Idx>, Index = Idx>,
        Idx: 'a,
    {
        let last = self.prev_of(pool, self.sentinel);
        if last == self.sentinel {
            None
        } else {
            // Safety: last is a live ring node
            Some(&*unsafe { pool.get_unchecked(last) }.value)
        }
    }

    /// Returns the payload at `idx`, or `None` for an invalid index or the
    /// sentinel.
    #[inline]
    pub fn value<'a, S>(&self, pool: &'a S, idx: Idx) -> Option<&'a [u8]>
    where
        S: Pool<Node<Idx>, Index = Idx>,
        Idx: 'a,
    {
        if idx == self.sentinel {
            return None;
        }
        pool.get(idx).map(|node| &*node.value)
    }

    /// Returns the first element's index, or `None` if empty.
    #[inline]
    pub fn front_index<S>(&self, pool: &S) -> Option<Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let first = self.next_of(pool, self.sentinel);
        if first == self.sentinel {
            None
        } else {
            Some(first)
        }
    }

    /// Returns the last element's index, or `None` if empty.
    #[inline]
    pub fn back_index<S>(&self, pool: &S) -> Option<Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let last = self.prev_of(pool, self.sentinel);
        if last == self.sentinel {
            None
        } else {
            Some(last)
        }
    }

    /// Returns the index after `idx`, or `None` if `idx` is the last element
    /// or invalid.
    #[inline]
    pub fn next_index<S>(&self, pool: &S, idx: Idx) -> Option<Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let next = pool.get(idx)?.next;
        if next == self.sentinel {
            None
        } else {
            Some(next)
        }
    }

    /// Returns the index before `idx`, or `None` if `idx` is the first element
    /// or invalid.
    #[inline]
    pub fn prev_index<S>(&self, pool: &S, idx: Idx) -> Option<Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let prev = pool.get(idx)?.prev;
        if prev == self.sentinel {
            None
        } else {
            Some(prev)
        }
    }
}

// =============================================================================
// Insertion
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    /// Duplicates `value` into a fresh element spliced in right after the
    /// sentinel (new first element).
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(..))` carrying the duplicated payload if the pool has
    /// no free slot; the ring is not mutated.
    #[inline]
    pub fn try_push_front<S>(&mut self, pool: &mut S, value: &[u8]) -> Result<Idx, Full<Box<[u8]>>>
    where
        S: BoundedPool<Node<Idx>, Index = Idx>,
    {
        let idx = pool
            .try_insert(Node::new(value))
            .map_err(|e| Full(e.0.value))?;
        let sentinel = self.sentinel;
        let first = self.next_of(pool, sentinel);
        self.link_between(pool, idx, sentinel, first);
        Ok(idx)
    }

    /// Duplicates `value` into a fresh element spliced in right before the
    /// sentinel (new last element).
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(..))` carrying the duplicated payload if the pool has
    /// no free slot; the ring is not mutated.
    #[inline]
    pub fn try_push_back<S>(&mut self, pool: &mut S, value: &[u8]) -> Result<Idx, Full<Box<[u8]>>>
    where
        S: BoundedPool<Node<Idx>, Index = Idx>,
    {
        let idx = pool
            .try_insert(Node::new(value))
            .map_err(|e| Full(e.0.value))?;
        let sentinel = self.sentinel;
        let last = self.prev_of(pool, sentinel);
        self.link_between(pool, idx, last, sentinel);
        Ok(idx)
    }

    /// Infallible [`try_push_front`](Queue::try_push_front) for unbounded
    /// pools.
    #[inline]
    pub fn push_front<S>(&mut self, pool: &mut S, value: &[u8]) -> Idx
    where
        S: UnboundedPool<Node<Idx>, Index = Idx>,
    {
        let idx = pool.insert(Node::new(value));
        let sentinel = self.sentinel;
        let first = self.next_of(pool, sentinel);
        self.link_between(pool, idx, sentinel, first);
        idx
    }

    /// Infallible [`try_push_back`](Queue::try_push_back) for unbounded pools.
    #[inline]
    pub fn push_back<S>(&mut self, pool: &mut S, value: &[u8]) -> Idx
    where
        S: UnboundedPool<Node<Idx>, Index = Idx>,
    {
        let idx = pool.insert(Node::new(value));
        let sentinel = self.sentinel;
        let last = self.prev_of(pool, sentinel);
        self.link_between(pool, idx, last, sentinel);
        idx
    }
}

// =============================================================================
// Removal
// =============================================================================

/// Copies `value` into `buf` truncated to `buf.len() - 1` bytes, then writes a
/// terminating NUL. An empty buffer is left untouched.
fn copy_truncated(value: &[u8], buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    let n = value.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&value[..n]);
    buf[n] = 0;
}

impl<Idx: Index> Queue<Idx> {
    /// Removes the first element, transferring ownership of its payload.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_front<S>(&mut self, pool: &mut S) -> Option<Box<[u8]>>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let first = self.next_of(pool, self.sentinel);
        if first == self.sentinel {
            return None;
        }
        Some(self.release(pool, first))
    }

    /// Removes the last element, transferring ownership of its payload.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop_back<S>(&mut self, pool: &mut S) -> Option<Box<[u8]>>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let last = self.prev_of(pool, self.sentinel);
        if last == self.sentinel {
            return None;
        }
        Some(self.release(pool, last))
    }

    /// [`pop_front`](Queue::pop_front), additionally copying the payload into
    /// `buf` truncated to `buf.len() - 1` bytes with a trailing NUL.
    #[inline]
    pub fn pop_front_into<S>(&mut self, pool: &mut S, buf: &mut [u8]) -> Option<Box<[u8]>>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let value = self.pop_front(pool)?;
        copy_truncated(&value, buf);
        Some(value)
    }

    /// [`pop_back`](Queue::pop_back), additionally copying the payload into
    /// `buf` truncated to `buf.len() - 1` bytes with a trailing NUL.
    #[inline]
    pub fn pop_back_into<S>(&mut self, pool: &mut S, buf: &mut [u8]) -> Option<Box<[u8]>>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let value = self.pop_back(pool)?;
        copy_truncated(&value, buf);
        Some(value)
    }
}

// =============================================================================
// Bulk operations
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    /// Releases every element. The queue stays usable.
    pub fn clear<S>(&mut self, pool: &mut S)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let mut cur = self.next_of(pool, self.sentinel);
        while cur != self.sentinel {
            // Safety: cur came from ring traversal
            let next = unsafe { pool.get_unchecked(cur) }.next;
            pool.remove(cur);
            cur = next;
        }

        let sentinel = self.sentinel;
        // Safety: the sentinel is live for the queue's whole life
        let node = unsafe { pool.get_unchecked_mut(sentinel) };
        node.prev = sentinel;
        node.next = sentinel;
    }

    /// Releases every element and the sentinel, consuming the handle.
    pub fn destroy<S>(mut self, pool: &mut S)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        self.clear(pool);
        pool.remove(self.sentinel);
    }

    /// Detaches all elements into a NONE-terminated segment, leaving the queue
    /// empty.
    pub(crate) fn take_all<S>(&mut self, pool: &mut S) -> Segment<Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let sentinel = self.sentinel;
        let first = self.next_of(pool, sentinel);
        if first == sentinel {
            return Segment::empty();
        }
        let last = self.prev_of(pool, sentinel);

        // Safety: all four nodes are live ring nodes
        {
            let node = unsafe { pool.get_unchecked_mut(sentinel) };
            node.prev = sentinel;
            node.next = sentinel;
        }
        unsafe { pool.get_unchecked_mut(first) }.prev = Idx::NONE;
        unsafe { pool.get_unchecked_mut(last) }.next = Idx::NONE;

        Segment {
            head: first,
            tail: last,
        }
    }

    /// Splices an entire segment into the ring right after `at`, consuming the
    /// segment.
    pub(crate) fn splice_after<S>(&mut self, pool: &mut S, at: Idx, seg: Segment<Idx>)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        if seg.is_empty() {
            return;
        }
        let next = self.next_of(pool, at);

        // Safety: at/next are live ring nodes, seg head/tail live detached nodes
        unsafe { pool.get_unchecked_mut(at) }.next = seg.head;
        unsafe { pool.get_unchecked_mut(seg.head) }.prev = at;
        unsafe { pool.get_unchecked_mut(seg.tail) }.next = next;
        unsafe { pool.get_unchecked_mut(next) }.prev = seg.tail;
    }

    /// The sentinel index, for crate-internal splicing.
    #[inline]
    pub(crate) fn anchor(&self) -> Idx {
        self.sentinel
    }
}

// =============================================================================
// Iteration
// =============================================================================

impl<Idx: Index> Queue<Idx> {
    /// Returns a double-ended iterator over payloads, front to back.
    pub fn iter<'a, S>(&self, pool: &'a S) -> Iter<'a, S, Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let first = self.next_of(pool, self.sentinel);
        let (front, back) = if first == self.sentinel {
            (Idx::NONE, Idx::NONE)
        } else {
            (first, self.prev_of(pool, self.sentinel))
        };
        Iter { pool, front, back }
    }

    /// Empties the queue, returning an iterator over the removed payloads.
    ///
    /// Elements are released as the iterator is consumed; dropping the
    /// iterator releases whatever remains.
    pub fn drain<'a, S>(&mut self, pool: &'a mut S) -> Drain<'a, S, Idx>
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let seg = self.take_all(pool);
        Drain {
            pool,
            current: seg.head,
        }
    }
}

/// Iterator over payload references, front to back.
pub struct Iter<'a, S, Idx: Index> {
    pool: &'a S,
    front: Idx,
    back: Idx,
}

impl<'a, S, Idx: Index + 'a> Iterator for Iter<'a, S, Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        // Safety: ring invariants guarantee front is live
        let node = unsafe { self.pool.get_unchecked(self.front) };

        // Meet in the middle
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.front = node.next;
        }

        Some(&node.value)
    }
}

impl<'a, S, Idx: Index + 'a> DoubleEndedIterator for Iter<'a, S, Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        // Safety: ring invariants guarantee back is live
        let node = unsafe { self.pool.get_unchecked(self.back) };

        // Meet in the middle
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.back = node.prev;
        }

        Some(&node.value)
    }
}

/// Iterator that removes and returns payloads front to back.
pub struct Drain<'a, S, Idx: Index>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    pool: &'a mut S,
    current: Idx,
}

impl<S, Idx: Index> Iterator for Drain<'_, S, Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    type Item = Box<[u8]>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        // The detached node carries its own forward link.
        let node = self.pool.remove(self.current)?;
        self.current = node.next;
        Some(node.value)
    }
}

impl<S, Idx: Index> Drop for Drain<'_, S, Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    fn drop(&mut self) {
        // Exhaust remaining elements so their slots are released
        for _ in self.by_ref() {}
    }
}

// =============================================================================
// Segment - detached run used by the cut/splice algorithms
// =============================================================================

/// A detached, NONE-terminated doubly-linked run of nodes.
///
/// This is the temporary sub-list of the reorder and sort algorithms: two
/// indices on the stack, no sentinel, no pool allocation. Nodes inside keep
/// their slots; only their links change.
#[derive(Debug)]
pub(crate) struct Segment<Idx: Index> {
    pub(crate) head: Idx,
    pub(crate) tail: Idx,
}

impl<Idx: Index> Segment<Idx> {
    #[inline]
    pub(crate) const fn empty() -> Self {
        Self {
            head: Idx::NONE,
            tail: Idx::NONE,
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub(crate) fn is_single(&self) -> bool {
        self.head.is_some() && self.head == self.tail
    }

    /// Detaches the inclusive ring range `from..=to` into a segment.
    ///
    /// `from` and `to` must be payload nodes of the same ring with `to`
    /// reachable from `from`; the ring is re-closed around the gap.
    pub(crate) fn cut<S>(pool: &mut S, from: Idx, to: Idx) -> Self
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: all four nodes are live ring nodes
        let before = unsafe { pool.get_unchecked(from) }.prev;
        let after = unsafe { pool.get_unchecked(to) }.next;
        unsafe { pool.get_unchecked_mut(before) }.next = after;
        unsafe { pool.get_unchecked_mut(after) }.prev = before;
        unsafe { pool.get_unchecked_mut(from) }.prev = Idx::NONE;
        unsafe { pool.get_unchecked_mut(to) }.next = Idx::NONE;

        Self {
            head: from,
            tail: to,
        }
    }

    /// Unlinks and returns the head node, or `Idx::NONE` if empty.
    pub(crate) fn pop_front<S>(&mut self, pool: &mut S) -> Idx
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let head = self.head;
        if head.is_none() {
            return Idx::NONE;
        }

        // Safety: head is a live segment node
        let next = unsafe { pool.get_unchecked(head) }.next;
        if next.is_none() {
            self.head = Idx::NONE;
            self.tail = Idx::NONE;
        } else {
            unsafe { pool.get_unchecked_mut(next) }.prev = Idx::NONE;
            self.head = next;
        }
        unsafe { pool.get_unchecked_mut(head) }.next = Idx::NONE;
        head
    }

    /// Links a detached node at the tail.
    pub(crate) fn push_back<S>(&mut self, pool: &mut S, idx: Idx)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        // Safety: idx is a live detached node; tail is live when non-NONE
        {
            let node = unsafe { pool.get_unchecked_mut(idx) };
            node.prev = self.tail;
            node.next = Idx::NONE;
        }
        if self.tail.is_none() {
            self.head = idx;
        } else {
            unsafe { pool.get_unchecked_mut(self.tail) }.next = idx;
        }
        self.tail = idx;
    }

    /// Appends `other` in O(1), leaving it empty.
    pub(crate) fn append<S>(&mut self, pool: &mut S, other: &mut Self)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.head = other.head;
            self.tail = other.tail;
        } else {
            // Safety: both boundary nodes are live
            unsafe { pool.get_unchecked_mut(self.tail) }.next = other.head;
            unsafe { pool.get_unchecked_mut(other.head) }.prev = self.tail;
            self.tail = other.tail;
        }
        other.head = Idx::NONE;
        other.tail = Idx::NONE;
    }

    /// Reverses the segment in place by exchanging every node's links.
    pub(crate) fn reverse<S>(&mut self, pool: &mut S)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let mut cur = self.head;
        while cur.is_some() {
            // Safety: cur comes from segment traversal
            let node = unsafe { pool.get_unchecked_mut(cur) };
            let next = node.next;
            node.next = node.prev;
            node.prev = next;
            cur = next;
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Splits at the structural midpoint: the left half ends just before the
    /// slow pointer, which lands on the second of the two central nodes for
    /// even lengths. The segment must hold at least two nodes.
    pub(crate) fn split_mid<S>(self, pool: &mut S) -> (Self, Self)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        debug_assert!(self.head.is_some() && self.head != self.tail);

        let mut slow = self.head;
        let mut fast = self.head;
        loop {
            if fast.is_none() {
                break;
            }
            // Safety: fast/step come from segment traversal
            let step = unsafe { pool.get_unchecked(fast) }.next;
            if step.is_none() {
                break;
            }
            slow = unsafe { pool.get_unchecked(slow) }.next;
            fast = unsafe { pool.get_unchecked(step) }.next;
        }

        // At least one advance happened, so slow has a predecessor.
        let before = unsafe { pool.get_unchecked(slow) }.prev;
        unsafe { pool.get_unchecked_mut(before) }.next = Idx::NONE;
        unsafe { pool.get_unchecked_mut(slow) }.prev = Idx::NONE;

        (
            Self {
                head: self.head,
                tail: before,
            },
            Self {
                head: slow,
                tail: self.tail,
            },
        )
    }
}

// =============================================================================
// Test support
// =============================================================================

#[cfg(test)]
impl<Idx: Index> Queue<Idx> {
    /// Asserts the full cycle invariant: forward walk returns to the sentinel
    /// in exactly len+1 steps and every link pair is mutual.
    pub(crate) fn assert_ring<S>(&self, pool: &S)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        let mut steps = 0usize;
        let mut cur = self.sentinel;
        loop {
            let next = pool.get(cur).expect("ring node must be live").next;
            assert_eq!(
                pool.get(next).expect("next link must be live").prev,
                cur,
                "mutual link broken"
            );
            cur = next;
            steps += 1;
            assert!(steps < (1 << 24), "ring does not close");
            if cur == self.sentinel {
                break;
            }
        }
        assert_eq!(steps, self.len(pool) + 1);
    }
}


#[cfg(test)]
mod bench_cycles {
    use super::*;
    use hdrhistogram::Histogram;

    #[test]
    #[ignore]
    fn bench_push_pop_cycle() {
        const ITERATIONS: usize = 100_000;

        let mut pool: QueuePool = QueuePool::with_capacity(1024);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        // Warmup
        for _ in 0..10_000 {
            queue.try_push_back(&mut pool, b"payload").unwrap();
            queue.pop_front(&mut pool);
        }

        for _ in 0..ITERATIONS {
            let start = std::time::Instant::now();
            queue.try_push_back(&mut pool, b"payload").unwrap();
            std::hint::black_box(queue.pop_front(&mut pool));
            hist.record(start.elapsed().as_nanos() as u64).unwrap();
        }

        println!(
            "push+pop | p50: {:4} ns | p99: {:4} ns | p999: {:5} ns | max: {:6}",
            hist.value_at_quantile(0.50),
            hist.value_at_quantile(0.99),
            hist.value_at_quantile(0.999),
            hist.max(),
        );
    }
}
