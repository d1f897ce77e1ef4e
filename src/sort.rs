//! Merge sort and k-way merge over detached segments.
//!
//! The recursion's temporary sub-lists are [`Segment`] values: two indices on
//! the stack, cut from and spliced back into the ring. Elements move by index
//! relinking only — the sort allocates nothing and cannot fail. O(n log n)
//! time, O(log n) recursion depth.

use crate::queue::Segment;
use crate::{Index, Node, Pool, Queue};

impl<Idx: Index> Queue<Idx> {
    /// Sorts the queue by lexicographic byte comparison of payloads.
    ///
    /// `descend = false` yields non-decreasing order, `descend = true`
    /// non-increasing. The sort is stable: payloads that compare equal keep
    /// their input order.
    pub fn sort<S>(&mut self, pool: &mut S, descend: bool)
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        if self.is_empty(pool) || self.is_singleton(pool) {
            return;
        }

        let seg = self.take_all(pool);
        let sorted = sort_segment(pool, seg, descend);
        let anchor = self.anchor();
        self.splice_after(pool, anchor, sorted);
    }

    /// Merges a chain of individually-sorted queues into the first one.
    ///
    /// All queues must share `pool` and already be sorted in the requested
    /// direction. Elements move by relinking — nothing is copied — so every
    /// queue after the first ends empty. Ties across queues resolve in chain
    /// order (the merge is stable).
    ///
    /// Returns the first queue's element count after consolidation, or 0
    /// (touching nothing) when the chain holds fewer than two queues.
    pub fn merge_sorted<S>(pool: &mut S, chain: &mut [Queue<Idx>], descend: bool) -> usize
    where
        S: Pool<Node<Idx>, Index = Idx>,
    {
        if chain.len() < 2 {
            return 0;
        }

        let (first, rest) = chain.split_at_mut(1);
        let first = &mut first[0];

        let mut merged = first.take_all(pool);
        for queue in rest.iter_mut() {
            let seg = queue.take_all(pool);
            merged = merge_segments(pool, merged, seg, descend);
        }

        let anchor = first.anchor();
        first.splice_after(pool, anchor, merged);
        first.len(pool)
    }
}

/// Recursive split-sort-merge. Segments of length <= 1 are already sorted.
fn sort_segment<S, Idx: Index>(pool: &mut S, seg: Segment<Idx>, descend: bool) -> Segment<Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    if seg.is_empty() || seg.is_single() {
        return seg;
    }

    let (left, right) = seg.split_mid(pool);
    let left = sort_segment(pool, left, descend);
    let right = sort_segment(pool, right, descend);
    merge_segments(pool, left, right, descend)
}

/// Two-way merge: repeatedly moves the winning front element to the output
/// tail, then appends whatever remains of the other side in O(1).
///
/// The comparison is non-strict (`<=` / `>=`) and favors `left`, so elements
/// comparing equal keep their input order.
fn merge_segments<S, Idx: Index>(
    pool: &mut S,
    mut left: Segment<Idx>,
    mut right: Segment<Idx>,
    descend: bool,
) -> Segment<Idx>
where
    S: Pool<Node<Idx>, Index = Idx>,
{
    let mut out = Segment::empty();

    while !left.is_empty() && !right.is_empty() {
        let take_left = {
            // Safety: segment heads are live while non-empty
            let l = unsafe { pool.get_unchecked(left.head) };
            let r = unsafe { pool.get_unchecked(right.head) };
            if descend {
                l.value >= r.value
            } else {
                l.value <= r.value
            }
        };

        let idx = if take_left {
            left.pop_front(pool)
        } else {
            right.pop_front(pool)
        };
        out.push_back(pool, idx);
    }

    out.append(pool, &mut left);
    out.append(pool, &mut right);
    out
}
