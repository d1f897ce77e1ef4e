//! Sentinel-anchored circular queues with in-place splice algorithms.
//!
//! This crate provides a doubly-linked, circular queue of bytestring elements
//! and a family of algorithms that reorder it purely by link surgery. The key
//! design decision: separate storage from structure.
//!
//! ```text
//! Pool (SlotPool / slab) - owns the nodes, provides stable indices
//! Queue                  - a sentinel index coordinating a ring of nodes
//! ```
//!
//! Every element embeds its own `prev`/`next` index links; the queue handle is
//! nothing but the index of a sentinel node whose payload is never observed.
//! The sentinel closes the ring, so empty/non-empty and head/tail boundaries
//! need no special cases, and every algorithm here — reversal, block reversal,
//! pairwise swap, middle/duplicate deletion, monotonic filtering, stable merge
//! sort, k-way merge — is expressed as O(1) index relinking:
//!
//! - **No element is ever copied or reallocated.** Reordering changes only
//!   link fields; an element's index (and payload address) stays valid across
//!   any sequence of transforms.
//! - **No auxiliary storage proportional to queue length.** Temporary
//!   sub-lists are two stack-resident indices; the sort's only overhead is its
//!   O(log n) recursion.
//! - **Several queues can share one pool**, which is what lets the k-way merge
//!   move elements between queues without allocating.
//!
//! # Quick Start
//!
//! ```
//! use ringlist::{Queue, QueuePool};
//!
//! // The pool owns the nodes.
//! let mut pool: QueuePool = QueuePool::with_capacity(16);
//!
//! // The queue coordinates indices into the pool.
//! let mut queue: Queue = Queue::try_new(&mut pool).unwrap();
//!
//! queue.try_push_back(&mut pool, b"c").unwrap();
//! queue.try_push_back(&mut pool, b"a").unwrap();
//! queue.try_push_back(&mut pool, b"b").unwrap();
//!
//! queue.sort(&mut pool, false);
//! let values: Vec<_> = queue.iter(&pool).collect();
//! assert_eq!(values, [b"a", b"b", b"c"]);
//!
//! queue.destroy(&mut pool);
//! ```
//!
//! Prefer [`OwnedQueue`] when one queue with private storage is all you need.
//!
//! # Operations
//!
//! | Operation | Effect | Cost |
//! |-----------|--------|------|
//! | `try_push_front` / `try_push_back` | insert at either end | O(1) |
//! | `pop_front` / `pop_back` (+`_into`) | remove at either end, transfer payload | O(1) |
//! | `reverse` | flip traversal order | O(n) |
//! | `reverse_chunks(k)` | reverse each full k-block | O(n) |
//! | `swap_pairs` | exchange consecutive pairs | O(n) |
//! | `remove_middle` | delete the structural midpoint | O(n) |
//! | `purge_duplicates` | delete every adjacent-equal run | O(n) |
//! | `retain_ascending` / `retain_descending` | monotonic suffix filter | O(n) |
//! | `sort(descend)` | stable merge sort | O(n log n) |
//! | `Queue::merge_sorted` | k-way merge into the first queue | O(total · k) |
//!
//! # Pool Options
//!
//! | Pool | Capacity | Insertion | Use case |
//! |------|----------|-----------|----------|
//! | [`SlotPool`] | fixed | `try_insert -> Result` | default choice |
//! | `slab::Slab` | growable | `insert -> Idx` | size unknown up front (feature `slab`) |
//!
//! # Feature Flags
//!
//! - `slab` - [`Pool`] impl for `slab::Slab`, giving infallible insertion

#![warn(missing_docs)]

pub mod index;
pub mod owned;
pub mod pool;
pub mod queue;

mod ops;
mod sort;

pub use index::Index;
pub use owned::OwnedQueue;
pub use pool::{BoundedPool, Full, Pool, SlotPool, UnboundedPool};
pub use queue::{Drain, Iter, Node, Queue, QueuePool};

#[cfg(feature = "slab")]
pub use queue::SlabQueuePool;
