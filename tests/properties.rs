//! Property tests: the queue against straightforward `Vec`/`VecDeque` models.

use std::collections::VecDeque;

use proptest::prelude::*;
use ringlist::{Queue, QueuePool};

fn small_value() -> impl Strategy<Value = Vec<u8>> {
    // Tiny alphabet and lengths so duplicates and ties actually happen.
    prop::collection::vec(b'a'..b'e', 0..4)
}

fn collect(queue: &Queue, pool: &QueuePool) -> Vec<Vec<u8>> {
    queue.iter(pool).map(|v| v.to_vec()).collect()
}

/// Checks every observable consistency property against the model: length,
/// contents, both traversal directions, the index walk, and pool accounting
/// (queue elements + sentinel, no leaked slots).
fn check_consistent(queue: &Queue, pool: &QueuePool, model: &VecDeque<Vec<u8>>) {
    assert_eq!(queue.len(pool), model.len());
    assert_eq!(queue.is_empty(pool), model.is_empty());
    assert_eq!(pool.len(), model.len() + 1);

    let expected: Vec<Vec<u8>> = model.iter().cloned().collect();
    assert_eq!(collect(queue, pool), expected);

    let backward: Vec<Vec<u8>> = queue.iter(pool).rev().map(|v| v.to_vec()).collect();
    let mut reversed = expected.clone();
    reversed.reverse();
    assert_eq!(backward, reversed);

    let mut steps = 0;
    let mut cur = queue.front_index(pool);
    while let Some(idx) = cur {
        steps += 1;
        cur = queue.next_index(pool, idx);
    }
    assert_eq!(steps, model.len());

    let mut steps = 0;
    let mut cur = queue.back_index(pool);
    while let Some(idx) = cur {
        steps += 1;
        cur = queue.prev_index(pool, idx);
    }
    assert_eq!(steps, model.len());
}

#[derive(Debug, Clone)]
enum Op {
    PushFront(Vec<u8>),
    PushBack(Vec<u8>),
    PopFront,
    PopBack,
    RemoveMiddle,
    Reverse,
    SwapPairs,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        small_value().prop_map(Op::PushFront),
        small_value().prop_map(Op::PushBack),
        Just(Op::PopFront),
        Just(Op::PopBack),
        Just(Op::RemoveMiddle),
        Just(Op::Reverse),
        Just(Op::SwapPairs),
    ]
}

proptest! {
    #[test]
    fn queue_matches_deque_model(ops in prop::collection::vec(op_strategy(), 0..48)) {
        let mut pool: QueuePool = QueuePool::with_capacity(ops.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        let mut model: VecDeque<Vec<u8>> = VecDeque::new();

        for op in ops {
            match op {
                Op::PushFront(v) => {
                    queue.try_push_front(&mut pool, &v).unwrap();
                    model.push_front(v);
                }
                Op::PushBack(v) => {
                    queue.try_push_back(&mut pool, &v).unwrap();
                    model.push_back(v);
                }
                Op::PopFront => {
                    let got = queue.pop_front(&mut pool).map(|v| v.to_vec());
                    prop_assert_eq!(got, model.pop_front());
                }
                Op::PopBack => {
                    let got = queue.pop_back(&mut pool).map(|v| v.to_vec());
                    prop_assert_eq!(got, model.pop_back());
                }
                Op::RemoveMiddle => {
                    let removed = queue.remove_middle(&mut pool);
                    prop_assert_eq!(removed, !model.is_empty());
                    if !model.is_empty() {
                        // Second of the two central elements for even length.
                        model.remove(model.len() / 2);
                    }
                }
                Op::Reverse => {
                    queue.reverse(&mut pool);
                    model = model.into_iter().rev().collect();
                }
                Op::SwapPairs => {
                    queue.swap_pairs(&mut pool);
                    let mut i = 0;
                    while i + 1 < model.len() {
                        model.swap(i, i + 1);
                        i += 2;
                    }
                }
            }
            check_consistent(&queue, &pool, &model);
        }
    }

    #[test]
    fn sort_matches_stable_model(
        values in prop::collection::vec(small_value(), 0..48),
        descend in any::<bool>(),
    ) {
        let mut pool: QueuePool = QueuePool::with_capacity(values.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &values {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        queue.sort(&mut pool, descend);

        let mut expected = values;
        if descend {
            expected.sort_by(|a, b| b.cmp(a));
        } else {
            expected.sort();
        }
        prop_assert_eq!(collect(&queue, &pool), expected.clone());
        check_consistent(&queue, &pool, &expected.into_iter().collect());
    }

    #[test]
    fn reverse_twice_is_identity(values in prop::collection::vec(small_value(), 0..32)) {
        let mut pool: QueuePool = QueuePool::with_capacity(values.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &values {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        queue.reverse(&mut pool);
        queue.reverse(&mut pool);

        prop_assert_eq!(collect(&queue, &pool), values);
    }

    #[test]
    fn reverse_chunks_matches_model(
        values in prop::collection::vec(small_value(), 0..32),
        k in 0usize..10,
    ) {
        let mut pool: QueuePool = QueuePool::with_capacity(values.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &values {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        queue.reverse_chunks(&mut pool, k);

        let mut expected = values;
        if k >= 2 {
            let full = expected.len() / k * k;
            for block in expected[..full].chunks_mut(k) {
                block.reverse();
            }
        }
        prop_assert_eq!(collect(&queue, &pool), expected.clone());
        check_consistent(&queue, &pool, &expected.into_iter().collect());
    }

    #[test]
    fn monotonic_filters_match_reference(values in prop::collection::vec(small_value(), 0..32)) {
        // Ascending filter: keep elements with nothing strictly smaller to
        // their right.
        let mut pool: QueuePool = QueuePool::with_capacity(values.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &values {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        let removed = queue.retain_ascending(&mut pool);

        let mut kept: Vec<Vec<u8>> = Vec::new();
        for v in values.iter().rev() {
            if kept.last().map_or(true, |min| v <= min) {
                kept.push(v.clone());
            }
        }
        kept.reverse();

        prop_assert_eq!(removed, values.len() - kept.len());
        prop_assert_eq!(collect(&queue, &pool), kept.clone());
        check_consistent(&queue, &pool, &kept.into_iter().collect());

        // Descending filter: mirror image.
        let mut pool: QueuePool = QueuePool::with_capacity(values.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &values {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        let removed = queue.retain_descending(&mut pool);

        let mut kept: Vec<Vec<u8>> = Vec::new();
        for v in values.iter().rev() {
            if kept.last().map_or(true, |max| v >= max) {
                kept.push(v.clone());
            }
        }
        kept.reverse();

        prop_assert_eq!(removed, values.len() - kept.len());
        prop_assert_eq!(collect(&queue, &pool), kept);
    }

    #[test]
    fn purge_duplicates_matches_reference(values in prop::collection::vec(small_value(), 0..32)) {
        let mut sorted = values;
        sorted.sort();

        let mut pool: QueuePool = QueuePool::with_capacity(sorted.len() + 1);
        let mut queue = Queue::try_new(&mut pool).unwrap();
        for v in &sorted {
            queue.try_push_back(&mut pool, v).unwrap();
        }

        let removed_any = queue.purge_duplicates(&mut pool);

        let unique: Vec<Vec<u8>> = sorted
            .iter()
            .filter(|v| sorted.iter().filter(|w| w == v).count() == 1)
            .cloned()
            .collect();

        prop_assert_eq!(removed_any, sorted.len() >= 2 && unique.len() != sorted.len());
        prop_assert_eq!(collect(&queue, &pool), unique.clone());
        check_consistent(&queue, &pool, &unique.into_iter().collect());
    }

    #[test]
    fn kway_merge_matches_model(
        inputs in prop::collection::vec(prop::collection::vec(small_value(), 0..12), 0..5),
    ) {
        let total_values: usize = inputs.iter().map(Vec::len).sum();
        let mut pool: QueuePool = QueuePool::with_capacity(total_values + inputs.len() + 1);

        let mut chain = Vec::new();
        let mut all: Vec<Vec<u8>> = Vec::new();
        for input in &inputs {
            let mut queue = Queue::try_new(&mut pool).unwrap();
            let mut sorted = input.clone();
            sorted.sort();
            for v in &sorted {
                queue.try_push_back(&mut pool, v).unwrap();
            }
            all.extend(sorted);
            chain.push(queue);
        }

        let total = Queue::merge_sorted(&mut pool, &mut chain, false);

        if chain.len() < 2 {
            prop_assert_eq!(total, 0);
        } else {
            prop_assert_eq!(total, all.len());
            all.sort();
            prop_assert_eq!(collect(&chain[0], &pool), all);
            for other in &chain[1..] {
                prop_assert!(other.is_empty(&pool));
            }
        }
    }
}
