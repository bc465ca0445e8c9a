//! Mixed workloads run with `strict-invariants` enabled
//!
//! Every mutating call re-validates the whole forest and panics on the first
//! broken invariant, so these tests only need to drive the heap through
//! cuts, cascades, unions and deletes.
//!
//! ```bash
//! cargo test --features strict-invariants --test strict_invariants
//! ```

use mergeable_heap::{DecreaseKeyHeap, Entry, FibonacciHeap, Item, MergeableHeap};

type IntHeap = FibonacciHeap<Entry<i32, i32>>;

#[test]
fn test_cascades_under_strict_checks() {
    let mut heap = IntHeap::new();
    let handles: Vec<_> = (0..256).map(|k| heap.insert(Entry::new(k, k))).collect();
    heap.extract_min();

    let mut next_key = -1;
    for handle in handles.iter().skip(1).rev().step_by(2) {
        heap.decrease_key(handle, next_key).unwrap();
        next_key -= 1;
    }
    for handle in handles.iter().skip(10).step_by(7) {
        if handle.is_live() {
            heap.delete(handle).unwrap();
        }
    }

    let mut last = i32::MIN;
    while let Some(entry) = heap.extract_min() {
        assert!(*entry.key() >= last);
        last = *entry.key();
    }
}

#[test]
fn test_union_under_strict_checks() {
    let mut left = IntHeap::new();
    let mut right = IntHeap::new();
    for k in 0..100 {
        left.insert(Entry::new(k * 2, k));
        right.insert(Entry::new(k * 2 + 1, k));
    }
    left.extract_min();
    let moved = right.insert(Entry::new(500, -1));
    right.extract_min();

    let mut merged = left.union(right);
    merged.decrease_key(&moved, -5).unwrap();
    assert_eq!(merged.extract_min().map(Entry::into_parts), Some((-5, -1)));
    assert_eq!(merged.len(), 198);
}
