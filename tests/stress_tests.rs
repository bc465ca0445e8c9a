//! Stress tests that push the heap through large and adversarial workloads
//!
//! These tests perform large numbers of operations in various patterns to
//! catch edge cases and verify correctness under load. They are written
//! against the heap traits so the same workloads apply to any decrease-key
//! heap.

use mergeable_heap::{DecreaseKeyHeap, Entry, FibonacciHeap, Item, MergeableHeap};

type IntEntry = Entry<i32, i32>;

fn pop_key<H: MergeableHeap<Item = IntEntry>>(heap: &mut H) -> Option<(i32, i32)> {
    heap.extract_min().map(Entry::into_parts)
}

/// Test massive numbers of inserts and pops
fn test_massive_operations<H: MergeableHeap<Item = IntEntry>>() {
    let mut heap = H::new();

    for i in 0..1000 {
        heap.insert(Entry::new(i, i));
    }
    assert_eq!(heap.len(), 1000);

    for i in 0..1000 {
        assert_eq!(pop_key(&mut heap), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test many decrease_key operations
fn test_many_decrease_keys<H: DecreaseKeyHeap<Item = IntEntry>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..500 {
        handles.push(heap.insert(Entry::new(10000 + i, i)));
    }
    // Build trees so that decreases actually cut
    heap.insert(Entry::new(-1, -1));
    assert_eq!(pop_key(&mut heap), Some((-1, -1)));

    for (i, handle) in handles.iter().enumerate().rev() {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
    }

    for i in 0..500 {
        assert_eq!(pop_key(&mut heap), Some((i, i)));
    }
}

/// Test alternating insert and pop
fn test_alternating_ops<H: MergeableHeap<Item = IntEntry>>() {
    let mut heap = H::new();

    for i in 0..200 {
        heap.insert(Entry::new(i * 2, i));
        heap.insert(Entry::new(i * 2 + 1, i + 1000));
        assert!(pop_key(&mut heap).is_some());
    }
    assert_eq!(heap.len(), 200);

    let mut last = i32::MIN;
    while let Some((key, _)) = pop_key(&mut heap) {
        assert!(key >= last);
        last = key;
    }
    assert!(heap.is_empty());
}

/// Test merge with large heaps
fn test_large_merge<H: MergeableHeap<Item = IntEntry>>() {
    let mut heap1 = H::new();
    let mut heap2 = H::new();

    for i in 0..500 {
        heap1.insert(Entry::new(i * 2, i));
        heap2.insert(Entry::new(i * 2 + 1, i + 1000));
    }
    pop_key(&mut heap1);
    pop_key(&mut heap2);

    let mut merged = heap1.union(heap2);
    assert_eq!(merged.len(), 998);

    let mut last = i32::MIN;
    while let Some((key, _)) = pop_key(&mut merged) {
        assert!(key >= last);
        last = key;
    }
}

/// Test delete of every other element
fn test_delete_half<H: DecreaseKeyHeap<Item = IntEntry>>() {
    let mut heap = H::new();
    let handles: Vec<_> = (0..400).map(|i| heap.insert(Entry::new(i, i))).collect();
    pop_key(&mut heap);

    for handle in handles.iter().skip(1).step_by(2) {
        assert!(heap.delete(handle).is_ok());
    }
    assert_eq!(heap.len(), 200);

    for i in (2..400).step_by(2) {
        assert_eq!(pop_key(&mut heap), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test with very large keys
fn test_large_keys<H: MergeableHeap<Item = IntEntry>>() {
    let mut heap = H::new();

    heap.insert(Entry::new(1_000_000_000, 1));
    heap.insert(Entry::new(-1_000_000_000, 2));
    heap.insert(Entry::new(i32::MAX, 3));
    heap.insert(Entry::new(i32::MIN, 4));

    assert_eq!(pop_key(&mut heap), Some((i32::MIN, 4)));
    assert_eq!(pop_key(&mut heap), Some((-1_000_000_000, 2)));
    assert_eq!(pop_key(&mut heap), Some((1_000_000_000, 1)));
    assert_eq!(pop_key(&mut heap), Some((i32::MAX, 3)));
}

#[test]
fn test_fibonacci_massive() {
    test_massive_operations::<FibonacciHeap<IntEntry>>();
}

#[test]
fn test_fibonacci_many_decrease_keys() {
    test_many_decrease_keys::<FibonacciHeap<IntEntry>>();
}

#[test]
fn test_fibonacci_alternating() {
    test_alternating_ops::<FibonacciHeap<IntEntry>>();
}

#[test]
fn test_fibonacci_large_merge() {
    test_large_merge::<FibonacciHeap<IntEntry>>();
}

#[test]
fn test_fibonacci_delete_half() {
    test_delete_half::<FibonacciHeap<IntEntry>>();
}

#[test]
fn test_fibonacci_large_keys() {
    test_large_keys::<FibonacciHeap<IntEntry>>();
}

/// Repeated decrease-key on the deepest nodes keeps every structural
/// invariant, including the degree bound, intact.
#[test]
fn test_fibonacci_cascades_keep_invariants() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..1024).map(|i| heap.insert(Entry::new(i, i))).collect();
    heap.insert(Entry::new(-1, -1));
    heap.extract_min();
    heap.check_invariants().unwrap();

    let mut next_key = -2;
    for round in 0..4 {
        for handle in handles.iter().skip(round + 1).step_by(3) {
            if !handle.is_live() {
                continue;
            }
            heap.decrease_key(handle, next_key).unwrap();
            next_key -= 1;
        }
        heap.check_invariants().unwrap();
        heap.extract_min();
        heap.check_invariants().unwrap();
    }

    let mut last = i32::MIN;
    while let Some(entry) = heap.extract_min() {
        assert!(*entry.key() >= last);
        last = *entry.key();
    }
}
