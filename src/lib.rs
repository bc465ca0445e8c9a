//! Mergeable priority queues for Rust
//!
//! This crate provides a Fibonacci heap: a forest of heap-ordered trees that
//! supports cheap union and cheap key decrease, the operations that make
//! Dijkstra's shortest paths and Prim's minimum spanning trees fast.
//!
//! # Complexity
//!
//! | Operation      | Amortized |
//! |----------------|-----------|
//! | `insert`       | O(1)      |
//! | `minimum`      | O(1)      |
//! | `union`        | O(1)      |
//! | `decrease_key` | O(1)      |
//! | `extract_min`  | O(log n)  |
//! | `delete`       | O(log n)  |
//!
//! The heap is single-threaded (`!Send`, `!Sync`). Wrap it in a mutex held for
//! the whole operation if several threads need it.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heap::{DecreaseKeyHeap, Entry, FibonacciHeap, Item, MergeableHeap};
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(Entry::new(5, "item1"));
//! let _handle2 = heap.insert(Entry::new(3, "item2"));
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.minimum().map(|e| *e.value()), Some("item1"));
//! ```

pub mod fibonacci;
mod node;
mod ownership;
pub mod pathfinding;
pub mod rank;
pub mod traits;

// Re-export the main types for convenience
pub use fibonacci::{FibHandle, FibonacciHeap};
pub use traits::{
    DecreaseKeyHeap, Entry, Handle, HeapError, InvariantViolation, Item, MergeableHeap,
};
