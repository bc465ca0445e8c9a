//! Common traits for mergeable heaps
//!
//! This module provides the capability layer every heap in this crate is built on:
//!
//! - [`Item`]: what a heap stores. A totally ordered key, an opaque value, and a
//!   key-mutation hook that only the owning heap can call.
//! - [`MergeableHeap`]: insert, minimum, extract-min and union.
//! - [`DecreaseKeyHeap`]: extends [`MergeableHeap`] with handle-based
//!   `decrease_key` and `delete`, the operations shortest-path and
//!   minimum-spanning-tree algorithms need.

use std::ops::Deref;

use thiserror::Error;

/// Error type for handle-based heap operations
///
/// A failed operation never modifies the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The requested key is larger than the element's current key
    #[error("new key is larger than the current key")]
    KeyIncreased,
    /// The handle is no longer valid (element was extracted or its heap dropped)
    #[error("handle is no longer valid (element was removed)")]
    InvalidHandle,
    /// The handle refers to an element owned by a different heap
    #[error("handle belongs to a different heap")]
    ForeignHandle,
}

/// A structural invariant found broken by a heap's self-check.
///
/// These are programming errors inside the heap, never caused by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("child key is smaller than its parent key")]
    HeapOrder,
    #[error("node parent link does not match the tree it sits in")]
    ParentLink,
    #[error("root node is marked")]
    MarkedRoot,
    #[error("node has {degree} children, bound is {bound}")]
    DegreeBound { degree: usize, bound: usize },
    #[error("heap records {recorded} nodes but {reachable} are reachable")]
    Count { recorded: usize, reachable: usize },
    #[error("minimum reference is missing, stale, or not the smallest root")]
    Minimum,
}

/// Proof that the caller is a heap in this crate.
///
/// [`Item::set_key`] takes one of these by value. It has no public
/// constructor, so code outside this crate can implement `set_key` but can
/// never call it.
#[derive(Debug)]
pub struct KeyToken {
    _private: (),
}

impl KeyToken {
    pub(crate) fn new() -> Self {
        KeyToken { _private: () }
    }
}

/// An element that can be stored in a heap.
///
/// The heap reads [`key`](Item::key) to order elements and never inspects
/// [`value`](Item::value). Keys only change through
/// [`DecreaseKeyHeap::decrease_key`], which is the sole caller of
/// [`set_key`](Item::set_key).
///
/// # Example
///
/// ```rust
/// use mergeable_heap::traits::{Item, KeyToken};
///
/// struct Job {
///     deadline: u64,
///     name: String,
/// }
///
/// impl Item for Job {
///     type Key = u64;
///     type Value = String;
///
///     fn key(&self) -> &u64 {
///         &self.deadline
///     }
///
///     fn value(&self) -> &String {
///         &self.name
///     }
///
///     fn set_key(&mut self, key: u64, _token: KeyToken) {
///         self.deadline = key;
///     }
/// }
/// ```
pub trait Item {
    /// Ordering key, smallest first
    type Key: Ord;
    /// Opaque payload
    type Value;

    fn key(&self) -> &Self::Key;

    fn value(&self) -> &Self::Value;

    /// Overwrites the key in place. Only callable by a heap.
    fn set_key(&mut self, key: Self::Key, token: KeyToken);
}

/// Default in-memory [`Item`]: a key paired with a payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }

    /// Splits the entry back into its key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: Ord, V> Item for Entry<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> &V {
        &self.value
    }

    fn set_key(&mut self, key: K, _token: KeyToken) {
        self.key = key;
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Entry::new(key, value)
    }
}

/// A handle to an element in the heap, used for decrease_key and delete
///
/// Handles may be `Clone` but not necessarily `Copy`, depending on
/// the underlying implementation.
pub trait Handle: Clone + PartialEq + Eq {}

/// A min-heap whose instances can be merged
///
/// # Example
///
/// ```rust
/// use mergeable_heap::{Entry, FibonacciHeap, Item, MergeableHeap};
///
/// let mut a = FibonacciHeap::new();
/// a.insert(Entry::new(4, "four"));
/// a.insert(Entry::new(6, "six"));
///
/// let mut b = FibonacciHeap::new();
/// b.insert(Entry::new(1, "one"));
///
/// let mut merged = a.union(b);
/// assert_eq!(merged.minimum().map(|e| *e.key()), Some(1));
/// assert_eq!(merged.extract_min().map(Entry::into_parts), Some((1, "one")));
/// assert_eq!(merged.len(), 2);
/// ```
pub trait MergeableHeap: Sized {
    /// The element type stored in the heap
    type Item: Item;

    /// Borrow guard returned by [`minimum`](MergeableHeap::minimum)
    type ItemRef<'a>: Deref<Target = Self::Item>
    where
        Self: 'a;

    /// The handle type returned by [`insert`](MergeableHeap::insert)
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an element, returning a handle to it
    ///
    /// # Time Complexity
    /// O(1) for the Fibonacci heap.
    fn insert(&mut self, item: Self::Item) -> Self::Handle;

    /// Returns the element with the smallest key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn minimum(&self) -> Option<Self::ItemRef<'_>>;

    /// Removes and returns the element with the smallest key
    ///
    /// # Time Complexity
    /// O(log n) amortized for the Fibonacci heap.
    fn extract_min(&mut self) -> Option<Self::Item>;

    /// Moves every element of `other` into this heap
    ///
    /// Handles obtained from `other` stay valid and now refer to this heap.
    fn merge(&mut self, other: Self);

    /// Consumes both heaps and returns their union
    fn union(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

/// Extended heap trait with `decrease_key` and `delete`
///
/// # Example
///
/// ```rust
/// use mergeable_heap::{DecreaseKeyHeap, Entry, FibonacciHeap, Item, MergeableHeap};
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(Entry::new(10, "a"));
/// let b = heap.insert(Entry::new(20, "b"));
/// heap.decrease_key(&b, 5).unwrap();
/// assert_eq!(heap.minimum().map(|e| *e.key()), Some(5));
/// ```
pub trait DecreaseKeyHeap: MergeableHeap {
    /// Lowers the key of the element identified by the handle
    ///
    /// A key equal to the current one is accepted and changes nothing.
    ///
    /// # Errors
    /// - [`HeapError::KeyIncreased`] if `key` is larger than the current key
    /// - [`HeapError::InvalidHandle`] if the element is no longer in any heap
    /// - [`HeapError::ForeignHandle`] if the element lives in another heap
    ///
    /// # Time Complexity
    /// O(1) amortized for the Fibonacci heap.
    fn decrease_key(
        &mut self,
        handle: &Self::Handle,
        key: <Self::Item as Item>::Key,
    ) -> Result<(), HeapError>;

    /// Removes the element identified by the handle and returns it
    ///
    /// # Errors
    /// Same handle errors as [`decrease_key`](DecreaseKeyHeap::decrease_key).
    ///
    /// # Time Complexity
    /// O(log n) amortized for the Fibonacci heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<Self::Item, HeapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let mut entry = Entry::new(7, "seven");
        assert_eq!(*entry.key(), 7);
        assert_eq!(*entry.value(), "seven");

        entry.set_key(3, KeyToken::new());
        assert_eq!(entry.into_parts(), (3, "seven"));
    }

    #[test]
    fn test_entry_from_tuple() {
        let entry: Entry<i32, char> = (1, 'x').into();
        assert_eq!(entry, Entry::new(1, 'x'));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HeapError::KeyIncreased.to_string(),
            "new key is larger than the current key"
        );
        assert_eq!(
            InvariantViolation::DegreeBound { degree: 4, bound: 2 }.to_string(),
            "node has 4 children, bound is 2"
        );
    }
}
