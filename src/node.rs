//! Fibonacci heap nodes and the node lists that own them.
//!
//! A [`Node`] wraps exactly one item. Nodes live in `Rc<RefCell<_>>` cells and
//! every node sits in exactly one [`NodeList`]: either the heap's root list or
//! the child list of its parent. The list owns its nodes through the strong
//! `next` chain; `prev`, `parent` and user handles are all `Weak`, so there are
//! no reference cycles and a node is freed as soon as it leaves its list
//! without being adopted elsewhere.
//!
//! Moving a node between lists is an unlink followed by a push: ownership is
//! transferred, never copied.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::ownership::HeapTag;

/// Type alias for strong node reference
pub(crate) type NodeRef<I> = Rc<RefCell<Node<I>>>;
/// Type alias for weak node reference (parent, prev and handle backlinks)
pub(crate) type WeakNodeRef<I> = Weak<RefCell<Node<I>>>;

pub(crate) struct Node<I> {
    pub(crate) item: I,
    pub(crate) parent: WeakNodeRef<I>,
    pub(crate) children: NodeList<I>,
    /// Set when this node lost a child since it last became a child itself
    pub(crate) mark: bool,
    /// Tag of the heap this node was inserted into
    pub(crate) tag: Rc<HeapTag>,
    prev: WeakNodeRef<I>,
    next: Option<NodeRef<I>>,
}

impl<I> Node<I> {
    pub(crate) fn new(item: I, tag: Rc<HeapTag>) -> Self {
        Node {
            item,
            parent: Weak::new(),
            children: NodeList::new(),
            mark: false,
            tag,
            prev: Weak::new(),
            next: None,
        }
    }

    /// Number of children
    #[inline]
    pub(crate) fn rank(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent.strong_count() == 0
    }
}

/// Doubly-linked list of nodes with O(1) push, unlink and concatenation.
///
/// Traversal works in both directions from either end, and from any node
/// through its neighbour links.
pub(crate) struct NodeList<I> {
    head: Option<NodeRef<I>>,
    tail: WeakNodeRef<I>,
    len: usize,
}

impl<I> NodeList<I> {
    pub(crate) fn new() -> Self {
        NodeList {
            head: None,
            tail: Weak::new(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn front(&self) -> Option<NodeRef<I>> {
        self.head.clone()
    }

    /// Appends a detached node.
    pub(crate) fn push_back(&mut self, node: NodeRef<I>) {
        {
            let mut n = node.borrow_mut();
            debug_assert!(n.next.is_none(), "node is still linked");
            n.prev = self.tail.clone();
        }
        let weak = Rc::downgrade(&node);
        match self.tail.upgrade() {
            Some(tail) => tail.borrow_mut().next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = weak;
        self.len += 1;
    }

    /// Detaches and returns the first node.
    pub(crate) fn pop_front(&mut self) -> Option<NodeRef<I>> {
        let head = self.head.take()?;
        let next = {
            let mut h = head.borrow_mut();
            h.prev = Weak::new();
            h.next.take()
        };
        match &next {
            Some(next) => next.borrow_mut().prev = Weak::new(),
            None => self.tail = Weak::new(),
        }
        self.head = next;
        self.len -= 1;
        Some(head)
    }

    /// Detaches `node`, which must currently be a member of this list.
    pub(crate) fn unlink(&mut self, node: &NodeRef<I>) {
        let (prev, next) = {
            let mut n = node.borrow_mut();
            (std::mem::take(&mut n.prev).upgrade(), n.next.take())
        };
        let prev_weak = prev.as_ref().map(Rc::downgrade).unwrap_or_default();
        match &next {
            Some(next) => next.borrow_mut().prev = prev_weak,
            None => self.tail = prev_weak,
        }
        // The slot being overwritten held the list's strong reference to `node`.
        let owned = match &prev {
            Some(prev) => std::mem::replace(&mut prev.borrow_mut().next, next),
            None => std::mem::replace(&mut self.head, next),
        };
        debug_assert!(owned.is_some_and(|n| Rc::ptr_eq(&n, node)));
        self.len -= 1;
    }

    /// Moves every node of `other` to the end of this list in O(1).
    pub(crate) fn append(&mut self, other: &mut NodeList<I>) {
        let Some(other_head) = other.head.take() else {
            return;
        };
        match self.tail.upgrade() {
            Some(tail) => {
                other_head.borrow_mut().prev = Rc::downgrade(&tail);
                tail.borrow_mut().next = Some(other_head);
            }
            None => self.head = Some(other_head),
        }
        self.tail = std::mem::take(&mut other.tail);
        self.len += other.len;
        other.len = 0;
    }

    pub(crate) fn iter(&self) -> Iter<I> {
        Iter {
            front: self.head.clone(),
            back: self.tail.upgrade(),
            remaining: self.len,
        }
    }
}

impl<I> Default for NodeList<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Drop for NodeList<I> {
    fn drop(&mut self) {
        // Tear down iteratively: dropping the `next` chain or a deep subtree
        // recursively would overflow the stack on large heaps.
        let mut pending = Vec::new();
        while let Some(node) = self.pop_front() {
            pending.push(node);
        }
        while let Some(node) = pending.pop() {
            let mut n = node.borrow_mut();
            while let Some(child) = n.children.pop_front() {
                pending.push(child);
            }
        }
    }
}

/// Iterator over the nodes of a [`NodeList`], yielding strong references.
///
/// The list must not be modified while the iterator is alive.
pub(crate) struct Iter<I> {
    front: Option<NodeRef<I>>,
    back: Option<NodeRef<I>>,
    remaining: usize,
}

impl<I> Iterator for Iter<I> {
    type Item = NodeRef<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.take()?;
        self.front = node.borrow().next.clone();
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I> DoubleEndedIterator for Iter<I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.take()?;
        self.back = node.borrow().prev.upgrade();
        self.remaining -= 1;
        Some(node)
    }
}

impl<I> ExactSizeIterator for Iter<I> {}
