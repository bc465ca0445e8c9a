//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, minimum, decrease_key, and union
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are kept
//! in a doubly linked root list and the heap maintains a reference to the
//! minimum root. Work is deferred until [`extract_min`], which consolidates the
//! root list so that no two roots share a degree. [`decrease_key`] cuts a node
//! that violates heap order out of its tree, and a parent that loses a second
//! child is cut in turn ("cascading cut"), which keeps every tree of degree `k`
//! at least `F(k+2)` nodes large.
//!
//! Nodes are reference counted. The heap owns them through its root list and
//! each node owns its children; parent links and [`FibHandle`]s are weak, so a
//! handle to an extracted element simply stops resolving.
//!
//! [`extract_min`]: MergeableHeap::extract_min
//! [`decrease_key`]: DecreaseKeyHeap::decrease_key

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::node::{Node, NodeList, NodeRef, WeakNodeRef};
use crate::ownership::HeapTag;
use crate::rank;
use crate::traits::{
    DecreaseKeyHeap, Handle, HeapError, InvariantViolation, Item, KeyToken, MergeableHeap,
};

/// Handle to an element in a Fibonacci heap
///
/// The handle does not keep the element alive. Once the element is extracted
/// or its heap is dropped, operations through the handle fail with
/// [`HeapError::InvalidHandle`]. After a union the handle refers to the merged
/// heap.
#[derive(Debug)]
pub struct FibHandle<I> {
    node: WeakNodeRef<I>,
}

impl<I> Clone for FibHandle<I> {
    fn clone(&self) -> Self {
        FibHandle {
            node: self.node.clone(),
        }
    }
}

impl<I> PartialEq for FibHandle<I> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<I> Eq for FibHandle<I> {}

impl<I> Handle for FibHandle<I> {}

impl<I: Item> FibHandle<I> {
    /// True while the element is still stored in some heap
    pub fn is_live(&self) -> bool {
        self.node.strong_count() > 0
    }

    /// Current key of the element, or `None` once it has left the heap
    pub fn key(&self) -> Option<I::Key>
    where
        I::Key: Clone,
    {
        let node = self.node.upgrade()?;
        let key = node.borrow().item.key().clone();
        Some(key)
    }

    /// Current value of the element, or `None` once it has left the heap
    pub fn value(&self) -> Option<I::Value>
    where
        I::Value: Clone,
    {
        let node = self.node.upgrade()?;
        let value = node.borrow().item.value().clone();
        Some(value)
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heap::{DecreaseKeyHeap, Entry, FibonacciHeap, Item, MergeableHeap};
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(Entry::new(5, "item"));
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.minimum().map(|e| *e.key()), Some(1));
/// assert_eq!(heap.extract_min().map(Entry::into_parts), Some((1, "item")));
/// assert!(!handle.is_live());
/// ```
pub struct FibonacciHeap<I: Item> {
    roots: NodeList<I>,
    /// Always a member of `roots`, or `None` iff `roots` is empty
    min: Option<NodeRef<I>>,
    len: usize,
    tag: Rc<HeapTag>,
}

impl<I: Item> MergeableHeap for FibonacciHeap<I> {
    type Item = I;
    type ItemRef<'a> = Ref<'a, I> where Self: 'a;
    type Handle = FibHandle<I>;

    fn new() -> Self {
        Self {
            roots: NodeList::new(),
            min: None,
            len: 0,
            tag: HeapTag::new(),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn insert(&mut self, item: I) -> FibHandle<I> {
        let node = Rc::new(RefCell::new(Node::new(item, Rc::clone(&self.tag))));
        let handle = FibHandle {
            node: Rc::downgrade(&node),
        };

        self.roots.push_back(Rc::clone(&node));
        self.len += 1;
        self.offer_min(node);

        self.check_strict();
        handle
    }

    fn minimum(&self) -> Option<Ref<'_, I>> {
        self.min
            .as_ref()
            .map(|min| Ref::map(min.borrow(), |node| &node.item))
    }

    fn extract_min(&mut self) -> Option<I> {
        let z = self.min.take()?;
        self.roots.unlink(&z);
        self.len -= 1;

        // Promote the children of z to roots
        let mut children = std::mem::take(&mut z.borrow_mut().children);
        for child in children.iter() {
            let mut child = child.borrow_mut();
            child.parent = Weak::new();
            child.mark = false;
        }
        self.roots.append(&mut children);

        if !self.roots.is_empty() {
            self.min = self.roots.front();
            self.consolidate();
        }

        self.check_strict();

        // The root list and `min` no longer reference z, handles are weak.
        debug_assert_eq!(Rc::strong_count(&z), 1);
        Rc::try_unwrap(z)
            .ok()
            .map(|cell| cell.into_inner().item)
    }

    fn merge(&mut self, mut other: Self) {
        HeapTag::forward(&other.tag, &self.tag);
        self.roots.append(&mut other.roots);
        if let Some(other_min) = other.min.take() {
            self.offer_min(other_min);
        }
        self.len += other.len;
        other.len = 0;

        trace!(len = self.len, roots = self.roots.len(), "merged heaps");
        self.check_strict();
    }
}

impl<I: Item> DecreaseKeyHeap for FibonacciHeap<I> {
    fn decrease_key(&mut self, handle: &FibHandle<I>, key: I::Key) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;

        {
            let mut n = node.borrow_mut();
            if key > *n.item.key() {
                debug!("rejected decrease_key: new key is larger than the current key");
                return Err(HeapError::KeyIncreased);
            }
            n.item.set_key(key, KeyToken::new());
        }

        let parent = node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            // Heap order still holds unless the node now beats its parent
            let violated = node.borrow().item.key() < parent.borrow().item.key();
            if violated {
                self.cut(&node, &parent);
                self.cascading_cut(parent);
            }
        }

        if node.borrow().is_root() {
            self.offer_min(node);
        }

        self.check_strict();
        Ok(())
    }

    fn delete(&mut self, handle: &FibHandle<I>) -> Result<I, HeapError> {
        let node = self.resolve(handle)?;

        // A generic key has no negative-infinity sentinel. Force the node to
        // the front instead: cut it as a decrease below its parent would, then
        // make it the minimum so extract_min removes it.
        let parent = node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            self.cut(&node, &parent);
            self.cascading_cut(parent);
        }
        self.min = Some(node);

        self.extract_min().ok_or(HeapError::InvalidHandle)
    }
}

impl<I: Item> FibonacciHeap<I> {
    /// Number of trees in the root list
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Largest degree any node may have at the current size, `floor(log_φ n)`
    pub fn degree_bound(&self) -> usize {
        rank::degree_bound(self.len)
    }

    /// Walks the whole forest and verifies every structural invariant
    ///
    /// Checks heap order, parent links, that roots are unmarked, the degree
    /// bound, the node count, and that the minimum reference is a root
    /// holding the smallest root key.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let bound = self.degree_bound();

        match &self.min {
            None if !self.roots.is_empty() => return Err(InvariantViolation::Minimum),
            None => {}
            Some(min) => {
                let min_node = min.borrow();
                if !min_node.is_root() {
                    return Err(InvariantViolation::Minimum);
                }
                let mut present = false;
                for root in self.roots.iter() {
                    present |= Rc::ptr_eq(&root, min);
                    if root.borrow().item.key() < min_node.item.key() {
                        return Err(InvariantViolation::Minimum);
                    }
                }
                if !present {
                    return Err(InvariantViolation::Minimum);
                }
            }
        }

        let mut reachable = 0;
        let mut pending: Vec<NodeRef<I>> = Vec::new();
        for root in self.roots.iter() {
            let r = root.borrow();
            if !r.is_root() {
                return Err(InvariantViolation::ParentLink);
            }
            if r.mark {
                return Err(InvariantViolation::MarkedRoot);
            }
            drop(r);
            pending.push(root);
        }

        while let Some(node) = pending.pop() {
            reachable += 1;
            let n = node.borrow();
            let degree = n.rank();
            if degree > bound {
                return Err(InvariantViolation::DegreeBound { degree, bound });
            }
            for child in n.children.iter() {
                let c = child.borrow();
                let parent_ok = c.parent.upgrade().is_some_and(|p| Rc::ptr_eq(&p, &node));
                if !parent_ok {
                    return Err(InvariantViolation::ParentLink);
                }
                if c.item.key() < n.item.key() {
                    return Err(InvariantViolation::HeapOrder);
                }
                drop(c);
                pending.push(child);
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::Count {
                recorded: self.len,
                reachable,
            });
        }
        Ok(())
    }

    /// Upgrades a handle and checks that its node belongs to this heap.
    fn resolve(&self, handle: &FibHandle<I>) -> Result<NodeRef<I>, HeapError> {
        let Some(node) = handle.node.upgrade() else {
            debug!("rejected handle: element is no longer in a heap");
            return Err(HeapError::InvalidHandle);
        };
        if !HeapTag::owns(&self.tag, &node.borrow().tag) {
            debug!("rejected handle: element belongs to another heap");
            return Err(HeapError::ForeignHandle);
        }
        Ok(node)
    }

    /// Makes `candidate` (a root) the minimum if its key is smaller.
    fn offer_min(&mut self, candidate: NodeRef<I>) {
        let smaller = match &self.min {
            None => true,
            Some(min) => candidate.borrow().item.key() < min.borrow().item.key(),
        };
        if smaller {
            self.min = Some(candidate);
        }
    }

    /// Links trees of equal degree until every root has a distinct degree,
    /// then rebuilds the root list and recomputes the minimum.
    fn consolidate(&mut self) {
        let roots_before = self.roots.len();
        let mut buckets: Vec<Option<NodeRef<I>>> = vec![None; rank::bucket_capacity(self.len)];

        // Every root is popped before it is bucketed, so linking never has to
        // touch the root list.
        self.min = None;
        while let Some(mut x) = self.roots.pop_front() {
            let mut degree = x.borrow().rank();
            loop {
                if degree >= buckets.len() {
                    buckets.resize(degree + 1, None);
                }
                let Some(mut y) = buckets[degree].take() else {
                    break;
                };
                if y.borrow().item.key() < x.borrow().item.key() {
                    std::mem::swap(&mut x, &mut y);
                }
                Self::link(y, &x);
                degree += 1;
            }
            buckets[degree] = Some(x);
        }

        let buckets_used = buckets.len();
        for root in buckets.into_iter().flatten() {
            self.roots.push_back(Rc::clone(&root));
            self.offer_min(root);
        }

        trace!(
            roots_before,
            roots_after = self.roots.len(),
            buckets_used,
            "consolidated root list"
        );
    }

    /// Makes the detached root `child` a child of `parent`.
    fn link(child: NodeRef<I>, parent: &NodeRef<I>) {
        {
            let mut c = child.borrow_mut();
            c.parent = Rc::downgrade(parent);
            c.mark = false;
        }
        parent.borrow_mut().children.push_back(child);
    }

    /// Cuts `node` from `parent` and adds it to the root list.
    fn cut(&mut self, node: &NodeRef<I>, parent: &NodeRef<I>) {
        parent.borrow_mut().children.unlink(node);
        {
            let mut n = node.borrow_mut();
            n.parent = Weak::new();
            n.mark = false;
        }
        self.roots.push_back(Rc::clone(node));
    }

    /// Walks up from `node`, cutting marked ancestors, until it reaches a root
    /// or marks an unmarked node.
    fn cascading_cut(&mut self, mut node: NodeRef<I>) {
        loop {
            let Some(parent) = node.borrow().parent.upgrade() else {
                return;
            };
            if !node.borrow().mark {
                node.borrow_mut().mark = true;
                return;
            }
            self.cut(&node, &parent);
            node = parent;
        }
    }

    #[inline]
    fn check_strict(&self) {
        #[cfg(feature = "strict-invariants")]
        if let Err(violation) = self.check_invariants() {
            panic!("heap invariant violated: {violation}");
        }
    }
}

impl<I: Item> Default for FibonacciHeap<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item> fmt::Debug for FibonacciHeap<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("roots", &self.roots.len())
            .finish_non_exhaustive()
    }
}

/// Diagnostic dump of the whole forest
///
/// Prints the element and root counts, the minimum key, then every root tree
/// starting at the minimum. Each node is written as `(key,value,degree,mark)`
/// followed by its children in brackets. The format is meant for humans and
/// test failure messages, not for parsing.
impl<I> fmt::Display for FibonacciHeap<I>
where
    I: Item,
    I::Key: fmt::Debug,
    I::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Elements: {}", self.len)?;
        writeln!(f, "Root Elements: {}", self.roots.len())?;
        let Some(min) = &self.min else {
            return writeln!(f, "Minimum Key: none");
        };
        writeln!(f, "Minimum Key: {:?}", min.borrow().item.key())?;
        write!(f, "Min:\t")?;
        write_tree(f, min)?;
        writeln!(f)?;
        for root in self.roots.iter().filter(|root| !Rc::ptr_eq(root, min)) {
            write!(f, "\t ")?;
            write_tree(f, &root)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_tree<I>(f: &mut fmt::Formatter<'_>, node: &NodeRef<I>) -> fmt::Result
where
    I: Item,
    I::Key: fmt::Debug,
    I::Value: fmt::Debug,
{
    let n = node.borrow();
    write!(
        f,
        "({:?},{:?},{},{}",
        n.item.key(),
        n.item.value(),
        n.rank(),
        n.mark
    )?;
    if !n.children.is_empty() {
        write!(f, " - [")?;
        for child in n.children.iter() {
            write_tree(f, &child)?;
        }
        write!(f, "]")?;
    }
    write!(f, ")")
}
