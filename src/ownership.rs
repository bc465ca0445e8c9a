//! Heap identity tags.
//!
//! Every heap owns a [`HeapTag`] and every node it allocates keeps a strong
//! reference to the tag current at insertion time. When a heap is merged into
//! another, its tag is forwarded to the surviving heap's tag instead of
//! rewriting every node, so union stays O(1). Resolving a node's tag follows
//! the forwarding chain (with path compression) to the tag of the heap that
//! owns the node today.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub(crate) struct HeapTag {
    merged_into: RefCell<Option<Rc<HeapTag>>>,
}

impl HeapTag {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(HeapTag::default())
    }

    /// Forwards `tag` (a consumed heap) to `target` (the surviving heap).
    pub(crate) fn forward(tag: &Rc<HeapTag>, target: &Rc<HeapTag>) {
        if !Rc::ptr_eq(tag, target) {
            *tag.merged_into.borrow_mut() = Some(Rc::clone(target));
        }
    }

    /// Returns the tag of the heap that currently owns whatever `tag` labels.
    pub(crate) fn resolve(tag: &Rc<HeapTag>) -> Rc<HeapTag> {
        let mut chain = Vec::new();
        let mut current = Rc::clone(tag);
        loop {
            let next = current.merged_into.borrow().clone();
            match next {
                Some(next) => {
                    chain.push(current);
                    current = next;
                }
                None => break,
            }
        }
        // Path compression: every tag on the chain now points at the root.
        for visited in chain {
            *visited.merged_into.borrow_mut() = Some(Rc::clone(&current));
        }
        current
    }

    /// True if a node labelled `tag` belongs to the heap owning `owner`.
    pub(crate) fn owns(owner: &Rc<HeapTag>, tag: &Rc<HeapTag>) -> bool {
        Rc::ptr_eq(owner, tag) || Rc::ptr_eq(owner, &HeapTag::resolve(tag))
    }
}
