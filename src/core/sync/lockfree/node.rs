/*!
 * Queue Node
 * Singly-linked node carrying one payload slot
 */

use crossbeam_epoch::{Atomic, Owned};
use std::mem::MaybeUninit;

/// Link in the lock-free queue chain
///
/// The payload is written once at construction and moved out at most once,
/// by the pop whose head CAS turned this node into the sentinel. Dropping a
/// `Node` never drops the payload: by the time a node is reclaimed its value
/// has either been taken or never existed (the initial sentinel).
pub(crate) struct Node<T> {
    data: MaybeUninit<T>,
    pub(crate) next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    /// Payload-less node used as the initial sentinel
    pub(crate) fn sentinel() -> Owned<Self> {
        Owned::new(Self {
            data: MaybeUninit::uninit(),
            next: Atomic::null(),
        })
    }

    /// Node carrying `value`, with no successor yet
    pub(crate) fn with_value(value: T) -> Owned<Self> {
        Owned::new(Self {
            data: MaybeUninit::new(value),
            next: Atomic::null(),
        })
    }

    /// Move the payload out of the node
    ///
    /// # Safety
    ///
    /// The node must have been built with [`Node::with_value`], and this must
    /// be the only call for this node: the caller is the pop that won the head
    /// CAS onto it.
    #[inline]
    pub(crate) unsafe fn take(&self) -> T {
        self.data.as_ptr().read()
    }
}
