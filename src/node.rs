//! Fixed-capacity node blocks.
//!
//! A node owns up to `C` elements packed from slot `0`. Slots `[0, len)` hold live values,
//! slots `[len, C)` are raw memory and are never read.
//!
//! ```text
//!   prev <──┐      ┌──> next
//! ┌─────────┴──────┴─────┬─────┬─────┬─────┬───────────┐
//! │ prev │ next │ len=3  │ T 0 │ T 1 │ T 2 │ uninit .. │
//! └──────┴──────┴────────┴─────┴─────┴─────┴───────────┘
//! ```
//!
//! Allocation and construction are separate steps: [`Node::allocate`] takes a raw block from
//! the allocation strategy and initialises only the header, values are then moved into
//! individual slots.

use std::alloc::Layout;
use std::mem::MaybeUninit;
use std::ptr::{self, addr_of_mut, NonNull};

use allocator_api2::alloc::{AllocError, Allocator};

/// A link to a neighbouring node.
pub(crate) type Link<T, const C: usize> = Option<NonNull<Node<T, C>>>;

pub(crate) struct Node<T, const C: usize> {
    pub(crate) prev: Link<T, C>,
    pub(crate) next: Link<T, C>,
    pub(crate) len: usize,
    slots: [MaybeUninit<T>; C],
}

impl<T, const C: usize> Node<T, C> {
    /// Rejects a zero node capacity when the node type is first used.
    const NON_ZERO_CAPACITY: () = assert!(C > 0, "node capacity must be at least 1");

    /// Layout of one node block.
    pub(crate) const fn layout() -> Layout {
        Layout::new::<Self>()
    }

    /// Allocates a raw node block from `alloc` and initialises its header.
    ///
    /// The returned node is unlinked and empty.
    pub(crate) fn allocate<A: Allocator>(alloc: &A) -> Result<NonNull<Self>, AllocError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO_CAPACITY;

        let block = alloc.allocate(Self::layout())?;
        let node = block.cast::<Self>();

        #[cfg(feature = "log")]
        log::trace!("Node::allocate {:p}", node);

        // SAFETY: `block` is a fresh allocation fitting `Self`. Only the header is written, the
        // slots stay uninitialised, which `MaybeUninit` permits.
        unsafe {
            let raw = node.as_ptr();
            addr_of_mut!((*raw).prev).write(None);
            addr_of_mut!((*raw).next).write(None);
            addr_of_mut!((*raw).len).write(0);
        }
        Ok(node)
    }

    /// Drops the live slots of `node` and returns its block to `alloc`.
    ///
    /// # Safety
    ///
    /// `node` must come from [`Node::allocate`] with an allocator that can release it, must be
    /// unlinked, and must not be used afterwards.
    pub(crate) unsafe fn release<A: Allocator>(node: NonNull<Self>, alloc: &A) {
        #[cfg(feature = "log")]
        log::trace!("Node::release {:p} ({} live)", node, (*node.as_ptr()).len);

        ptr::drop_in_place((*node.as_ptr()).as_mut_slice());
        alloc.deallocate(node.cast(), Self::layout());
    }

    #[inline]
    pub(crate) const fn is_full(&self) -> bool {
        self.len == C
    }

    #[inline]
    fn slot_ptr(&self) -> *const T {
        self.slots.as_ptr().cast()
    }

    #[inline]
    fn slot_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast()
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are initialised.
        unsafe { &*ptr::slice_from_raw_parts(self.slot_ptr(), self.len) }
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        // SAFETY: slots `[0, len)` are initialised.
        unsafe { &mut *ptr::slice_from_raw_parts_mut(self.slot_mut_ptr(), len) }
    }

    /// Returns a raw pointer to slot `index` of `node` without borrowing the node.
    ///
    /// Iterators hand out references to several slots of one node at once, which a `&mut Node`
    /// would alias.
    ///
    /// # Safety
    ///
    /// `node` must be live and `index < C`.
    #[inline]
    pub(crate) unsafe fn slot(node: NonNull<Self>, index: usize) -> *mut T {
        debug_assert!(index < C);
        addr_of_mut!((*node.as_ptr()).slots).cast::<T>().add(index)
    }

    /// Writes `value` at `index`, moving `[index, len)` one slot to the right.
    ///
    /// # Safety
    ///
    /// The node must not be full and `index <= self.len`.
    pub(crate) unsafe fn insert(&mut self, index: usize, value: T) {
        debug_assert!(!self.is_full());
        debug_assert!(index <= self.len);

        let base = self.slot_mut_ptr();
        ptr::copy(base.add(index), base.add(index + 1), self.len - index);
        base.add(index).write(value);
        self.len += 1;
    }

    /// Reads the value at `index` out, moving `(index, len)` one slot to the left.
    ///
    /// # Safety
    ///
    /// `index < self.len`.
    pub(crate) unsafe fn remove(&mut self, index: usize) -> T {
        debug_assert!(index < self.len);

        let base = self.slot_mut_ptr();
        let value = base.add(index).read();
        ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
        self.len -= 1;
        value
    }

    /// Appends `value` after the last live slot.
    ///
    /// # Safety
    ///
    /// The node must not be full.
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        debug_assert!(!self.is_full());

        self.slot_mut_ptr().add(self.len).write(value);
        self.len += 1;
    }

    /// Reads the last live value out.
    ///
    /// # Safety
    ///
    /// The node must not be empty.
    #[inline]
    pub(crate) unsafe fn pop(&mut self) -> T {
        debug_assert!(self.len > 0);

        self.len -= 1;
        self.slot_mut_ptr().add(self.len).read()
    }

    /// Moves slots `[at, len)` into the empty node `other`, starting at its slot `0`.
    ///
    /// # Safety
    ///
    /// `other` must be empty and distinct from `self`, and `at <= self.len`.
    pub(crate) unsafe fn split_off(&mut self, other: &mut Self, at: usize) {
        debug_assert_eq!(other.len, 0);
        debug_assert!(at <= self.len);

        let moved = self.len - at;
        ptr::copy_nonoverlapping(self.slot_ptr().add(at), other.slot_mut_ptr(), moved);
        other.len = moved;
        self.len = at;
    }
}
