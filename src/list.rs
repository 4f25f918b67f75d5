//! The unrolled list: a doubly linked chain of fixed-capacity nodes.
//!
//! ```text
//!  head                                         tail
//!   │                                            │
//! ┌─v──────────────┐    ┌────────────────┐    ┌──v─────────────┐
//! │ 1 2 3 . .      │<──>│ 4 5 6 7 8      │<──>│ 9 . . . .      │
//! └────────────────┘    └────────────────┘    └────────────────┘
//! ```
//!
//! Every node in the chain holds between `1` and `C` elements. A node is allocated when an
//! insertion finds no room and released as soon as its last element leaves, wherever it sits in
//! the chain. Nodes are never merged back together after removals.
//!
//! # Panics and allocation failure
//!
//! Moving a value in or out of a slot cannot fail, so the only fallible step of an insertion is
//! allocating a node. It happens before anything is moved: a failed insertion leaves the list
//! exactly as it was. The `try_*` methods report the failure and hand the value back, the other
//! insertions call [`handle_alloc_error`].
//!
//! Removal never runs user code, the removed value is returned to the caller. [`clear`] and
//! `Drop` run each element's destructor; if one panics, the list stays valid but the block of
//! the node being released leaks.
//!
//! [`clear`]: UnrolledList::clear

use std::alloc::handle_alloc_error;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};
use std::ptr::NonNull;

use allocator_api2::alloc::{Allocator, Global};

use crate::alloc::CompatibleAlloc;
use crate::cursor::{Cursor, CursorMut};
use crate::error::{Error, TryInsertError};
use crate::iter::{IntoIter, Iter, IterMut};
use crate::node::{Link, Node};

/// Node capacity used when none is given.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

/// A sequence storing up to `C` elements per linked node.
///
/// # Type Parameters
///
/// - `T`: element type
/// - `C`: elements per node, at least `1`
/// - `A`: allocation strategy for node blocks
///
/// # Example
///
/// ```
/// use unrolled_list::UnrolledList;
///
/// let mut list: UnrolledList<i32, 4> = UnrolledList::new();
/// list.push_back(2);
/// list.push_back(3);
/// list.push_front(1);
/// list.insert(3, 4);
///
/// assert_eq!(list.len(), 4);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
/// assert_eq!(list.pop_front(), Some(1));
/// assert_eq!(list.remove(1), Some(3));
/// ```
pub struct UnrolledList<T, const C: usize = DEFAULT_NODE_CAPACITY, A: Allocator = Global> {
    head: Link<T, C>,
    tail: Link<T, C>,
    len: usize,
    alloc: A,
    _marker: PhantomData<Box<Node<T, C>>>,
}

unsafe impl<T: Send, const C: usize, A: Allocator + Send> Send for UnrolledList<T, C, A> {}
unsafe impl<T: Sync, const C: usize, A: Allocator + Sync> Sync for UnrolledList<T, C, A> {}

#[cold]
pub(crate) fn alloc_failed<T, const C: usize>() -> ! {
    handle_alloc_error(Node::<T, C>::layout())
}

impl<T, const C: usize> UnrolledList<T, C, Global> {
    /// Creates an empty list using the global allocator.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a list holding `n` clones of `value`.
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(value, n, Global)
    }
}

impl<T, const C: usize, A: Allocator> UnrolledList<T, C, A> {
    /// Maximum number of elements a node holds.
    pub const NODE_CAPACITY: usize = C;

    /// Creates an empty list allocating its nodes from `alloc`.
    ///
    /// Nothing is allocated until the first insertion.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates a list holding `n` clones of `value`, allocating from `alloc`.
    pub fn from_elem_in(value: T, n: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new_in(alloc);
        list.extend(std::iter::repeat(value).take(n));
        list
    }

    /// Builds a list from `iter`, allocating from `alloc`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if a node could not be allocated. Every element taken from
    /// `iter` so far is dropped and every node released before returning; the same happens if
    /// `iter` panics.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new_in(alloc);
        for value in iter {
            list.try_push_back(value)?;
        }
        Ok(list)
    }

    /// Moves `other` into a list allocating from `alloc`.
    ///
    /// If `alloc` can release `other`'s nodes the chain is adopted as it is, in O(1). Otherwise
    /// the elements are moved one by one into nodes from `alloc`.
    pub fn from_list_in(mut other: Self, alloc: A) -> Self
    where
        A: CompatibleAlloc,
    {
        if alloc.can_release(&other.alloc) {
            let head = other.head.take();
            let tail = other.tail.take();
            let len = std::mem::replace(&mut other.len, 0);
            Self {
                head,
                tail,
                len,
                alloc,
                _marker: PhantomData,
            }
        } else {
            let mut list = Self::new_in(alloc);
            list.extend(other);
            list
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Largest number of elements a list could address, `usize::MAX` for zero-sized `T`.
    #[inline]
    pub const fn max_len(&self) -> usize {
        match std::mem::size_of::<T>() {
            0 => usize::MAX,
            size => usize::MAX / size,
        }
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the allocation strategy.
    #[inline]
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Counts the nodes in the chain.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut next = self.head;
        while let Some(node) = next {
            count += 1;
            // SAFETY: nodes reachable from `head` are live.
            next = unsafe { (*node.as_ptr()).next };
        }
        count
    }

    /// Returns the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: chained nodes hold at least one element.
        self.head.map(|node| unsafe { &*Node::slot(node, 0) })
    }

    /// Returns the first element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: chained nodes hold at least one element.
        self.head.map(|node| unsafe { &mut *Node::slot(node, 0) })
    }

    /// Returns the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        // SAFETY: chained nodes hold at least one element.
        self.tail
            .map(|node| unsafe { &*Node::slot(node, (*node.as_ptr()).len - 1) })
    }

    /// Returns the last element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: chained nodes hold at least one element.
        self.tail
            .map(|node| unsafe { &mut *Node::slot(node, (*node.as_ptr()).len - 1) })
    }

    /// Returns a front-to-back iterator.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self.head, self.tail, self.len)
    }

    /// Returns a front-to-back iterator yielding mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, C> {
        IterMut::new(self.head, self.tail, self.len)
    }

    /// Returns a cursor at the first element, or at the end if the list is empty.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T, C, A> {
        Cursor::new(self, self.head, 0, 0)
    }

    /// Returns a cursor at the last element, or at the end if the list is empty.
    pub fn cursor_back(&self) -> Cursor<'_, T, C, A> {
        let (node, slot) = self.locate(self.len.saturating_sub(1));
        Cursor::new(self, node, slot, self.len.saturating_sub(1))
    }

    /// Returns a cursor at the element with logical index `index`, or at the end if
    /// `index >= len`.
    ///
    /// Whole nodes are skipped, from whichever end is closer.
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T, C, A> {
        let (node, slot) = self.locate(index);
        Cursor::new(self, node, slot, index.min(self.len))
    }

    /// Returns a mutable cursor at the first element, or at the end if the list is empty.
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, C, A> {
        let head = self.head;
        CursorMut::new(self, head, 0, 0)
    }

    /// Returns a mutable cursor at the last element, or at the end if the list is empty.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, C, A> {
        let index = self.len.saturating_sub(1);
        let (node, slot) = self.locate(index);
        CursorMut::new(self, node, slot, index)
    }

    /// Returns a mutable cursor at the element with logical index `index`, or at the end if
    /// `index >= len`.
    pub fn cursor_mut_at(&mut self, index: usize) -> CursorMut<'_, T, C, A> {
        let (node, slot) = self.locate(index);
        let index = index.min(self.len);
        CursorMut::new(self, node, slot, index)
    }

    /// Appends `value`.
    ///
    /// # Panics
    ///
    /// Calls [`handle_alloc_error`] if a node is needed and cannot be allocated.
    pub fn push_back(&mut self, value: T) {
        if self.try_push_back(value).is_err() {
            alloc_failed::<T, C>();
        }
    }

    /// Appends `value`, handing it back if a node is needed and cannot be allocated.
    ///
    /// # Errors
    ///
    /// On allocation failure the list is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        self.push_back_at(value).map(|_| ())
    }

    /// Prepends `value`.
    ///
    /// # Panics
    ///
    /// Calls [`handle_alloc_error`] if a node is needed and cannot be allocated.
    pub fn push_front(&mut self, value: T) {
        if self.try_push_front(value).is_err() {
            alloc_failed::<T, C>();
        }
    }

    /// Prepends `value`, handing it back if a node is needed and cannot be allocated.
    ///
    /// The head node's elements shift one slot right when it has room.
    ///
    /// # Errors
    ///
    /// On allocation failure the list is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        match self.head {
            // SAFETY: `head` is live.
            Some(head) if unsafe { !(*head.as_ptr()).is_full() } => unsafe {
                (*head.as_ptr()).insert(0, value);
            },
            _ => {
                let Ok(node) = Node::allocate(&self.alloc) else {
                    return Err(TryInsertError { value });
                };
                // SAFETY: `node` is fresh and empty.
                unsafe {
                    (*node.as_ptr()).push(value);
                    self.link_front(node);
                }
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        // SAFETY: `tail` is live and non-empty. It is released once empty and not used again.
        unsafe {
            let value = (*tail.as_ptr()).pop();
            self.len -= 1;
            if (*tail.as_ptr()).len == 0 {
                self.unlink(tail);
                Node::release(tail, &self.alloc);
            }
            Some(value)
        }
    }

    /// Removes and returns the first element.
    ///
    /// The head node's remaining elements shift one slot left.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        // SAFETY: `head` is live and non-empty.
        Some(unsafe { self.take_at(head, 0).0 })
    }

    /// Inserts `value` so that it ends up at logical index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`. Calls [`handle_alloc_error`] if a node is needed and cannot be
    /// allocated.
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
        self.cursor_mut_at(index).insert(value);
    }

    /// Removes and returns the element at logical index `index`, or `None` if out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        self.cursor_mut_at(index).remove_current()
    }

    /// Removes the elements in `range`, returning how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or ends past `len`.
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end + 1,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        let len = self.len;
        assert!(start <= end, "range start (is {start}) should be <= end (is {end})");
        assert!(end <= len, "range end (is {end}) should be <= len (is {len})");

        self.cursor_mut_at(start).remove_n(end - start)
    }

    /// Removes every element and releases every node, front to back.
    pub fn clear(&mut self) {
        while let Some(node) = self.head {
            // SAFETY: `node` is live. It is unlinked and the length settled before any
            // destructor runs, so a panicking destructor leaves a consistent list.
            unsafe {
                self.len -= (*node.as_ptr()).len;
                self.unlink(node);
                Node::release(node, &self.alloc);
            }
        }
        debug_assert_eq!(self.len, 0);
    }

    /// Swaps the contents and allocators of two lists in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Checks the chain invariants.
    ///
    /// # Panics
    ///
    /// Panics if a node is empty or over capacity, a back link is wrong, `tail` is not the last
    /// node, or the element count differs from `len`.
    pub fn assert_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.head.is_none(), self.len == 0);

        let mut count = 0;
        let mut prev: Link<T, C> = None;
        let mut next = self.head;
        while let Some(node) = next {
            // SAFETY: nodes reachable from `head` are live.
            let node_ref = unsafe { node.as_ref() };
            assert!(
                (1..=C).contains(&node_ref.len),
                "node holds {} elements, capacity {C}",
                node_ref.len
            );
            assert_eq!(node_ref.prev, prev, "broken back link");
            count += node_ref.len;
            prev = Some(node);
            next = node_ref.next;
        }
        assert_eq!(prev, self.tail, "tail is not the last node");
        assert_eq!(count, self.len, "element count differs from len");
    }

    /// Finds the node and slot holding logical index `index`, or the end sentinel.
    pub(crate) fn locate(&self, index: usize) -> (Link<T, C>, usize) {
        if index >= self.len {
            return (None, 0);
        }

        if index < self.len / 2 {
            let mut remaining = index;
            let mut next = self.head;
            while let Some(node) = next {
                // SAFETY: nodes reachable from `head` are live.
                let node_ref = unsafe { node.as_ref() };
                if remaining < node_ref.len {
                    return (Some(node), remaining);
                }
                remaining -= node_ref.len;
                next = node_ref.next;
            }
        } else {
            let mut remaining = self.len - 1 - index;
            let mut prev = self.tail;
            while let Some(node) = prev {
                // SAFETY: nodes reachable from `tail` are live.
                let node_ref = unsafe { node.as_ref() };
                if remaining < node_ref.len {
                    return (Some(node), node_ref.len - 1 - remaining);
                }
                remaining -= node_ref.len;
                prev = node_ref.prev;
            }
        }
        unreachable!("chain holds fewer than len elements")
    }

    pub(crate) const fn head(&self) -> Link<T, C> {
        self.head
    }

    pub(crate) const fn tail(&self) -> Link<T, C> {
        self.tail
    }

    /// Appends `value`, returning the node and slot it landed in.
    fn push_back_at(&mut self, value: T) -> Result<(NonNull<Node<T, C>>, usize), TryInsertError<T>> {
        let node = match self.tail {
            // SAFETY: `tail` is live.
            Some(tail) if unsafe { !(*tail.as_ptr()).is_full() } => tail,
            _ => {
                let Ok(node) = Node::allocate(&self.alloc) else {
                    return Err(TryInsertError { value });
                };
                // SAFETY: `node` is fresh and unlinked.
                unsafe { self.link_back(node) };
                node
            }
        };
        // SAFETY: `node` is live and has room.
        let slot = unsafe {
            (*node.as_ptr()).push(value);
            (*node.as_ptr()).len - 1
        };
        self.len += 1;
        Ok((node, slot))
    }

    /// Inserts `value` before the element at (`at`, `slot`), or appends it if `at` is `None`.
    ///
    /// Returns the node and slot holding the new element. A full node is split first: a new
    /// node is allocated, takes slots `[C / 2, C)` and is linked after it. Nothing is touched
    /// when the allocation fails.
    ///
    /// # Safety
    ///
    /// `at` must be `None` or a node of this list with `slot < len`.
    pub(crate) unsafe fn insert_at(
        &mut self,
        at: Link<T, C>,
        slot: usize,
        value: T,
    ) -> Result<(NonNull<Node<T, C>>, usize), TryInsertError<T>> {
        let Some(node) = at else {
            return self.push_back_at(value);
        };
        debug_assert!(slot < (*node.as_ptr()).len);

        if !(*node.as_ptr()).is_full() {
            (*node.as_ptr()).insert(slot, value);
            self.len += 1;
            return Ok((node, slot));
        }

        let Ok(fresh) = Node::allocate(&self.alloc) else {
            return Err(TryInsertError { value });
        };
        let half = C / 2;
        (*node.as_ptr()).split_off(&mut *fresh.as_ptr(), half);
        self.link_after(node, fresh);

        #[cfg(feature = "log")]
        log::trace!("UnrolledList::insert split {:p} at {} into {:p}", node, half, fresh);

        let (target, slot) = if slot > half {
            (fresh, slot - half)
        } else {
            (node, slot)
        };
        (*target.as_ptr()).insert(slot, value);
        self.len += 1;
        Ok((target, slot))
    }

    /// Takes the element at (`node`, `slot`) out.
    ///
    /// Returns it with the node and slot now holding its logical follower, `(None, 0)` if there
    /// is none. The node is released if it empties.
    ///
    /// # Safety
    ///
    /// `node` must be a node of this list and `slot < node.len`.
    pub(crate) unsafe fn take_at(
        &mut self,
        node: NonNull<Node<T, C>>,
        slot: usize,
    ) -> (T, Link<T, C>, usize) {
        let raw = node.as_ptr();
        let value = (*raw).remove(slot);
        self.len -= 1;

        if (*raw).len == 0 {
            let next = (*raw).next;
            self.unlink(node);
            Node::release(node, &self.alloc);
            (value, next, 0)
        } else if slot == (*raw).len {
            (value, (*raw).next, 0)
        } else {
            (value, Some(node), slot)
        }
    }

    /// # Safety
    ///
    /// `node` must be live and unlinked.
    unsafe fn link_back(&mut self, node: NonNull<Node<T, C>>) {
        (*node.as_ptr()).prev = self.tail;
        (*node.as_ptr()).next = None;
        match self.tail {
            Some(tail) => (*tail.as_ptr()).next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
    }

    /// # Safety
    ///
    /// `node` must be live and unlinked.
    unsafe fn link_front(&mut self, node: NonNull<Node<T, C>>) {
        (*node.as_ptr()).prev = None;
        (*node.as_ptr()).next = self.head;
        match self.head {
            Some(head) => (*head.as_ptr()).prev = Some(node),
            None => self.tail = Some(node),
        }
        self.head = Some(node);
    }

    /// # Safety
    ///
    /// `after` must be a node of this list, `node` live and unlinked.
    unsafe fn link_after(&mut self, after: NonNull<Node<T, C>>, node: NonNull<Node<T, C>>) {
        let next = (*after.as_ptr()).next;
        (*node.as_ptr()).prev = Some(after);
        (*node.as_ptr()).next = next;
        match next {
            Some(next) => (*next.as_ptr()).prev = Some(node),
            None => self.tail = Some(node),
        }
        (*after.as_ptr()).next = Some(node);
    }

    /// Detaches `node` from its neighbours, fixing `head` and `tail` as needed.
    ///
    /// # Safety
    ///
    /// `node` must be a node of this list.
    unsafe fn unlink(&mut self, node: NonNull<Node<T, C>>) {
        let prev = (*node.as_ptr()).prev.take();
        let next = (*node.as_ptr()).next.take();
        match prev {
            Some(prev) => (*prev.as_ptr()).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => (*next.as_ptr()).prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<T, const C: usize, A: Allocator> Drop for UnrolledList<T, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const C: usize, A: Allocator + Default> Default for UnrolledList<T, C, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, const C: usize, A: Allocator + Clone> Clone for UnrolledList<T, C, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.alloc = source.alloc.clone();
        self.extend(source.iter().cloned());
    }
}

impl<T, const C: usize, A: Allocator> Extend<T> for UnrolledList<T, C, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, const C: usize, A: Allocator> Extend<&'a T> for UnrolledList<T, C, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(*value);
        }
    }
}

impl<T, const C: usize, A: Allocator + Default> FromIterator<T> for UnrolledList<T, C, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new_in(A::default());
        list.extend(iter);
        list
    }
}

impl<T, const C: usize, const N: usize, A: Allocator + Default> From<[T; N]>
    for UnrolledList<T, C, A>
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const C: usize, A: Allocator> IntoIterator for UnrolledList<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, const C: usize, A: Allocator> IntoIterator for &'a UnrolledList<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const C: usize, A: Allocator> IntoIterator for &'a mut UnrolledList<T, C, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq, const C: usize, A: Allocator> PartialEq for UnrolledList<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const C: usize, A: Allocator> Eq for UnrolledList<T, C, A> {}

impl<T: PartialOrd, const C: usize, A: Allocator> PartialOrd for UnrolledList<T, C, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, const C: usize, A: Allocator> Ord for UnrolledList<T, C, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, const C: usize, A: Allocator> Hash for UnrolledList<T, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug, const C: usize, A: Allocator> fmt::Debug for UnrolledList<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}
