//! Cursors over an [`UnrolledList`].
//!
//! A cursor points at a node and a slot within it, or at the end sentinel past the last
//! element. The sentinel sits between the back and the front: moving forward from it wraps to
//! the first element, moving backward wraps to the last.

use std::fmt;

use allocator_api2::alloc::{Allocator, Global};

use crate::error::{Error, TryInsertError};
use crate::list::{alloc_failed, UnrolledList};
use crate::node::{Link, Node};

/// Identity of an element slot, or of the end sentinel.
///
/// A position compares node identity and slot index. It is a token only and cannot be
/// dereferenced; reading goes through a live cursor. Mutations change which element a
/// position names:
///
/// - splitting a full node moves its slots `[C / 2, C)` into a new node, so positions at those
///   slots of the split node are stale; lower slots keep naming the same element.
/// - inserting into or removing from a node without a split shifts the slots at and after the
///   mutated one, so those positions are stale.
/// - removing through a cursor leaves the cursor on the follower of the removed element, or at
///   the end.
/// - positions in untouched nodes stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    node: usize,
    slot: usize,
}

impl Position {
    /// The end sentinel.
    pub const END: Self = Self { node: 0, slot: 0 };

    fn new<T, const C: usize>(node: Link<T, C>, slot: usize) -> Self {
        match node {
            Some(node) => Self {
                node: node.as_ptr() as usize,
                slot,
            },
            None => Self::END,
        }
    }

    /// Returns `true` for the end sentinel.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.node == 0
    }

    /// Slot within the node, `0` for the end sentinel.
    #[inline]
    pub const fn slot(&self) -> usize {
        self.slot
    }
}

/// Where a cursor stands; `index` equals the list length at the end.
struct Spot<T, const C: usize> {
    node: Link<T, C>,
    slot: usize,
    index: usize,
}

impl<T, const C: usize> Clone for Spot<T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const C: usize> Copy for Spot<T, C> {}

impl<T, const C: usize> Spot<T, C> {
    fn step_next<A: Allocator>(&mut self, list: &UnrolledList<T, C, A>) {
        match self.node {
            None => {
                self.node = list.head();
                self.slot = 0;
                self.index = 0;
            }
            Some(node) => {
                // SAFETY: the cursor borrows the list, so `node` is live.
                let node = unsafe { node.as_ref() };
                if self.slot + 1 < node.len {
                    self.slot += 1;
                } else {
                    self.node = node.next;
                    self.slot = 0;
                }
                self.index += 1;
            }
        }
    }

    fn step_prev<A: Allocator>(&mut self, list: &UnrolledList<T, C, A>) {
        let prev = match self.node {
            None => list.tail(),
            Some(_) if self.slot > 0 => {
                self.slot -= 1;
                self.index -= 1;
                return;
            }
            // SAFETY: the cursor borrows the list, so `node` is live.
            Some(node) => unsafe { node.as_ref().prev },
        };
        match prev {
            Some(prev) => {
                // SAFETY: linked nodes are live and hold at least one element.
                self.slot = unsafe { prev.as_ref().len } - 1;
                self.node = Some(prev);
                self.index -= 1;
            }
            None => {
                self.node = None;
                self.slot = 0;
                self.index = list.len();
            }
        }
    }

    fn index(&self) -> Option<usize> {
        self.node.map(|_| self.index)
    }

    fn position(&self) -> Position {
        Position::new(self.node, self.slot)
    }
}

/// A read-only cursor.
///
/// ```
/// use unrolled_list::UnrolledList;
///
/// let list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
/// let mut cursor = list.cursor_front();
/// cursor.move_next();
/// assert_eq!(cursor.current(), Some(&2));
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.current(), None);
/// assert_eq!(cursor.index(), None);
/// ```
pub struct Cursor<'a, T, const C: usize, A: Allocator = Global> {
    list: &'a UnrolledList<T, C, A>,
    spot: Spot<T, C>,
}

impl<'a, T, const C: usize, A: Allocator> Cursor<'a, T, C, A> {
    pub(crate) fn new(
        list: &'a UnrolledList<T, C, A>,
        node: Link<T, C>,
        slot: usize,
        index: usize,
    ) -> Self {
        Self {
            list,
            spot: Spot { node, slot, index },
        }
    }

    /// Returns the element under the cursor, `None` at the end.
    pub fn current(&self) -> Option<&'a T> {
        // SAFETY: `slot` is live while the list is borrowed.
        self.spot
            .node
            .map(|node| unsafe { &*Node::slot(node, self.spot.slot) })
    }

    /// Moves to the next element, from the end to the front.
    pub fn move_next(&mut self) {
        self.spot.step_next(self.list);
    }

    /// Moves to the previous element, from the front to the end and from the end to the back.
    pub fn move_prev(&mut self) {
        self.spot.step_prev(self.list);
    }

    /// Logical index of the current element, `None` at the end.
    pub fn index(&self) -> Option<usize> {
        self.spot.index()
    }

    /// Identity of the current slot.
    pub fn position(&self) -> Position {
        self.spot.position()
    }
}

impl<T, const C: usize, A: Allocator> Clone for Cursor<'_, T, C, A> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            spot: self.spot,
        }
    }
}

impl<T, const C: usize, A: Allocator> PartialEq for Cursor<'_, T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl<T, const C: usize, A: Allocator> Eq for Cursor<'_, T, C, A> {}

impl<T: fmt::Debug, const C: usize, A: Allocator> fmt::Debug for Cursor<'_, T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.index())
            .field(&self.current())
            .finish()
    }
}

/// A cursor that can insert and remove.
///
/// ```
/// use unrolled_list::UnrolledList;
///
/// let mut list: UnrolledList<i32, 2> = UnrolledList::from([1, 3, 4]);
/// let mut cursor = list.cursor_mut_at(1);
/// cursor.insert(2);
/// assert_eq!(cursor.current(), Some(&mut 2));
/// cursor.move_next();
/// assert_eq!(cursor.remove_current(), Some(3));
/// assert_eq!(cursor.current(), Some(&mut 4));
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);
/// ```
pub struct CursorMut<'a, T, const C: usize, A: Allocator = Global> {
    list: &'a mut UnrolledList<T, C, A>,
    spot: Spot<T, C>,
}

impl<'a, T, const C: usize, A: Allocator> CursorMut<'a, T, C, A> {
    pub(crate) fn new(
        list: &'a mut UnrolledList<T, C, A>,
        node: Link<T, C>,
        slot: usize,
        index: usize,
    ) -> Self {
        Self {
            list,
            spot: Spot { node, slot, index },
        }
    }

    /// Returns the element under the cursor, `None` at the end.
    pub fn current(&mut self) -> Option<&mut T> {
        // SAFETY: `slot` is live and the list is borrowed mutably through `self`.
        self.spot
            .node
            .map(|node| unsafe { &mut *Node::slot(node, self.spot.slot) })
    }

    /// Moves to the next element, from the end to the front.
    pub fn move_next(&mut self) {
        self.spot.step_next(self.list);
    }

    /// Moves to the previous element, from the front to the end and from the end to the back.
    pub fn move_prev(&mut self) {
        self.spot.step_prev(self.list);
    }

    /// Logical index of the current element, `None` at the end.
    pub fn index(&self) -> Option<usize> {
        self.spot.index()
    }

    /// Identity of the current slot.
    pub fn position(&self) -> Position {
        self.spot.position()
    }

    /// Returns a read-only cursor at the same element.
    pub fn as_cursor(&self) -> Cursor<'_, T, C, A> {
        Cursor {
            list: &*self.list,
            spot: self.spot,
        }
    }

    /// Inserts `value` before the current element, or at the back when at the end, and moves
    /// onto it.
    ///
    /// # Panics
    ///
    /// Calls [`handle_alloc_error`](std::alloc::handle_alloc_error) if a node is needed and
    /// cannot be allocated.
    pub fn insert(&mut self, value: T) {
        if self.try_insert(value).is_err() {
            alloc_failed::<T, C>();
        }
    }

    /// Inserts `value` like [`insert`](Self::insert), handing it back if a node is needed and
    /// cannot be allocated.
    ///
    /// # Errors
    ///
    /// On allocation failure neither the list nor the cursor change.
    pub fn try_insert(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        // SAFETY: the spot is the end sentinel or a live slot of `list`.
        let (node, slot) = unsafe { self.list.insert_at(self.spot.node, self.spot.slot, value)? };
        self.spot.node = Some(node);
        self.spot.slot = slot;
        Ok(())
    }

    /// Inserts `n` clones of `value` before the current element and moves onto the first.
    ///
    /// # Panics
    ///
    /// Calls [`handle_alloc_error`](std::alloc::handle_alloc_error) if a node is needed and
    /// cannot be allocated.
    pub fn insert_n(&mut self, n: usize, value: &T)
    where
        T: Clone,
    {
        if self.try_insert_n(n, value).is_err() {
            alloc_failed::<T, C>();
        }
    }

    /// Inserts `n` clones of `value` like [`insert_n`](Self::insert_n).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if a node could not be allocated. Clones inserted before the
    /// failure stay in the list, with the cursor on the most recent one.
    pub fn try_insert_n(&mut self, n: usize, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        for _ in 0..n {
            self.try_insert(value.clone())?;
        }
        Ok(())
    }

    /// Removes the current element and moves onto its follower, or the end.
    ///
    /// Returns `None` at the end.
    pub fn remove_current(&mut self) -> Option<T> {
        let node = self.spot.node?;
        // SAFETY: `node` is a live node of `list` and `slot < len`.
        let (value, next, slot) = unsafe { self.list.take_at(node, self.spot.slot) };
        self.spot.node = next;
        self.spot.slot = slot;
        if next.is_none() {
            self.spot.index = self.list.len();
        }
        Some(value)
    }

    /// Removes up to `n` elements starting at the current one, stopping at the end.
    ///
    /// Returns how many were removed.
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.remove_current().is_some() {
            removed += 1;
        }
        removed
    }
}

impl<T: fmt::Debug, const C: usize, A: Allocator> fmt::Debug for CursorMut<'_, T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.index())
            .field(&self.as_cursor().current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::pedantic)]

    use super::*;
    use crate::ArrayAllocator;

    fn contents<const C: usize, A: Allocator>(list: &UnrolledList<i32, C, A>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn cursor_empty_list() {
        let list: UnrolledList<i32, 4> = UnrolledList::new();
        let mut cursor = list.cursor_front();
        assert_eq!(cursor, list.cursor_back());
        assert_eq!(cursor.position(), Position::END);
        assert!(cursor.position().is_end());
        assert_eq!(cursor.current(), None);
        cursor.move_next();
        assert_eq!(cursor.current(), None);
        cursor.move_prev();
        assert_eq!(cursor.index(), None);
    }
    #[test]
    fn cursor_walks_forward_across_nodes() {
        let list: UnrolledList<i32, 3> = (0..8).collect();
        let mut cursor = list.cursor_front();
        let mut seen = Vec::new();
        while let Some(&value) = cursor.current() {
            assert_eq!(cursor.index(), Some(seen.len()));
            seen.push(value);
            cursor.move_next();
        }
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert_eq!(cursor.index(), None);

        cursor.move_next();
        assert_eq!(cursor.current(), Some(&0));
        assert_eq!(cursor.index(), Some(0));
    }
    #[test]
    fn cursor_walks_backward_across_nodes() {
        let list: UnrolledList<i32, 3> = (0..8).collect();
        let mut cursor = list.cursor_back();
        let mut seen = Vec::new();
        while let Some(&value) = cursor.current() {
            assert_eq!(cursor.index(), Some(value as usize));
            seen.push(value);
            cursor.move_prev();
        }
        assert_eq!(seen, (0..8).rev().collect::<Vec<_>>());

        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&7));
        assert_eq!(cursor.index(), Some(7));
    }
    #[test]
    fn cursor_at_index() {
        let list: UnrolledList<i32, 3> = (0..10).collect();
        for i in 0..10 {
            let cursor = list.cursor_at(i);
            assert_eq!(cursor.current(), Some(&(i as i32)));
            assert_eq!(cursor.index(), Some(i));
        }
        assert_eq!(list.cursor_at(10).position(), Position::END);
        assert_eq!(list.cursor_at(99).current(), None);
    }
    #[test]
    fn cursor_equality_is_position() {
        let list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
        let mut a = list.cursor_front();
        let b = list.cursor_at(1);
        assert_ne!(a, b);
        a.move_next();
        assert_eq!(a, b);
        assert_eq!(a.position().slot(), 1);
        let c = a.clone();
        assert_eq!(c.position(), b.position());
    }
    #[test]
    fn cursor_mut_insert_into_empty() {
        let mut list: UnrolledList<i32, 4> = UnrolledList::new();
        let mut cursor = list.cursor_front_mut();
        cursor.insert(10);
        assert_eq!(cursor.current(), Some(&mut 10));
        assert_eq!(cursor.index(), Some(0));
        assert_eq!(list.len(), 1);
        assert_eq!(contents(&list), [10]);
    }
    #[test]
    fn cursor_mut_insert_at_end_appends() {
        let mut list: UnrolledList<i32, 2> = UnrolledList::from([1, 2]);
        let mut cursor = list.cursor_mut_at(2);
        cursor.insert(3);
        assert_eq!(cursor.index(), Some(2));
        cursor.move_next();
        assert_eq!(cursor.current(), None);
        assert_eq!(contents(&list), [1, 2, 3]);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_insert_lands_on_value() {
        let mut list: UnrolledList<i32, 4> = UnrolledList::from([0, 1, 2, 3, 4, 5, 6]);
        for at in [0, 3, 5, 9] {
            let mut cursor = list.cursor_mut_at(at);
            cursor.insert(-1);
            assert_eq!(cursor.current(), Some(&mut -1));
            assert_eq!(cursor.index(), Some(at));
            cursor.move_next();
            let follower = cursor.index();
            assert_eq!(follower.unwrap_or(list.len()), at + 1);
            list.assert_invariants();
        }
        assert_eq!(contents(&list), [-1, 0, 1, -1, 2, -1, 3, 4, 5, -1, 6]);
    }
    #[test]
    fn cursor_mut_split_moves_upper_half() {
        let mut list: UnrolledList<i32, 4> = UnrolledList::from([0, 1, 2, 3]);
        let before: Vec<Position> = (0..4).map(|i| list.cursor_at(i).position()).collect();

        list.cursor_mut_at(3).insert(-1);
        assert_eq!(contents(&list), [0, 1, 2, -1, 3]);
        assert_eq!(list.cursor_at(0).position(), before[0]);
        assert_eq!(list.cursor_at(1).position(), before[1]);
        assert_ne!(list.cursor_at(2).position(), before[2]);
        assert_eq!(list.cursor_at(2).position().slot(), 0);
        assert_eq!(list.cursor_at(4).position().slot(), 2);
    }
    #[test]
    fn cursor_mut_shift_renames_later_slots() {
        let mut list: UnrolledList<i32, 4> = UnrolledList::from([0, 1, 2]);
        let before: Vec<Position> = (0..3).map(|i| list.cursor_at(i).position()).collect();

        list.cursor_mut_at(1).insert(-1);
        assert_eq!(list.cursor_at(0).position(), before[0]);
        // Slot 1 now holds the inserted value, `1` moved on to slot 2.
        assert_eq!(list.cursor_at(1).position(), before[1]);
        assert_eq!(list.cursor_at(1).current(), Some(&-1));
        assert_eq!(list.cursor_at(2).position(), before[2]);
        assert_eq!(list.cursor_at(2).current(), Some(&1));
    }
    #[test]
    fn cursor_mut_try_insert_failure_leaves_list() {
        let memory = ArrayAllocator::<2>::new();
        let mut list: UnrolledList<u64, 2, _> = UnrolledList::new_in(&memory);
        list.extend([1, 2]);

        let mut cursor = list.cursor_mut_at(1);
        let before = cursor.position();
        let err = cursor.try_insert(9).unwrap_err();
        assert_eq!(err.into_inner(), 9);
        assert_eq!(cursor.position(), before);
        assert_eq!(cursor.current(), Some(&mut 2));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2]);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_insert_n() {
        let mut list: UnrolledList<i32, 3> = UnrolledList::from([1, 2]);
        let mut cursor = list.cursor_mut_at(1);
        cursor.insert_n(5, &7);
        assert_eq!(cursor.index(), Some(1));
        cursor.insert_n(0, &8);
        assert_eq!(contents(&list), [1, 7, 7, 7, 7, 7, 2]);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_try_insert_n_stops_at_failure() {
        let memory = ArrayAllocator::<2>::new();
        let mut list: UnrolledList<u64, 2, _> = UnrolledList::new_in(&memory);
        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.try_insert_n(5, &3), Err(Error::Alloc));
        assert_eq!(list.len(), 2);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_remove_current() {
        let mut list: UnrolledList<i32, 4> = UnrolledList::from([1, 2, 3, 4, 5]);
        let mut cursor = list.cursor_mut_at(1);
        assert_eq!(cursor.remove_current(), Some(2));
        assert_eq!(cursor.current(), Some(&mut 3));
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(contents(&list), [1, 3, 4, 5]);
    }
    #[test]
    fn cursor_mut_remove_last_of_node_moves_to_next() {
        let mut list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
        let mut cursor = list.cursor_mut_at(1);
        assert_eq!(cursor.remove_current(), Some(2));
        assert_eq!(cursor.current(), Some(&mut 3));
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(cursor.remove_current(), Some(3));
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.index(), None);
        assert_eq!(cursor.remove_current(), None);
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&mut 1));
        assert_eq!(list.node_count(), 1);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_remove_n() {
        let mut list: UnrolledList<i32, 3> = (0..10).collect();
        let mut cursor = list.cursor_mut_at(2);
        assert_eq!(cursor.remove_n(4), 4);
        assert_eq!(cursor.current(), Some(&mut 6));
        assert_eq!(cursor.remove_n(100), 4);
        assert_eq!(cursor.current(), None);
        assert_eq!(contents(&list), [0, 1]);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_remove_all_from_front() {
        let mut list: UnrolledList<i32, 3> = UnrolledList::from([1, 2, 3]);
        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.remove_current(), Some(1));
        assert_eq!(cursor.current(), Some(&mut 2));
        assert_eq!(cursor.remove_n(2), 2);
        assert_eq!(cursor.position(), Position::END);
        assert!(list.is_empty());
        assert_eq!(list.node_count(), 0);
        list.assert_invariants();
    }
    #[test]
    fn cursor_mut_edit_in_place() {
        let mut list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
        let mut cursor = list.cursor_back_mut();
        while let Some(value) = cursor.current() {
            *value *= 10;
            cursor.move_prev();
        }
        assert_eq!(contents(&list), [10, 20, 30]);
    }
    #[test]
    fn cursor_mut_as_cursor() {
        let mut list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
        let cursor = list.cursor_mut_at(2);
        assert_eq!(cursor.as_cursor().current(), Some(&3));
        assert_eq!(cursor.as_cursor().position(), cursor.position());
        assert_eq!(format!("{cursor:?}"), "CursorMut(Some(2), Some(3))");
    }
}
