//! Iterators over an [`UnrolledList`].

use std::iter::FusedIterator;
use std::marker::PhantomData;

use allocator_api2::alloc::{Allocator, Global};

use crate::list::UnrolledList;
use crate::node::{Link, Node};

/// Both ends of a borrowed run of elements.
///
/// `front` is the next slot yielded from the front, `back` is one past the next slot yielded
/// from the back. `len` counts what is left and stops the two ends from crossing.
struct Range<T, const C: usize> {
    head: Link<T, C>,
    front: usize,
    tail: Link<T, C>,
    back: usize,
    len: usize,
}

impl<T, const C: usize> Clone for Range<T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const C: usize> Copy for Range<T, C> {}

impl<T, const C: usize> Range<T, C> {
    fn new(head: Link<T, C>, tail: Link<T, C>, len: usize) -> Self {
        // SAFETY: `tail` is live while the list is borrowed.
        let back = tail.map_or(0, |tail| unsafe { (*tail.as_ptr()).len });
        Self {
            head,
            front: 0,
            tail,
            back,
            len,
        }
    }

    fn next(&mut self) -> Option<*mut T> {
        if self.len == 0 {
            return None;
        }
        let node = self.head?;
        // SAFETY: `len > 0`, so `head` is live and `front` one of its live slots. Only the `len`
        // and `next` fields are read, leaving handed out elements unaliased.
        unsafe {
            let slot = Node::slot(node, self.front);
            self.front += 1;
            if self.front == (*node.as_ptr()).len {
                self.head = (*node.as_ptr()).next;
                self.front = 0;
            }
            self.len -= 1;
            Some(slot)
        }
    }

    fn next_back(&mut self) -> Option<*mut T> {
        if self.len == 0 {
            return None;
        }
        let node = self.tail?;
        // SAFETY: as in `next`, from the back.
        unsafe {
            self.back -= 1;
            let slot = Node::slot(node, self.back);
            if self.back == 0 {
                self.tail = (*node.as_ptr()).prev;
                self.back = self.tail.map_or(0, |prev| (*prev.as_ptr()).len);
            }
            self.len -= 1;
            Some(slot)
        }
    }
}

/// Iterator over shared references, created by [`UnrolledList::iter`].
pub struct Iter<'a, T, const C: usize> {
    range: Range<T, C>,
    _marker: PhantomData<&'a T>,
}

impl<T, const C: usize> Iter<'_, T, C> {
    pub(crate) fn new(head: Link<T, C>, tail: Link<T, C>, len: usize) -> Self {
        Self {
            range: Range::new(head, tail, len),
            _marker: PhantomData,
        }
    }
}

unsafe impl<T: Sync, const C: usize> Send for Iter<'_, T, C> {}
unsafe impl<T: Sync, const C: usize> Sync for Iter<'_, T, C> {}

impl<T, const C: usize> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            range: self.range,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, const C: usize> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the list is borrowed for `'a`.
        self.range.next().map(|slot| unsafe { &*slot })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.range.len, Some(self.range.len))
    }
}

impl<T, const C: usize> DoubleEndedIterator for Iter<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // SAFETY: the list is borrowed for `'a`.
        self.range.next_back().map(|slot| unsafe { &*slot })
    }
}

impl<T, const C: usize> ExactSizeIterator for Iter<'_, T, C> {}
impl<T, const C: usize> FusedIterator for Iter<'_, T, C> {}

/// Iterator over mutable references, created by [`UnrolledList::iter_mut`].
pub struct IterMut<'a, T, const C: usize> {
    range: Range<T, C>,
    _marker: PhantomData<&'a mut T>,
}

impl<T, const C: usize> IterMut<'_, T, C> {
    pub(crate) fn new(head: Link<T, C>, tail: Link<T, C>, len: usize) -> Self {
        Self {
            range: Range::new(head, tail, len),
            _marker: PhantomData,
        }
    }
}

unsafe impl<T: Send, const C: usize> Send for IterMut<'_, T, C> {}
unsafe impl<T: Sync, const C: usize> Sync for IterMut<'_, T, C> {}

impl<'a, T, const C: usize> Iterator for IterMut<'a, T, C> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the list is borrowed mutably for `'a` and every slot is yielded once.
        self.range.next().map(|slot| unsafe { &mut *slot })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.range.len, Some(self.range.len))
    }
}

impl<T, const C: usize> DoubleEndedIterator for IterMut<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // SAFETY: the list is borrowed mutably for `'a` and every slot is yielded once.
        self.range.next_back().map(|slot| unsafe { &mut *slot })
    }
}

impl<T, const C: usize> ExactSizeIterator for IterMut<'_, T, C> {}
impl<T, const C: usize> FusedIterator for IterMut<'_, T, C> {}

/// Owning iterator, created by [`UnrolledList::into_iter`].
///
/// Nodes are released as they empty. Elements left over are dropped with the iterator.
pub struct IntoIter<T, const C: usize, A: Allocator = Global> {
    list: UnrolledList<T, C, A>,
}

impl<T, const C: usize, A: Allocator> IntoIter<T, C, A> {
    pub(crate) fn new(list: UnrolledList<T, C, A>) -> Self {
        Self { list }
    }
}

impl<T, const C: usize, A: Allocator> Iterator for IntoIter<T, C, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, const C: usize, A: Allocator> DoubleEndedIterator for IntoIter<T, C, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, const C: usize, A: Allocator> ExactSizeIterator for IntoIter<T, C, A> {}
impl<T, const C: usize, A: Allocator> FusedIterator for IntoIter<T, C, A> {}

#[cfg(test)]
mod tests {
    #![allow(clippy::pedantic)]

    use rand::Rng;

    use super::*;
    use crate::TrackingAllocator;

    #[test]
    fn iter_empty() {
        let list: UnrolledList<i32, 3> = UnrolledList::new();
        let mut iter = list.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
    #[test]
    fn iter_forward_and_back() {
        let list: UnrolledList<i32, 3> = (0..10).collect();
        assert!(list.iter().copied().eq(0..10));
        assert!(list.iter().rev().copied().eq((0..10).rev()));
        assert_eq!(list.iter().len(), 10);
    }
    #[test]
    fn iter_ends_meet() {
        let list: UnrolledList<i32, 3> = (0..10).collect();
        let mut iter = list.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        loop {
            match iter.next() {
                Some(&v) => front.push(v),
                None => break,
            }
            match iter.next_back() {
                Some(&v) => back.push(v),
                None => break,
            }
        }
        assert_eq!(front, [0, 1, 2, 3, 4]);
        assert_eq!(back, [9, 8, 7, 6, 5]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
    #[test]
    fn iter_random_ends_against_oracle() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let n = rng.gen_range(0..40);
            let list: UnrolledList<usize, 4> = (0..n).collect();
            let oracle: Vec<usize> = (0..n).collect();
            let mut iter = list.iter();
            let mut expected = oracle.iter();
            for _ in 0..=n {
                if rng.gen_bool(0.5) {
                    assert_eq!(iter.next(), expected.next());
                } else {
                    assert_eq!(iter.next_back(), expected.next_back());
                }
                assert_eq!(iter.len(), expected.len());
            }
        }
    }
    #[test]
    fn iter_clone_is_independent() {
        let list: UnrolledList<i32, 2> = UnrolledList::from([1, 2, 3]);
        let mut iter = list.iter();
        iter.next();
        let copy = iter.clone();
        iter.next();
        assert_eq!(copy.copied().collect::<Vec<_>>(), [2, 3]);
        assert_eq!(iter.copied().collect::<Vec<_>>(), [3]);
    }
    #[test]
    fn iter_mut_edits() {
        let mut list: UnrolledList<i32, 3> = (0..7).collect();
        for value in list.iter_mut().rev().take(3) {
            *value = -*value;
        }
        for value in &mut list {
            *value += 1;
        }
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            [1, 2, 3, 4, -3, -4, -5]
        );
    }
    #[test]
    fn iter_mut_holds_many_references() {
        let mut list: UnrolledList<String, 4> = UnrolledList::from(["a", "b", "c"].map(String::from));
        let refs: Vec<&mut String> = list.iter_mut().collect();
        for r in refs {
            r.push('!');
        }
        assert_eq!(list.iter().map(String::as_str).collect::<Vec<_>>(), ["a!", "b!", "c!"]);
    }
    #[test]
    fn into_iter_both_ends() {
        let list: UnrolledList<String, 2> = (0..5).map(|i| i.to_string()).collect();
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next().as_deref(), Some("0"));
        assert_eq!(iter.next_back().as_deref(), Some("4"));
        assert_eq!(iter.collect::<Vec<_>>(), ["1", "2", "3"]);
    }
    #[test]
    fn into_iter_partial_releases_everything() {
        let tracker = TrackingAllocator::new(Global);
        let mut list: UnrolledList<String, 2, _> = UnrolledList::new_in(&tracker);
        list.extend((0..9).map(|i| i.to_string()));

        let mut iter = list.into_iter();
        iter.next();
        iter.next();
        iter.next();
        assert_eq!(tracker.stats().deallocations, 1);
        drop(iter);
        assert!(tracker.stats().is_balanced());
    }
}
