//! An unrolled linked list: a doubly linked chain of nodes each storing up to `C` elements
//! inline, with node blocks taken from a pluggable [`Allocator`].
//!
//! ```
//! use unrolled_list::UnrolledList;
//!
//! let mut list: UnrolledList<u32, 4> = (0..10).collect();
//! assert_eq!(list.node_count(), 3);
//!
//! let mut cursor = list.cursor_mut_at(5);
//! cursor.remove_n(3);
//! cursor.insert(99);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 99, 8, 9]);
//! ```
#![warn(clippy::pedantic)]

pub use allocator_api2::alloc::{AllocError, Allocator, Global};

mod node;

mod list;
pub use list::*;

mod cursor;
pub use cursor::*;

mod iter;
pub use iter::*;

mod alloc;
pub use alloc::*;

mod array_allocator;
pub use array_allocator::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::pedantic)]

    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn list_send_sync() {
        assert_send::<UnrolledList<String>>();
        assert_sync::<UnrolledList<String>>();
        assert_send::<Iter<'static, String, 4>>();
        assert_send::<IterMut<'static, String, 4>>();
        assert_send::<IntoIter<String, 4>>();
    }
    #[test]
    fn list_in_array_allocator() {
        let memory = ArrayAllocator::<256>::new();
        let mut list: UnrolledList<u64, 8, _> = UnrolledList::new_in(&memory);
        list.extend(0..100);
        list.remove_range(10..90);
        assert_eq!(list.len(), 20);
        assert!(list.iter().copied().eq((0..10).chain(90..100)));
        list.assert_invariants();
        drop(list);
        assert_eq!(memory.available(), 256);
    }
}
