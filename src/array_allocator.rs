//! First-fit allocator managing memory within an array.
//!
//! The array is divided into [`BLOCK_SIZE`]-byte blocks. Free runs of blocks form a list sorted
//! by index, each run storing its own header (`size`, `next`) in its first block. Allocation
//! takes the front of the first run large enough, deallocation puts a run back in order and
//! merges it with adjacent free runs.

use std::alloc::Layout;
use std::cell::{Cell, UnsafeCell};
use std::cmp::Ordering;
use std::fmt;
use std::mem::{align_of, size_of};
use std::ptr::NonNull;

use allocator_api2::alloc::{AllocError, Allocator};

use crate::alloc::CompatibleAlloc;

/// Size in bytes of one block.
pub const BLOCK_SIZE: usize = size_of::<Block>();
/// Largest alignment an [`ArrayAllocator`] can satisfy.
pub const BLOCK_ALIGN: usize = align_of::<Block>();

/// Header of a free run of blocks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(C, align(16))]
pub struct Block {
    size: usize,
    next: Option<usize>,
}

impl Block {
    const EMPTY: Self = Block {
        size: 0,
        next: None,
    };
}

/// An allocator handing out blocks of an inline array of `N` blocks.
///
/// Blocks point into the array, so only a borrow, `&ArrayAllocator<N>`, is an [`Allocator`].
/// The borrow keeps the array in place for as long as any block is handed out.
///
/// ```
/// use unrolled_list::{ArrayAllocator, UnrolledList};
///
/// let memory = ArrayAllocator::<64>::new();
/// let mut list: UnrolledList<u8, 8, _> = UnrolledList::new_in(&memory);
/// list.extend(0..20);
/// assert!(memory.available() < 64);
/// drop(list);
/// assert_eq!(memory.available(), 64);
/// ```
///
/// A list cannot own the allocator, since moving the list would move the blocks:
///
/// ```compile_fail
/// use unrolled_list::{ArrayAllocator, UnrolledList};
///
/// let list: UnrolledList<u8, 8, ArrayAllocator<64>> = UnrolledList::new_in(ArrayAllocator::new());
/// ```
pub struct ArrayAllocator<const N: usize> {
    head: Cell<Option<usize>>,
    data: UnsafeCell<[Block; N]>,
}

impl<const N: usize> ArrayAllocator<N> {
    /// Creates an allocator with all `N` blocks free.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        #[cfg(feature = "log")]
        log::trace!("ArrayAllocator::new");

        let mut data = [Block::EMPTY; N];
        let head = if N > 0 {
            data[0] = Block {
                size: N,
                next: None,
            };
            Some(0)
        } else {
            None
        };
        Self {
            head: Cell::new(head),
            data: UnsafeCell::new(data),
        }
    }

    /// Number of free blocks.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_runs().map(|(_, size)| size).sum()
    }

    /// Free runs as `(index, size)` pairs, in index order.
    pub fn free_runs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut next = self.head.get();
        std::iter::from_fn(move || {
            let index = next?;
            let block = self.read(index);
            next = block.next;
            Some((index, block.size))
        })
    }

    #[inline]
    fn block(&self, index: usize) -> *mut Block {
        debug_assert!(index < N);
        // SAFETY: `index` is within the array.
        unsafe { self.data.get().cast::<Block>().add(index) }
    }

    #[inline]
    fn read(&self, index: usize) -> Block {
        // SAFETY: free run headers are only ever touched through these accessors, never while a
        // block containing them is handed out.
        unsafe { self.block(index).read() }
    }

    #[inline]
    fn write(&self, index: usize, block: Block) {
        // SAFETY: see `read`.
        unsafe { self.block(index).write(block) }
    }

    /// Points the link preceding a run (the list head or `prev.next`) at `next`.
    fn relink(&self, prev: Option<usize>, next: Option<usize>) {
        match prev {
            Some(prev) => {
                let mut block = self.read(prev);
                block.next = next;
                self.write(prev, block);
            }
            None => self.head.set(next),
        }
    }

    fn blocks_for(layout: Layout) -> usize {
        layout.size().div_ceil(BLOCK_SIZE).max(1)
    }

    fn index_of(&self, ptr: NonNull<u8>) -> usize {
        let offset = ptr.as_ptr() as usize - self.data.get() as usize;
        debug_assert_eq!(offset % BLOCK_SIZE, 0);
        offset / BLOCK_SIZE
    }

    fn take(&self, blocks: usize) -> Option<usize> {
        let mut prev = None;
        let mut current = self.head.get();
        while let Some(index) = current {
            let block = self.read(index);
            match blocks.cmp(&block.size) {
                // ┌───┬──────┬───┐
                // │...│index │...│
                // └───┴──────┴───┘
                // The run is used whole.
                Ordering::Equal => {
                    self.relink(prev, block.next);
                    return Some(index);
                }
                // ┌───┬──────┬──────────┬───┐
                // │...│index │index + n │...│
                // └───┴──────┴──────────┴───┘
                // The front is handed out, the remainder takes its place in the list.
                Ordering::Less => {
                    let rest = index + blocks;
                    self.write(
                        rest,
                        Block {
                            size: block.size - blocks,
                            next: block.next,
                        },
                    );
                    self.relink(prev, Some(rest));
                    return Some(index);
                }
                Ordering::Greater => {
                    prev = Some(index);
                    current = block.next;
                }
            }
        }
        None
    }

    fn give_back(&self, index: usize, blocks: usize) {
        let end = index + blocks;

        let mut prev = None;
        let mut next = self.head.get();
        while let Some(current) = next {
            if current > index {
                break;
            }
            debug_assert!(current + self.read(current).size <= index, "double free");
            prev = Some(current);
            next = self.read(current).next;
        }

        // ┌───┬────┬────┬───┐
        // │...│self│next│...│
        // └───┴────┴────┴───┘
        // Absorb the following run when it starts where this one ends.
        let (mut size, mut link) = (blocks, next);
        if next == Some(end) {
            let following = self.read(end);
            size += following.size;
            link = following.next;
        }

        match prev {
            // ┌───┬────┬────┬───┐
            // │...│prev│self│...│
            // └───┴────┴────┴───┘
            // The preceding run absorbs this one.
            Some(prev) if prev + self.read(prev).size == index => {
                let size = self.read(prev).size + size;
                self.write(prev, Block { size, next: link });
            }
            // ┌───┬────┬───┬────┬───┐
            // │...│prev│...│self│...│
            // └───┴────┴───┴────┴───┘
            Some(prev) => {
                self.write(index, Block { size, next: link });
                self.relink(Some(prev), Some(index));
            }
            // No free run before this one.
            None => {
                self.write(index, Block { size, next: link });
                self.head.set(Some(index));
            }
        }
    }
}

impl<const N: usize> fmt::Debug for ArrayAllocator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayAllocator")
            .field("blocks", &N)
            .field("free", &self.free_runs().collect::<Vec<_>>())
            .finish()
    }
}

// Blocks point into the array itself, so only a borrow may hand them out: moving the
// allocator would move every block with it.
unsafe impl<const N: usize> Allocator for &ArrayAllocator<N> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if layout.align() > BLOCK_ALIGN {
            #[cfg(feature = "log")]
            log::debug!("ArrayAllocator::allocate unsupported alignment {}", layout.align());
            return Err(AllocError);
        }

        let blocks = ArrayAllocator::<N>::blocks_for(layout);
        let Some(index) = self.take(blocks) else {
            #[cfg(feature = "log")]
            log::debug!("ArrayAllocator::allocate no run of {blocks} blocks");
            return Err(AllocError);
        };

        #[cfg(feature = "log")]
        log::trace!("ArrayAllocator::allocate {blocks} blocks at {index}");

        let ptr = NonNull::new(self.block(index).cast::<u8>()).ok_or(AllocError)?;
        Ok(NonNull::slice_from_raw_parts(ptr, blocks * BLOCK_SIZE))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let index = self.index_of(ptr);
        let blocks = ArrayAllocator::<N>::blocks_for(layout);

        #[cfg(feature = "log")]
        log::trace!("ArrayAllocator::deallocate {blocks} blocks at {index}");

        self.give_back(index, blocks);
    }
}

impl<const N: usize> CompatibleAlloc for &ArrayAllocator<N> {
    fn can_release(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}
