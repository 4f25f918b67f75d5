//! Allocation strategies for node blocks.
//!
//! Lists take any [`Allocator`] from `allocator_api2`. Moving a list into a new allocator
//! additionally needs [`CompatibleAlloc`] to decide whether the chain can be adopted as-is.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use allocator_api2::alloc::{AllocError, Allocator, Global};

/// An allocator that can tell whether blocks from another instance may be released through it.
pub trait CompatibleAlloc: Allocator {
    /// Returns `true` if blocks allocated by `other` may be deallocated through `self`.
    fn can_release(&self, other: &Self) -> bool;
}

impl CompatibleAlloc for Global {
    #[inline]
    fn can_release(&self, _other: &Self) -> bool {
        true
    }
}

impl<A: CompatibleAlloc + ?Sized> CompatibleAlloc for &A {
    #[inline]
    fn can_release(&self, other: &Self) -> bool {
        (**self).can_release(*other)
    }
}

/// Allocation counters of a [`TrackingAllocator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationStats {
    /// Number of successful allocations.
    pub allocations: usize,
    /// Number of deallocations.
    pub deallocations: usize,
    /// Number of requests the inner allocator refused.
    pub failures: usize,
    /// Bytes currently allocated.
    pub bytes_in_use: usize,
    /// Largest value `bytes_in_use` reached.
    pub peak_bytes: usize,
}

impl AllocationStats {
    /// Returns `true` if every allocation has been matched by a deallocation.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.allocations == self.deallocations && self.bytes_in_use == 0
    }
}

/// Wraps an allocator and counts the requests passing through it.
///
/// Counters live in the instance, so lists sharing one tracker (through `&TrackingAllocator`)
/// are counted together, and separate trackers never interfere.
///
/// ```
/// use unrolled_list::{TrackingAllocator, UnrolledList};
///
/// let tracker: TrackingAllocator = TrackingAllocator::default();
/// let mut list: UnrolledList<u32, 4, _> = UnrolledList::new_in(&tracker);
/// list.extend(0..9);
/// assert_eq!(tracker.stats().allocations, 3);
/// drop(list);
/// assert!(tracker.stats().is_balanced());
/// ```
#[derive(Debug, Default)]
pub struct TrackingAllocator<A = Global> {
    inner: A,
    stats: Cell<AllocationStats>,
}

impl<A> TrackingAllocator<A> {
    /// Creates a tracker around `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            stats: Cell::new(AllocationStats::default()),
        }
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> AllocationStats {
        self.stats.get()
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.stats.set(AllocationStats::default());
    }

    /// Returns the wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn update(&self, f: impl FnOnce(&mut AllocationStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

unsafe impl<A: Allocator> Allocator for TrackingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        match self.inner.allocate(layout) {
            Ok(block) => {
                self.update(|stats| {
                    stats.allocations += 1;
                    stats.bytes_in_use += layout.size();
                    stats.peak_bytes = stats.peak_bytes.max(stats.bytes_in_use);
                });
                Ok(block)
            }
            Err(err) => {
                self.update(|stats| stats.failures += 1);
                Err(err)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.update(|stats| {
            stats.deallocations += 1;
            stats.bytes_in_use -= layout.size();
        });
        self.inner.deallocate(ptr, layout);
    }
}

impl<A: Allocator> CompatibleAlloc for TrackingAllocator<A> {
    fn can_release(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::pedantic)]

    use super::*;

    #[test]
    fn global_is_compatible() {
        assert!(Global.can_release(&Global));
        assert!(<&Global as CompatibleAlloc>::can_release(&&Global, &&Global));
    }
    #[test]
    fn tracking_compatible_only_with_itself() {
        let a = TrackingAllocator::new(Global);
        let b = TrackingAllocator::new(Global);
        assert!(a.can_release(&a));
        assert!(!a.can_release(&b));
        assert!(<&TrackingAllocator as CompatibleAlloc>::can_release(&&a, &&a));
        assert!(!<&TrackingAllocator as CompatibleAlloc>::can_release(&&a, &&b));
    }
    #[test]
    fn tracking_counts() {
        let tracker = TrackingAllocator::new(Global);
        let layout = Layout::new::<[u64; 4]>();

        let a = tracker.allocate(layout).unwrap();
        let b = tracker.allocate(layout).unwrap();
        assert_eq!(
            tracker.stats(),
            AllocationStats {
                allocations: 2,
                deallocations: 0,
                failures: 0,
                bytes_in_use: 64,
                peak_bytes: 64,
            }
        );

        unsafe {
            tracker.deallocate(a.cast(), layout);
            tracker.deallocate(b.cast(), layout);
        }
        let stats = tracker.stats();
        assert!(stats.is_balanced());
        assert_eq!(stats.peak_bytes, 64);

        tracker.reset();
        assert_eq!(tracker.stats(), AllocationStats::default());
    }
}
