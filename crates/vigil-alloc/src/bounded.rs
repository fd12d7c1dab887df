//! Budgeted allocator strategy.
//!
//! [`Bounded`] wraps another strategy and refuses any acquisition that
//! would push the total outstanding bytes past a fixed limit. Clones share
//! one budget, so a container and all of its copies draw from the same
//! pool.

use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::error::AllocError;
use crate::heap::Heap;
use crate::storage::{array_layout, Storage};
use crate::strategy::Allocator;

/// Strategy that caps outstanding bytes at `limit`.
///
/// Element lifecycle is delegated to the inner strategy unchanged.
#[derive(Clone, Debug)]
pub struct Bounded<A = Heap> {
    inner: A,
    limit: usize,
    in_use: Rc<Cell<usize>>,
}

impl Bounded<Heap> {
    /// A heap-backed strategy with a budget of `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self::with_inner(Heap, limit)
    }
}

impl<A: Allocator> Bounded<A> {
    /// Wrap `inner` with a budget of `limit` bytes.
    pub fn with_inner(inner: A, limit: usize) -> Self {
        Self {
            inner,
            limit,
            in_use: Rc::new(Cell::new(0)),
        }
    }

    /// The configured budget in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes currently acquired and not yet released.
    pub fn in_use(&self) -> usize {
        self.in_use.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.in_use.get())
    }
}

// SAFETY: every block is produced by the inner strategy, whose contract
// we inherit; the budget check only ever rejects requests. A block the
// inner strategy over-provisions past the budget goes straight back to it.
unsafe impl<A: Allocator> Allocator for Bounded<A> {
    fn acquire<T>(&self, capacity: usize) -> Result<Storage<T>, AllocError> {
        let bytes = array_layout::<T>(capacity)?.size();
        if bytes > self.remaining() {
            return Err(AllocError::OutOfMemory {
                requested_bytes: bytes,
            });
        }
        let storage = self.inner.acquire::<T>(capacity)?;
        let granted = storage.byte_size();
        if granted > self.remaining() {
            // SAFETY: fresh from `inner`, no element was constructed in it.
            unsafe { self.inner.release(storage) };
            return Err(AllocError::OutOfMemory {
                requested_bytes: granted,
            });
        }
        self.in_use.set(self.in_use.get() + granted);
        Ok(storage)
    }

    unsafe fn release<T>(&self, storage: Storage<T>) {
        self.in_use
            .set(self.in_use.get().saturating_sub(storage.byte_size()));
        // SAFETY: forwarded from the caller; the block came from `inner`.
        unsafe { self.inner.release(storage) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.construct(slot, value) }
    }

    unsafe fn construct_with<T, F>(&self, slot: NonNull<T>, f: F)
    where
        F: FnOnce() -> T,
    {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.construct_with(slot, f) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.destroy(slot) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_bytes_in_use() {
        let b = Bounded::new(1024);
        let s = b.acquire::<u32>(16).unwrap();
        assert_eq!(b.in_use(), 64);
        assert_eq!(b.remaining(), 960);
        unsafe { b.release(s) };
        assert_eq!(b.in_use(), 0);
    }

    #[test]
    fn rejects_request_over_budget() {
        let b = Bounded::new(100);
        let err = b.acquire::<u64>(13).unwrap_err();
        assert_eq!(
            err,
            AllocError::OutOfMemory {
                requested_bytes: 104
            }
        );
        assert_eq!(b.in_use(), 0);
    }

    #[test]
    fn exact_budget_succeeds() {
        let b = Bounded::new(64);
        let s = b.acquire::<u64>(8).unwrap();
        assert_eq!(b.remaining(), 0);
        assert!(b.acquire::<u8>(1).is_err());
        unsafe { b.release(s) };
    }

    #[test]
    fn clones_share_one_budget() {
        let a = Bounded::new(128);
        let b = a.clone();
        let s = a.acquire::<u64>(10).unwrap();
        assert_eq!(b.in_use(), 80);
        assert!(b.acquire::<u64>(10).is_err());
        unsafe { b.release(s) };
        assert_eq!(a.in_use(), 0);
    }

    #[test]
    fn nested_budgets_both_apply() {
        let outer = Bounded::with_inner(Bounded::new(32), 1024);
        assert!(outer.acquire::<u64>(5).is_err());
        assert_eq!(outer.in_use(), 0);
    }

    /// Hands out the next power of two slots, like a size-class pool.
    #[derive(Clone)]
    struct Rounding;

    // SAFETY: blocks come from `Heap` unchanged.
    unsafe impl Allocator for Rounding {
        fn acquire<T>(&self, capacity: usize) -> Result<Storage<T>, AllocError> {
            Heap.acquire(capacity.next_power_of_two())
        }

        unsafe fn release<T>(&self, storage: Storage<T>) {
            // SAFETY: forwarded from the caller.
            unsafe { Heap.release(storage) }
        }
    }

    #[test]
    fn over_provisioned_block_is_charged_in_full() {
        let b = Bounded::with_inner(Rounding, 40);
        let err = b.acquire::<u64>(5).unwrap_err();
        assert_eq!(
            err,
            AllocError::OutOfMemory {
                requested_bytes: 64
            }
        );
        assert_eq!(b.in_use(), 0);
        assert_eq!(b.remaining(), 40);

        let s = b.acquire::<u64>(3).unwrap();
        assert_eq!(s.capacity(), 4);
        assert_eq!(b.in_use(), 32);
        assert!(b.in_use() <= b.limit());
        assert_eq!(b.remaining(), 8);
        unsafe { b.release(s) };
        assert_eq!(b.in_use(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn in_use_never_exceeds_limit(
                requests in proptest::collection::vec(0usize..64, 1..40),
            ) {
                let b = Bounded::new(512);
                let mut held = Vec::new();
                for n in requests {
                    if let Ok(s) = b.acquire::<u32>(n) {
                        held.push(s);
                    }
                    prop_assert!(b.in_use() <= b.limit());
                }
                for s in held {
                    unsafe { b.release(s) };
                }
                prop_assert_eq!(b.in_use(), 0);
            }
        }
    }
}
