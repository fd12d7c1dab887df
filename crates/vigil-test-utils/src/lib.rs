//! Test utilities and instrumented types for Vigil development.
//!
//! Provides a [`TrackingAlloc`] strategy that counts every acquire,
//! release, construct and destroy it performs, plus element fixtures in
//! [`fixtures`] for checking that containers neither leak nor double-drop.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod fixtures;

use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use vigil_alloc::{AllocError, Allocator, Heap, Storage};

pub use fixtures::{DropLog, MoveOnly, Tracked};

/// Snapshot of a [`TrackingAlloc`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub acquires: usize,
    pub releases: usize,
    pub constructs: usize,
    pub destroys: usize,
}

impl AllocStats {
    /// Blocks acquired and not yet released.
    pub fn outstanding_blocks(&self) -> usize {
        self.acquires - self.releases
    }

    /// Elements constructed and not yet destroyed.
    pub fn constructed_minus_destroyed(&self) -> isize {
        self.constructs as isize - self.destroys as isize
    }
}

/// Heap-backed strategy that counts every operation.
///
/// Clones share counters, so a container and its copies report together.
#[derive(Clone, Debug, Default)]
pub struct TrackingAlloc {
    stats: Rc<Cell<AllocStats>>,
}

impl TrackingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    fn bump(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }
}

// SAFETY: storage comes from `Heap` unchanged.
unsafe impl Allocator for TrackingAlloc {
    fn acquire<T>(&self, capacity: usize) -> Result<Storage<T>, AllocError> {
        let storage = Heap.acquire(capacity)?;
        self.bump(|s| s.acquires += 1);
        Ok(storage)
    }

    unsafe fn release<T>(&self, storage: Storage<T>) {
        self.bump(|s| s.releases += 1);
        // SAFETY: forwarded from the caller; the block came from `Heap`.
        unsafe { Heap.release(storage) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        self.bump(|s| s.constructs += 1);
        // SAFETY: forwarded from the caller.
        unsafe { Heap.construct(slot, value) }
    }

    unsafe fn construct_with<T, F>(&self, slot: NonNull<T>, f: F)
    where
        F: FnOnce() -> T,
    {
        self.bump(|s| s.constructs += 1);
        // SAFETY: forwarded from the caller.
        unsafe { Heap.construct_with(slot, f) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        self.bump(|s| s.destroys += 1);
        // SAFETY: forwarded from the caller.
        unsafe { Heap.destroy(slot) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_acquire_and_release() {
        let a = TrackingAlloc::new();
        let s = a.acquire::<u32>(4).unwrap();
        assert_eq!(a.stats().outstanding_blocks(), 1);
        unsafe { a.release(s) };
        assert_eq!(a.stats().outstanding_blocks(), 0);
        assert_eq!(a.stats().acquires, 1);
    }

    #[test]
    fn counts_lifecycle() {
        let a = TrackingAlloc::new();
        let s = a.acquire::<String>(2).unwrap();
        let slot = s.slot(0).unwrap();
        unsafe {
            a.construct_with(slot, || String::from("x"));
            a.destroy(slot);
            a.release(s);
        }
        let stats = a.stats();
        assert_eq!(stats.constructs, 1);
        assert_eq!(stats.destroys, 1);
        assert_eq!(stats.constructed_minus_destroyed(), 0);
    }

    #[test]
    fn clones_share_counters() {
        let a = TrackingAlloc::new();
        let b = a.clone();
        let s = b.acquire::<u8>(1).unwrap();
        unsafe { a.release(s) };
        assert_eq!(a.stats(), b.stats());
    }
}
