//! The allocator strategy trait.

use std::ptr::{self, NonNull};

use crate::error::AllocError;
use crate::storage::Storage;

/// A pluggable memory and object-lifecycle policy.
///
/// Containers never call `std::alloc` or `drop_in_place` directly; they go
/// through their strategy so that custom memory sources (pools, arenas,
/// budgets) can be swapped in without touching container logic.
///
/// Strategies are cheap policy values: containers clone them when they
/// are copied, so a clone must be able to release storage acquired by the
/// original.
///
/// # Safety
///
/// Implementors must guarantee that every `Storage<T>` returned from
/// [`acquire`](Allocator::acquire) is valid for reads and writes of
/// `capacity` properly aligned `T` values and is not handed to anyone
/// else until it comes back through [`release`](Allocator::release).
/// Containers rely on this for memory safety.
pub unsafe trait Allocator: Clone {
    /// Acquire uninitialised storage for `capacity` elements of `T`.
    ///
    /// No element is constructed.
    fn acquire<T>(&self, capacity: usize) -> Result<Storage<T>, AllocError>;

    /// Return storage to the memory source.
    ///
    /// # Safety
    ///
    /// `storage` must come from `acquire` on this strategy (or a clone of
    /// it) and must hold no live elements.
    unsafe fn release<T>(&self, storage: Storage<T>);

    /// Build one element in place by moving `value` into `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must lie inside acquired, unreleased storage and must not
    /// currently hold a live element.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: caller guarantees the slot is acquired and vacant.
        unsafe { slot.as_ptr().write(value) }
    }

    /// Build one element in place from a constructor closure.
    ///
    /// The closure captures whatever arguments the element needs, owned
    /// or borrowed, so callers never build a temporary element first.
    ///
    /// # Safety
    ///
    /// Same contract as [`construct`](Allocator::construct).
    unsafe fn construct_with<T, F>(&self, slot: NonNull<T>, f: F)
    where
        F: FnOnce() -> T,
    {
        // SAFETY: forwarded from the caller.
        unsafe { self.construct(slot, f()) }
    }

    /// Run the element's teardown without releasing its memory.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live element, which is dead afterwards.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: caller guarantees the slot holds a live element.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}
