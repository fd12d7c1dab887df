//! Acquired-but-uninitialised element blocks.
//!
//! A [`Storage<T>`] is what an [`Allocator`](crate::Allocator) hands out:
//! a base pointer plus the number of `T` slots behind it. It says nothing
//! about which slots hold live values; that bookkeeping belongs to the
//! container that owns the block.

use std::alloc::Layout;
use std::mem;
use std::ptr::NonNull;

use crate::error::AllocError;

/// An uninitialised block of `capacity` slots of `T`.
///
/// `Storage` is move-only: it must be handed back to the allocator that
/// produced it exactly once, through
/// [`Allocator::release`](crate::Allocator::release). Dropping a
/// `Storage` without releasing it leaks the block but is memory safe.
#[derive(Debug)]
#[must_use = "acquired storage must be released through its allocator"]
pub struct Storage<T> {
    ptr: NonNull<T>,
    capacity: usize,
}

impl<T> Storage<T> {
    /// A block that owns no memory.
    ///
    /// Used for zero-capacity requests and for zero-sized `T`, where every
    /// slot lives at the same dangling, well-aligned address.
    pub fn unallocated(capacity: usize) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: if mem::size_of::<T>() == 0 { capacity } else { 0 },
        }
    }

    /// Assemble a block from a raw pointer and slot count.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `capacity` consecutive,
    /// properly aligned `T` values, and nothing else may use that memory
    /// until the block is released.
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, capacity: usize) -> Self {
        Self { ptr, capacity }
    }

    /// Number of `T` slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the block in bytes (zero for unallocated blocks).
    pub fn byte_size(&self) -> usize {
        if self.owns_memory() {
            // Cannot overflow: the layout was validated at acquisition.
            self.capacity * mem::size_of::<T>()
        } else {
            0
        }
    }

    /// Whether the block is backed by real memory that must be freed.
    pub fn owns_memory(&self) -> bool {
        self.capacity != 0 && mem::size_of::<T>() != 0
    }

    /// Base pointer of the block.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Base pointer of the block as `NonNull`.
    pub fn as_non_null(&self) -> NonNull<T> {
        self.ptr
    }

    /// Pointer to slot `index`, or `None` if `index >= capacity`.
    pub fn slot(&self, index: usize) -> Option<NonNull<T>> {
        if index >= self.capacity {
            return None;
        }
        // SAFETY: index < capacity, so the offset stays inside the block
        // (or is a zero-byte offset for zero-sized T).
        Some(unsafe { self.ptr.add(index) })
    }
}

/// Layout for `capacity` consecutive `T` values.
pub(crate) fn array_layout<T>(capacity: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow {
        requested: capacity,
    })
}
