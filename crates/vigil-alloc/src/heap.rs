//! Global-heap allocator strategy.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::storage::{array_layout, Storage};
use crate::strategy::Allocator;

/// Stateless strategy backed by the process-wide global allocator.
///
/// This is the default strategy for `Vector`. It never constructs or
/// destroys elements on its own; the trait's default lifecycle methods
/// are used as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Heap;

// SAFETY: non-empty blocks come straight from `std::alloc::alloc` with
// `Layout::array::<T>(capacity)`, so they are sized and aligned for
// `capacity` values of `T`. Empty blocks own no memory.
unsafe impl Allocator for Heap {
    fn acquire<T>(&self, capacity: usize) -> Result<Storage<T>, AllocError> {
        let layout = array_layout::<T>(capacity)?;
        if layout.size() == 0 {
            return Ok(Storage::unallocated(capacity));
        }
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            // SAFETY: fresh allocation of exactly `capacity` slots.
            Some(ptr) => Ok(unsafe { Storage::from_raw_parts(ptr, capacity) }),
            None => Err(AllocError::OutOfMemory {
                requested_bytes: layout.size(),
            }),
        }
    }

    unsafe fn release<T>(&self, storage: Storage<T>) {
        if !storage.owns_memory() {
            return;
        }
        // SAFETY: the same size/align pair was validated by
        // `Layout::array` when the block was acquired.
        let layout = unsafe {
            Layout::from_size_align_unchecked(storage.byte_size(), mem::align_of::<T>())
        };
        // SAFETY: caller guarantees the block came from `acquire` above.
        unsafe { alloc::dealloc(storage.as_ptr().cast::<u8>(), layout) }
    }
}
