//! Low-level buffer primitives.
//!
//! [`RawBuffer`] owns one [`Storage`] block plus the count of live
//! elements at its front. It is the only place in this crate that touches
//! uninitialised memory; every element is built and torn down through the
//! buffer's [`Allocator`], never directly.
//!
//! Invariant: slots `[0, len)` hold live elements, `[len, capacity)` are
//! acquired but vacant. Elements that only change address are moved with
//! a bitwise copy, so the strategy's construct/destroy hooks see each
//! element exactly once per lifetime. Methods that shift elements
//! temporarily shrink `len` so that a panicking element or strategy leaks
//! values rather than dropping them twice.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use vigil_alloc::{AllocError, Allocator, Storage};

/// Contiguous element storage managed through an allocator strategy.
pub(crate) struct RawBuffer<T, A: Allocator> {
    storage: Storage<T>,
    len: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

impl<T, A: Allocator> RawBuffer<T, A> {
    /// Acquire an empty buffer with room for `capacity` elements.
    pub(crate) fn new_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let storage = alloc.acquire::<T>(capacity)?;
        Ok(Self {
            storage,
            len: 0,
            alloc,
            _owns: PhantomData,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) are live, the base pointer is non-null and
        // aligned even when the block owns no memory.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.len) }
    }

    /// Pointer to slot `index`. Caller ensures `index < capacity`.
    fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.capacity());
        // SAFETY: index is inside the acquired block.
        unsafe { self.storage.as_non_null().add(index) }
    }

    /// Move every live element into a fresh block of `new_capacity` slots
    /// and release the old block.
    ///
    /// Relocation is a bitwise copy: the strategy sees no construct or
    /// destroy for elements that merely change address. On failure the
    /// buffer is untouched.
    pub(crate) fn grow_to(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        debug_assert!(new_capacity >= self.len);
        let fresh = self.alloc.acquire::<T>(new_capacity)?;
        // SAFETY: the blocks are distinct, `[0, len)` is live in the old one
        // and vacant in the new one. The old copies are never read again.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), fresh.as_ptr(), self.len);
        }
        let old = mem::replace(&mut self.storage, fresh);
        // SAFETY: every element of `old` was moved out above.
        unsafe { self.alloc.release(old) };
        Ok(())
    }

    /// Construct `value` at the tail. Caller ensures `len < capacity`.
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: slot `len` is acquired and vacant.
        unsafe { self.alloc.construct(self.slot(self.len), value) };
        self.len += 1;
    }

    /// Construct the tail element from `f`. Caller ensures `len < capacity`.
    pub(crate) fn push_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        debug_assert!(self.len < self.capacity());
        // SAFETY: slot `len` is acquired and vacant.
        unsafe { self.alloc.construct_with(self.slot(self.len), f) };
        self.len += 1;
    }

    /// Destroy the last element. Returns `false` if the buffer was empty.
    pub(crate) fn pop_destroy(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        // SAFETY: slot `len` was the last live element and is no longer
        // counted, so it is torn down exactly once.
        unsafe { self.alloc.destroy(self.slot(self.len)) };
        true
    }

    /// Shift `[index, len)` one slot right and construct `value` at `index`.
    ///
    /// Caller ensures `index <= len < capacity`.
    pub(crate) fn insert_at(&mut self, index: usize, value: T) {
        let len = self.len;
        debug_assert!(index <= len && len < self.capacity());
        self.len = index;
        // SAFETY: `[index, len)` is live and `len < capacity`, so the
        // destination range `[index + 1, len + 1)` is inside the block.
        // `ptr::copy` handles the overlap.
        unsafe {
            let base = self.storage.as_ptr();
            ptr::copy(base.add(index), base.add(index + 1), len - index);
        }
        // SAFETY: slot `index` was vacated by the shift above.
        unsafe { self.alloc.construct(self.slot(index), value) };
        self.len = len + 1;
    }

    /// Destroy the element at `index` and shift `(index, len)` one slot left.
    ///
    /// Caller ensures `index < len`.
    pub(crate) fn remove_at(&mut self, index: usize) {
        let len = self.len;
        debug_assert!(index < len);
        self.len = index;
        // SAFETY: slot `index` is live and no longer counted.
        unsafe { self.alloc.destroy(self.slot(index)) };
        // SAFETY: `(index, len)` is live; moving it down one slot fills the
        // hole and leaves slot `len - 1` as a stale copy that is never read.
        unsafe {
            let base = self.storage.as_ptr();
            ptr::copy(base.add(index + 1), base.add(index), len - index - 1);
        }
        self.len = len - 1;
    }

    /// Destroy every live element in forward order. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        for i in 0..len {
            // SAFETY: slots [0, len) were live and are now uncounted.
            unsafe { self.alloc.destroy(self.slot(i)) };
        }
    }

    /// Copy every live element into a new buffer of the same capacity
    /// acquired from `alloc`.
    ///
    /// If a clone panics, the partial copy is torn down by its own drop.
    pub(crate) fn duplicate_in(&self, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut copy = Self::new_in(self.capacity(), alloc)?;
        for item in self.as_slice() {
            copy.push_with(|| item.clone());
        }
        Ok(copy)
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        self.clear();
        let storage = mem::replace(&mut self.storage, Storage::unallocated(0));
        // SAFETY: all elements were destroyed by `clear`.
        unsafe { self.alloc.release(storage) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vigil_alloc::{Bounded, Heap};

    /// Logs its tag on drop.
    struct DropTag {
        tag: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl Drop for DropTag {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.tag);
        }
    }

    fn filled(n: u32, cap: usize) -> (RawBuffer<DropTag, Heap>, Rc<RefCell<Vec<u32>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut buf = RawBuffer::new_in(cap, Heap).unwrap();
        for tag in 0..n {
            buf.push(DropTag {
                tag,
                log: log.clone(),
            });
        }
        (buf, log)
    }

    fn tags(buf: &RawBuffer<DropTag, Heap>) -> Vec<u32> {
        buf.as_slice().iter().map(|p| p.tag).collect()
    }

    #[test]
    fn new_buffer_is_empty_with_capacity() {
        let buf: RawBuffer<u8, Heap> = RawBuffer::new_in(10, Heap).unwrap();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 10);
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn grow_preserves_order_without_drops() {
        let (mut buf, log) = filled(4, 4);
        buf.grow_to(8).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(tags(&buf), vec![0, 1, 2, 3]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn failed_grow_leaves_buffer_intact() {
        let mut buf = RawBuffer::new_in(2, Bounded::new(16)).unwrap();
        buf.push(1u64);
        buf.push(2u64);
        assert!(buf.grow_to(4).is_err());
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.as_slice(), &[1, 2]);
    }

    #[test]
    fn pop_destroys_only_the_tail() {
        let (mut buf, log) = filled(3, 4);
        assert!(buf.pop_destroy());
        assert_eq!(*log.borrow(), vec![2]);
        assert_eq!(tags(&buf), vec![0, 1]);
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut buf: RawBuffer<u8, Heap> = RawBuffer::new_in(1, Heap).unwrap();
        assert!(!buf.pop_destroy());
    }

    #[test]
    fn insert_shifts_right() {
        let mut buf = RawBuffer::new_in(5, Heap).unwrap();
        for v in [1, 2, 3] {
            buf.push(v);
        }
        buf.insert_at(1, 9);
        assert_eq!(buf.as_slice(), &[1, 9, 2, 3]);
        buf.insert_at(4, 7);
        assert_eq!(buf.as_slice(), &[1, 9, 2, 3, 7]);
    }

    #[test]
    fn remove_destroys_exactly_one() {
        let (mut buf, log) = filled(4, 4);
        buf.remove_at(1);
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(tags(&buf), vec![0, 2, 3]);
        buf.remove_at(2);
        assert_eq!(*log.borrow(), vec![1, 3]);
        assert_eq!(tags(&buf), vec![0, 2]);
    }

    #[test]
    fn drop_destroys_in_forward_order() {
        let (buf, log) = filled(4, 8);
        drop(buf);
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let (mut buf, log) = filled(3, 6);
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 6);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_copies_capacity_and_values() {
        let mut buf = RawBuffer::new_in(6, Heap).unwrap();
        buf.push(String::from("a"));
        buf.push(String::from("b"));
        let copy = buf.duplicate_in(Heap).unwrap();
        assert_eq!(copy.capacity(), 6);
        assert_eq!(copy.as_slice(), buf.as_slice());
    }

    #[test]
    fn release_returns_budget() {
        let budget = Bounded::new(1024);
        {
            let mut buf = RawBuffer::new_in(4, budget.clone()).unwrap();
            buf.push(1u32);
            buf.grow_to(16).unwrap();
            assert_eq!(budget.in_use(), 64);
        }
        assert_eq!(budget.in_use(), 0);
    }

    #[test]
    fn relocation_bypasses_lifecycle_hooks() {
        let alloc = vigil_test_utils::TrackingAlloc::new();
        let mut buf = RawBuffer::new_in(2, alloc.clone()).unwrap();
        buf.push(String::from("a"));
        buf.push(String::from("b"));
        buf.grow_to(8).unwrap();
        buf.insert_at(0, String::from("z"));
        buf.remove_at(1);
        assert_eq!(buf.as_slice(), &["z", "b"]);
        let stats = alloc.stats();
        assert_eq!(stats.constructs, 3);
        assert_eq!(stats.destroys, 1);
        assert_eq!(stats.constructed_minus_destroyed(), buf.len() as isize);
    }

    #[test]
    fn zero_sized_elements_are_counted() {
        let mut buf = RawBuffer::new_in(2, Heap).unwrap();
        buf.push(());
        buf.push(());
        buf.grow_to(4).unwrap();
        buf.push(());
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_slice().len(), 3);
    }
}
