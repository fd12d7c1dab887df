//! The dynamic array container.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::slice;

use vigil_alloc::{Allocator, Heap};

use crate::config::VectorConfig;
use crate::cursor::Cursor;
use crate::error::VectorError;
use crate::id::VectorId;
use crate::metrics::VectorMetrics;
use crate::raw::RawBuffer;
use crate::registry::Registry;

/// A contiguous, growable array with invalidation-checked cursors.
///
/// Memory comes from the allocator strategy `A`; elements are built and
/// torn down through it as well. Capacity doubles when full.
///
/// Mutations that shift elements invalidate exactly the cursors whose
/// positions they disturb:
///
/// | Operation | Invalidated positions |
/// |-----------|-----------------------|
/// | `pop_back` | `[len - 1, len]` |
/// | `insert` / `erase` at `p` | `[p, len]` |
/// | `clear` / `assign_from` | all |
///
/// `len` is the length before the operation. Growth invalidates nothing:
/// cursor positions are logical indices.
///
/// ```
/// use vigil_vec::{Vector, VectorError};
///
/// let mut v = Vector::new();
/// for x in [10, 20, 30, 40] {
///     v.push_back(x).unwrap();
/// }
/// let it = v.cursor_at(1).unwrap();
/// let tail = v.cursor_at(3).unwrap();
/// let next = v.erase(&it).unwrap();
/// assert_eq!(v.as_slice(), &[10, 30, 40]);
/// assert_eq!(v.at(&next), Ok(&30));
/// assert_eq!(v.at(&tail), Err(VectorError::InvalidIterator));
/// ```
pub struct Vector<T, A: Allocator = Heap> {
    buf: RawBuffer<T, A>,
    registry: Rc<RefCell<Registry>>,
    config: VectorConfig,
    grow_events: u64,
}

/// Out-of-memory is fatal for the infallible constructors and trait impls.
#[cold]
fn alloc_failure(err: VectorError) -> ! {
    panic!("vigil: {err}")
}

impl<T> Vector<T, Heap> {
    /// An empty vector with the default capacity (10) on the global heap.
    pub fn new() -> Self {
        Self::with_config(VectorConfig::default(), Heap)
    }

    /// An empty vector with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(VectorConfig::new(capacity), Heap)
    }
}

impl<T> Default for Vector<T, Heap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// An empty vector with the default capacity, drawing from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self::with_config(VectorConfig::default(), alloc)
    }

    /// An empty vector with room for `capacity` elements from `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::with_config(VectorConfig::new(capacity), alloc)
    }

    /// An empty vector built from `config`.
    ///
    /// # Panics
    ///
    /// Panics if the initial buffer cannot be acquired.
    pub fn with_config(config: VectorConfig, alloc: A) -> Self {
        match Self::try_with_config(config, alloc) {
            Ok(v) => v,
            Err(err) => alloc_failure(err),
        }
    }

    /// An empty vector built from `config`, reporting acquisition failure.
    pub fn try_with_config(config: VectorConfig, alloc: A) -> Result<Self, VectorError> {
        let buf = RawBuffer::new_in(config.initial_capacity, alloc)?;
        Ok(Self::from_parts(buf, config))
    }

    fn from_parts(buf: RawBuffer<T, A>, config: VectorConfig) -> Self {
        let registry = Registry::new(VectorId::next(), buf.len());
        Self {
            buf,
            registry: Rc::new(RefCell::new(registry)),
            config,
            grow_events: 0,
        }
    }

    /// This instance's identity.
    pub fn id(&self) -> VectorId {
        self.registry.borrow().owner()
    }

    /// The allocator strategy.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// The construction config.
    pub fn config(&self) -> &VectorConfig {
        &self.config
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    /// Number of acquired slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the next push must grow the buffer.
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.buf.capacity()
    }

    /// Bookkeeping counters.
    pub fn metrics(&self) -> VectorMetrics {
        let registry = self.registry.borrow();
        VectorMetrics {
            grow_events: self.grow_events,
            invalidated_cursors: registry.invalidated_total(),
            live_cursors: registry.live(),
        }
    }

    /// Make room for one more element, doubling capacity if full.
    ///
    /// On failure nothing has changed.
    fn reserve_one(&mut self) -> Result<(), VectorError> {
        if !self.is_full() {
            return Ok(());
        }
        let capacity = self.buf.capacity();
        let new_capacity = self.config.next_capacity(capacity).ok_or(
            vigil_alloc::AllocError::CapacityOverflow {
                requested: capacity,
            },
        )?;
        self.buf.grow_to(new_capacity)?;
        self.grow_events += 1;
        Ok(())
    }

    fn sync_len(&self) {
        self.registry.borrow_mut().set_len(self.buf.len());
    }

    /// Append `value`, growing first if the buffer is full.
    pub fn push_back(&mut self, value: T) -> Result<(), VectorError> {
        self.reserve_one()?;
        self.buf.push(value);
        self.sync_len();
        Ok(())
    }

    /// Append an element built in place by `make`.
    ///
    /// `make` runs only after room is secured, directly into the tail slot.
    pub fn emplace_back<F>(&mut self, make: F) -> Result<(), VectorError>
    where
        F: FnOnce() -> T,
    {
        self.reserve_one()?;
        self.buf.push_with(make);
        self.sync_len();
        Ok(())
    }

    /// Destroy the last element. No-op when empty.
    ///
    /// Invalidates cursors at the last element and at the end position.
    pub fn pop_back(&mut self) {
        let len = self.buf.len();
        if len == 0 {
            return;
        }
        {
            let mut registry = self.registry.borrow_mut();
            registry.invalidate_range(len - 1, len);
            registry.set_len(len - 1);
        }
        self.buf.pop_destroy();
    }

    /// A copy of the last element.
    pub fn back(&self) -> Result<T, VectorError>
    where
        T: Clone,
    {
        self.buf
            .as_slice()
            .last()
            .cloned()
            .ok_or(VectorError::EmptyContainer)
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, VectorError> {
        let len = self.buf.len();
        self.buf
            .as_slice()
            .get(index)
            .ok_or(VectorError::OutOfRange { index, len })
    }

    /// The element at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, VectorError> {
        let len = self.buf.len();
        self.buf
            .as_mut_slice()
            .get_mut(index)
            .ok_or(VectorError::OutOfRange { index, len })
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// The live elements as a mutable slice.
    ///
    /// Writing through the slice never moves elements, so no cursor is
    /// invalidated.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Borrowing iterator over the live elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.buf.as_slice().iter()
    }

    /// A fresh cursor at the first element.
    pub fn begin(&self) -> Cursor<T> {
        Cursor::register(&self.registry, 0)
    }

    /// A fresh cursor one past the last element.
    pub fn end(&self) -> Cursor<T> {
        Cursor::register(&self.registry, self.buf.len())
    }

    /// A fresh cursor at `index`; `index == len` yields an end cursor.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<T>, VectorError> {
        let len = self.buf.len();
        if index > len {
            return Err(VectorError::OutOfRange { index, len });
        }
        Ok(Cursor::register(&self.registry, index))
    }

    /// Dereference `cursor`.
    pub fn at(&self, cursor: &Cursor<T>) -> Result<&T, VectorError> {
        let index = cursor.locate(self.id())?;
        self.get(index)
    }

    /// Dereference `cursor` mutably.
    pub fn at_mut(&mut self, cursor: &Cursor<T>) -> Result<&mut T, VectorError> {
        let index = cursor.locate(self.id())?;
        self.get_mut(index)
    }

    /// Insert `value` before `position` and return a cursor to it.
    ///
    /// `position` and every cursor at or after it are invalidated; use the
    /// returned cursor instead. If growth fails, nothing is invalidated.
    pub fn insert(&mut self, position: &Cursor<T>, value: T) -> Result<Cursor<T>, VectorError> {
        let index = position.locate(self.id())?;
        self.reserve_one()?;
        let len = self.buf.len();
        self.registry.borrow_mut().invalidate_range(index, len);
        self.buf.insert_at(index, value);
        self.sync_len();
        Ok(Cursor::register(&self.registry, index))
    }

    /// Remove the element at `position` and return a cursor to its slot.
    ///
    /// The returned cursor points at the element that followed, or is the
    /// end cursor if the last element was erased. `position` and every
    /// cursor at or after it are invalidated.
    pub fn erase(&mut self, position: &Cursor<T>) -> Result<Cursor<T>, VectorError> {
        let index = position.locate(self.id())?;
        let len = self.buf.len();
        if index >= len {
            return Err(VectorError::OutOfRange { index, len });
        }
        {
            let mut registry = self.registry.borrow_mut();
            registry.invalidate_range(index, len);
            registry.set_len(len - 1);
        }
        self.buf.remove_at(index);
        Ok(Cursor::register(&self.registry, index))
    }

    /// Destroy every element, keeping capacity. Invalidates all cursors.
    pub fn clear(&mut self) {
        {
            let mut registry = self.registry.borrow_mut();
            registry.invalidate_all();
            registry.set_len(0);
        }
        self.buf.clear();
    }

    /// A copy with its own buffer (same capacity), identity and registry.
    pub fn try_clone(&self) -> Result<Self, VectorError>
    where
        T: Clone,
    {
        let buf = self.buf.duplicate_in(self.allocator().clone())?;
        Ok(Self::from_parts(buf, self.config.clone()))
    }

    /// Replace this vector's contents with a copy of `other`'s.
    ///
    /// The copy is built before the old contents are torn down, so on
    /// failure `self` is unchanged. On success every cursor of `self` is
    /// invalidated; cursors of `other` are unaffected.
    pub fn assign_from(&mut self, other: &Self) -> Result<(), VectorError>
    where
        T: Clone,
    {
        let fresh = other.buf.duplicate_in(self.allocator().clone())?;
        {
            let mut registry = self.registry.borrow_mut();
            registry.invalidate_all();
            registry.set_len(fresh.len());
        }
        let old = mem::replace(&mut self.buf, fresh);
        drop(old);
        Ok(())
    }
}

impl<T: Clone, A: Allocator> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(v) => v,
            Err(err) => alloc_failure(err),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            alloc_failure(err);
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Vector<T, B>> for Vector<T, A> {
    fn eq(&self, other: &Vector<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push_back(value) {
                alloc_failure(err);
            }
        }
    }
}

impl<T> FromIterator<T> for Vector<T, Heap> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
