//! Self-registering cursors (the container's iterator type).
//!
//! A [`Cursor`] is a detached position handle: it does not borrow its
//! vector, so the vector stays free to mutate while cursors are alive.
//! Instead each cursor registers itself in the vector's registry and
//! checks, at the moment of use, whether it is still there.
//!
//! A cursor is in one of two states:
//!
//! - **Valid:** its registry is alive and still holds its id.
//! - **Invalid:** a mutation removed its entry, or the vector was
//!   dropped. Permanent; nothing re-attaches it.
//!
//! Dropping a cursor deregisters it, so the registry only ever tracks
//! cursors somebody can still use.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::error::VectorError;
use crate::id::{CursorId, VectorId};
use crate::registry::Registry;

/// A registered position within a [`Vector`](crate::Vector).
///
/// Obtained from [`Vector::begin`](crate::Vector::begin),
/// [`Vector::end`](crate::Vector::end),
/// [`Vector::cursor_at`](crate::Vector::cursor_at), or returned by
/// `insert`/`erase`. Dereference through
/// [`Vector::at`](crate::Vector::at) / [`Vector::at_mut`](crate::Vector::at_mut).
pub struct Cursor<T> {
    id: CursorId,
    registry: Weak<RefCell<Registry>>,
    _elem: PhantomData<fn() -> T>,
}

impl<T> Cursor<T> {
    pub(crate) fn register(registry: &Rc<RefCell<Registry>>, position: usize) -> Self {
        let id = registry.borrow_mut().register(position);
        Self {
            id,
            registry: Rc::downgrade(registry),
            _elem: PhantomData,
        }
    }

    /// A cursor that was never attached to anything.
    fn detached() -> Self {
        Self {
            id: CursorId::next(),
            registry: Weak::new(),
            _elem: PhantomData,
        }
    }

    /// Run `f` against the live registry, or fail with `InvalidIterator`.
    fn with_registry<R>(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<R, VectorError>,
    ) -> Result<R, VectorError> {
        let registry = self.registry.upgrade().ok_or(VectorError::InvalidIterator)?;
        let mut registry = registry.borrow_mut();
        f(&mut registry)
    }

    /// This cursor's registration id.
    pub fn id(&self) -> CursorId {
        self.id
    }

    /// Whether the cursor may still be used.
    pub fn is_valid(&self) -> bool {
        self.position().is_ok()
    }

    /// The vector this cursor belongs to, or `None` once invalid.
    pub fn owner(&self) -> Option<VectorId> {
        self.with_registry(|r| {
            r.position(self.id)
                .map(|_| r.owner())
                .ok_or(VectorError::InvalidIterator)
        })
        .ok()
    }

    /// Current logical position; `len` denotes past-the-end.
    pub fn position(&self) -> Result<usize, VectorError> {
        self.with_registry(|r| r.position(self.id).ok_or(VectorError::InvalidIterator))
    }

    /// Position, after checking the cursor is valid and belongs to `owner`.
    pub(crate) fn locate(&self, owner: VectorId) -> Result<usize, VectorError> {
        self.with_registry(|r| {
            let pos = r.position(self.id).ok_or(VectorError::InvalidIterator)?;
            if r.owner() != owner {
                return Err(VectorError::IncompatibleIterator);
            }
            Ok(pos)
        })
    }

    /// Step one position forward.
    ///
    /// Fails with `InvalidIterator` if the cursor is invalid and with
    /// `OutOfRange` if it already sits past the end.
    pub fn advance(&mut self) -> Result<(), VectorError> {
        self.with_registry(|r| r.advance(self.id)).map(|_| ())
    }

    /// Compare positions with another cursor of the same vector.
    ///
    /// Both cursors must be valid (`InvalidIterator`) and share an owner
    /// (`IncompatibleIterator`).
    pub fn try_eq(&self, other: &Cursor<T>) -> Result<bool, VectorError> {
        let (owner, pos) = self.with_registry(|r| {
            let pos = r.position(self.id).ok_or(VectorError::InvalidIterator)?;
            Ok((r.owner(), pos))
        })?;
        let (other_owner, other_pos) = other.with_registry(|r| {
            let pos = r.position(other.id).ok_or(VectorError::InvalidIterator)?;
            Ok((r.owner(), pos))
        })?;
        if owner != other_owner {
            return Err(VectorError::IncompatibleIterator);
        }
        Ok(pos == other_pos)
    }
}

impl<T> Clone for Cursor<T> {
    /// Registers a second cursor at the same position. Cloning an invalid
    /// cursor yields another invalid cursor.
    fn clone(&self) -> Self {
        let Some(registry) = self.registry.upgrade() else {
            return Self::detached();
        };
        let position = registry.borrow().position(self.id);
        match position {
            Some(pos) => Self::register(&registry, pos),
            None => Self::detached(),
        }
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.deregister(self.id);
            }
            Err(_) => {
                // The entry stays behind until an invalidation covers it.
                #[cfg(debug_assertions)]
                eprintln!(
                    "vigil: cursor {} dropped while its registry was borrowed; entry not released",
                    self.id,
                );
            }
        };
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("id", &self.id)
            .field("position", &self.position().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(len: usize) -> Rc<RefCell<Registry>> {
        Rc::new(RefCell::new(Registry::new(VectorId::next(), len)))
    }

    #[test]
    fn registered_cursor_is_valid() {
        let reg = shared(3);
        let c: Cursor<u8> = Cursor::register(&reg, 2);
        assert!(c.is_valid());
        assert_eq!(c.position(), Ok(2));
        assert_eq!(c.owner(), Some(reg.borrow().owner()));
    }

    #[test]
    fn drop_deregisters() {
        let reg = shared(3);
        {
            let _a: Cursor<u8> = Cursor::register(&reg, 0);
            let _b: Cursor<u8> = Cursor::register(&reg, 3);
            assert_eq!(reg.borrow().live(), 2);
        }
        assert_eq!(reg.borrow().live(), 0);
    }

    #[test]
    fn invalidated_cursor_rejects_everything() {
        let reg = shared(3);
        let mut c: Cursor<u8> = Cursor::register(&reg, 1);
        let other: Cursor<u8> = Cursor::register(&reg, 0);
        reg.borrow_mut().invalidate_range(1, 3);
        assert!(!c.is_valid());
        assert_eq!(c.owner(), None);
        assert_eq!(c.advance(), Err(VectorError::InvalidIterator));
        assert_eq!(c.try_eq(&other), Err(VectorError::InvalidIterator));
        assert_eq!(other.try_eq(&c), Err(VectorError::InvalidIterator));
    }

    #[test]
    fn cursor_outliving_registry_is_invalid() {
        let reg = shared(1);
        let c: Cursor<u8> = Cursor::register(&reg, 0);
        drop(reg);
        assert_eq!(c.position(), Err(VectorError::InvalidIterator));
    }

    #[test]
    fn cross_registry_comparison_is_incompatible() {
        let a = shared(1);
        let b = shared(1);
        let ca: Cursor<u8> = Cursor::register(&a, 0);
        let cb: Cursor<u8> = Cursor::register(&b, 0);
        assert_eq!(ca.try_eq(&cb), Err(VectorError::IncompatibleIterator));
    }

    #[test]
    fn locate_checks_owner() {
        let reg = shared(2);
        let c: Cursor<u8> = Cursor::register(&reg, 1);
        let owner = reg.borrow().owner();
        assert_eq!(c.locate(owner), Ok(1));
        assert_eq!(
            c.locate(VectorId::next()),
            Err(VectorError::IncompatibleIterator)
        );
    }

    #[test]
    fn clone_registers_independently() {
        let reg = shared(3);
        let mut a: Cursor<u8> = Cursor::register(&reg, 0);
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(reg.borrow().live(), 2);
        a.advance().unwrap();
        assert_eq!(a.position(), Ok(1));
        assert_eq!(b.position(), Ok(0));
        assert_eq!(a.try_eq(&b), Ok(false));
    }

    #[test]
    fn drop_during_registry_borrow_leaves_entry_for_invalidation() {
        let reg = shared(3);
        let c: Cursor<u8> = Cursor::register(&reg, 2);
        let id = c.id();
        {
            let _held = reg.borrow();
            drop(c);
        }
        assert_eq!(reg.borrow().position(id), Some(2));
        reg.borrow_mut().invalidate_range(2, 3);
        assert_eq!(reg.borrow().live(), 0);
    }

    #[test]
    fn clone_of_invalid_is_invalid() {
        let reg = shared(3);
        let a: Cursor<u8> = Cursor::register(&reg, 2);
        reg.borrow_mut().invalidate_all();
        let b = a.clone();
        assert!(!b.is_valid());
        assert_eq!(reg.borrow().live(), 0);
    }
}
