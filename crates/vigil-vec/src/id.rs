//! Identity types for vectors and cursors.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`VectorId`] allocation.
static VECTOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`CursorId`] allocation.
static CURSOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a [`Vector`](crate::Vector).
///
/// Allocated from a monotonic counter, so a vector dropped and replaced
/// by a new one at the same address still gets a different id. Copies
/// (clone, copy-assignment target) never share an id with their source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorId(u64);

impl VectorId {
    /// Allocate a fresh, never-before-returned id.
    pub fn next() -> Self {
        Self(VECTOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registered [`Cursor`](crate::Cursor).
///
/// Ids are never reused, which is what makes invalidation permanent: once
/// an id leaves its registry nothing can put it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorId(u64);

impl CursorId {
    /// Allocate a fresh, never-before-returned id.
    pub fn next() -> Self {
        Self(CURSOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_ids_are_unique() {
        let a = VectorId::next();
        let b = VectorId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn cursor_ids_are_unique() {
        let ids: Vec<CursorId> = (0..64).map(|_| CursorId::next()).collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
