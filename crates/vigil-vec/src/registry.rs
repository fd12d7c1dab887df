//! Per-vector cursor registry.
//!
//! The registry is a side table mapping each live [`CursorId`] to its
//! logical position. Cursors hold a weak reference to the registry and
//! look their position up on every use; the vector invalidates cursors by
//! deleting their entries.
//!
//! Positions are indices into the logical sequence, not addresses, so
//! buffer reallocation never disturbs them.
//!
//! Invariant: every entry's position lies in `[0, len]`, where `len` mirrors
//! the owning vector's live element count.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::VectorError;
use crate::id::{CursorId, VectorId};

/// Cursors removed by a single invalidation pass.
pub(crate) type Invalidated = SmallVec<[CursorId; 4]>;

pub(crate) struct Registry {
    owner: VectorId,
    entries: IndexMap<CursorId, usize>,
    len: usize,
    invalidated_total: u64,
}

impl Registry {
    pub(crate) fn new(owner: VectorId, len: usize) -> Self {
        Self {
            owner,
            entries: IndexMap::new(),
            len,
            invalidated_total: 0,
        }
    }

    pub(crate) fn owner(&self) -> VectorId {
        self.owner
    }

    /// Record the owning vector's new live length.
    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Add a cursor at `position` and return its id.
    pub(crate) fn register(&mut self, position: usize) -> CursorId {
        debug_assert!(position <= self.len);
        let id = CursorId::next();
        self.entries.insert(id, position);
        id
    }

    pub(crate) fn position(&self, id: CursorId) -> Option<usize> {
        self.entries.get(&id).copied()
    }

    /// Step a cursor one position forward.
    pub(crate) fn advance(&mut self, id: CursorId) -> Result<usize, VectorError> {
        let len = self.len;
        let pos = self
            .entries
            .get_mut(&id)
            .ok_or(VectorError::InvalidIterator)?;
        if *pos >= len {
            return Err(VectorError::OutOfRange {
                index: *pos + 1,
                len,
            });
        }
        *pos += 1;
        Ok(*pos)
    }

    /// Drop a cursor's entry without counting it as invalidated.
    pub(crate) fn deregister(&mut self, id: CursorId) -> bool {
        self.entries.swap_remove(&id).is_some()
    }

    /// Invalidate every cursor positioned in `[first, last]`.
    pub(crate) fn invalidate_range(&mut self, first: usize, last: usize) -> Invalidated {
        let victims: Invalidated = self
            .entries
            .iter()
            .filter(|&(_, &pos)| pos >= first && pos <= last)
            .map(|(&id, _)| id)
            .collect();
        for id in &victims {
            self.entries.swap_remove(id);
        }
        self.invalidated_total += victims.len() as u64;
        victims
    }

    /// Invalidate every registered cursor.
    pub(crate) fn invalidate_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.invalidated_total += count as u64;
        count
    }

    /// Number of registered cursors.
    pub(crate) fn live(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn invalidated_total(&self) -> u64 {
        self.invalidated_total
    }
}
