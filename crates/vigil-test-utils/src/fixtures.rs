//! Element fixtures for lifecycle testing.
//!
//! - [`Tracked`]: a value whose constructions and drops are counted by a
//!   shared [`DropLog`].
//! - [`MoveOnly`]: deliberately not `Clone`, for emplace/move paths.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared ledger of [`Tracked`] instances.
#[derive(Clone, Debug, Default)]
pub struct DropLog {
    live: Rc<Cell<isize>>,
    dropped: Rc<RefCell<Vec<u32>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked value carrying `tag`.
    pub fn track(&self, tag: u32) -> Tracked {
        self.live.set(self.live.get() + 1);
        Tracked {
            tag,
            log: self.clone(),
        }
    }

    /// Instances currently alive (created or cloned, not yet dropped).
    pub fn live(&self) -> isize {
        self.live.get()
    }

    /// Tags in the order their instances were dropped.
    pub fn dropped(&self) -> Vec<u32> {
        self.dropped.borrow().clone()
    }
}

/// A value that reports its lifecycle to a [`DropLog`].
#[derive(Debug)]
pub struct Tracked {
    pub tag: u32,
    log: DropLog,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.log.track(self.tag)
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.live.set(self.log.live.get() - 1);
        self.log.dropped.borrow_mut().push(self.tag);
    }
}

/// Non-`Clone` payload.
#[derive(Debug, PartialEq, Eq)]
pub struct MoveOnly {
    pub id: u32,
    pub payload: Box<[u8]>,
}

impl MoveOnly {
    pub fn new(id: u32, len: usize) -> Self {
        Self {
            id,
            payload: vec![id as u8; len].into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_and_drop_balance() {
        let log = DropLog::new();
        let a = log.track(1);
        let b = a.clone();
        assert_eq!(log.live(), 2);
        drop(a);
        drop(b);
        assert_eq!(log.live(), 0);
        assert_eq!(log.dropped(), vec![1, 1]);
    }

    #[test]
    fn move_only_payload_matches_id() {
        let m = MoveOnly::new(3, 4);
        assert_eq!(&*m.payload, &[3, 3, 3, 3]);
    }
}
