//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors returned by [`Allocator::acquire`](crate::Allocator::acquire).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The memory source could not satisfy the request.
    OutOfMemory {
        /// Size of the failed request in bytes.
        requested_bytes: usize,
    },
    /// The requested element count does not fit in `isize::MAX` bytes.
    CapacityOverflow {
        /// The requested element count.
        requested: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested_bytes } => {
                write!(f, "out of memory: failed to acquire {requested_bytes} bytes")
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements exceed isize::MAX bytes")
            }
        }
    }
}

impl Error for AllocError {}
