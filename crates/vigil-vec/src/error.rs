//! Container error types.

use std::error::Error;
use std::fmt;

use vigil_alloc::AllocError;

/// Errors returned by [`Vector`](crate::Vector) and
/// [`Cursor`](crate::Cursor) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// The allocator strategy could not supply a buffer. The container is
    /// left exactly as it was before the call.
    OutOfMemory(AllocError),
    /// `back()` on a vector with no live elements.
    EmptyContainer,
    /// An index or cursor position outside the live range.
    OutOfRange {
        /// The offending position.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// The cursor has been invalidated by a mutation, or its vector is gone.
    InvalidIterator,
    /// The cursor belongs to a different vector instance.
    IncompatibleIterator,
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory(err) => write!(f, "allocation failed: {err}"),
            Self::EmptyContainer => write!(f, "vector is empty"),
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::InvalidIterator => write!(f, "iterator has been invalidated"),
            Self::IncompatibleIterator => {
                write!(f, "iterator belongs to a different vector")
            }
        }
    }
}

impl Error for VectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfMemory(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for VectorError {
    fn from(err: AllocError) -> Self {
        Self::OutOfMemory(err)
    }
}
