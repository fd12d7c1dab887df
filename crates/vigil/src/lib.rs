//! Vigil: a growable array whose cursors know when they have gone stale.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Vigil sub-crates. For most users, adding `vigil` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vigil::prelude::*;
//!
//! let mut v = Vector::new();
//! for x in [1, 2, 3] {
//!     v.push_back(x).unwrap();
//! }
//!
//! // Insert before the first element; the cursor passed in goes stale.
//! let it = v.begin();
//! let fresh = v.insert(&it, 0).unwrap();
//! assert_eq!(v.as_slice(), &[0, 1, 2, 3]);
//! assert_eq!(v.at(&it), Err(VectorError::InvalidIterator));
//! assert_eq!(v.at(&fresh), Ok(&0));
//!
//! // Custom memory sources plug in through the allocator strategy.
//! let budget = Bounded::new(64);
//! let mut small: Vector<u64, _> = Vector::with_capacity_in(8, budget);
//! for i in 0..8 {
//!     small.push_back(i).unwrap();
//! }
//! assert!(matches!(small.push_back(8), Err(VectorError::OutOfMemory(_))));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `vigil-alloc` | `Allocator` trait, `Storage`, `Heap`, `Bounded` |
//! | [`vec`] | `vigil-vec` | `Vector`, `Cursor`, config, metrics, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator strategies (`vigil-alloc`).
///
/// Implement [`alloc::Allocator`] to back a [`Vector`](vec::Vector) with
/// your own memory source.
pub use vigil_alloc as alloc;

/// The container and its cursors (`vigil-vec`).
pub use vigil_vec as vec;

/// Common imports for typical usage.
///
/// ```rust
/// use vigil::prelude::*;
/// ```
pub mod prelude {
    pub use vigil_alloc::{AllocError, Allocator, Bounded, Heap, Storage};
    pub use vigil_vec::{
        Cursor, CursorId, Vector, VectorConfig, VectorError, VectorId, VectorMetrics,
    };
}
