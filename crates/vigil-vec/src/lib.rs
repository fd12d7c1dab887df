//! A growable array built on pluggable allocator strategies, with cursors
//! that detect their own invalidation.
//!
//! # Architecture
//!
//! ```text
//! Vector<T, A>
//! ├── RawBuffer<T, A>          (Storage<T> + live length, all unsafe lives here)
//! │   └── A: Allocator         (acquire / release / construct / destroy)
//! └── Rc<RefCell<Registry>>    (CursorId → position side table)
//!         ▲
//!         └── Weak ── Cursor<T>  (self-registers, deregisters on drop)
//! ```
//!
//! Cursors never borrow their vector. They store an id and a weak
//! reference to the registry; every dereference, advance, or comparison
//! looks the id up and fails with
//! [`VectorError::InvalidIterator`] if a mutation removed it.
//!
//! # Invalidation
//!
//! Positions are logical indices, so reallocation never invalidates a
//! cursor. Shifting operations remove exactly the entries whose positions
//! they disturb; see [`Vector`] for the table.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod cursor;
pub mod error;
pub mod id;
pub mod metrics;
mod raw;
mod registry;
pub mod vector;

// Public re-exports for the primary API surface.
pub use config::VectorConfig;
pub use cursor::Cursor;
pub use error::VectorError;
pub use id::{CursorId, VectorId};
pub use metrics::VectorMetrics;
pub use vector::Vector;
pub use vigil_alloc::{AllocError, Allocator, Bounded, Heap, Storage};
