//! Allocator strategies for Vigil containers.
//!
//! An [`Allocator`] separates two concerns that a plain `Box`/`Vec`
//! fuse together:
//!
//! - **Memory:** [`acquire`](Allocator::acquire) hands out an
//!   uninitialised [`Storage`] block, [`release`](Allocator::release)
//!   gives it back. Neither runs element constructors or destructors.
//! - **Lifecycle:** [`construct`](Allocator::construct) /
//!   [`construct_with`](Allocator::construct_with) build one element in a
//!   slot, [`destroy`](Allocator::destroy) tears it down without giving
//!   the memory back.
//!
//! This is the leaf crate of the workspace. Two strategies ship with it:
//!
//! - [`Heap`]: stateless, backed by the global allocator.
//! - [`Bounded`]: caps outstanding bytes with a budget shared by all of
//!   its clones; useful for modelling fixed-size pools and for driving
//!   out-of-memory paths in tests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod bounded;
pub mod error;
pub mod heap;
pub mod storage;
pub mod strategy;

pub use bounded::Bounded;
pub use error::AllocError;
pub use heap::Heap;
pub use storage::Storage;
pub use strategy::Allocator;
