//! Benchmark workloads for the Vigil container.
//!
//! - [`filled`]: a heap-backed vector holding `0..n`
//! - [`mixed_workload`]: a deterministic, seeded stream of edits
//! - [`apply`]: replay a workload against a vector

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vigil_alloc::Allocator;
use vigil_vec::{Vector, VectorError};

/// One step of a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Append a value.
    Push(u64),
    /// Remove the last element.
    Pop,
    /// Insert a value before a position, taken modulo `len + 1`.
    Insert(usize, u64),
    /// Remove the element at a position, taken modulo `len`.
    Erase(usize),
}

/// A heap-backed vector holding `0..n`, sized exactly.
pub fn filled(n: usize) -> Vector<u64> {
    let mut v = Vector::with_capacity(n);
    v.extend(0..n as u64);
    v
}

/// Generate `count` edits from `seed`.
///
/// Roughly half the edits append, so the vector trends upward in size.
/// The same seed always yields the same workload.
pub fn mixed_workload(count: usize, seed: u64) -> Vec<Edit> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let roll = rng.next_u64();
            let value = rng.next_u64();
            match roll % 8 {
                0..=3 => Edit::Push(value),
                4 => Edit::Pop,
                5 | 6 => Edit::Insert((value >> 32) as usize, value),
                _ => Edit::Erase((value >> 32) as usize),
            }
        })
        .collect()
}

/// Replay `edits` against `v`. Returns the number of edits that changed it.
pub fn apply<A: Allocator>(v: &mut Vector<u64, A>, edits: &[Edit]) -> Result<usize, VectorError> {
    let mut changed = 0;
    for edit in edits {
        match *edit {
            Edit::Push(x) => v.push_back(x)?,
            Edit::Pop => {
                if v.is_empty() {
                    continue;
                }
                v.pop_back();
            }
            Edit::Insert(at, x) => {
                let cursor = v.cursor_at(at % (v.len() + 1))?;
                v.insert(&cursor, x)?;
            }
            Edit::Erase(at) => {
                if v.is_empty() {
                    continue;
                }
                let cursor = v.cursor_at(at % v.len())?;
                v.erase(&cursor)?;
            }
        }
        changed += 1;
    }
    Ok(changed)
}
