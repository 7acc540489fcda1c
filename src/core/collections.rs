//! Collection type aliases used throughout the crate.
//!
//! Centralizes the hash map / set flavor and small inline buffers so the mesh
//! model and the checkers agree on one set of container types.
//!
//! - [`FastHashMap`] / [`FastHashSet`]: `rustc_hash` (Fx) hashing. Keys are
//!   vertex-index tuples, never attacker-controlled, so `DoS` resistance is
//!   not needed.
//! - [`SmallBuffer`]: `SmallVec` kept on the stack up to `N` elements.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::core::facet_keys::FacetKey;
use crate::core::mesh::TetIndex;

/// Hash map with Fx hashing.
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Hash set with Fx hashing.
pub type FastHashSet<T> = FxHashSet<T>;

pub use std::collections::hash_map::Entry;

/// Stack-first vector with inline capacity `N`.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Local facet index inside a tetrahedron (`0..4`, the index of the opposite vertex).
pub type FacetIndex = u8;

/// Owners of one facet. A valid mesh has at most two.
pub type FacetOwners = SmallBuffer<(TetIndex, FacetIndex), 2>;

/// Map from canonical facet key to the `(tetrahedron, local facet)` pairs owning it.
pub type FacetToTetsMap = FastHashMap<FacetKey, FacetOwners>;

/// Map from canonical facet key to the number of owning tetrahedra.
pub type FacetCountMap = FastHashMap<FacetKey, usize>;
