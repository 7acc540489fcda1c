//! Canonical keys for edges and facets of tetrahedra.
//!
//! A key is the sorted tuple of vertex indices, so two tetrahedra sharing a
//! facet (in any vertex order) derive the same key. Keys are exact; there is no
//! hashing step that could collide.

#![forbid(unsafe_code)]

use crate::core::mesh::VertexIndex;

/// Canonical (sorted) facet key.
pub type FacetKey = [VertexIndex; 3];

/// Canonical (sorted) edge key.
pub type EdgeKey = [VertexIndex; 2];

/// Local vertex positions of each facet, indexed by the opposite vertex.
///
/// Facet `i` is made of every vertex except `vertices[i]`, in ascending local
/// order.
pub const FACET_LOCAL_VERTICES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

/// Local vertex positions of the six edges of a tetrahedron.
pub const EDGE_LOCAL_VERTICES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Canonical key of a facet given its three vertices in any order.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::facet_keys::facet_key_from_vertices;
///
/// assert_eq!(facet_key_from_vertices([7, 2, 5]), [2, 5, 7]);
/// assert_eq!(facet_key_from_vertices([5, 7, 2]), facet_key_from_vertices([2, 7, 5]));
/// ```
#[inline]
#[must_use]
pub fn facet_key_from_vertices(mut vertices: [VertexIndex; 3]) -> FacetKey {
    vertices.sort_unstable();
    vertices
}

/// Canonical key of an edge given its endpoints in any order.
#[inline]
#[must_use]
pub const fn edge_key_from_vertices(a: VertexIndex, b: VertexIndex) -> EdgeKey {
    if a <= b { [a, b] } else { [b, a] }
}

/// Vertices of facet `facet` (the one opposite `vertices[facet]`), in local order.
///
/// # Panics
///
/// Panics if `facet >= 4`.
#[inline]
#[must_use]
pub const fn facet_vertices(vertices: &[VertexIndex; 4], facet: usize) -> [VertexIndex; 3] {
    let local = FACET_LOCAL_VERTICES[facet];
    [vertices[local[0]], vertices[local[1]], vertices[local[2]]]
}

/// Canonical key of facet `facet` of a tetrahedron.
///
/// # Panics
///
/// Panics if `facet >= 4`.
#[inline]
#[must_use]
pub fn facet_key(vertices: &[VertexIndex; 4], facet: usize) -> FacetKey {
    facet_key_from_vertices(facet_vertices(vertices, facet))
}

/// Canonical keys of the six edges of a tetrahedron.
#[must_use]
pub fn edge_keys(vertices: &[VertexIndex; 4]) -> [EdgeKey; 6] {
    EDGE_LOCAL_VERTICES.map(|[a, b]| edge_key_from_vertices(vertices[a], vertices[b]))
}
