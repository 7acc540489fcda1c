//! Arena-based tetrahedral mesh handed over by a triangulation engine.
//!
//! A [`Mesh`] owns:
//! - the point table (`N` finite points, addressed `0..N`),
//! - a count of auxiliary vertices (addressed `N..N + aux`) the engine used to
//!   close the complex (e.g. a point at infinity),
//! - an arena of [`Tetrahedron`] records addressed by [`TetIndex`].
//!
//! Neighbor links are plain indices into the arena, so the model has no
//! ownership cycles. The constructor validates every index once; afterwards
//! the mesh is immutable and every checker can index without bounds surprises.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::collections::{FacetIndex, FacetToTetsMap};
use crate::core::facet_keys::{FacetKey, facet_key, facet_vertices};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// Index of a vertex: `0..N` finite, `N..N + aux` auxiliary.
pub type VertexIndex = usize;

/// Index of a tetrahedron in the mesh arena.
pub type TetIndex = usize;

/// Errors raised while assembling a [`Mesh`] from engine output.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// A tetrahedron references a vertex outside `0..N + aux`.
    #[error(
        "Tetrahedron {tet} slot {slot} references vertex {vertex}, but only {vertex_count} vertices exist"
    )]
    VertexOutOfRange {
        /// Offending tetrahedron.
        tet: TetIndex,
        /// Local slot (`0..4`).
        slot: usize,
        /// The out-of-range vertex index.
        vertex: VertexIndex,
        /// `N + aux`.
        vertex_count: usize,
    },
    /// A tetrahedron links to a neighbor outside the arena.
    #[error(
        "Tetrahedron {tet} slot {slot} links to neighbor {neighbor}, but only {tet_count} tetrahedra exist"
    )]
    NeighborOutOfRange {
        /// Offending tetrahedron.
        tet: TetIndex,
        /// Local slot (`0..4`).
        slot: usize,
        /// The out-of-range neighbor index.
        neighbor: TetIndex,
        /// Number of tetrahedra in the arena.
        tet_count: usize,
    },
    /// A signed raw vertex index was negative.
    #[error("Negative vertex index {value} in slot {slot}")]
    NegativeVertexIndex {
        /// Local slot (`0..4`).
        slot: usize,
        /// The raw value.
        value: i64,
    },
    /// A tetrahedron uses the same vertex twice.
    #[error("Tetrahedron {tet} repeats vertex {vertex}")]
    RepeatedVertex {
        /// Offending tetrahedron.
        tet: TetIndex,
        /// The repeated vertex.
        vertex: VertexIndex,
    },
    /// A point of the table has a NaN or infinite coordinate.
    #[error("Point {point} has a non-finite coordinate: {source}")]
    NonFiniteCoordinate {
        /// Offending point index.
        point: VertexIndex,
        /// Underlying conversion error.
        source: CoordinateConversionError,
    },
}

/// Classification of a vertex index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexClass {
    /// Index of a real input point (`< N`).
    Finite,
    /// Index of an auxiliary closure vertex (`N..N + aux`).
    Auxiliary,
    /// Index outside the vertex space.
    OutOfRange,
}

/// A tetrahedron record of the arena.
///
/// `neighbors[i]` is the tetrahedron across the facet opposite `vertices[i]`,
/// or `None` on an open boundary.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::Tetrahedron;
///
/// let t = Tetrahedron::try_from_signed([0, 1, 2, 3], [-1, 4, -1, -1]).unwrap();
/// assert_eq!(t.neighbors, [None, Some(4), None, None]);
/// assert!(Tetrahedron::try_from_signed([0, -1, 2, 3], [-1; 4]).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tetrahedron {
    /// Vertex indices; order defines orientation.
    pub vertices: [VertexIndex; 4],
    /// Neighbor across the facet opposite each vertex.
    pub neighbors: [Option<TetIndex>; 4],
}

impl Tetrahedron {
    /// Create a tetrahedron from vertices and neighbor links.
    #[must_use]
    pub const fn new(vertices: [VertexIndex; 4], neighbors: [Option<TetIndex>; 4]) -> Self {
        Self {
            vertices,
            neighbors,
        }
    }

    /// Create a tetrahedron without any neighbor links.
    #[must_use]
    pub const fn without_neighbors(vertices: [VertexIndex; 4]) -> Self {
        Self::new(vertices, [None; 4])
    }

    /// Build from the signed raw indices an engine typically emits, where a
    /// negative neighbor means "no neighbor".
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NegativeVertexIndex`] if any vertex index is negative.
    pub fn try_from_signed(vertices: [i64; 4], neighbors: [i64; 4]) -> Result<Self, MeshError> {
        let mut verts = [0; 4];
        for (slot, &value) in vertices.iter().enumerate() {
            verts[slot] = usize::try_from(value)
                .map_err(|_| MeshError::NegativeVertexIndex { slot, value })?;
        }
        let neighbors = neighbors.map(|n| usize::try_from(n).ok());
        Ok(Self::new(verts, neighbors))
    }

    /// Vertices of the facet opposite `vertices[facet]`.
    #[must_use]
    pub const fn facet_vertices(&self, facet: usize) -> [VertexIndex; 3] {
        facet_vertices(&self.vertices, facet)
    }

    /// Canonical key of the facet opposite `vertices[facet]`.
    #[must_use]
    pub fn facet_key(&self, facet: usize) -> FacetKey {
        facet_key(&self.vertices, facet)
    }

    /// Returns `true` if `vertex` is one of the four vertices.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexIndex) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Local slot of `vertex`, if present.
    #[must_use]
    pub fn local_index_of(&self, vertex: VertexIndex) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Returns `true` if all four vertices are finite for a table of `n_points`.
    #[must_use]
    pub fn is_finite(&self, n_points: usize) -> bool {
        self.vertices.iter().all(|&v| v < n_points)
    }
}

/// Immutable tetrahedral mesh: point table, tetrahedron arena, auxiliary count.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
/// assert_eq!(mesh.tet_count(), 1);
/// assert!(mesh.is_finite_vertex(3));
///
/// // Vertex 4 would need an auxiliary vertex.
/// let tets = vec![Tetrahedron::without_neighbors([0, 1, 2, 4])];
/// let bad = Mesh::new(mesh.points().to_vec(), tets, 0);
/// assert!(bad.is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "MeshRepr<T>",
    bound(serialize = "T: CoordinateScalar", deserialize = "T: CoordinateScalar")
)]
pub struct Mesh<T>
where
    T: CoordinateScalar,
{
    points: Vec<Point<T>>,
    tetrahedra: Vec<Tetrahedron>,
    auxiliary_count: usize,
}

/// Unvalidated serialized form of a [`Mesh`].
#[derive(Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
struct MeshRepr<T>
where
    T: CoordinateScalar,
{
    points: Vec<Point<T>>,
    tetrahedra: Vec<Tetrahedron>,
    auxiliary_count: usize,
}

impl<T> TryFrom<MeshRepr<T>> for Mesh<T>
where
    T: CoordinateScalar,
{
    type Error = MeshError;

    fn try_from(repr: MeshRepr<T>) -> Result<Self, Self::Error> {
        Self::new(repr.points, repr.tetrahedra, repr.auxiliary_count)
    }
}

impl<T> Mesh<T>
where
    T: CoordinateScalar,
{
    /// Assemble a mesh, validating every index.
    ///
    /// # Errors
    ///
    /// - [`MeshError::NonFiniteCoordinate`] if a point has a NaN/infinite coordinate
    /// - [`MeshError::VertexOutOfRange`] if a vertex index is `>= N + aux`
    /// - [`MeshError::NeighborOutOfRange`] if a neighbor index is `>= tet count`
    /// - [`MeshError::RepeatedVertex`] if a tetrahedron repeats a vertex
    pub fn new(
        points: Vec<Point<T>>,
        tetrahedra: Vec<Tetrahedron>,
        auxiliary_count: usize,
    ) -> Result<Self, MeshError> {
        for (point, p) in points.iter().enumerate() {
            p.to_f64()
                .map_err(|source| MeshError::NonFiniteCoordinate { point, source })?;
        }

        let vertex_count = points.len() + auxiliary_count;
        let tet_count = tetrahedra.len();
        for (tet, t) in tetrahedra.iter().enumerate() {
            for (slot, &vertex) in t.vertices.iter().enumerate() {
                if vertex >= vertex_count {
                    return Err(MeshError::VertexOutOfRange {
                        tet,
                        slot,
                        vertex,
                        vertex_count,
                    });
                }
                if t.vertices[..slot].contains(&vertex) {
                    return Err(MeshError::RepeatedVertex { tet, vertex });
                }
            }
            for (slot, neighbor) in t.neighbors.iter().enumerate() {
                if let Some(neighbor) = *neighbor
                    && neighbor >= tet_count
                {
                    return Err(MeshError::NeighborOutOfRange {
                        tet,
                        slot,
                        neighbor,
                        tet_count,
                    });
                }
            }
        }

        Ok(Self {
            points,
            tetrahedra,
            auxiliary_count,
        })
    }

    /// The finite point table.
    #[must_use]
    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    /// The tetrahedron arena.
    #[must_use]
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    /// Tetrahedron at `index`, if any.
    #[must_use]
    pub fn tetrahedron(&self, index: TetIndex) -> Option<&Tetrahedron> {
        self.tetrahedra.get(index)
    }

    /// Number of finite points `N`.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of auxiliary vertices.
    #[must_use]
    pub const fn auxiliary_count(&self) -> usize {
        self.auxiliary_count
    }

    /// Size of the vertex index space, `N + aux`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len() + self.auxiliary_count
    }

    /// Number of tetrahedron records.
    #[must_use]
    pub fn tet_count(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Returns `true` if the arena holds no tetrahedra.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tetrahedra.is_empty()
    }

    /// Returns `true` if `vertex` addresses a real input point.
    #[must_use]
    pub fn is_finite_vertex(&self, vertex: VertexIndex) -> bool {
        vertex < self.points.len()
    }

    /// Returns `true` if `vertex` addresses an auxiliary closure vertex.
    #[must_use]
    pub fn is_auxiliary_vertex(&self, vertex: VertexIndex) -> bool {
        (self.points.len()..self.vertex_count()).contains(&vertex)
    }

    /// Classify a vertex index.
    #[must_use]
    pub fn classify_vertex(&self, vertex: VertexIndex) -> VertexClass {
        if self.is_finite_vertex(vertex) {
            VertexClass::Finite
        } else if self.is_auxiliary_vertex(vertex) {
            VertexClass::Auxiliary
        } else {
            VertexClass::OutOfRange
        }
    }

    /// Point of a finite vertex, `None` for auxiliary or out-of-range indices.
    #[must_use]
    pub fn point(&self, vertex: VertexIndex) -> Option<&Point<T>> {
        self.points.get(vertex)
    }

    /// Returns `true` if every vertex of `tet` is finite.
    #[must_use]
    pub fn is_finite_tet(&self, tet: &Tetrahedron) -> bool {
        tet.is_finite(self.points.len())
    }

    /// The four points of a finite tetrahedron, `None` if any vertex is auxiliary.
    #[must_use]
    pub fn tet_points(&self, tet: &Tetrahedron) -> Option<[Point<T>; 4]> {
        let [a, b, c, d] = tet.vertices;
        Some([
            *self.point(a)?,
            *self.point(b)?,
            *self.point(c)?,
            *self.point(d)?,
        ])
    }

    /// Iterate `(index, tetrahedron)` over tetrahedra whose vertices are all finite.
    pub fn finite_tetrahedra(&self) -> impl Iterator<Item = (TetIndex, &Tetrahedron)> + '_ {
        self.tetrahedra
            .iter()
            .enumerate()
            .filter(|(_, t)| self.is_finite_tet(t))
    }

    /// Map each canonical facet key to every `(tetrahedron, local facet)` owning it.
    ///
    /// Duplicate tetrahedron records contribute duplicate owners, which is what
    /// lets the topology and adjacency checks detect them.
    #[must_use]
    pub fn build_facet_to_tets_map(&self) -> FacetToTetsMap {
        facet_to_tets_map(&self.tetrahedra)
    }
}

/// Facet → owners map of a bare tetrahedron table.
pub(crate) fn facet_to_tets_map(tetrahedra: &[Tetrahedron]) -> FacetToTetsMap {
    let mut map = FacetToTetsMap::default();
    map.reserve(tetrahedra.len() * 2);
    for (tet, t) in tetrahedra.iter().enumerate() {
        for facet in 0..4 as FacetIndex {
            map.entry(t.facet_key(usize::from(facet)))
                .or_default()
                .push((tet, facet));
        }
    }
    map
}
