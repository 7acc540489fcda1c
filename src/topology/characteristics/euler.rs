//! Euler characteristic computation for tetrahedral meshes.
//!
//! This module implements Euler characteristic calculation using the formula
//! χ = Σ(-1)^k · `f_k`, where `f_k` is the number of `k`-simplices:
//! χ = V − E + F − C for a tetrahedral complex, and χ = V − E + F for its
//! triangulated hull surface.
//!
//! # Examples
//!
//! ```rust
//! use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
//! use delaunay_audit::geometry::point::Point;
//! use delaunay_audit::topology::characteristics::euler;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ];
//! let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
//!
//! let counts = euler::count_simplices(&mesh);
//! assert_eq!(euler::euler_characteristic(&counts), 1); // Single tetrahedron has χ = 1
//!
//! let hull = euler::count_hull_simplices(&mesh);
//! assert_eq!(euler::euler_characteristic(&hull), 2); // Its surface is a 2-sphere
//! ```

use crate::core::collections::{FacetCountMap, FacetToTetsMap, FastHashSet};
use crate::core::facet_keys::{EdgeKey, edge_key_from_vertices, edge_keys};
use crate::core::mesh::{Mesh, VertexIndex};
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Counts of k-simplices (the **f-vector**).
///
/// For a tetrahedral complex `by_dim` is `[V, E, F, C]`; for a hull surface it
/// is `[V, E, F]`.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::topology::characteristics::euler::FVector;
///
/// let counts = FVector {
///     by_dim: vec![4, 6, 4, 1], // one tetrahedron
/// };
///
/// assert_eq!(counts.count(0), 4);  // vertices
/// assert_eq!(counts.count(3), 1);  // tetrahedra
/// assert_eq!(counts.count(4), 0);  // out of range
/// assert_eq!(counts.dimension(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FVector {
    /// `by_dim[k]` = `f_k` = number of `k`-simplices
    pub by_dim: Vec<usize>,
}

impl FVector {
    /// Get the number of `k`-simplices.
    ///
    /// Returns 0 if `k` is out of range.
    #[must_use]
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.by_dim.get(k).copied().unwrap_or(0)
    }

    /// Get the dimension of the complex the counts describe.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.by_dim.len().saturating_sub(1)
    }
}

impl std::fmt::Display for FVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const LABELS: [&str; 4] = ["V", "E", "F", "C"];
        for (k, count) in self.by_dim.iter().enumerate() {
            if k > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={count}", LABELS.get(k).copied().unwrap_or("?"))?;
        }
        Ok(())
    }
}

/// Topological classification of a tetrahedral mesh.
///
/// Determines the expected Euler characteristic of the volumetric complex.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::topology::characteristics::euler::TopologyClassification;
///
/// let closed = TopologyClassification::ClosedSphere;
/// assert_eq!(format!("{closed:?}"), "ClosedSphere");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyClassification {
    /// No tetrahedra (χ = 0).
    Empty,

    /// A single tetrahedron (χ = 1).
    SingleSimplex,

    /// Topological 3-ball with a boundary surface (χ = 1).
    ///
    /// A finite triangulation without auxiliary closure falls here.
    Ball,

    /// Closed 3-sphere (χ = 0): every facet has exactly two owners.
    ///
    /// A triangulation closed through auxiliary vertices falls here.
    ClosedSphere,

    /// Some facet is owned by more than two tetrahedra; not a manifold.
    NonManifold {
        /// Number of facets with more than two owners.
        overshared_facets: usize,
    },
}

impl std::fmt::Display for TopologyClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::SingleSimplex => write!(f, "single tetrahedron"),
            Self::Ball => write!(f, "3-ball"),
            Self::ClosedSphere => write!(f, "closed 3-sphere"),
            Self::NonManifold { overshared_facets } => {
                write!(f, "non-manifold ({overshared_facets} over-shared facets)")
            }
        }
    }
}

/// Count all simplices of the mesh, auxiliary vertices included.
///
/// - `f₀`: distinct vertices referenced by any tetrahedron
/// - `f₁`: distinct unordered edges
/// - `f₂`: distinct unordered facets (a shared facet counts once)
/// - `f₃`: tetrahedron records
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::topology::characteristics::euler;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
///     Point::new([1.0, 1.0, 1.0]),
/// ];
/// let tets = vec![
///     Tetrahedron::without_neighbors([0, 1, 2, 3]),
///     Tetrahedron::without_neighbors([4, 3, 2, 1]),
/// ];
/// let mesh = Mesh::new(points, tets, 0).unwrap();
/// assert_eq!(euler::count_simplices(&mesh).by_dim, vec![5, 9, 7, 2]);
/// ```
#[must_use]
pub fn count_simplices<T: CoordinateScalar>(mesh: &Mesh<T>) -> FVector {
    if mesh.is_empty() {
        return FVector {
            by_dim: vec![0; 4],
        };
    }
    count_simplices_with_facet_map(mesh, &mesh.build_facet_to_tets_map())
}

pub(crate) fn count_simplices_with_facet_map<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    facet_to_tets: &FacetToTetsMap,
) -> FVector {
    let mut vertices: FastHashSet<VertexIndex> = FastHashSet::default();
    let mut edges: FastHashSet<EdgeKey> = FastHashSet::default();

    for tet in mesh.tetrahedra() {
        vertices.extend(tet.vertices);
        edges.extend(edge_keys(&tet.vertices));
    }

    FVector {
        by_dim: vec![
            vertices.len(),
            edges.len(),
            facet_to_tets.len(),
            mesh.tet_count(),
        ],
    }
}

/// Count simplices of the hull surface of the finite sub-complex.
///
/// The hull is made of the facets of finite tetrahedra owned by exactly one
/// finite tetrahedron. For a valid triangulation it is a topological 2-sphere
/// with χ = 2, whether or not the mesh is closed through auxiliary vertices.
///
/// Returns `[V, E, F]` of the surface (all zero if no tetrahedron is finite).
#[must_use]
pub fn count_hull_simplices<T: CoordinateScalar>(mesh: &Mesh<T>) -> FVector {
    let mut owner_counts = FacetCountMap::default();
    for (_, tet) in mesh.finite_tetrahedra() {
        for facet in 0..4 {
            *owner_counts.entry(tet.facet_key(facet)).or_insert(0) += 1;
        }
    }

    let mut vertices: FastHashSet<VertexIndex> = FastHashSet::default();
    let mut edges: FastHashSet<EdgeKey> = FastHashSet::default();
    let mut faces = 0_usize;

    for (&[a, b, c], _) in owner_counts.iter().filter(|&(_, &n)| n == 1) {
        faces += 1;
        vertices.extend([a, b, c]);
        edges.extend([
            edge_key_from_vertices(a, b),
            edge_key_from_vertices(a, c),
            edge_key_from_vertices(b, c),
        ]);
    }

    FVector {
        by_dim: vec![vertices.len(), edges.len(), faces],
    }
}

/// Compute Euler characteristic from simplex counts.
///
/// Uses the alternating sum formula: χ = Σ(-1)^k · `f_k`
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::topology::characteristics::euler::{FVector, euler_characteristic};
///
/// // Tetrahedron: V=4, E=6, F=4, C=1 → χ = 4-6+4-1 = 1
/// assert_eq!(euler_characteristic(&FVector { by_dim: vec![4, 6, 4, 1] }), 1);
///
/// // Its boundary: V=4, E=6, F=4 → χ = 2
/// assert_eq!(euler_characteristic(&FVector { by_dim: vec![4, 6, 4] }), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Simplex counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &FVector) -> isize {
    counts
        .by_dim
        .iter()
        .enumerate()
        .map(|(k, &f_k)| {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            sign * (f_k as isize)
        })
        .sum()
}

/// Classify the mesh topologically from its facet ownership.
///
/// - No tetrahedra → `Empty`
/// - Any facet with more than two owners → `NonManifold`
/// - One tetrahedron → `SingleSimplex`
/// - Any facet with one owner → `Ball`
/// - Otherwise → `ClosedSphere`
#[must_use]
pub fn classify_mesh<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    facet_to_tets: &FacetToTetsMap,
) -> TopologyClassification {
    if mesh.is_empty() {
        return TopologyClassification::Empty;
    }

    let overshared_facets = facet_to_tets
        .values()
        .filter(|owners| owners.len() > 2)
        .count();
    if overshared_facets > 0 {
        return TopologyClassification::NonManifold { overshared_facets };
    }

    if mesh.tet_count() == 1 {
        TopologyClassification::SingleSimplex
    } else if facet_to_tets.values().any(|owners| owners.len() == 1) {
        TopologyClassification::Ball
    } else {
        TopologyClassification::ClosedSphere
    }
}

/// Get expected χ for a topological classification.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::topology::characteristics::euler::{
///     TopologyClassification, expected_chi_for,
/// };
///
/// assert_eq!(expected_chi_for(&TopologyClassification::Empty), Some(0));
/// assert_eq!(expected_chi_for(&TopologyClassification::Ball), Some(1));
/// assert_eq!(expected_chi_for(&TopologyClassification::ClosedSphere), Some(0));
/// assert_eq!(
///     expected_chi_for(&TopologyClassification::NonManifold { overshared_facets: 1 }),
///     None
/// );
/// ```
#[must_use]
pub const fn expected_chi_for(classification: &TopologyClassification) -> Option<isize> {
    match classification {
        TopologyClassification::Empty | TopologyClassification::ClosedSphere => Some(0),
        TopologyClassification::SingleSimplex | TopologyClassification::Ball => Some(1),
        TopologyClassification::NonManifold { .. } => None,
    }
}
