//! The triangulation engine boundary.
//!
//! Checkers and the exporter only ever see a finished [`Mesh`]. Whatever
//! produces it sits behind [`Triangulator`], a single `compute` operation, so
//! the audit can be driven by a real engine or by synthetic meshes alike.
//!
//! [`BruteForceTriangulator`] is a small reference implementation: it
//! enumerates every 4-subset of the input, keeps those with an empty
//! circumsphere and closes the hull with one auxiliary vertex. It is
//! `O(n^5)` and only meant for tests, demos and benchmarks.

#![forbid(unsafe_code)]

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::core::mesh::{Mesh, MeshError, Tetrahedron, VertexIndex, facet_to_tets_map};
use crate::core::stats::{TriangulationStats, millis};
use crate::geometry::kernel::{Kernel, RobustKernel};
use crate::geometry::point::Point;
use crate::geometry::predicates::{InSphere, Orientation};
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// Default input size limit of [`BruteForceTriangulator`].
pub const DEFAULT_MAX_POINTS: usize = 32;

/// A finished triangulation.
#[derive(Clone, Debug)]
pub struct TriangulationOutput<T: CoordinateScalar> {
    /// The mesh, closed with auxiliary vertices where the engine does so.
    pub mesh: Mesh<T>,
    /// Construction statistics.
    pub stats: TriangulationStats,
}

/// Something that turns a point set into a tetrahedral mesh.
pub trait Triangulator<T: CoordinateScalar> {
    /// Failure type of the engine.
    type Error: std::error::Error;

    /// Triangulate `points`. Point `i` of the input is vertex `i` of the mesh.
    ///
    /// # Errors
    ///
    /// Engine-specific.
    fn compute(&mut self, points: &[Point<T>]) -> Result<TriangulationOutput<T>, Self::Error>;
}

/// Errors of [`BruteForceTriangulator`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationError {
    /// Fewer than four points.
    #[error("At least 4 points are required, got {count}")]
    TooFewPoints {
        /// Number of input points.
        count: usize,
    },
    /// More points than the configured limit.
    #[error("Brute-force triangulation is limited to {max} points, got {count}")]
    TooManyPoints {
        /// Number of input points.
        count: usize,
        /// Configured limit.
        max: usize,
    },
    /// All points are coplanar.
    #[error("Input spans no tetrahedron (all points coplanar)")]
    DegenerateInput,
    /// A point lies on the circumsphere of a candidate tetrahedron, so the
    /// Delaunay tetrahedralization is not unique.
    #[error("Vertex {vertex} is cospherical with tetrahedron {simplex:?}")]
    NotGeneralPosition {
        /// The candidate tetrahedron.
        simplex: [VertexIndex; 4],
        /// The cospherical vertex.
        vertex: VertexIndex,
    },
    /// A predicate could not be evaluated.
    #[error("Predicate failure: {0}")]
    Predicate(#[from] CoordinateConversionError),
    /// The assembled mesh was rejected.
    #[error("Mesh assembly failed: {0}")]
    Mesh(#[from] MeshError),
}

/// Reference triangulator enumerating empty-circumsphere tetrahedra.
///
/// The output has one auxiliary vertex (index `n`) joined to every hull
/// facet, so every facet is shared by exactly two tetrahedra. Finite
/// tetrahedra are positively oriented.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::triangulator::{BruteForceTriangulator, Triangulator};
/// use delaunay_audit::geometry::point::Point;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let output = BruteForceTriangulator::<f64>::default().compute(&points).unwrap();
/// assert_eq!(output.mesh.tet_count(), 5); // one finite, four closing the hull
/// assert_eq!(output.mesh.auxiliary_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BruteForceTriangulator<T: CoordinateScalar, K = RobustKernel<T>>
where
    K: Kernel<Scalar = T>,
{
    kernel: K,
    max_points: usize,
}

impl<T: CoordinateScalar> Default for BruteForceTriangulator<T> {
    fn default() -> Self {
        Self::with_kernel(RobustKernel::new())
    }
}

impl<T, K> BruteForceTriangulator<T, K>
where
    T: CoordinateScalar,
    K: Kernel<Scalar = T>,
{
    /// Use `kernel` for orientation and in-sphere decisions.
    #[must_use]
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    /// Change the input size limit.
    #[must_use]
    pub fn max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    fn finite_tetrahedra(
        &self,
        points: &[Point<T>],
    ) -> Result<Vec<[VertexIndex; 4]>, TriangulationError> {
        let n = points.len();
        let mut found = Vec::new();

        for a in 0..n {
            for b in a + 1..n {
                for c in b + 1..n {
                    for d in c + 1..n {
                        let mut simplex = [a, b, c, d];
                        let mut coords = simplex.map(|v| points[v]);
                        match self.kernel.orientation(&coords)? {
                            Orientation::DEGENERATE => continue,
                            Orientation::NEGATIVE => {
                                simplex.swap(0, 1);
                                coords.swap(0, 1);
                            }
                            Orientation::POSITIVE => {}
                        }
                        if self.circumsphere_is_empty(&simplex, &coords, points)? {
                            found.push(simplex);
                        }
                    }
                }
            }
        }

        Ok(found)
    }

    fn circumsphere_is_empty(
        &self,
        simplex: &[VertexIndex; 4],
        coords: &[Point<T>; 4],
        points: &[Point<T>],
    ) -> Result<bool, TriangulationError> {
        let mut cospherical = None;
        for (vertex, point) in points.iter().enumerate() {
            if simplex.contains(&vertex) {
                continue;
            }
            match self.kernel.in_sphere(coords, point)? {
                InSphere::INSIDE => return Ok(false),
                InSphere::BOUNDARY => cospherical = cospherical.or(Some(vertex)),
                InSphere::OUTSIDE => {}
            }
        }
        match cospherical {
            Some(vertex) => Err(TriangulationError::NotGeneralPosition {
                simplex: *simplex,
                vertex,
            }),
            None => Ok(true),
        }
    }
}

/// Join every hull facet of `finite` to `apex` and link all neighbors.
fn close_and_link(finite: &[[VertexIndex; 4]], apex: VertexIndex) -> Vec<Tetrahedron> {
    let mut tets: Vec<Tetrahedron> = finite
        .iter()
        .map(|&v| Tetrahedron::without_neighbors(v))
        .collect();

    let hull_facets: Vec<_> = facet_to_tets_map(&tets)
        .into_values()
        .filter(|owners| owners.len() == 1)
        .map(|owners| owners[0])
        .collect();
    for (tet, facet) in hull_facets {
        let facet = usize::from(facet);
        let mut vertices = tets[tet].vertices;
        vertices[facet] = apex;
        // Swapping two of the kept vertices puts the apex on the far side.
        let (i, j) = match facet {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        vertices.swap(i, j);
        tets.push(Tetrahedron::without_neighbors(vertices));
    }

    for owners in facet_to_tets_map(&tets).into_values() {
        if let [(t0, f0), (t1, f1)] = owners.as_slice() {
            tets[*t0].neighbors[usize::from(*f0)] = Some(*t1);
            tets[*t1].neighbors[usize::from(*f1)] = Some(*t0);
        }
    }
    tets
}

impl<T, K> Triangulator<T> for BruteForceTriangulator<T, K>
where
    T: CoordinateScalar,
    K: Kernel<Scalar = T>,
{
    type Error = TriangulationError;

    fn compute(&mut self, points: &[Point<T>]) -> Result<TriangulationOutput<T>, Self::Error> {
        let count = points.len();
        if count < 4 {
            return Err(TriangulationError::TooFewPoints { count });
        }
        if count > self.max_points {
            return Err(TriangulationError::TooManyPoints {
                count,
                max: self.max_points,
            });
        }

        let start = Instant::now();
        let finite = self.finite_tetrahedra(points)?;
        if finite.is_empty() {
            return Err(TriangulationError::DegenerateInput);
        }
        let split_done = Instant::now();

        let tets = close_and_link(&finite, count);
        let mesh = Mesh::new(points.to_vec(), tets, 1)?;
        let end = Instant::now();

        let stats = TriangulationStats {
            total_time: millis(end - start),
            split_time: millis(split_done - start),
            out_time: millis(end - split_done),
            ..TriangulationStats::default()
        };
        debug!(
            points = count,
            finite = finite.len(),
            total = mesh.tet_count(),
            "Brute-force triangulation"
        );

        Ok(TriangulationOutput { mesh, stats })
    }
}
