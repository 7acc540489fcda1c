//! # delaunay-audit
//!
//! Correctness verification and export for finished 3D Delaunay tetrahedral
//! meshes.
//!
//! A triangulation engine hands over a [`Mesh`](core::mesh::Mesh): a table of
//! `N` finite points, a count of auxiliary vertices used to close the complex
//! and an arena of tetrahedra with per-facet neighbor links. This crate checks
//! the invariants a valid Delaunay tetrahedralization must satisfy and writes
//! the finite part of the mesh as a legacy VTK unstructured grid.
//!
//! # Checks
//!
//! | Invariant | Function | Report |
//! |---|---|---|
//! | Euler characteristic | [`check_euler`](topology::characteristics::validation::check_euler) | [`EulerCheckResult`](topology::characteristics::validation::EulerCheckResult) |
//! | Orientation | [`check_orientation`](validation::orientation::check_orientation) | [`OrientationReport`](validation::orientation::OrientationReport) |
//! | Adjacency | [`check_adjacency`](validation::adjacency::check_adjacency) | [`AdjacencyReport`](validation::adjacency::AdjacencyReport) |
//! | Empty circumsphere | [`check_delaunay`](validation::delaunay::check_delaunay) | [`DelaunayReport`](validation::delaunay::DelaunayReport) |
//!
//! Every checker is a pure function over `&Mesh`. Invariant violations are
//! report contents, never errors; the only hard failures are malformed input
//! (rejected by [`Mesh::new`](core::mesh::Mesh::new)), predicate evaluation
//! failures and I/O errors while exporting. [`audit`](validation::audit::audit)
//! runs all four checks with one [`AuditConfig`](config::AuditConfig).
//!
//! # Basic Usage
//!
//! ```rust
//! use delaunay_audit::prelude::*;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([0.3, 0.3, 0.3]),
//! ];
//!
//! let output = BruteForceTriangulator::<f64>::default().compute(&points).unwrap();
//! let report = audit(&output.mesh, &AuditConfig::default()).unwrap();
//! assert!(report.is_valid(), "{report}");
//!
//! let mut vtk = Vec::new();
//! let cells = finite_cells(output.mesh.tetrahedra(), output.mesh.point_count());
//! write_vtk(&mut vtk, output.mesh.points(), &cells).unwrap();
//! assert!(String::from_utf8(vtk).unwrap().contains("CELLS 4 20"));
//! ```
//!
//! # Numerical predicates
//!
//! Orientation and in-sphere decisions go through a [`Kernel`](geometry::kernel::Kernel).
//! Determinants are evaluated in `f64` on scale-normalized matrices and compared
//! against a tolerance relative to their magnitude bound, so classification is
//! the same for a mesh and any uniformly scaled copy of it, in `f32` or `f64`.
//! [`FastKernel`](geometry::kernel::FastKernel) evaluates one determinant per
//! decision; [`RobustKernel`](geometry::kernel::RobustKernel) cross-checks the two
//! in-sphere formulations. A point on a circumsphere (within tolerance) is never
//! a Delaunay violation.
//!
//! # Features
//!
//! - `parallel`: run the per-tetrahedron loops of the orientation and Delaunay
//!   checkers on rayon's thread pool. Reports are identical to the serial ones.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Mesh model, construction statistics and the triangulation engine boundary.
pub mod core {
    /// Hash map, set and small-buffer aliases
    pub mod collections;
    pub mod facet_keys;
    pub mod mesh;
    pub mod stats;
    pub mod triangulator;
    pub use mesh::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Points, scalar abstraction and numerical predicates.
///
/// Predicates are isolated here so that the checkers depend only on the
/// [`Kernel`](kernel::Kernel) trait.
pub mod geometry {
    /// Geometric kernel abstraction
    pub mod kernel;
    pub mod matrix;
    pub mod point;
    /// Seeded point sets for named distributions
    pub mod point_generation;
    pub mod predicates;
    /// Enhanced predicates with improved numerical robustness
    pub mod robust_predicates;
    /// Coordinate scalar abstraction and safe conversions.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use point::*;
    pub use predicates::*;
    pub use traits::*;
}

/// Combinatorial topology of tetrahedral meshes.
pub mod topology {
    /// Simplex counting and Euler characteristic validation
    pub mod characteristics {
        pub mod euler;
        pub mod validation;
        pub use euler::*;
        pub use validation::*;
    }
}

/// Orientation, adjacency and Delaunay checkers.
pub mod validation {
    pub mod adjacency;
    pub mod audit;
    pub mod delaunay;
    pub mod error;
    pub mod orientation;
    mod parallel;
    pub use error::*;
}

/// Mesh export.
pub mod io {
    /// Legacy VTK ASCII writer
    pub mod vtk;
}

pub mod config;

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    pub use crate::config::{AuditConfig, AuditConfigBuilder};
    pub use crate::core::{
        mesh::*,
        stats::*,
        triangulator::{
            BruteForceTriangulator, TriangulationError, TriangulationOutput, Triangulator,
        },
    };

    pub use crate::core::collections::{FacetToTetsMap, FastHashMap, FastHashSet, SmallBuffer};

    pub use crate::geometry::{
        kernel::*,
        point::*,
        point_generation::{Distribution, generate_points},
        predicates::{InSphere, Orientation},
        robust_predicates::{PredicateConfig, config_presets},
        traits::coordinate::*,
    };

    pub use crate::io::vtk::{ExportError, export_vtk, finite_cells, write_vtk};
    pub use crate::topology::characteristics::validation::{EulerCheckResult, check_euler};
    pub use crate::validation::{
        adjacency::{AdjacencyLink, AdjacencyReport, check_adjacency},
        audit::{AuditReport, InvariantKind, audit, audit_with_kernel},
        delaunay::{DelaunayMode, DelaunayReport, DelaunayViolation, check_delaunay},
        error::ValidationError,
        orientation::{OrientationConvention, OrientationReport, check_orientation},
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}
