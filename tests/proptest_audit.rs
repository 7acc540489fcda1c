//! Property-based tests for the full audit.
//!
//! ## Test Properties
//!
//! 1. **Reference meshes pass**: reference triangulations of random point sets
//!    satisfy every invariant in both Delaunay modes
//! 2. **Orientation flips are caught**: swapping two vertices of any finite
//!    tetrahedron inverts exactly that tetrahedron
//! 3. **Mode ordering**: a neighbor-local violation is always an exhaustive one
//! 4. **Export matches the filter**: the VTK cell count equals the number of
//!    finite tetrahedra
//! 5. **Scale invariance**: scaling every point by `10^k` leaves the audit
//!    report unchanged
//!
//! Point sets come from seeded generators; inputs that are not in general
//! position are discarded.

use delaunay_audit::prelude::*;
use proptest::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Distributions whose samples are in general position with probability one.
fn distribution() -> impl Strategy<Value = Distribution> {
    prop_oneof![
        Just(Distribution::Uniform),
        Just(Distribution::Ball),
        Just(Distribution::Gaussian),
    ]
}

fn triangulate(points: &[Point<f64>]) -> Option<Mesh<f64>> {
    BruteForceTriangulator::<f64>::default()
        .compute(points)
        .ok()
        .map(|output| output.mesh)
}

/// Swap two vertices and the matching neighbor links of tetrahedron `tet`.
fn flip_tetrahedron(mesh: &Mesh<f64>, tet: usize) -> Mesh<f64> {
    let mut tets = mesh.tetrahedra().to_vec();
    tets[tet].vertices.swap(0, 1);
    tets[tet].neighbors.swap(0, 1);
    Mesh::new(mesh.points().to_vec(), tets, mesh.auxiliary_count()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: reference meshes pass every check
    #[test]
    fn prop_reference_meshes_pass_audit(
        n in 5_usize..=10,
        dist in distribution(),
        seed in any::<u64>(),
        exhaustive in any::<bool>(),
    ) {
        init_tracing();
        let points = generate_points::<f64>(n, dist, seed).unwrap();
        let mesh = triangulate(&points);
        prop_assume!(mesh.is_some());
        let mesh = mesh.unwrap();

        let mode = if exhaustive { DelaunayMode::Exhaustive } else { DelaunayMode::NeighborLocal };
        let config = AuditConfigBuilder::default().delaunay_mode(mode).build().unwrap();
        let report = audit(&mesh, &config).unwrap();
        prop_assert!(report.is_valid(), "{} points ({dist}, seed {seed}):\n{report}", n);
        prop_assert_eq!(report.euler.chi, 0);
        prop_assert_eq!(report.euler.hull_chi, 2);
        prop_assert_eq!(report.orientation.skipped_auxiliary, report.delaunay.skipped_auxiliary);
    }

    /// Property: flipping any finite tetrahedron is detected and nothing else is
    #[test]
    fn prop_flipped_tetrahedron_is_caught(
        n in 5_usize..=9,
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let points = generate_points::<f64>(n, Distribution::Uniform, seed).unwrap();
        let mesh = triangulate(&points);
        prop_assume!(mesh.is_some());
        let mesh = mesh.unwrap();

        let finite: Vec<usize> = mesh.finite_tetrahedra().map(|(i, _)| i).collect();
        let target = finite[pick.index(finite.len())];
        let flipped = flip_tetrahedron(&mesh, target);

        let report = audit(&flipped, &AuditConfig::default()).unwrap();
        prop_assert_eq!(report.failed_invariants(), vec![InvariantKind::Orientation]);
        prop_assert_eq!(report.orientation.inverted, vec![target]);
    }

    /// Property: a local violation is also an exhaustive violation
    #[test]
    fn prop_local_violations_are_exhaustive_violations(
        n in 5_usize..=9,
        seed in any::<u64>(),
        shift in prop::array::uniform3(-0.3_f64..0.3),
    ) {
        let points = generate_points::<f64>(n, Distribution::Ball, seed).unwrap();
        let mesh = triangulate(&points);
        prop_assume!(mesh.is_some());
        let mesh = mesh.unwrap();

        // Move one vertex after triangulating; the connectivity may stop being Delaunay.
        let mut moved = mesh.points().to_vec();
        let [x, y, z] = *moved[0].coords();
        moved[0] = Point::new([x + shift[0], y + shift[1], z + shift[2]]);
        let perturbed = Mesh::new(moved, mesh.tetrahedra().to_vec(), 1).unwrap();

        let kernel = RobustKernel::<f64>::new();
        let local = check_delaunay(&perturbed, &kernel, DelaunayMode::NeighborLocal).unwrap();
        let exhaustive = check_delaunay(&perturbed, &kernel, DelaunayMode::Exhaustive).unwrap();
        for tet in &local.violating_tets {
            prop_assert!(exhaustive.violating_tets.contains(tet));
        }
        prop_assert!(local.violations.len() <= exhaustive.violations.len());
    }

    /// Property: exported cell count equals the number of finite tetrahedra
    #[test]
    fn prop_export_matches_filter(
        n in 4_usize..=9,
        seed in any::<u64>(),
    ) {
        let points = generate_points::<f64>(n, Distribution::Uniform, seed).unwrap();
        let mesh = triangulate(&points);
        prop_assume!(mesh.is_some());
        let mesh = mesh.unwrap();

        let cells = finite_cells(mesh.tetrahedra(), mesh.point_count());
        prop_assert_eq!(cells.len(), mesh.finite_tetrahedra().count());
        prop_assert!(cells.iter().all(|c| c.vertices.iter().all(|&v| v < n)));

        let mut bytes = Vec::new();
        write_vtk(&mut bytes, mesh.points(), &cells).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = format!("CELLS {} {}", cells.len(), 5 * cells.len());
        prop_assert!(text.contains(&header));
        prop_assert_eq!(text.lines().filter(|l| l.starts_with("4 ")).count(), cells.len());
    }

    /// Property: uniform scaling does not change the audit report
    #[test]
    fn prop_audit_is_scale_invariant(
        n in 5_usize..=9,
        seed in any::<u64>(),
        exponent in -8_i32..=8,
    ) {
        let points = generate_points::<f64>(n, Distribution::Uniform, seed).unwrap();
        let mesh = triangulate(&points);
        prop_assume!(mesh.is_some());
        let mesh = mesh.unwrap();

        let scale = 10_f64.powi(exponent);
        let scaled_points = mesh
            .points()
            .iter()
            .map(|p| {
                let [x, y, z] = *p.coords();
                Point::new([x * scale, y * scale, z * scale])
            })
            .collect();
        let scaled = Mesh::new(scaled_points, mesh.tetrahedra().to_vec(), mesh.auxiliary_count())
            .unwrap();

        let config = AuditConfigBuilder::default()
            .delaunay_mode(DelaunayMode::Exhaustive)
            .build()
            .unwrap();
        let expected = audit(&mesh, &config).unwrap();
        prop_assert_eq!(audit(&scaled, &config).unwrap(), expected);
    }
}
