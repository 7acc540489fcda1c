//! Triangulate a seeded point set, audit the result and export it as VTK.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example audit_and_export -- 24
//! ```
//!
//! The optional argument is the number of points (at most 32, the limit of
//! the reference triangulator). The mesh is written to `tri.vtk` in the
//! current directory.

use delaunay_audit::prelude::*;
use std::error::Error;
use std::time::Instant;

const SEED: u64 = 123_456_789;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let point_count = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 20,
    };

    println!("=== delaunay-audit demo ===");
    println!("Points: {point_count} ({}, seed {SEED})", Distribution::Ball);

    let points = generate_points::<f64>(point_count, Distribution::Ball, SEED)?;
    let output = BruteForceTriangulator::<f64>::default().compute(&points)?;
    let mesh = &output.mesh;

    let start = Instant::now();
    let report = audit(mesh, &AuditConfig::default())?;
    let audit_ms = millis(start.elapsed());

    println!();
    println!("{report}");
    println!("Audit time: {audit_ms:.2} ms");
    println!();
    print!("{}", output.stats.summary::<f64>(mesh.point_count()));

    let written = export_vtk("tri.vtk", mesh)?;
    println!();
    println!(
        "Wrote {written} of {} tetrahedra to tri.vtk",
        mesh.tet_count()
    );

    if report.is_valid() {
        Ok(())
    } else {
        Err(format!("audit failed: {:?}", report.failed_invariants()).into())
    }
}
