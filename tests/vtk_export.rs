//! Integration tests for the legacy VTK exporter.

use std::fs;
use std::path::PathBuf;

use delaunay_audit::prelude::*;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("delaunay_audit_{}_{name}.vtk", std::process::id()))
}

#[test]
fn test_single_point_without_cells() {
    let mesh = Mesh::new(vec![Point::new([0.0_f64, 0.0, 0.0])], Vec::new(), 0).unwrap();
    let path = scratch_path("single_point");

    let written = export_vtk(&path, &mesh).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written, 0);
    assert_eq!(
        text,
        "# vtk DataFile Version 1.0\n\
         Unstructured Grid Example\n\
         ASCII\n\
         \n\
         DATASET UNSTRUCTURED_GRID\n\
         POINTS 1 float\n\
         0 0 0\n\
         \n\
         CELLS 0 0\n\
         \n\
         CELL_TYPES 0\n"
    );
}

#[test]
fn test_auxiliary_cells_are_not_exported() {
    let points = vec![
        Point::new([0.0_f64, 0.0, 0.0]),
        Point::new([1.0, 0.0, 0.0]),
        Point::new([0.0, 1.0, 0.0]),
        Point::new([0.0, 0.0, 0.5]),
    ];
    let tets = vec![
        Tetrahedron::without_neighbors([0, 1, 2, 3]),
        Tetrahedron::without_neighbors([0, 2, 1, 5]),
    ];
    let mesh = Mesh::new(points, tets, 2).unwrap();
    let path = scratch_path("auxiliary");

    let written = export_vtk(&path, &mesh).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written, 1);
    assert!(text.contains("POINTS 4 float\n0 0 0\n1 0 0\n0 1 0\n0 0 0.5\n"));
    assert!(text.ends_with("\nCELLS 1 5\n4 0 1 2 3\n\nCELL_TYPES 1\n10 "));
}

#[test]
fn test_reference_mesh_export() {
    let points = generate_points::<f64>(8, Distribution::Uniform, 99).unwrap();
    let output = BruteForceTriangulator::<f64>::default()
        .compute(&points)
        .unwrap();
    let finite = output.mesh.finite_tetrahedra().count();

    let mut bytes = Vec::new();
    let cells = finite_cells(output.mesh.tetrahedra(), output.mesh.point_count());
    write_vtk(&mut bytes, output.mesh.points(), &cells).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(cells.len(), finite);
    assert!(text.contains(&format!("CELLS {finite} {}\n", 5 * finite)));
    assert!(text.ends_with(&"10 ".repeat(finite)));
    // Every cell line references finite vertices only.
    let cell_lines = text.lines().filter(|l| l.starts_with("4 ")).count();
    assert_eq!(cell_lines, finite);
}

#[test]
fn test_unwritable_path_is_an_error() {
    let mesh = Mesh::new(vec![Point::new([0.0_f64, 0.0, 0.0])], Vec::new(), 0).unwrap();
    let path = std::env::temp_dir()
        .join("delaunay_audit_missing_dir")
        .join("nested")
        .join("out.vtk");

    let err = export_vtk(&path, &mesh).unwrap_err();
    assert!(matches!(&err, ExportError::Io { path: p, .. } if *p == path));
    assert!(err.to_string().contains("out.vtk"));
}
