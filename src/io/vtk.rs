//! Legacy VTK (`.vtk`) ASCII writer for the finite part of a mesh.
//!
//! Only tetrahedra whose four vertices are real input points are written;
//! tetrahedra touching an auxiliary vertex have no coordinates to export.
//! The layout is fixed (header text, blank lines, a trailing `10 ` token per
//! cell without a final newline) so downstream consumers can rely on it byte
//! for byte.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::mesh::{Mesh, Tetrahedron, VertexIndex};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// VTK cell type code of a linear tetrahedron.
pub const VTK_TETRA: u8 = 10;

const HEADER: &str =
    "# vtk DataFile Version 1.0\nUnstructured Grid Example\nASCII\n\nDATASET UNSTRUCTURED_GRID\n";

/// Errors raised while exporting a mesh.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output file could not be created, written or flushed.
    #[error("Failed to write VTK file {}: {source}", .path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The caller-supplied writer failed.
    #[error("Failed to write VTK data: {0}")]
    Write(#[from] io::Error),
    /// A point coordinate could not be represented.
    #[error("Point {point} cannot be exported: {source}")]
    Coordinate {
        /// Offending point index.
        point: VertexIndex,
        /// Underlying conversion error.
        #[source]
        source: CoordinateConversionError,
    },
}

/// Tetrahedra whose vertices are all `< point_count`, in table order.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::Tetrahedron;
/// use delaunay_audit::io::vtk::finite_cells;
///
/// let tets = [
///     Tetrahedron::without_neighbors([0, 1, 2, 3]),
///     Tetrahedron::without_neighbors([0, 1, 2, 5]),
/// ];
/// assert_eq!(finite_cells(&tets, 4), vec![tets[0]]);
/// ```
#[must_use]
pub fn finite_cells(tetrahedra: &[Tetrahedron], point_count: usize) -> Vec<Tetrahedron> {
    tetrahedra
        .iter()
        .filter(|t| t.is_finite(point_count))
        .copied()
        .collect()
}

/// Format a coordinate the way C's `%g` does with six significant digits.
///
/// # Examples
///
/// ```
/// use delaunay_audit::io::vtk::format_coordinate;
///
/// assert_eq!(format_coordinate(0.0), "0");
/// assert_eq!(format_coordinate(1.0 / 3.0), "0.333333");
/// assert_eq!(format_coordinate(1e7), "1e+07");
/// assert_eq!(format_coordinate(-2.5e-5), "-2.5e-05");
/// ```
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    const PRECISION: i32 = 6;

    if !value.is_finite() || value == 0.0 {
        let special = match value {
            v if v.is_nan() => "nan",
            v if v == 0.0 && v.is_sign_negative() => "-0",
            v if v == 0.0 => "0",
            v if v < 0.0 => "-inf",
            _ => "inf",
        };
        return special.to_string();
    }

    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exponent) {
        let decimals = usize::try_from(PRECISION - 1 - exponent).unwrap_or(0);
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_fraction_zeros(mantissa),
            exponent.unsigned_abs()
        )
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Write `points` and `cells` as a legacy VTK unstructured grid.
///
/// `cells` are written as given; pass the output of [`finite_cells`] to
/// exclude auxiliary vertices.
///
/// # Errors
///
/// - [`ExportError::Write`] if the writer fails
/// - [`ExportError::Coordinate`] if a coordinate cannot be converted to `f64`
pub fn write_vtk<T, W>(
    mut writer: W,
    points: &[Point<T>],
    cells: &[Tetrahedron],
) -> Result<(), ExportError>
where
    T: CoordinateScalar,
    W: Write,
{
    writer.write_all(HEADER.as_bytes())?;
    writeln!(writer, "POINTS {} float", points.len())?;
    for (point, p) in points.iter().enumerate() {
        let [x, y, z] = p
            .to_f64()
            .map_err(|source| ExportError::Coordinate { point, source })?;
        writeln!(
            writer,
            "{} {} {}",
            format_coordinate(x),
            format_coordinate(y),
            format_coordinate(z)
        )?;
    }

    writeln!(writer, "\nCELLS {} {}", cells.len(), cells.len() * 5)?;
    for cell in cells {
        let [a, b, c, d] = cell.vertices;
        writeln!(writer, "4 {a} {b} {c} {d}")?;
    }

    writeln!(writer, "\nCELL_TYPES {}", cells.len())?;
    for _ in cells {
        write!(writer, "{VTK_TETRA} ")?;
    }
    Ok(())
}

/// Write the finite part of `mesh` to `path`, returning the number of cells
/// written.
///
/// The file is flushed before returning; it is closed on every path.
///
/// # Errors
///
/// - [`ExportError::Io`] if the file cannot be created or written
/// - [`ExportError::Coordinate`] if a coordinate cannot be converted to `f64`
///
/// # Examples
///
/// ```no_run
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::io::vtk::export_vtk;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
/// assert_eq!(export_vtk("tri.vtk", &mesh).unwrap(), 1);
/// ```
pub fn export_vtk<T, P>(path: P, mesh: &Mesh<T>) -> Result<usize, ExportError>
where
    T: CoordinateScalar,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let cells = finite_cells(mesh.tetrahedra(), mesh.point_count());
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    write_vtk(&mut writer, mesh.points(), &cells).map_err(|err| match err {
        ExportError::Write(source) => io_error(source),
        other => other,
    })?;
    writer.flush().map_err(io_error)?;

    debug!(
        path = %path.display(),
        points = mesh.point_count(),
        cells = cells.len(),
        skipped = mesh.tet_count() - cells.len(),
        "Exported VTK"
    );
    Ok(cells.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastey::paste;

    macro_rules! gen_format_tests {
        ($($name:ident: $value:expr => $expected:expr),* $(,)?) => {
            paste! {
                $(
                    #[test]
                    fn [<format_ $name>]() {
                        assert_eq!(format_coordinate($value), $expected);
                    }
                )*
            }
        };
    }

    gen_format_tests! {
        zero: 0.0 => "0",
        negative_zero: -0.0 => "-0",
        integer: 42.0 => "42",
        half: 0.5 => "0.5",
        negative: -1.25 => "-1.25",
        six_digits: 123_456.0 => "123456",
        rounds_to_six_digits: 1_234_567.0 => "1.23457e+06",
        large: 1e7 => "1e+07",
        small_fixed: 0.0001 => "0.0001",
        small_scientific: 0.000_012_5 => "1.25e-05",
        third: 1.0 / 3.0 => "0.333333",
        huge: 1.5e300 => "1.5e+300",
        round_up_carries: 999_999.5 => "1e+06",
    }

    #[test]
    fn empty_cell_list_layout() {
        let mut out = Vec::new();
        write_vtk(&mut out, &[Point::new([0.0_f64, 0.0, 0.0])], &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# vtk DataFile Version 1.0\nUnstructured Grid Example\nASCII\n\n\
             DATASET UNSTRUCTURED_GRID\nPOINTS 1 float\n0 0 0\n\n\
             CELLS 0 0\n\nCELL_TYPES 0\n"
        );
    }

    #[test]
    fn cells_and_types_layout() {
        let points = [
            Point::new([0.0_f32, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ];
        let cells = [
            Tetrahedron::without_neighbors([0, 1, 2, 3]),
            Tetrahedron::without_neighbors([1, 0, 3, 2]),
        ];
        let mut out = Vec::new();
        write_vtk(&mut out, &points, &cells).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\nCELLS 2 10\n4 0 1 2 3\n4 1 0 3 2\n\nCELL_TYPES 2\n10 10 "));
        assert!(text.contains("POINTS 4 float\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n"));
    }

    #[test]
    fn finite_cells_preserve_order() {
        let tets = [
            Tetrahedron::without_neighbors([4, 1, 2, 3]),
            Tetrahedron::without_neighbors([3, 2, 1, 0]),
            Tetrahedron::without_neighbors([0, 1, 2, 3]),
        ];
        assert_eq!(finite_cells(&tets, 4), vec![tets[1], tets[2]]);
        assert!(finite_cells(&tets, 0).is_empty());
    }
}
