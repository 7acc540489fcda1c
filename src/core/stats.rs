//! Construction statistics reported by a triangulator.
//!
//! The checkers never read these; they are carried alongside the mesh for
//! display. Times are in milliseconds.

#![forbid(unsafe_code)]

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::traits::coordinate::CoordinateScalar;

/// Phase timings and counters of one triangulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangulationStats {
    /// Wall time of the whole run (ms).
    pub total_time: f64,
    /// Initial simplex construction (ms).
    pub init_time: f64,
    /// Point insertion by splitting (ms).
    pub split_time: f64,
    /// Flipping (ms).
    pub flip_time: f64,
    /// Relocation of uninserted points (ms).
    pub relocate_time: f64,
    /// Sorting (ms).
    pub sort_time: f64,
    /// Output assembly (ms).
    pub out_time: f64,
    /// Star splaying repair (ms).
    pub splaying_time: f64,
    /// Number of flips performed.
    pub total_flip_num: usize,
    /// Number of vertices that failed fast insertion.
    pub fail_vert_num: usize,
    /// Number of stars handled by the final repair.
    pub final_star_num: usize,
}

/// Converts a duration to fractional milliseconds.
#[must_use]
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl TriangulationStats {
    /// Summary table for `point_count` points triangulated with scalar `T`.
    ///
    /// The `FP Mode` line reports `Double` or `Single` from the scalar width.
    ///
    /// # Examples
    ///
    /// ```
    /// use delaunay_audit::core::stats::TriangulationStats;
    ///
    /// let stats = TriangulationStats { total_flip_num: 12, ..Default::default() };
    /// let text = stats.summary::<f64>(100).to_string();
    /// assert!(text.contains("PointNum       100"));
    /// assert!(text.contains("FP Mode        Double"));
    /// ```
    #[must_use]
    pub fn summary<T: CoordinateScalar>(&self, point_count: usize) -> StatsSummary<'_> {
        StatsSummary {
            stats: self,
            point_count,
            precision: T::precision_name(),
        }
    }
}

/// [`fmt::Display`] adapter returned by [`TriangulationStats::summary`].
#[derive(Clone, Copy, Debug)]
pub struct StatsSummary<'a> {
    stats: &'a TriangulationStats,
    point_count: usize,
    precision: &'static str,
}

impl fmt::Display for StatsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats;
        writeln!(f)?;
        writeln!(f, "---- SUMMARY ----")?;
        writeln!(f)?;
        writeln!(f, "PointNum       {}", self.point_count)?;
        writeln!(f, "FP Mode        {}", self.precision)?;
        writeln!(f)?;
        for (label, value) in [
            ("TotalTime (ms)", s.total_time),
            ("InitTime      ", s.init_time),
            ("SplitTime     ", s.split_time),
            ("FlipTime      ", s.flip_time),
            ("RelocateTime  ", s.relocate_time),
            ("SortTime      ", s.sort_time),
            ("OutTime       ", s.out_time),
            ("SplayingTime  ", s.splaying_time),
        ] {
            writeln!(f, "{label} {value:>10.2}")?;
        }
        writeln!(f)?;
        writeln!(f, "# Flips        {:>10}", s.total_flip_num)?;
        writeln!(f, "# Failed verts {:>10}", s.fail_vert_num)?;
        writeln!(f, "# Final stars  {:>10}", s.final_star_num)
    }
}
