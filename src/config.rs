//! Audit configuration.
//!
//! [`AuditConfig`] collects every knob the checkers read: predicate tolerances,
//! the expected orientation sign, the Delaunay checking mode and an optional
//! override for the expected Euler characteristic. Tolerances are relative to
//! each determinant's magnitude bound, so the same configuration audits `f32`
//! and `f64` meshes of any scale. It is serde-serializable so a configuration
//! can be stored next to the mesh it audited.
//!
//! # Examples
//!
//! ```
//! use delaunay_audit::config::AuditConfigBuilder;
//! use delaunay_audit::validation::delaunay::DelaunayMode;
//!
//! let config = AuditConfigBuilder::default()
//!     .delaunay_mode(DelaunayMode::Exhaustive)
//!     .expected_euler(0)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.expected_euler, Some(0));
//! assert!(config.predicates.adaptive);
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::geometry::robust_predicates::{PredicateConfig, config_presets};
use crate::validation::delaunay::DelaunayMode;
use crate::validation::orientation::OrientationConvention;

/// Configuration for [`audit`](crate::validation::audit::audit).
#[derive(Builder, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Predicate tolerances and kernel selection.
    #[builder(default)]
    pub predicates: PredicateConfig,
    /// Expected orientation sign of finite tetrahedra.
    #[builder(default)]
    pub orientation: OrientationConvention,
    /// Vertices each circumsphere is tested against.
    #[builder(default)]
    pub delaunay_mode: DelaunayMode,
    /// Expected volumetric Euler characteristic; derived from the mesh's
    /// classification when `None`.
    #[builder(setter(strip_option), default)]
    pub expected_euler: Option<isize>,
}

impl AuditConfig {
    /// Tight tolerances for well-conditioned input.
    #[must_use]
    pub fn high_precision() -> Self {
        Self::with_predicates(config_presets::high_precision())
    }

    /// Loose tolerances for nearly degenerate input.
    #[must_use]
    pub fn degenerate_robust() -> Self {
        Self::with_predicates(config_presets::degenerate_robust())
    }

    /// Single-evaluation predicates ([`FastKernel`](crate::geometry::kernel::FastKernel)).
    #[must_use]
    pub fn fast() -> Self {
        Self::with_predicates(config_presets::fast())
    }

    fn with_predicates(predicates: PredicateConfig) -> Self {
        Self {
            predicates,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = AuditConfigBuilder::default().build().unwrap();
        assert_eq!(built, AuditConfig::default());
        assert_eq!(built.delaunay_mode, DelaunayMode::NeighborLocal);
        assert_eq!(built.orientation, OrientationConvention::Positive);
        assert_eq!(built.expected_euler, None);
    }

    #[test]
    fn presets_differ_in_tolerance() {
        let general = AuditConfig::default();
        let tight = AuditConfig::high_precision();
        let loose = AuditConfig::degenerate_robust();
        assert!(tight.predicates.relative_tolerance < general.predicates.relative_tolerance);
        assert!(loose.predicates.relative_tolerance > general.predicates.relative_tolerance);
        assert!(!AuditConfig::fast().predicates.adaptive);
        assert_eq!(general.predicates, PredicateConfig::default());
    }

    #[test]
    fn default_tolerance_is_relative_to_f64_precision() {
        let config = AuditConfig::default();
        assert!(config.predicates.relative_tolerance < 1e-10);
        assert!(config.predicates.relative_tolerance > f64::EPSILON);
    }

    #[test]
    fn serde_roundtrip() {
        let config = AuditConfigBuilder::default()
            .delaunay_mode(DelaunayMode::Exhaustive)
            .orientation(OrientationConvention::Negative)
            .expected_euler(2)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: AuditConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
