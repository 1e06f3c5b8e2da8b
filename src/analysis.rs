//! Shape analysis for uploaded model files.
//!
//! The estimator turns an upload's byte size into a synthetic geometric
//! analysis record. It is a stand-in for a real mesh-analysis backend
//! (volume integration, watertightness checks, overhang detection); the
//! pricing model downstream depends on its exact output shape, so the
//! heuristic arithmetic is reproduced verbatim.

use serde::{Deserialize, Serialize};

/// Bounding dimensions of the estimated model, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Geometric analysis of an uploaded model file.
///
/// Produced fresh per request and consumed once by the pricer; never
/// persisted by the analysis path itself (the quote store keeps a copy
/// when a client asks for one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Estimated model volume. Floored at 1.0 cm³.
    pub volume_cm3: f64,
    pub surface_area_cm2: f64,
    pub dimensions_cm: Dimensions,
    pub face_count: u64,
    pub vertex_count: u64,
    /// Normalized model complexity in [0, 1].
    pub complexity_factor: f64,
    pub is_watertight: bool,
    pub needs_supports: bool,
    /// Which estimator backend produced this record.
    pub analysis_method: String,
}

/// A backend capable of analyzing an uploaded model.
///
/// The shipped implementation is [`HeuristicEstimator`]; a real
/// mesh-analysis backend can replace it without touching the pricer.
pub trait ShapeEstimator: Send + Sync {
    fn estimate(&self, byte_size: u64) -> AnalysisResult;
}

/// Size-based heuristic estimator.
///
/// Deterministic and total over all byte sizes: larger files are assumed
/// to hold larger, more complex models. No file content is inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

/// Complexity above which a model is assumed to need support material.
const SUPPORT_COMPLEXITY_THRESHOLD: f64 = 0.3;

impl ShapeEstimator for HeuristicEstimator {
    fn estimate(&self, byte_size: u64) -> AnalysisResult {
        let size = byte_size as f64;

        // Roughly 10 cm³ per 100 kB, floored so even empty uploads price
        // as a minimal printable object.
        let volume_cm3 = (size / 100_000.0 * 10.0).max(1.0);

        let surface_area_cm2 = volume_cm3 * 6.0;

        // Slightly rectangular box around an equivalent cube.
        let cube_side = volume_cm3.cbrt();
        let dimensions_cm = Dimensions {
            x: round_to(cube_side * 1.2, 2),
            y: round_to(cube_side * 0.8, 2),
            z: round_to(cube_side, 2),
        };

        let complexity_factor = (size / 1_000_000.0).min(1.0);

        let face_count = byte_size / 50;
        let vertex_count = (face_count as f64 * 0.6) as u64;

        // Support detection runs on the unrounded complexity value.
        let needs_supports = complexity_factor > SUPPORT_COMPLEXITY_THRESHOLD;

        AnalysisResult {
            volume_cm3: round_to(volume_cm3, 3),
            surface_area_cm2: round_to(surface_area_cm2, 2),
            dimensions_cm,
            face_count,
            vertex_count,
            complexity_factor: round_to(complexity_factor, 3),
            is_watertight: true,
            needs_supports,
            analysis_method: "size_heuristic".to_string(),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_floor_applies_to_tiny_files() {
        let analysis = HeuristicEstimator.estimate(0);
        assert_eq!(analysis.volume_cm3, 1.0);
        assert_eq!(analysis.surface_area_cm2, 6.0);
        assert_eq!(analysis.face_count, 0);
        assert_eq!(analysis.vertex_count, 0);
        assert_eq!(analysis.complexity_factor, 0.0);
        assert!(!analysis.needs_supports);
        assert!(analysis.is_watertight);
    }

    #[test]
    fn test_half_megabyte_scenario() {
        let analysis = HeuristicEstimator.estimate(500_000);
        assert_eq!(analysis.volume_cm3, 50.0);
        assert_eq!(analysis.surface_area_cm2, 300.0);
        assert_eq!(analysis.complexity_factor, 0.5);
        assert!(analysis.needs_supports);
        assert_eq!(analysis.face_count, 10_000);
        assert_eq!(analysis.vertex_count, 6_000);
    }

    #[test]
    fn test_dimensions_are_rectangular_around_cube_side() {
        let analysis = HeuristicEstimator.estimate(500_000);
        // 50 cm³ -> cube side 3.684...
        assert_eq!(analysis.dimensions_cm.x, 4.42);
        assert_eq!(analysis.dimensions_cm.y, 2.95);
        assert_eq!(analysis.dimensions_cm.z, 3.68);
    }

    #[test]
    fn test_complexity_clamps_at_one() {
        let analysis = HeuristicEstimator.estimate(5_000_000);
        assert_eq!(analysis.complexity_factor, 1.0);
        assert!(analysis.needs_supports);
    }

    #[test]
    fn test_support_threshold() {
        // 300 kB sits exactly on the threshold and must not trigger.
        assert!(!HeuristicEstimator.estimate(300_000).needs_supports);
        assert!(HeuristicEstimator.estimate(310_000).needs_supports);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let a = HeuristicEstimator.estimate(123_456);
        let b = HeuristicEstimator.estimate(123_456);
        assert_eq!(a, b);
    }

    #[test]
    fn test_volume_never_below_floor() {
        for size in [0u64, 1, 50, 9_999, 10_000, 100_000, 1_000_000] {
            assert!(
                HeuristicEstimator.estimate(size).volume_cm3 >= 1.0,
                "volume floor violated for {} bytes",
                size
            );
        }
    }
}
