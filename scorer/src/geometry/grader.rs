//! # Geometric Grading
//!
//! Compares a detected shape's vertices against an expected, grid-space
//! reference polygon and measures how far the drawing deviates in scale,
//! rotation, and position. The three deviations are folded into one overall
//! accuracy in `[0, 1]`.
//!
//! Vertex correspondence is purely index-based: vertex `i` of the detected
//! shape is compared against vertex `i` of the expected shape. No
//! rotation-invariant matching is attempted; the expected polygon must be
//! ordered to correspond with a correctly drawn answer.

use super::angle_between_degrees;
use crate::error::ScorerError;
use crate::types::{DetectedShape, ExpectedShape, GeometricAccuracy, Point};

const SCALE_WEIGHT: f64 = 0.3;
const ROTATION_WEIGHT: f64 = 0.3;
const POSITION_WEIGHT: f64 = 0.4;

/// Grades detected shapes against expected shapes.
///
/// `grid_spacing` is the uniform pixel width of one grid unit; the conversion
/// is linear and assumes perspective and skew were corrected upstream.
#[derive(Debug, Clone, Copy)]
pub struct GeometricGrader {
    grid_spacing: f64,
}

impl GeometricGrader {
    /// Rejects a non-finite or non-positive grid spacing, which would turn
    /// the pixel-to-grid conversion into NaN coordinates.
    pub fn new(grid_spacing: f64) -> Result<Self, ScorerError> {
        if !grid_spacing.is_finite() || grid_spacing <= 0.0 {
            return Err(ScorerError::InvalidInput(format!(
                "grid_spacing must be a positive number, got {grid_spacing}"
            )));
        }
        Ok(Self { grid_spacing })
    }

    /// Measures a detected shape against the expected answer.
    ///
    /// A shape-type mismatch, vertex-count mismatch, or empty expected polygon
    /// is a *hard mismatch*: the result is the incomparable sentinel
    /// (`position_error = +∞`, `overall_accuracy = 0`), not a partial score.
    pub fn grade(&self, detected: &DetectedShape, expected: &ExpectedShape) -> GeometricAccuracy {
        if detected.shape_type != expected.shape_type {
            tracing::debug!(
                detected = %detected.shape_type,
                expected = %expected.shape_type,
                "shape type mismatch"
            );
            return GeometricAccuracy::incomparable();
        }

        let grid_vertices = self.pixels_to_grid(&detected.vertices);
        if expected.vertices.is_empty() || grid_vertices.len() != expected.vertices.len() {
            return GeometricAccuracy::incomparable();
        }

        let scale_factor = scale_factor(&grid_vertices, &expected.vertices);
        let rotation_angle = rotation_angle(&grid_vertices, &expected.vertices);
        let position_error = position_error(&grid_vertices, &expected.vertices);

        let tolerance = &expected.tolerance;
        let scale_score = (1.0 - (scale_factor - 1.0).abs() / tolerance.scale).max(0.0);
        let rotation_score = (1.0 - rotation_angle.abs() / tolerance.rotation).max(0.0);
        let position_score = (1.0 - position_error / tolerance.position).max(0.0);

        let overall_accuracy = (scale_score * SCALE_WEIGHT
            + rotation_score * ROTATION_WEIGHT
            + position_score * POSITION_WEIGHT)
            .clamp(0.0, 1.0);

        GeometricAccuracy {
            scale_factor,
            rotation_angle,
            position_error,
            overall_accuracy,
        }
    }

    /// Converts pixel vertices to grid units by the uniform grid spacing.
    fn pixels_to_grid(&self, vertices: &[Point]) -> Vec<Point> {
        vertices
            .iter()
            .map(|p| Point::new(p.x / self.grid_spacing, p.y / self.grid_spacing))
            .collect()
    }
}

/// Mean ratio of corresponding consecutive-edge lengths (detected over
/// expected), along the open vertex chain. Zero-length edges are skipped;
/// with no measurable edge the scale factor defaults to 1.0.
fn scale_factor(detected: &[Point], expected: &[Point]) -> f64 {
    if detected.len() < 2 {
        return 1.0;
    }

    let mut ratios = Vec::new();
    for i in 0..detected.len() - 1 {
        let detected_edge = detected[i].distance_to(&detected[i + 1]);
        let expected_edge = expected[i].distance_to(&expected[i + 1]);
        if detected_edge > 0.0 && expected_edge > 0.0 {
            ratios.push(detected_edge / expected_edge);
        }
    }

    if ratios.is_empty() {
        return 1.0;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Mean angle in degrees between the fans of vectors from the first vertex to
/// each subsequent vertex, detected versus expected. Zero-length vectors are
/// skipped; with no measurable pair the rotation is 0.
fn rotation_angle(detected: &[Point], expected: &[Point]) -> f64 {
    if detected.len() < 2 {
        return 0.0;
    }

    let mut angles = Vec::new();
    for i in 1..detected.len() {
        let detected_vec = (
            detected[i].x - detected[0].x,
            detected[i].y - detected[0].y,
        );
        let expected_vec = (
            expected[i].x - expected[0].x,
            expected[i].y - expected[0].y,
        );
        if let Some(angle) = angle_between_degrees(detected_vec, expected_vec) {
            angles.push(angle);
        }
    }

    if angles.is_empty() {
        return 0.0;
    }
    angles.iter().sum::<f64>() / angles.len() as f64
}

/// Mean grid-unit distance between corresponding vertices.
fn position_error(detected: &[Point], expected: &[Point]) -> f64 {
    if detected.is_empty() || detected.len() != expected.len() {
        return f64::INFINITY;
    }
    let total: f64 = detected
        .iter()
        .zip(expected.iter())
        .map(|(d, e)| d.distance_to(e))
        .sum();
    total / detected.len() as f64
}
