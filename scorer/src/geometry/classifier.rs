//! # Shape Classification
//!
//! Classifies a polygon approximation of a detected contour into a shape
//! category, keyed on vertex count with two refinements: an interior-angle
//! test separates rectangles from other quadrilaterals, and a circularity
//! test separates circles from general polygons. Also derives the detection
//! confidence for a shape from the detector's dissimilarity measure.

use super::{angle_between_degrees, polygon_area, perimeter};
use crate::types::{Point, ShapeType};
use std::f64::consts::PI;

/// Maximum deviation from 90 degrees for a quadrilateral's interior angles
/// to still count as a rectangle.
const RIGHT_ANGLE_TOLERANCE_DEGREES: f64 = 15.0;

/// Minimum ratio of polygon area to equivalent-circle area for a many-vertex
/// polygon to count as a circle.
const CIRCULARITY_THRESHOLD: f64 = 0.7;

/// Detected regions smaller than this pixel area get their confidence discounted.
const SMALL_REGION_AREA: f64 = 100.0;
const SMALL_REGION_DISCOUNT: f64 = 0.8;

/// Classifies polygon approximations and scores detection quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeClassifier;

impl ShapeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies a polygon by its vertex count.
    ///
    /// Fewer than three vertices is `Unknown`; four vertices are split into
    /// rectangle or general quadrilateral; more than six into circle or
    /// general polygon.
    pub fn classify(&self, vertices: &[Point]) -> ShapeType {
        match vertices.len() {
            0..=2 => ShapeType::Unknown,
            3 => ShapeType::Triangle,
            4 => {
                if self.is_rectangle(vertices) {
                    ShapeType::Rectangle
                } else {
                    ShapeType::Quadrilateral
                }
            }
            5 => ShapeType::Pentagon,
            6 => ShapeType::Hexagon,
            _ => {
                if self.is_circle(vertices) {
                    ShapeType::Circle
                } else {
                    ShapeType::Polygon
                }
            }
        }
    }

    /// Detection confidence for a shape, from the dissimilarity between the
    /// raw detected boundary and its polygon approximation (as reported by the
    /// detection collaborator) and the detected region's pixel area.
    ///
    /// Lower dissimilarity means higher confidence; very small regions are
    /// discounted. The result is clamped to `[0, 1]`.
    pub fn detection_confidence(&self, dissimilarity: f64, contour_area: f64) -> f64 {
        let mut confidence = (1.0 - dissimilarity).max(0.0);
        if contour_area < SMALL_REGION_AREA {
            confidence *= SMALL_REGION_DISCOUNT;
        }
        confidence.min(1.0)
    }

    /// True when all four interior angles are within tolerance of 90 degrees.
    fn is_rectangle(&self, vertices: &[Point]) -> bool {
        if vertices.len() != 4 {
            return false;
        }
        for i in 0..4 {
            let p1 = vertices[i];
            let p2 = vertices[(i + 1) % 4];
            let p3 = vertices[(i + 2) % 4];
            let v1 = (p1.x - p2.x, p1.y - p2.y);
            let v2 = (p3.x - p2.x, p3.y - p2.y);
            match angle_between_degrees(v1, v2) {
                Some(angle) if (angle - 90.0).abs() < RIGHT_ANGLE_TOLERANCE_DEGREES => {}
                _ => return false,
            }
        }
        true
    }

    /// True when the polygon's area is close to that of a circle with the
    /// same perimeter (`area / (π * (perimeter / 2π)²) > 0.7`).
    fn is_circle(&self, vertices: &[Point]) -> bool {
        if vertices.len() < 6 {
            return false;
        }
        let area = polygon_area(vertices);
        let perimeter = perimeter(vertices);
        let expected_area = PI * (perimeter / (2.0 * PI)).powi(2);
        if expected_area <= 0.0 {
            return false;
        }
        area / expected_area > CIRCULARITY_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Regular n-gon of the given radius, centered at the origin.
    fn regular_polygon(n: usize, radius: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / n as f64;
                Point::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect()
    }

    #[test]
    fn test_classify_by_vertex_count() {
        let classifier = ShapeClassifier::new();
        assert_eq!(
            classifier.classify(&points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])),
            ShapeType::Triangle
        );
        assert_eq!(classifier.classify(&regular_polygon(5, 1.0)), ShapeType::Pentagon);
        assert_eq!(classifier.classify(&regular_polygon(6, 1.0)), ShapeType::Hexagon);
        assert_eq!(classifier.classify(&points(&[(0.0, 0.0), (1.0, 1.0)])), ShapeType::Unknown);
    }

    #[test]
    fn test_classify_square_as_rectangle() {
        let classifier = ShapeClassifier::new();
        let square = points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_eq!(classifier.classify(&square), ShapeType::Rectangle);
    }

    #[test]
    fn test_classify_skewed_quadrilateral() {
        let classifier = ShapeClassifier::new();
        // A kite with angles far from 90 degrees.
        let kite = points(&[(0.0, 0.0), (4.0, 1.0), (8.0, 0.0), (4.0, 10.0)]);
        assert_eq!(classifier.classify(&kite), ShapeType::Quadrilateral);
    }

    #[test]
    fn test_classify_many_vertex_ring_as_circle() {
        let classifier = ShapeClassifier::new();
        // A regular 12-gon has circularity π / (12 tan(15°)) ≈ 0.98.
        assert_eq!(classifier.classify(&regular_polygon(12, 5.0)), ShapeType::Circle);
    }

    #[test]
    fn test_classify_spiky_star_as_polygon() {
        let classifier = ShapeClassifier::new();
        // Alternating radii make a star whose area is far below a circle's.
        let star: Vec<Point> = (0..12)
            .map(|i| {
                let radius = if i % 2 == 0 { 5.0 } else { 1.0 };
                let theta = 2.0 * PI * i as f64 / 12.0;
                Point::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        assert_eq!(classifier.classify(&star), ShapeType::Polygon);
    }

    #[test]
    fn test_detection_confidence_from_dissimilarity() {
        let classifier = ShapeClassifier::new();
        assert!((classifier.detection_confidence(0.1, 500.0) - 0.9).abs() < 1e-9);
        assert_eq!(classifier.detection_confidence(1.5, 500.0), 0.0);
    }

    #[test]
    fn test_detection_confidence_small_region_discount() {
        let classifier = ShapeClassifier::new();
        let confidence = classifier.detection_confidence(0.1, 50.0);
        assert!((confidence - 0.72).abs() < 1e-9);
    }
}
