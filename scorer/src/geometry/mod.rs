//! # Geometry Module
//!
//! Pure polygon geometry for the visual-answer path: shape classification and
//! geometric grading, plus the small vertex-list primitives both of them share.
//! Everything operates on vertex lists already extracted by the detection
//! collaborator; no image data is touched here.

pub mod classifier;
pub mod grader;

use crate::types::Point;

/// Polygon area via the shoelace formula, over the closed ring of vertices.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Perimeter of the closed ring of vertices.
pub fn perimeter(vertices: &[Point]) -> f64 {
    if vertices.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        total += a.distance_to(&b);
    }
    total
}

/// Angle in degrees between two vectors, via `atan2` of the cross and dot
/// products. Exact for parallel vectors, where the arc-cosine form drifts a
/// few ulps. Returns `None` when either vector is zero-length.
pub(crate) fn angle_between_degrees(a: (f64, f64), b: (f64, f64)) -> Option<f64> {
    if (a.0 == 0.0 && a.1 == 0.0) || (b.0 == 0.0 && b.1 == 0.0) {
        return None;
    }
    let cross = a.0 * b.1 - a.1 * b.0;
    let dot = a.0 * b.0 + a.1 * b.1;
    Some(cross.atan2(dot).abs().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_polygon_area_square() {
        assert_eq!(polygon_area(&unit_square()), 1.0);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_perimeter_square() {
        assert_eq!(perimeter(&unit_square()), 4.0);
    }

    #[test]
    fn test_angle_between_right_angle() {
        let angle = angle_between_degrees((1.0, 0.0), (0.0, 1.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_zero_vector() {
        assert!(angle_between_degrees((0.0, 0.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_angle_between_parallel_vectors_is_exactly_zero() {
        // The spread between these components is enough that the normalized
        // dot product is not exactly 1.0 in floating point; the angle must
        // still come out as exactly zero.
        let v = (0.1 + 0.2, 17.3);
        assert_eq!(angle_between_degrees(v, v).unwrap(), 0.0);
    }

    #[test]
    fn test_angle_between_opposite_vectors() {
        let angle = angle_between_degrees((2.0, 3.0), (-2.0, -3.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }
}
