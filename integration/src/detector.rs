//! Sidecar-file shape detector.
//!
//! The image-preprocessing stage of the pipeline (edge detection, contour
//! extraction, deskewing) runs outside this repository and writes the polygon
//! approximations it finds to a JSON sidecar next to the image,
//! `<image>.shapes.json`. This detector loads that file, classifies each
//! polygon, and derives a detection confidence, yielding fully-formed
//! [`DetectedShape`]s for the scoring core.

use scorer::geometry::polygon_area;
use scorer::{BoundingBox, DetectedShape, Point, ScorerError, ShapeClassifier, ShapeDetector};
use serde::Deserialize;
use std::fs;

/// One raw polygon from the preprocessing stage.
#[derive(Debug, Deserialize)]
struct SidecarShape {
    /// Polygon approximation of the detected contour, in pixel space.
    vertices: Vec<Point>,
    /// Dissimilarity between the raw boundary and its polygon approximation,
    /// as measured by the preprocessing stage. Lower is better.
    #[serde(default)]
    dissimilarity: f64,
    /// Pre-computed detection confidence, when the preprocessing stage
    /// supplies one directly.
    #[serde(default)]
    confidence: Option<f64>,
}

/// Reads pre-extracted shapes from `<image_path>.shapes.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarShapeDetector {
    classifier: ShapeClassifier,
}

impl SidecarShapeDetector {
    pub fn new() -> Self {
        Self {
            classifier: ShapeClassifier::new(),
        }
    }
}

impl ShapeDetector for SidecarShapeDetector {
    fn detect(&self, image_path: &str) -> Result<Vec<DetectedShape>, ScorerError> {
        let sidecar_path = format!("{image_path}.shapes.json");
        let raw = fs::read_to_string(&sidecar_path).map_err(|e| {
            ScorerError::DetectorFailure(format!(
                "could not read extracted shapes for '{image_path}': {e}"
            ))
        })?;
        let entries: Vec<SidecarShape> = serde_json::from_str(&raw).map_err(|e| {
            ScorerError::InvalidJson(format!("malformed shapes file '{sidecar_path}': {e}"))
        })?;

        let shapes: Vec<DetectedShape> = entries
            .into_iter()
            .filter(|entry| entry.vertices.len() >= 3)
            .map(|entry| {
                let shape_type = self.classifier.classify(&entry.vertices);
                let area = polygon_area(&entry.vertices);
                let confidence = entry.confidence.unwrap_or_else(|| {
                    self.classifier.detection_confidence(entry.dissimilarity, area)
                });
                let bounding_box = BoundingBox::enclosing(&entry.vertices);
                DetectedShape {
                    shape_type,
                    vertices: entry.vertices,
                    confidence,
                    bounding_box,
                }
            })
            .collect();

        tracing::debug!(image_path, count = shapes.len(), "shapes loaded from sidecar");
        Ok(shapes)
    }
}
