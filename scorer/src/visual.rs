//! # Visual Answer Marking
//!
//! Orchestrates the visual-answer path: take the shapes a detector found in a
//! student's drawing, grade the most confidently detected one against the
//! expected answer, and compose feedback. Detection failures degrade to a
//! zero-confidence report with an explanatory message rather than an error;
//! the surrounding workflow must always receive a usable report.

use crate::detector::ShapeDetector;
use crate::error::ScorerError;
use crate::feedback;
use crate::geometry::grader::GeometricGrader;
use crate::types::{DetectedShape, ExpectedShape, GeometricAccuracy, Point, ShapeType};
use serde::{Deserialize, Serialize};

/// Wire summary of one detected shape, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedShapeSummary {
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub vertices: Vec<Point>,
    pub confidence: f64,
}

impl From<&DetectedShape> for DetectedShapeSummary {
    fn from(shape: &DetectedShape) -> Self {
        Self {
            shape_type: shape.shape_type,
            vertices: shape.vertices.clone(),
            confidence: shape.confidence,
        }
    }
}

/// Result of marking one visual answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMarkReport {
    /// Overall geometric accuracy of the best-detected shape, in `[0, 1]`.
    pub confidence: f64,
    pub feedback: String,
    /// `None` when nothing could be measured (no shapes, detector failure).
    pub geometric_accuracy: Option<GeometricAccuracy>,
    pub detected_shapes: Vec<DetectedShapeSummary>,
}

impl VisualMarkReport {
    fn empty(feedback: impl Into<String>) -> Self {
        Self {
            confidence: 0.0,
            feedback: feedback.into(),
            geometric_accuracy: None,
            detected_shapes: Vec::new(),
        }
    }
}

/// Marks visual answers drawn on grid paper.
///
/// `grid_spacing` is the pixel width of one grid unit in the source image.
#[derive(Debug, Clone, Copy)]
pub struct VisualMarker {
    grader: GeometricGrader,
}

impl VisualMarker {
    /// Fails with [`ScorerError::InvalidInput`] when `grid_spacing` is not a
    /// positive number.
    pub fn new(grid_spacing: f64) -> Result<Self, ScorerError> {
        Ok(Self {
            grader: GeometricGrader::new(grid_spacing)?,
        })
    }

    /// Marks a visual answer from shapes a detector already extracted.
    ///
    /// An empty shape list is a detection failure, not an error: the report
    /// carries zero confidence and an explanatory message. Otherwise the
    /// shape with the highest detection confidence is graded.
    pub fn mark(&self, shapes: &[DetectedShape], expected: &ExpectedShape) -> VisualMarkReport {
        let Some(best) = shapes
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        else {
            return VisualMarkReport::empty("No shapes detected in the image");
        };

        let accuracy = self.grader.grade(best, expected);
        let feedback = feedback::visual_feedback(best, &accuracy, expected);

        tracing::debug!(
            shape = %best.shape_type,
            overall_accuracy = accuracy.overall_accuracy,
            "visual answer graded"
        );

        VisualMarkReport {
            confidence: accuracy.overall_accuracy,
            feedback,
            geometric_accuracy: Some(accuracy),
            detected_shapes: shapes.iter().map(DetectedShapeSummary::from).collect(),
        }
    }

    /// Marks a visual answer by running the given detector on an image first.
    ///
    /// A detector failure is treated as a transient collaborator fault and
    /// degrades to a zero-confidence report with the failure message; it is
    /// never propagated as an error.
    pub fn mark_from_image(
        &self,
        detector: &dyn ShapeDetector,
        image_path: &str,
        expected: &ExpectedShape,
    ) -> VisualMarkReport {
        match detector.detect(image_path) {
            Ok(shapes) => self.mark(&shapes, expected),
            Err(e) => {
                tracing::warn!(image_path, error = %e, "shape detection failed");
                VisualMarkReport::empty(format!("Error processing image: {e}"))
            }
        }
    }
}
