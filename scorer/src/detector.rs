//! # ShapeDetector Trait
//!
//! Seam between the scoring core and the image-processing collaborator.
//! The core never decodes images: a concrete detector turns an image path into
//! a list of [`DetectedShape`]s, and only the visual-mode entry point needs
//! one, so text-only scoring carries no image-processing dependency at all.
//! Callers resolve a concrete detector lazily at the call site that needs it.

use crate::error::ScorerError;
use crate::types::DetectedShape;

/// Strategy trait for shape detection.
///
/// Implementations may run a full computer-vision pipeline or simply load
/// shapes that an upstream stage already extracted. A failed detection (image
/// unreadable, missing sidecar data) is a [`ScorerError::DetectorFailure`];
/// an image in which no shapes were found is `Ok` with an empty list.
pub trait ShapeDetector: Send + Sync {
    /// Detects the shapes drawn in the image at `image_path`.
    fn detect(&self, image_path: &str) -> Result<Vec<DetectedShape>, ScorerError>;
}
