//! # Feedback Composition
//!
//! Deterministic, template-based assembly of the human-readable strings that
//! accompany numeric scores: per-criterion keyword explanations, banded
//! confidence reasoning, and geometric feedback for visual answers.
//!
//! Nothing here is generative. Every sentence is triggered by a numeric
//! threshold and interpolates measured values, so the same inputs always
//! produce the same text.

use crate::settings::ReasoningBands;
use crate::types::{Criterion, DetectedShape, ExpectedShape, GeometricAccuracy};

/// Explains which of a criterion's required keywords were found in the
/// student answer and which are missing.
pub fn criterion_explanation(criterion: &Criterion, found: &[String], missing: &[String]) -> String {
    let total = criterion.keywords.len();
    if found.len() == total {
        format!(
            "All required keywords found: {}",
            criterion.keywords.join(", ")
        )
    } else if !found.is_empty() {
        format!(
            "Found {}/{} keywords. Found: {}. Missing: {}",
            found.len(),
            total,
            found.join(", "),
            missing.join(", ")
        )
    } else {
        format!(
            "No required keywords found. Expected: {}",
            criterion.keywords.join(", ")
        )
    }
}

/// Produces the qualitative reasoning line for a criteria-based confidence
/// score, using the four bands defined by `bands` (inclusive lower bounds).
pub fn confidence_reasoning(
    criteria_matched: usize,
    total_criteria: usize,
    partial_matches: usize,
    confidence_score: f64,
    bands: &ReasoningBands,
) -> String {
    if confidence_score >= bands.high {
        format!(
            "High confidence: {criteria_matched}/{total_criteria} criteria fully met. \
             Strong evidence supports this marking decision."
        )
    } else if confidence_score >= bands.good {
        format!(
            "Good confidence: {criteria_matched}/{total_criteria} criteria fully met \
             with {partial_matches} partial matches. Marking decision is well-supported."
        )
    } else if confidence_score >= bands.moderate {
        format!(
            "Moderate confidence: {criteria_matched}/{total_criteria} criteria met. \
             Some uncertainty exists; consider human review."
        )
    } else {
        format!(
            "Low confidence: Only {criteria_matched}/{total_criteria} criteria met. \
             High uncertainty; human review recommended."
        )
    }
}

/// Composes feedback for a graded visual answer.
///
/// Thresholds come from the expected shape's own tolerances, so feedback and
/// grading agree on what counts as a deviation for each question. An answer
/// with no triggered sentence gets the single "correct" sentence.
pub fn visual_feedback(
    detected: &DetectedShape,
    accuracy: &GeometricAccuracy,
    expected: &ExpectedShape,
) -> String {
    let tolerance = &expected.tolerance;
    let mut parts: Vec<String> = Vec::new();

    if detected.shape_type != expected.shape_type {
        parts.push(format!(
            "Expected a {}, but detected a {}",
            expected.shape_type, detected.shape_type
        ));
    }

    if (accuracy.scale_factor - 1.0).abs() > tolerance.scale {
        if accuracy.scale_factor > 1.0 {
            parts.push("The shape is drawn too large".to_string());
        } else {
            parts.push("The shape is drawn too small".to_string());
        }
    }

    if accuracy.rotation_angle.abs() > tolerance.rotation {
        parts.push(format!(
            "The shape is rotated by {:.1}\u{b0} from the expected orientation",
            accuracy.rotation_angle
        ));
    }

    if accuracy.position_error > tolerance.position {
        parts.push("The shape is not positioned correctly on the grid".to_string());
    }

    if parts.is_empty() {
        return "Excellent! The shape is drawn correctly with proper scale, rotation, and position."
            .to_string();
    }

    format!("{}.", parts.join(". "))
}
