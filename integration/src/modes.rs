//! Mode dispatch and response envelopes.
//!
//! Each mode takes a raw JSON payload and always produces a complete
//! envelope: `success: true` with the mode's result fields, or
//! `success: false` with an `error` string and a safe default payload.
//! A raw fault never crosses this boundary.

use crate::config;
use crate::detector::SidecarShapeDetector;
use scorer::{
    ConfidenceAggregator, ConfidenceBreakdown, Criterion, DetectedShape, ExpectedShape,
    GeometricAccuracy, MarkingOutcome, PartialCreditDetail, ScorerError, VisualMarkReport,
    VisualMarker, visual::DetectedShapeSummary,
};
use serde::{Deserialize, Serialize};

fn parse<'a, T: Deserialize<'a>>(raw: &'a str) -> Result<T, ScorerError> {
    serde_json::from_str(raw).map_err(|e| ScorerError::InvalidJson(e.to_string()))
}

// ---------------------------------------------------------------------------
// Criteria confidence mode
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfidenceInput {
    #[serde(default)]
    student_answer: String,
    #[serde(default)]
    mark_scheme: Vec<Criterion>,
    #[serde(default)]
    llm_feedback: String,
}

/// Response envelope for criteria-confidence mode.
#[derive(Debug, Serialize)]
pub struct ConfidenceEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub confidence_score: f64,
    pub criteria_matched: usize,
    pub total_criteria: usize,
    pub partial_credit_details: Vec<PartialCreditDetail>,
    pub reasoning: String,
}

impl ConfidenceEnvelope {
    fn from_breakdown(breakdown: ConfidenceBreakdown) -> Self {
        Self {
            success: true,
            error: None,
            confidence_score: breakdown.confidence_score,
            criteria_matched: breakdown.criteria_matched,
            total_criteria: breakdown.total_criteria,
            partial_credit_details: breakdown.partial_credit_details,
            reasoning: breakdown.reasoning,
        }
    }

    /// Failure payload: mid-range confidence so a downstream consumer neither
    /// trusts nor outright discards the mark, plus the error for triage.
    pub fn failure(error: &ScorerError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            confidence_score: 0.5,
            criteria_matched: 0,
            total_criteria: 1,
            partial_credit_details: Vec::new(),
            reasoning: format!("Error occurred: {error}"),
        }
    }
}

/// Runs criteria-confidence scoring over a raw JSON payload.
pub fn run_confidence(raw: &str) -> ConfidenceEnvelope {
    let result = parse::<ConfidenceInput>(raw).and_then(|input| {
        ConfidenceAggregator::new().score_from_criteria(
            &input.student_answer,
            &input.mark_scheme,
            &input.llm_feedback,
        )
    });
    match result {
        Ok(breakdown) => ConfidenceEnvelope::from_breakdown(breakdown),
        Err(e) => {
            tracing::warn!(error = %e, "confidence mode failed");
            ConfidenceEnvelope::failure(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Visual marking mode
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VisualInput {
    #[serde(default)]
    image_path: String,
    expected_answer: Option<ExpectedShape>,
    #[serde(default = "config::default_grid_spacing")]
    grid_spacing: f64,
    /// Shapes already extracted upstream; when present, no detector runs.
    #[serde(default)]
    detected_shapes: Option<Vec<DetectedShape>>,
}

/// Response envelope for visual-marking mode.
#[derive(Debug, Serialize)]
pub struct VisualEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub confidence: f64,
    pub feedback: String,
    pub geometric_accuracy: Option<GeometricAccuracy>,
    pub detected_shapes: Vec<DetectedShapeSummary>,
}

impl VisualEnvelope {
    fn from_report(report: VisualMarkReport) -> Self {
        Self {
            success: true,
            error: None,
            confidence: report.confidence,
            feedback: report.feedback,
            geometric_accuracy: report.geometric_accuracy,
            detected_shapes: report.detected_shapes,
        }
    }

    pub fn failure(error: &ScorerError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            confidence: 0.0,
            feedback: format!("Error occurred: {error}"),
            geometric_accuracy: None,
            detected_shapes: Vec::new(),
        }
    }
}

/// Runs visual marking over a raw JSON payload.
///
/// The concrete detector is resolved lazily, only on the path that actually
/// needs to look at an image; payloads carrying `detected_shapes` inline
/// never touch it.
pub fn run_visual(raw: &str) -> VisualEnvelope {
    let result = parse::<VisualInput>(raw).and_then(|input| {
        let expected = input
            .expected_answer
            .ok_or_else(|| ScorerError::MissingField("expected_answer".to_string()))?;
        let marker = VisualMarker::new(input.grid_spacing)?;
        let report = match input.detected_shapes {
            Some(shapes) => marker.mark(&shapes, &expected),
            None => {
                let detector = SidecarShapeDetector::new();
                marker.mark_from_image(&detector, &input.image_path, &expected)
            }
        };
        Ok(report)
    });
    match result {
        Ok(report) => VisualEnvelope::from_report(report),
        Err(e) => {
            tracing::warn!(error = %e, "visual mode failed");
            VisualEnvelope::failure(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Agreement mode
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AgreementInput {
    #[serde(default)]
    marking_results: Vec<MarkingOutcome>,
}

/// Response envelope for agreement-confidence mode.
#[derive(Debug, Serialize)]
pub struct AgreementEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub confidence_score: f64,
}

impl AgreementEnvelope {
    pub fn failure(error: &ScorerError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            confidence_score: 0.0,
        }
    }
}

/// Runs agreement-confidence scoring over a raw JSON payload.
pub fn run_agreement(raw: &str) -> AgreementEnvelope {
    match parse::<AgreementInput>(raw) {
        Ok(input) => AgreementEnvelope {
            success: true,
            error: None,
            confidence_score: ConfidenceAggregator::new()
                .score_from_agreement(&input.marking_results),
        },
        Err(e) => {
            tracing::warn!(error = %e, "agreement mode failed");
            AgreementEnvelope::failure(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_mode_success_envelope() {
        let input = r#"{
            "student_answer": "I used the quadratic formula to solve the equation",
            "mark_scheme": [{
                "description": "Correct method",
                "marks": 2,
                "keywords": ["quadratic", "formula", "solve", "equation"]
            }],
            "llm_feedback": "correct method"
        }"#;
        let envelope = run_confidence(input);
        assert!(envelope.success);
        assert!(envelope.error.is_none());
        assert_eq!(envelope.confidence_score, 1.0);
        assert_eq!(envelope.criteria_matched, 1);
        assert_eq!(envelope.total_criteria, 1);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_confidence_mode_empty_scheme_yields_default_payload() {
        let envelope = run_confidence(r#"{"student_answer": "something"}"#);
        assert!(!envelope.success);
        assert_eq!(envelope.confidence_score, 0.5);
        assert_eq!(envelope.total_criteria, 1);
        assert!(envelope.reasoning.starts_with("Error occurred:"));
    }

    #[test]
    fn test_confidence_mode_malformed_json() {
        let envelope = run_confidence("{not json");
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("invalid JSON"));
    }

    #[test]
    fn test_visual_mode_with_inline_shapes() {
        let input = r#"{
            "expected_answer": {
                "shape_type": "triangle",
                "vertices": [[2, 2], [4, 6], [7, 3]],
                "tolerance": {"scale": 0.1, "rotation": 5.0, "position": 1.0}
            },
            "grid_spacing": 1.0,
            "detected_shapes": [{
                "shape_type": "triangle",
                "vertices": [[2.1, 2.0], [4.0, 6.1], [7.0, 3.0]],
                "confidence": 0.9
            }]
        }"#;
        let envelope = run_visual(input);
        assert!(envelope.success);
        let accuracy = envelope.geometric_accuracy.unwrap();
        assert!(accuracy.overall_accuracy > 0.8);
        assert_eq!(envelope.confidence, accuracy.overall_accuracy);
        assert_eq!(envelope.detected_shapes.len(), 1);
    }

    #[test]
    fn test_visual_mode_missing_expected_answer() {
        let envelope = run_visual(r#"{"image_path": "answer.png", "detected_shapes": []}"#);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("expected_answer"));
        assert_eq!(envelope.confidence, 0.0);
    }

    #[test]
    fn test_visual_mode_unreadable_image_degrades() {
        // No sidecar shapes exist for this path; the detector failure must
        // degrade to a zero-confidence report, not an envelope failure.
        let input = r#"{
            "image_path": "/nonexistent/answer.png",
            "expected_answer": {"shape_type": "triangle", "vertices": [[2, 2], [4, 6], [7, 3]]}
        }"#;
        let envelope = run_visual(input);
        assert!(envelope.success);
        assert_eq!(envelope.confidence, 0.0);
        assert!(envelope.feedback.starts_with("Error processing image:"));
        assert!(envelope.geometric_accuracy.is_none());
    }

    #[test]
    fn test_visual_mode_rejects_non_positive_grid_spacing() {
        let input = r#"{
            "expected_answer": {"shape_type": "triangle", "vertices": [[2, 2], [4, 6], [7, 3]]},
            "grid_spacing": 0.0,
            "detected_shapes": [{
                "shape_type": "triangle",
                "vertices": [[2, 2], [4, 6], [7, 3]],
                "confidence": 0.9
            }]
        }"#;
        let envelope = run_visual(input);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("grid_spacing"));
        assert_eq!(envelope.confidence, 0.0);
        assert!(envelope.geometric_accuracy.is_none());
    }

    #[test]
    fn test_visual_mode_empty_inline_shapes() {
        let input = r#"{
            "expected_answer": {"shape_type": "triangle", "vertices": [[2, 2], [4, 6], [7, 3]]},
            "detected_shapes": []
        }"#;
        let envelope = run_visual(input);
        assert!(envelope.success);
        assert_eq!(envelope.feedback, "No shapes detected in the image");
    }

    #[test]
    fn test_agreement_mode_success_envelope() {
        let input = r#"{"marking_results": [
            {"marks_awarded": 3, "total_marks": 4},
            {"marks_awarded": 3, "total_marks": 4},
            {"marks_awarded": 3, "total_marks": 4}
        ]}"#;
        let envelope = run_agreement(input);
        assert!(envelope.success);
        assert_eq!(envelope.confidence_score, 1.0);
    }

    #[test]
    fn test_agreement_mode_defaults_missing_fields() {
        // A result with no marks_awarded counts as 0 of its total.
        let envelope = run_agreement(r#"{"marking_results": [{"total_marks": 4}]}"#);
        assert!(envelope.success);
        assert_eq!(envelope.confidence_score, 1.0);
    }

    #[test]
    fn test_agreement_mode_empty_results() {
        let envelope = run_agreement(r#"{}"#);
        assert!(envelope.success);
        assert_eq!(envelope.confidence_score, 0.0);
    }

    #[test]
    fn test_agreement_mode_malformed_json() {
        let envelope = run_agreement("[");
        assert!(!envelope.success);
        assert_eq!(envelope.confidence_score, 0.0);
    }
}
