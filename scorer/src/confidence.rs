//! # Confidence Aggregation
//!
//! Turns heterogeneous signals into confidence scalars in `[0, 1]`:
//! criteria matching, semantic similarity, multi-run agreement, and geometric
//! accuracy, plus a generic weighted combiner. These replace a language
//! model's self-reported confidence with measurable evidence.
//!
//! All methods are synchronous, side-effect-free functions of their inputs;
//! the only state is the immutable [`ScorerSettings`] fixed at construction,
//! so one aggregator can be shared across questions and candidates freely.

use crate::criteria::CriterionMatcher;
use crate::error::ScorerError;
use crate::feedback;
use crate::settings::ScorerSettings;
use crate::types::{
    ConfidenceBreakdown, Criterion, GeometricAccuracy, MarkingOutcome, PartialCreditDetail,
};

/// Computes and combines confidence signals.
#[derive(Debug, Clone)]
pub struct ConfidenceAggregator {
    settings: ScorerSettings,
    matcher: CriterionMatcher,
}

impl Default for ConfidenceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceAggregator {
    /// Creates an aggregator with default settings.
    pub fn new() -> Self {
        Self::with_settings(ScorerSettings::default())
    }

    /// Creates an aggregator with explicit settings.
    pub fn with_settings(settings: ScorerSettings) -> Self {
        let matcher = CriterionMatcher::new(settings.partial_credit_threshold);
        Self { settings, matcher }
    }

    /// Criteria-based confidence: runs the matcher over every criterion of the
    /// mark scheme and normalizes full matches plus partial credit into `[0, 1]`.
    ///
    /// `llm_feedback` is carried through for parity with the marking pipeline's
    /// call contract; the criteria signal is computed from the answer alone.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ScorerError::InvalidInput`] when the mark scheme is
    /// empty or a criterion violates its construction invariants. An empty
    /// scheme must not silently become a misleading mid-range confidence.
    pub fn score_from_criteria(
        &self,
        student_answer: &str,
        mark_scheme: &[Criterion],
        llm_feedback: &str,
    ) -> Result<ConfidenceBreakdown, ScorerError> {
        let _ = llm_feedback;

        if mark_scheme.is_empty() {
            return Err(ScorerError::InvalidInput(
                "mark scheme must contain at least one criterion".to_string(),
            ));
        }
        for criterion in mark_scheme {
            criterion.validate()?;
        }

        let mut criteria_matched = 0usize;
        let mut partial_credit_details: Vec<PartialCreditDetail> = Vec::new();

        for criterion in mark_scheme {
            let result = self.matcher.match_criterion(student_answer, criterion);
            if result.fully_matched {
                criteria_matched += 1;
            } else if result.partially_matched {
                partial_credit_details.push(PartialCreditDetail {
                    criterion: criterion.description.clone(),
                    matched: true,
                    partial_score: result.partial_score,
                    explanation: result.explanation,
                });
            }
        }

        let total_criteria = mark_scheme.len();
        let partial_credit_score: f64 = partial_credit_details
            .iter()
            .map(|detail| detail.partial_score)
            .sum();
        let total_score = criteria_matched as f64 + partial_credit_score;
        let confidence_score = (total_score / total_criteria as f64).min(1.0);

        let reasoning = feedback::confidence_reasoning(
            criteria_matched,
            total_criteria,
            partial_credit_details.len(),
            confidence_score,
            &self.settings.bands,
        );

        tracing::debug!(
            criteria_matched,
            total_criteria,
            confidence_score,
            "criteria confidence computed"
        );

        Ok(ConfidenceBreakdown {
            criteria_matched,
            total_criteria,
            confidence_score,
            partial_credit_details,
            reasoning,
        })
    }

    /// Similarity-based confidence: blends a pre-normalized embedding
    /// similarity with word-count and word-overlap factors.
    ///
    /// `length_factor = min(S/E, E/S) * w_length` over word counts; zero when
    /// the expected answer has no words. `keyword_factor` is the fraction of
    /// expected words present in the student answer, weighted by `w_keyword`.
    pub fn score_from_similarity(
        &self,
        student_answer: &str,
        expected_answer: &str,
        embedding_similarity: f64,
    ) -> f64 {
        let weights = &self.settings.similarity;

        let student_words: Vec<&str> = student_answer.split_whitespace().collect();
        let expected_words: Vec<&str> = expected_answer.split_whitespace().collect();

        let length_factor = if expected_words.is_empty() {
            0.0
        } else {
            let student_len = student_words.len() as f64;
            let expected_len = expected_words.len() as f64;
            let ratio = if student_len > 0.0 {
                (student_len / expected_len).min(expected_len / student_len)
            } else {
                0.0
            };
            ratio * weights.length
        };

        let keyword_factor = if expected_words.is_empty() {
            0.0
        } else {
            let expected_set: std::collections::HashSet<String> =
                expected_words.iter().map(|w| w.to_lowercase()).collect();
            let student_set: std::collections::HashSet<String> =
                student_words.iter().map(|w| w.to_lowercase()).collect();
            let overlap = expected_set.intersection(&student_set).count() as f64;
            overlap / expected_set.len() as f64 * weights.keyword
        };

        let confidence = embedding_similarity * weights.embedding + length_factor + keyword_factor;
        confidence.clamp(0.0, 1.0)
    }

    /// Agreement confidence: one minus a scaled population standard deviation
    /// of the per-run marking percentages.
    ///
    /// Outcomes with non-positive `total_marks` are skipped; an empty or
    /// fully-invalid list fails softly with `0.0`.
    pub fn score_from_agreement(&self, marking_results: &[MarkingOutcome]) -> f64 {
        let percentages: Vec<f64> = marking_results
            .iter()
            .filter(|outcome| outcome.total_marks > 0.0)
            .map(|outcome| outcome.marks_awarded / outcome.total_marks)
            .collect();

        if percentages.is_empty() {
            return 0.0;
        }

        let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
        let variance = percentages
            .iter()
            .map(|p| (p - mean).powi(2))
            .sum::<f64>()
            / percentages.len() as f64;
        let std_dev = variance.sqrt();

        (1.0 - std_dev * self.settings.agreement_spread_factor).clamp(0.0, 1.0)
    }

    /// Geometric confidence: converts the measurements of a graded shape into
    /// a confidence scalar using the scorer-wide tolerances and weights.
    ///
    /// Returns `0.0` when no measurements are available. An infinite position
    /// error drives the position sub-score to zero rather than poisoning the sum.
    pub fn score_from_geometry(&self, measurements: Option<&GeometricAccuracy>) -> f64 {
        let Some(accuracy) = measurements else {
            return 0.0;
        };
        let geometric = &self.settings.geometric;

        let scale_confidence =
            (1.0 - (accuracy.scale_factor - 1.0).abs() / geometric.scale_tolerance).max(0.0);
        let rotation_confidence =
            (1.0 - accuracy.rotation_angle.abs() / geometric.rotation_tolerance).max(0.0);
        let position_confidence =
            (1.0 - accuracy.position_error / geometric.position_tolerance).max(0.0);

        let confidence = scale_confidence * geometric.scale_weight
            + rotation_confidence * geometric.rotation_weight
            + position_confidence * geometric.position_weight;

        confidence.clamp(0.0, 1.0)
    }

    /// Combines multiple confidence scores into one weighted average.
    ///
    /// Omitted weights mean equal weighting. Provided weights are re-normalized
    /// to sum to 1; a zero-sum weight vector falls back to equal weighting.
    /// Returns `0.0` for an empty score list.
    pub fn combine(&self, scores: &[f64], weights: Option<&[f64]>) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }

        let equal = vec![1.0 / scores.len() as f64; scores.len()];
        let raw_weights = weights.unwrap_or(&equal);

        let total_weight: f64 = raw_weights.iter().sum();
        let normalized: Vec<f64> = if total_weight > 0.0 {
            raw_weights.iter().map(|w| w / total_weight).collect()
        } else {
            vec![1.0 / raw_weights.len() as f64; raw_weights.len()]
        };

        let combined: f64 = scores
            .iter()
            .zip(normalized.iter())
            .map(|(score, weight)| score * weight)
            .sum();

        combined.clamp(0.0, 1.0)
    }
}
