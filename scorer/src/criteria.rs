//! # Criterion Matching
//!
//! Decides, per marking criterion, whether a student's free-text answer fully,
//! partially, or not at all satisfies the criterion's required keyword set.
//!
//! Matching is a case-insensitive substring containment test of each keyword
//! against the whole answer. The answer is not tokenized: a keyword matches
//! when it appears literally anywhere in the lower-cased text.

use crate::feedback;
use crate::types::{Criterion, MatchResult};

/// Matches individual criteria against answer text.
///
/// The partial-credit threshold is the matcher's only state, fixed at
/// construction; all methods are pure functions of their inputs.
#[derive(Debug, Clone)]
pub struct CriterionMatcher {
    partial_credit_threshold: f64,
}

impl CriterionMatcher {
    /// Creates a matcher with the given minimum match percentage for partial credit.
    pub fn new(partial_credit_threshold: f64) -> Self {
        Self {
            partial_credit_threshold,
        }
    }

    /// Evaluates one criterion against the student answer.
    ///
    /// - `match_percentage` is matched required keywords over total required
    ///   keywords, or `0.0` for a keyword-less criterion.
    /// - A criterion is **fully matched** when `match_percentage >= 1 - tolerance`.
    /// - It is **partially matched** when not fully matched and the percentage
    ///   reaches the partial-credit threshold; the partial score is then
    ///   `match_percentage * marks`.
    pub fn match_criterion(&self, student_answer: &str, criterion: &Criterion) -> MatchResult {
        let answer_lower = student_answer.to_lowercase();

        let mut found: Vec<String> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        for keyword in &criterion.keywords {
            if answer_lower.contains(&keyword.to_lowercase()) {
                found.push(keyword.clone());
            } else {
                missing.push(keyword.clone());
            }
        }

        // Partial-credit keywords are diagnostic only; they never affect scoring.
        let partial_keyword_matches = criterion
            .partial_credit_keywords
            .as_deref()
            .map(|keywords| {
                keywords
                    .iter()
                    .filter(|k| answer_lower.contains(&k.to_lowercase()))
                    .count()
            })
            .unwrap_or(0);

        let total_keywords = criterion.keywords.len();
        let match_percentage = if total_keywords > 0 {
            found.len() as f64 / total_keywords as f64
        } else {
            0.0
        };

        let fully_matched = match_percentage >= 1.0 - criterion.tolerance;
        let partially_matched =
            !fully_matched && match_percentage >= self.partial_credit_threshold;

        let partial_score = if partially_matched {
            match_percentage * criterion.marks as f64
        } else {
            0.0
        };

        tracing::debug!(
            criterion = %criterion.description,
            matched = found.len(),
            total = total_keywords,
            partial_keyword_matches,
            fully_matched,
            partially_matched,
            "criterion evaluated"
        );

        let explanation = feedback::criterion_explanation(criterion, &found, &missing);

        MatchResult {
            fully_matched,
            partially_matched,
            match_percentage,
            partial_score,
            explanation,
        }
    }
}
