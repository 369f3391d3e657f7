//! Scoring settings.
//!
//! Every threshold and weight the scoring core uses lives here as explicit,
//! serializable configuration with documented defaults, so the knobs are
//! independently testable and tunable instead of being buried as literals.
//! Components receive a [`ScorerSettings`] at construction and never mutate it.

use serde::{Deserialize, Serialize};

fn default_partial_credit_threshold() -> f64 {
    0.6
}

fn default_similarity_weights() -> SimilarityWeights {
    SimilarityWeights::default()
}

fn default_agreement_spread_factor() -> f64 {
    2.0
}

fn default_geometric_confidence() -> GeometricConfidenceSettings {
    GeometricConfidenceSettings::default()
}

fn default_reasoning_bands() -> ReasoningBands {
    ReasoningBands::default()
}

/// Weights for the three similarity-confidence factors.
///
/// Deliberately not sum-normalized against each other: the embedding similarity
/// is assumed pre-normalized to `[0, 1]` and the final result is clamped.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SimilarityWeights {
    pub embedding: f64,
    pub length: f64,
    pub keyword: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            embedding: 0.5,
            length: 0.2,
            keyword: 0.3,
        }
    }
}

/// Per-factor tolerances and weights for converting geometric measurements
/// into a confidence signal. These are scorer-wide and intentionally looser
/// than the per-question grading tolerances carried on an expected shape.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct GeometricConfidenceSettings {
    pub scale_tolerance: f64,
    /// Degrees.
    pub rotation_tolerance: f64,
    /// Grid units.
    pub position_tolerance: f64,
    pub scale_weight: f64,
    pub rotation_weight: f64,
    pub position_weight: f64,
}

impl Default for GeometricConfidenceSettings {
    fn default() -> Self {
        Self {
            scale_tolerance: 0.2,
            rotation_tolerance: 10.0,
            position_tolerance: 2.0,
            scale_weight: 0.3,
            rotation_weight: 0.3,
            position_weight: 0.4,
        }
    }
}

/// Inclusive lower bounds of the qualitative confidence bands used when
/// composing reasoning text.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ReasoningBands {
    pub high: f64,
    pub good: f64,
    pub moderate: f64,
}

impl Default for ReasoningBands {
    fn default() -> Self {
        Self {
            high: 0.9,
            good: 0.7,
            moderate: 0.5,
        }
    }
}

/// Process-wide scorer configuration, fixed at construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScorerSettings {
    /// Minimum match percentage for a criterion to earn partial credit.
    #[serde(default = "default_partial_credit_threshold")]
    pub partial_credit_threshold: f64,

    #[serde(default = "default_similarity_weights")]
    pub similarity: SimilarityWeights,

    /// Multiplier applied to the standard deviation of marking percentages;
    /// with the default of 2.0, a spread of 0.5 collapses agreement confidence to 0.
    #[serde(default = "default_agreement_spread_factor")]
    pub agreement_spread_factor: f64,

    #[serde(default = "default_geometric_confidence")]
    pub geometric: GeometricConfidenceSettings,

    #[serde(default = "default_reasoning_bands")]
    pub bands: ReasoningBands,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            partial_credit_threshold: default_partial_credit_threshold(),
            similarity: SimilarityWeights::default(),
            agreement_spread_factor: default_agreement_spread_factor(),
            geometric: GeometricConfidenceSettings::default(),
            bands: ReasoningBands::default(),
        }
    }
}
