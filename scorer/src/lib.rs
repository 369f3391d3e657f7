//! # Scorer Library
//!
//! This crate provides the scoring core of the automated exam-marking pipeline:
//! it turns a student's free-text or visual answer plus a set of marking
//! criteria into an objective, reproducible confidence estimate, replacing a
//! language model's self-reported confidence with measurable signals.
//!
//! ## Key Concepts
//! - **CriterionMatcher**: keyword-based full/partial matching of individual marking criteria.
//! - **ConfidenceAggregator**: criteria, similarity, agreement, and geometric confidence
//!   signals, plus a weighted combiner producing one scalar.
//! - **ShapeClassifier / GeometricGrader**: classification of detected polygons and
//!   measurement of scale, rotation, and position deviations against an expected shape.
//! - **VisualMarker**: the visual-answer orchestration over a pluggable [`ShapeDetector`].
//! - **Feedback**: deterministic, template-based explanations of every numeric result.
//!
//! Every operation is a synchronous, pure function of its inputs; scoring calls are
//! independent and may run concurrently across questions and candidates without
//! synchronization.

pub mod confidence;
pub mod criteria;
pub mod detector;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod settings;
pub mod types;
pub mod visual;

pub use confidence::ConfidenceAggregator;
pub use criteria::CriterionMatcher;
pub use detector::ShapeDetector;
pub use error::ScorerError;
pub use geometry::classifier::ShapeClassifier;
pub use geometry::grader::GeometricGrader;
pub use settings::ScorerSettings;
pub use types::{
    BoundingBox, ConfidenceBreakdown, Criterion, DetectedShape, ExpectedShape, GeometricAccuracy,
    MarkingOutcome, MatchResult, PartialCreditDetail, Point, ShapeTolerance, ShapeType,
};
pub use visual::{DetectedShapeSummary, VisualMarkReport, VisualMarker};
