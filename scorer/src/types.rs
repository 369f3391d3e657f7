//! # Types Module
//!
//! This module defines the core data structures used throughout the scoring core.
//! All of them are plain value objects with structural equality; the only behavior
//! they carry is construction-time validation.
//!
//! Two invariants hold for every value handed back to a caller:
//! - confidence and accuracy scores are clamped to `[0.0, 1.0]`;
//! - `GeometricAccuracy::position_error` may be `+∞`, which means the shapes were
//!   not comparable at all. Callers must treat it as "no measurement", never as zero.

use crate::error::ScorerError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_marks() -> u32 {
    1
}

fn default_tolerance() -> f64 {
    0.1
}

fn default_total_marks() -> f64 {
    1.0
}

/// A single marking criterion: one gradable requirement with keyword-based
/// matching rules and a point value.
///
/// Immutable once constructed; built once per mark scheme and read-only during scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(default)]
    pub description: String,

    /// Point value of this criterion. Must be positive.
    #[serde(default = "default_marks")]
    pub marks: u32,

    /// Required terms; a criterion is satisfied when (almost) all of them appear
    /// literally in the lower-cased student answer.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Reduced term set tracked for diagnostics only; it does not influence scoring.
    #[serde(default)]
    pub partial_credit_keywords: Option<Vec<String>>,

    /// Slack allowed before a match is considered full, as a fraction in `[0, 1]`.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Criterion {
    /// Builds a validated criterion.
    pub fn new(
        description: impl Into<String>,
        marks: u32,
        keywords: Vec<String>,
        partial_credit_keywords: Option<Vec<String>>,
        tolerance: f64,
    ) -> Result<Self, ScorerError> {
        let criterion = Self {
            description: description.into(),
            marks,
            keywords,
            partial_credit_keywords,
            tolerance,
        };
        criterion.validate()?;
        Ok(criterion)
    }

    /// Checks the construction invariants (`marks > 0`, `tolerance ∈ [0, 1]`).
    ///
    /// Deserialized criteria bypass [`Criterion::new`], so the aggregator re-checks
    /// every criterion before scoring.
    pub fn validate(&self) -> Result<(), ScorerError> {
        if self.marks == 0 {
            return Err(ScorerError::InvalidInput(format!(
                "criterion '{}' must be worth at least one mark",
                self.description
            )));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(ScorerError::InvalidInput(format!(
                "criterion '{}' has tolerance {} outside [0, 1]",
                self.description, self.tolerance
            )));
        }
        Ok(())
    }
}

/// Outcome of matching one criterion against one answer.
///
/// Transient: produced and consumed within a single scoring call, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub fully_matched: bool,
    pub partially_matched: bool,
    /// Matched required keywords over total required keywords; `0.0` for a
    /// keyword-less criterion.
    pub match_percentage: f64,
    /// Fraction of the criterion's marks earned through partial credit.
    pub partial_score: f64,
    pub explanation: String,
}

/// One partial-credit entry in a [`ConfidenceBreakdown`], in mark-scheme order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialCreditDetail {
    /// Description of the partially satisfied criterion.
    pub criterion: String,
    pub matched: bool,
    pub partial_score: f64,
    pub explanation: String,
}

/// Detailed breakdown of a criteria-based confidence calculation.
///
/// One instance per `(student_answer, mark_scheme, llm_feedback)` triple; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Count of fully matched criteria. Unweighted: each criterion counts as one
    /// regardless of its mark value.
    pub criteria_matched: usize,
    pub total_criteria: usize,
    /// Clamped to `[0.0, 1.0]`.
    pub confidence_score: f64,
    pub partial_credit_details: Vec<PartialCreditDetail>,
    pub reasoning: String,
}

/// One independent marking attempt, used for agreement confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkingOutcome {
    #[serde(default)]
    pub marks_awarded: f64,
    #[serde(default = "default_total_marks")]
    pub total_marks: f64,
}

/// A 2D point, serialized as a two-element array (`[x, y]`) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Axis-aligned bounding box of a detected region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Smallest box enclosing all the given points. Zero-sized when the list is empty.
    pub fn enclosing(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}

/// Fixed category set for classified shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Triangle,
    Rectangle,
    Quadrilateral,
    Pentagon,
    Hexagon,
    Circle,
    Polygon,
    Unknown,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Triangle => "triangle",
            ShapeType::Rectangle => "rectangle",
            ShapeType::Quadrilateral => "quadrilateral",
            ShapeType::Pentagon => "pentagon",
            ShapeType::Hexagon => "hexagon",
            ShapeType::Circle => "circle",
            ShapeType::Polygon => "polygon",
            ShapeType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A geometric shape extracted from a student's drawing by the detection
/// collaborator. Vertices are in pixel space; consumed read-only by the grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedShape {
    pub shape_type: ShapeType,
    pub vertices: Vec<Point>,
    /// Detection quality in `[0, 1]`; independent of grading correctness.
    pub confidence: f64,
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

/// Per-question slack for geometric grading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTolerance {
    /// Allowed deviation of the scale factor from 1.0.
    #[serde(default = "ShapeTolerance::default_scale")]
    pub scale: f64,
    /// Allowed rotation, in degrees.
    #[serde(default = "ShapeTolerance::default_rotation")]
    pub rotation: f64,
    /// Allowed mean vertex displacement, in grid units.
    #[serde(default = "ShapeTolerance::default_position")]
    pub position: f64,
}

impl ShapeTolerance {
    fn default_scale() -> f64 {
        0.1
    }

    fn default_rotation() -> f64 {
        5.0
    }

    fn default_position() -> f64 {
        1.0
    }
}

impl Default for ShapeTolerance {
    fn default() -> Self {
        Self {
            scale: Self::default_scale(),
            rotation: Self::default_rotation(),
            position: Self::default_position(),
        }
    }
}

/// The reference answer for a visual question: a grid-space polygon whose
/// vertices correspond index-for-index with a correctly drawn detected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedShape {
    pub shape_type: ShapeType,
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub tolerance: ShapeTolerance,
}

/// Geometric accuracy measurements for one grading call.
///
/// `position_error` is `+∞` when the detected and expected shapes are not
/// comparable (type or vertex-count mismatch); `serde_json` renders that as
/// `null`, which callers must treat as "no measurement".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricAccuracy {
    /// Ratio of detected to expected edge lengths; `1.0` is perfect.
    pub scale_factor: f64,
    /// Mean angular deviation in degrees.
    pub rotation_angle: f64,
    /// Mean grid-unit distance between corresponding vertices.
    pub position_error: f64,
    /// Weighted composite, clamped to `[0.0, 1.0]`.
    pub overall_accuracy: f64,
}

impl GeometricAccuracy {
    /// Sentinel for a hard mismatch: the shapes cannot be compared at all.
    pub fn incomparable() -> Self {
        Self {
            scale_factor: 0.0,
            rotation_angle: 0.0,
            position_error: f64::INFINITY,
            overall_accuracy: 0.0,
        }
    }

    /// True when this result is the hard-mismatch sentinel.
    pub fn is_comparable(&self) -> bool {
        self.position_error.is_finite()
    }
}
