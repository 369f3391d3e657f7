//! End-to-end properties of the scoring core, exercised through the public API.

use scorer::{
    BoundingBox, ConfidenceAggregator, Criterion, DetectedShape, ExpectedShape, GeometricGrader,
    MarkingOutcome, Point, ShapeTolerance, ShapeType,
};

fn quadratic_scheme() -> Vec<Criterion> {
    vec![
        Criterion::new(
            "Correct method for solving quadratic equation",
            2,
            vec![
                "quadratic".to_string(),
                "formula".to_string(),
                "solve".to_string(),
                "equation".to_string(),
            ],
            Some(vec!["quadratic".to_string(), "equation".to_string()]),
            0.1,
        )
        .unwrap(),
        Criterion::new(
            "Correct substitution of values",
            1,
            vec![
                "substitute".to_string(),
                "values".to_string(),
                "correct".to_string(),
            ],
            Some(vec!["substitute".to_string()]),
            0.1,
        )
        .unwrap(),
        Criterion::new(
            "Correct final answer",
            1,
            vec![
                "answer".to_string(),
                "correct".to_string(),
                "result".to_string(),
            ],
            Some(vec!["answer".to_string()]),
            0.1,
        )
        .unwrap(),
    ]
}

#[test]
fn confidence_is_always_in_unit_interval() {
    let aggregator = ConfidenceAggregator::new();
    let scheme = quadratic_scheme();
    let answers = [
        "",
        "nothing relevant here",
        "I used the quadratic formula to solve the equation and got x = 2",
        "quadratic formula solve equation substitute values correct answer result",
    ];
    for answer in answers {
        let breakdown = aggregator.score_from_criteria(answer, &scheme, "").unwrap();
        assert!(
            (0.0..=1.0).contains(&breakdown.confidence_score),
            "answer {answer:?} scored {}",
            breakdown.confidence_score
        );
    }
}

#[test]
fn fully_keyword_covered_criterion_always_fully_matches() {
    let aggregator = ConfidenceAggregator::new();
    for tolerance in [0.0, 0.1, 0.5, 1.0] {
        let scheme = vec![
            Criterion::new(
                "Method",
                2,
                vec!["quadratic".to_string(), "formula".to_string()],
                None,
                tolerance,
            )
            .unwrap(),
        ];
        let breakdown = aggregator
            .score_from_criteria("the quadratic formula", &scheme, "")
            .unwrap();
        assert_eq!(breakdown.criteria_matched, 1, "tolerance {tolerance}");
    }
}

#[test]
fn combine_single_score_is_identity() {
    let aggregator = ConfidenceAggregator::new();
    for score in [0.0, 0.25, 0.5, 1.0] {
        assert_eq!(aggregator.combine(&[score], None), score);
    }
}

#[test]
fn combine_exclusive_weight_selects_exclusively() {
    let aggregator = ConfidenceAggregator::new();
    let combined = aggregator.combine(&[0.3, 0.8], Some(&[1.0, 0.0]));
    assert!((combined - 0.3).abs() < 1e-12);
}

#[test]
fn agreement_of_nothing_is_zero_and_unanimity_is_one() {
    let aggregator = ConfidenceAggregator::new();
    assert_eq!(aggregator.score_from_agreement(&[]), 0.0);

    let unanimous = vec![
        MarkingOutcome {
            marks_awarded: 1.0,
            total_marks: 1.0,
        };
        5
    ];
    assert_eq!(aggregator.score_from_agreement(&unanimous), 1.0);
}

#[test]
fn shape_type_mismatch_always_yields_incomparable_result() {
    let grader = GeometricGrader::new(1.0).unwrap();
    let detected = DetectedShape {
        shape_type: ShapeType::Rectangle,
        vertices: vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ],
        confidence: 0.9,
        bounding_box: BoundingBox::default(),
    };
    let expected = ExpectedShape {
        shape_type: ShapeType::Triangle,
        vertices: vec![Point::new(2.0, 2.0), Point::new(4.0, 6.0), Point::new(7.0, 3.0)],
        tolerance: ShapeTolerance::default(),
    };
    let accuracy = grader.grade(&detected, &expected);
    assert_eq!(accuracy.position_error, f64::INFINITY);
    assert_eq!(accuracy.overall_accuracy, 0.0);
}

#[test]
fn worked_example_full_match() {
    let aggregator = ConfidenceAggregator::new();
    let scheme = vec![
        Criterion::new(
            "Correct method",
            2,
            vec![
                "quadratic".to_string(),
                "formula".to_string(),
                "solve".to_string(),
                "equation".to_string(),
            ],
            None,
            0.1,
        )
        .unwrap(),
    ];
    let breakdown = aggregator
        .score_from_criteria(
            "I used the quadratic formula to solve the equation and got x = 2",
            &scheme,
            "Student used correct method but made calculation error",
        )
        .unwrap();
    assert_eq!(breakdown.criteria_matched, 1);
    assert_eq!(breakdown.confidence_score, 1.0);
}

#[test]
fn worked_example_three_of_four_keywords() {
    let aggregator = ConfidenceAggregator::new();
    let scheme = vec![
        Criterion::new(
            "Correct method",
            2,
            vec![
                "quadratic".to_string(),
                "formula".to_string(),
                "solve".to_string(),
                "equation".to_string(),
            ],
            None,
            0.1,
        )
        .unwrap(),
    ];
    // 3/4 keywords: 0.75 is at least the 0.6 partial threshold and below
    // the 0.9 full threshold, so the criterion earns 0.75 * 2 = 1.5 marks
    // and confidence saturates at min(1.0, 1.5 / 1).
    let breakdown = aggregator
        .score_from_criteria("the quadratic formula applies to this equation", &scheme, "")
        .unwrap();
    assert_eq!(breakdown.criteria_matched, 0);
    assert_eq!(breakdown.partial_credit_details.len(), 1);
    assert_eq!(breakdown.partial_credit_details[0].partial_score, 1.5);
    assert_eq!(breakdown.confidence_score, 1.0);
}

#[test]
fn worked_example_nearly_perfect_triangle() {
    let grader = GeometricGrader::new(1.0).unwrap();
    let detected = DetectedShape {
        shape_type: ShapeType::Triangle,
        vertices: vec![Point::new(2.1, 2.0), Point::new(4.0, 6.1), Point::new(7.0, 3.0)],
        confidence: 0.9,
        bounding_box: BoundingBox::default(),
    };
    let expected = ExpectedShape {
        shape_type: ShapeType::Triangle,
        vertices: vec![Point::new(2.0, 2.0), Point::new(4.0, 6.0), Point::new(7.0, 3.0)],
        tolerance: ShapeTolerance::default(),
    };
    let accuracy = grader.grade(&detected, &expected);
    assert!(
        accuracy.overall_accuracy > 0.8,
        "expected near-perfect accuracy, got {}",
        accuracy.overall_accuracy
    );
}
