//! # Integration Library
//!
//! JSON boundary between the marking pipeline and the scoring core. The
//! `markit` binary exposes the three scoring modes over a command-line/JSON
//! interface; this library holds the mode dispatch, the response envelopes,
//! and the sidecar-file shape detector so they can be exercised in tests
//! without spawning a process.

pub mod config;
pub mod detector;
pub mod modes;

pub use detector::SidecarShapeDetector;
pub use modes::{
    AgreementEnvelope, ConfidenceEnvelope, VisualEnvelope, run_agreement, run_confidence,
    run_visual,
};
