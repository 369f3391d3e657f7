//! Boundary-level configuration, read from environment variables with
//! sensible defaults. Scoring thresholds and weights are not configured here;
//! those live on [`scorer::ScorerSettings`].

use std::env;

/// Log filter for the process, e.g. `info` or `scorer=debug`.
pub fn log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into())
}

/// Pixels per grid unit assumed when the input payload does not carry
/// `grid_spacing`.
pub fn default_grid_spacing() -> f64 {
    env::var("GRID_SPACING")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50.0)
}
