//! Weighted page scoring
//!
//! Reduces a finished run into a percentage score and a per-check
//! breakdown.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = 100 × Σ weight(passed) / Σ weight(ran)
//! ```
//!
//! Checks skipped after a fatal failure appear in neither sum. A run in
//! which nothing ran scores 100. The score is rounded to two decimals
//! and clamped to [0, 100]; a run with any failed check is capped at
//! 99.99 so that 100 always means every executed check passed.
//!
//! # Example
//!
//! Three checks weighted 10, 20 and 30. The first fails fatally after
//! nothing else ran: `0 / 10 = 0%`. If instead the weight-30 check is the
//! only failure: `(10 + 20) / 60 = 50%`.

mod weighted_scorer;

pub use weighted_scorer::{score_run, CheckReport, ScoreResult};
