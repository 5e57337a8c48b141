//! # Score Trends
//!
//! Compares the mean of the most recent window of scored runs with the
//! window before it. Windows hold up to [`TREND_WINDOW`] runs and are equal
//! in size, so two runs are enough to produce a trend. Insufficient runs
//! (undefined scores) are skipped by the caller.

use serde::{Deserialize, Serialize};

pub const TREND_WINDOW: usize = 5;

/// Mean difference, in score points, that counts as movement.
pub const TREND_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreTrend {
    Improving,
    Degrading,
    Stable,
    InsufficientData,
}

/// Trend over `history`, oldest first.
pub fn score_trend(history: &[f64]) -> ScoreTrend {
    let window = usize::min(TREND_WINDOW, history.len() / 2);
    if window == 0 {
        return ScoreTrend::InsufficientData;
    }
    let n = history.len();
    let latest = &history[n - window..];
    let previous = &history[n - 2 * window..n - window];
    let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    let delta = mean(latest) - mean(previous);
    if delta > TREND_MARGIN {
        ScoreTrend::Improving
    } else if delta < -TREND_MARGIN {
        ScoreTrend::Degrading
    } else {
        ScoreTrend::Stable
    }
}
