//! Short-window systolic trend detection.
//!
//! Compares the mean systolic of the last three readings against the mean
//! of the (up to) three readings before them. A difference beyond ±5 mmHg
//! counts as movement; anything inside the band is noise.

use crate::{BloodPressureReading, Trend, TrendDirection, TrendPoint};

/// Number of readings in each comparison window
pub const WINDOW_SIZE: usize = 3;

/// Mean difference (mmHg) that separates movement from noise
pub const NOISE_BAND_MMHG: f64 = 5.0;

/// Detect the systolic trend over a series of readings
///
/// Readings are ordered by time before windowing, so callers may pass them
/// newest-first. Returns `None` when there are not enough readings to fill
/// the recent window and leave at least one reading before it.
pub fn detect_trend(readings: &[TrendPoint]) -> Option<Trend> {
    if readings.len() <= WINDOW_SIZE {
        tracing::debug!(
            "Trend needs more than {} readings, got {}",
            WINDOW_SIZE,
            readings.len()
        );
        return None;
    }

    let mut ordered: Vec<&TrendPoint> = readings.iter().collect();
    ordered.sort_by_key(|p| p.taken_at);

    let split = ordered.len() - WINDOW_SIZE;
    let recent = &ordered[split..];
    let prior = &ordered[split.saturating_sub(WINDOW_SIZE)..split];

    let recent_mean = mean_systolic(recent)?;
    let prior_mean = mean_systolic(prior)?;
    let diff = recent_mean - prior_mean;

    let direction = if diff > NOISE_BAND_MMHG {
        TrendDirection::Up
    } else if diff < -NOISE_BAND_MMHG {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    tracing::debug!(
        "Trend: prior mean {:.1}, recent mean {:.1}, diff {:.1} → {:?}",
        prior_mean,
        recent_mean,
        diff,
        direction
    );

    Some(direction.into())
}

/// Project readings onto the fields trend detection needs
pub fn trend_points(readings: &[BloodPressureReading]) -> Vec<TrendPoint> {
    readings
        .iter()
        .map(|r| TrendPoint {
            taken_at: r.taken_at,
            systolic: r.systolic,
        })
        .collect()
}

fn mean_systolic(window: &[&TrendPoint]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|p| p.systolic).sum();
    Some(sum / window.len() as f64)
}
