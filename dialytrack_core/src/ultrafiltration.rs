//! Ultrafiltration (UF) rate and safety tier.
//!
//! The rate is fluid removed per kilogram of body weight per hour of
//! treatment. A zero or negative weight or duration yields a rate of 0
//! rather than an error: a session in progress has no duration yet and the
//! rate is still displayed.

use crate::{Error, Result, SafetyLevel, UfInput, UfThresholds};

/// UF rate in ml/kg/hr
pub fn ultrafiltration_rate(
    volume_removed_ml: f64,
    patient_weight_kg: f64,
    duration_minutes: f64,
) -> f64 {
    if duration_minutes.is_nan()
        || duration_minutes <= 0.0
        || patient_weight_kg.is_nan()
        || patient_weight_kg <= 0.0
    {
        tracing::debug!(
            "UF rate undefined (weight {} kg, duration {} min), reporting 0",
            patient_weight_kg,
            duration_minutes
        );
        return 0.0;
    }

    volume_removed_ml / patient_weight_kg / (duration_minutes / 60.0)
}

/// Classify a UF rate using the default bands (safe < 10, caution < 13)
pub fn classify_uf_safety(rate: f64) -> SafetyLevel {
    classify_uf_safety_with(rate, &UfThresholds::default())
}

/// Classify a UF rate against configured bands
///
/// Each band is closed on its lower bound: a rate exactly at
/// `safe_below` is caution, exactly at `caution_below` is risk.
pub fn classify_uf_safety_with(rate: f64, thresholds: &UfThresholds) -> SafetyLevel {
    if rate < thresholds.safe_below {
        SafetyLevel::Safe
    } else if rate < thresholds.caution_below {
        SafetyLevel::Caution
    } else {
        SafetyLevel::Risk
    }
}

impl UfInput {
    /// Build UF input from raw values
    ///
    /// Zero is accepted for every field (session not started or not yet
    /// weighed); negative or non-finite values are rejected.
    pub fn new(volume_removed_ml: f64, patient_weight_kg: f64, duration_minutes: f64) -> Result<Self> {
        let input = Self {
            volume_removed_ml,
            patient_weight_kg,
            duration_minutes,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("volume removed", self.volume_removed_ml),
            ("patient weight", self.patient_weight_kg),
            ("duration", self.duration_minutes),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    pub fn rate(&self) -> f64 {
        ultrafiltration_rate(
            self.volume_removed_ml,
            self.patient_weight_kg,
            self.duration_minutes,
        )
    }

    pub fn safety(&self, thresholds: &UfThresholds) -> SafetyLevel {
        classify_uf_safety_with(self.rate(), thresholds)
    }
}
