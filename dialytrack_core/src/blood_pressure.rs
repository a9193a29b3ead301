//! Blood-pressure classification and mean arterial pressure.
//!
//! Classification rules are evaluated in a fixed order and the first match
//! wins:
//! 1. Systolic < 90 or diastolic < 60 → Low
//! 2. Both below the normal cutoffs → Normal
//! 3. Systolic ≤ elevated and diastolic < elevated → Elevated
//! 4. Systolic ≤ stage 1 or diastolic ≤ stage 1 → High (stage 1)
//! 5. Systolic ≥ stage 2 or diastolic ≥ stage 2 → Crisis
//! 6. Anything else → High (stage 2)
//!
//! The mix of `<` and `≤` between rules 2-4 is intentional and must not be
//! normalised.

use crate::{
    BloodPressureReading, BpCategory, BpClassification, BpThresholds, Error, ReadingSource,
    Result,
};
use chrono::{DateTime, Utc};

const LOW_SYSTOLIC: f64 = 90.0;
const LOW_DIASTOLIC: f64 = 60.0;

/// Classify a systolic/diastolic pair against the given thresholds
///
/// Total over all finite input; never panics.
pub fn classify_blood_pressure(
    systolic: f64,
    diastolic: f64,
    thresholds: &BpThresholds,
) -> BpClassification {
    let category = if systolic < LOW_SYSTOLIC || diastolic < LOW_DIASTOLIC {
        BpCategory::Low
    } else if systolic < thresholds.normal_sys && diastolic < thresholds.normal_dia {
        BpCategory::Normal
    } else if systolic <= thresholds.elevated_sys && diastolic < thresholds.elevated_dia {
        BpCategory::Elevated
    } else if systolic <= thresholds.stage1_sys || diastolic <= thresholds.stage1_dia {
        BpCategory::HighStage1
    } else if systolic >= thresholds.stage2_sys || diastolic >= thresholds.stage2_dia {
        BpCategory::Crisis
    } else {
        BpCategory::HighStage2
    };

    tracing::debug!(
        "Classified {}/{} mmHg as {:?}",
        systolic,
        diastolic,
        category
    );

    category.into()
}

/// Mean arterial pressure, rounded to the nearest mmHg
///
/// Returns `None` when there is no diastolic value or either value is not
/// finite.
pub fn mean_arterial_pressure(systolic: f64, diastolic: Option<f64>) -> Option<i32> {
    let diastolic = diastolic?;
    if !systolic.is_finite() || !diastolic.is_finite() {
        return None;
    }
    Some(((2.0 * diastolic + systolic) / 3.0).round() as i32)
}

impl BloodPressureReading {
    /// Build a reading from raw input, rejecting values no cuff can produce
    pub fn new(
        systolic: f64,
        diastolic: f64,
        taken_at: DateTime<Utc>,
        source: ReadingSource,
    ) -> Result<Self> {
        let reading = Self {
            systolic,
            diastolic,
            taken_at,
            source,
        };
        reading.validate()?;
        Ok(reading)
    }

    /// Check that both pressures are finite and positive
    pub fn validate(&self) -> Result<()> {
        check_pressure("systolic", self.systolic)?;
        check_pressure("diastolic", self.diastolic)?;
        Ok(())
    }

    pub fn classify(&self, thresholds: &BpThresholds) -> BpClassification {
        classify_blood_pressure(self.systolic, self.diastolic, thresholds)
    }

    pub fn mean_arterial_pressure(&self) -> Option<i32> {
        mean_arterial_pressure(self.systolic, Some(self.diastolic))
    }
}

fn check_pressure(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Validation(format!(
            "{} pressure must be a finite number, got {}",
            field, value
        )));
    }
    if value <= 0.0 {
        return Err(Error::Validation(format!(
            "{} pressure must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}
