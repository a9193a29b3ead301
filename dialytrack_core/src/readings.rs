//! Blood-pressure reading import.
//!
//! Loads readings exported by the app or typed up by hand, either as a JSON
//! array or as CSV with a `systolic,diastolic,taken_at,source` header. The
//! format is chosen by file extension.

use crate::{BloodPressureReading, Error, ReadingSource, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

/// CSV row format for imported readings
#[derive(Debug, Deserialize)]
struct CsvRow {
    systolic: f64,
    diastolic: f64,
    taken_at: String,
    source: Option<String>,
}

impl TryFrom<CsvRow> for BloodPressureReading {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let taken_at = DateTime::parse_from_rfc3339(row.taken_at.trim())
            .map_err(|e| Error::Validation(format!("Invalid taken_at '{}': {}", row.taken_at, e)))?
            .with_timezone(&Utc);

        let source = match row.source.as_deref() {
            Some(s) => s.parse()?,
            None => ReadingSource::Unknown,
        };

        BloodPressureReading::new(row.systolic, row.diastolic, taken_at, source)
    }
}

/// Load readings from a JSON or CSV file
///
/// Every reading is validated; the first invalid one fails the whole load
/// with its (1-based) row number. The result is sorted oldest first.
pub fn load_readings(path: &Path) -> Result<Vec<BloodPressureReading>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let mut readings = match extension.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        other => {
            return Err(Error::Other(format!(
                "Unsupported readings file extension {:?} for {:?} (expected .json or .csv)",
                other.unwrap_or(""),
                path
            )))
        }
    };

    readings.sort_by_key(|r| r.taken_at);

    tracing::info!("Loaded {} readings from {:?}", readings.len(), path);
    Ok(readings)
}

fn load_json(path: &Path) -> Result<Vec<BloodPressureReading>> {
    let contents = std::fs::read_to_string(path)?;
    let readings: Vec<BloodPressureReading> = serde_json::from_str(&contents)?;

    for (idx, reading) in readings.iter().enumerate() {
        reading
            .validate()
            .map_err(|e| Error::Validation(format!("Reading {}: {}", idx + 1, e)))?;
    }

    Ok(readings)
}

fn load_csv(path: &Path) -> Result<Vec<BloodPressureReading>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut readings = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let reading = BloodPressureReading::try_from(row)
            .map_err(|e| Error::Validation(format!("Row {}: {}", idx + 1, e)))?;
        readings.push(reading);
    }

    Ok(readings)
}
