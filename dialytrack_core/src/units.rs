//! Weight and fluid unit preferences.
//!
//! Metric functions work in kilograms and millilitres. These helpers convert
//! whatever the user entered before it reaches them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

const KG_PER_LB: f64 = 0.453_592_37;
const ML_PER_FL_OZ: f64 = 29.573_529_562_5;

/// User's preferred weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg / KG_PER_LB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

/// User's preferred fluid volume unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidUnit {
    #[default]
    Ml,
    L,
    FlOz,
}

impl FluidUnit {
    pub fn to_ml(self, value: f64) -> f64 {
        match self {
            FluidUnit::Ml => value,
            FluidUnit::L => value * 1000.0,
            FluidUnit::FlOz => value * ML_PER_FL_OZ,
        }
    }

    pub fn from_ml(self, ml: f64) -> f64 {
        match self {
            FluidUnit::Ml => ml,
            FluidUnit::L => ml / 1000.0,
            FluidUnit::FlOz => ml / ML_PER_FL_OZ,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FluidUnit::Ml => "ml",
            FluidUnit::L => "L",
            FluidUnit::FlOz => "fl oz",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pounds" => Ok(WeightUnit::Lb),
            other => Err(Error::UnknownKey {
                kind: "weight unit",
                key: other.to_string(),
            }),
        }
    }
}

impl FromStr for FluidUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(FluidUnit::Ml),
            "l" | "litres" | "liters" => Ok(FluidUnit::L),
            "fl_oz" | "floz" | "oz" => Ok(FluidUnit::FlOz),
            other => Err(Error::UnknownKey {
                kind: "fluid unit",
                key: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl fmt::Display for FluidUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_conversion() {
        assert!((WeightUnit::Lb.to_kg(154.0) - 69.853).abs() < 1e-3);
        assert_eq!(WeightUnit::Kg.to_kg(70.0), 70.0);
        let back = WeightUnit::Lb.from_kg(WeightUnit::Lb.to_kg(180.0));
        assert!((back - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_fluid_conversion() {
        assert_eq!(FluidUnit::L.to_ml(2.5), 2500.0);
        assert!((FluidUnit::FlOz.to_ml(8.0) - 236.588).abs() < 1e-3);
        assert_eq!(FluidUnit::L.from_ml(1500.0), 1.5);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("LBS".parse::<WeightUnit>().unwrap(), WeightUnit::Lb);
        assert_eq!("l".parse::<FluidUnit>().unwrap(), FluidUnit::L);
        assert_eq!("oz".parse::<FluidUnit>().unwrap(), FluidUnit::FlOz);
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FluidUnit::FlOz).unwrap();
        assert_eq!(json, "\"fl_oz\"");
    }
}
