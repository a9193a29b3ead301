//! Configuration file support for Dialytrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dialytrack/config.toml`.
//! Every field has a default, so a partial file only overrides what it names.

use crate::units::{FluidUnit, WeightUnit};
use crate::{BpThresholds, Error, PlanId, Result, UfThresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub blood_pressure: BpThresholds,

    #[serde(default)]
    pub ultrafiltration: UfThresholds,

    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

/// Display and input unit preferences
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UnitsConfig {
    #[serde(default)]
    pub weight: WeightUnit,

    #[serde(default)]
    pub fluid: FluidUnit,
}

/// Subscription defaults used when no plan is given on the command line
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionConfig {
    #[serde(default = "default_plan")]
    pub plan: PlanId,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            plan: default_plan(),
        }
    }
}

fn default_plan() -> PlanId {
    PlanId::Free
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME").map_err(|_| {
                    Error::Config("Neither a config directory nor HOME is available".into())
                })?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("dialytrack").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject cutoffs the metric functions cannot use meaningfully
    pub fn validate(&self) -> Result<()> {
        let bp = &self.blood_pressure;
        for (name, value) in [
            ("normal_sys", bp.normal_sys),
            ("normal_dia", bp.normal_dia),
            ("elevated_sys", bp.elevated_sys),
            ("elevated_dia", bp.elevated_dia),
            ("stage1_sys", bp.stage1_sys),
            ("stage1_dia", bp.stage1_dia),
            ("stage2_sys", bp.stage2_sys),
            ("stage2_dia", bp.stage2_dia),
            ("safe_below", self.ultrafiltration.safe_below),
            ("caution_below", self.ultrafiltration.caution_below),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.ultrafiltration.safe_below > self.ultrafiltration.caution_below {
            return Err(Error::Config(format!(
                "ultrafiltration.safe_below ({}) exceeds caution_below ({})",
                self.ultrafiltration.safe_below, self.ultrafiltration.caution_below
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.blood_pressure.normal_sys, 120.0);
        assert_eq!(config.blood_pressure.stage2_dia, 120.0);
        assert_eq!(config.ultrafiltration.safe_below, 10.0);
        assert_eq!(config.ultrafiltration.caution_below, 13.0);
        assert_eq!(config.units.weight, WeightUnit::Kg);
        assert_eq!(config.subscription.plan, PlanId::Free);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.units.fluid = FluidUnit::L;
        config.subscription.plan = PlanId::Premium;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[blood_pressure]
normal_sys = 125.0

[units]
weight = "lb"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.blood_pressure.normal_sys, 125.0);
        assert_eq!(config.blood_pressure.normal_dia, 80.0); // default
        assert_eq!(config.units.weight, WeightUnit::Lb);
        assert_eq!(config.units.fluid, FluidUnit::Ml); // default
        assert_eq!(config.ultrafiltration, UfThresholds::default());
    }

    #[test]
    fn test_inverted_uf_bands_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[ultrafiltration]\nsafe_below = 14.0\ncaution_below = 12.0\n",
        )
        .unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("safe_below"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = Config::default();
        config.blood_pressure.stage1_dia = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stage1_dia"));
    }

    #[test]
    fn test_unknown_plan_rejected() {
        let toml_str = "[subscription]\nplan = \"platinum\"\n";
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
