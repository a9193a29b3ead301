#![forbid(unsafe_code)]

//! Core clinical metrics and subscription entitlements for Dialytrack.
//!
//! This crate provides:
//! - Domain types (readings, thresholds, plans, usage items)
//! - Blood-pressure classification and mean arterial pressure
//! - Ultrafiltration rate and safety tiers
//! - Systolic trend detection
//! - The subscription plan table and entitlement checks
//! - Configuration, unit conversion and reading import
//!
//! Every metric and entitlement function is pure: inputs are passed in
//! explicitly and nothing is cached between calls apart from the immutable
//! plan table.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod blood_pressure;
pub mod ultrafiltration;
pub mod trend;
pub mod plans;
pub mod entitlement;
pub mod readings;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use blood_pressure::{classify_blood_pressure, mean_arterial_pressure};
pub use ultrafiltration::{classify_uf_safety, classify_uf_safety_with, ultrafiltration_rate};
pub use trend::{detect_trend, trend_points};
pub use plans::{build_default_plans, get_default_plans};
pub use entitlement::{
    can_add_resource, compute_usage_item, has_feature, minimum_plan_for_feature,
    requires_upgrade, usage_report,
};
pub use readings::load_readings;
