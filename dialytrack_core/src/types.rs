//! Core domain types for Dialytrack.
//!
//! This module defines the fundamental types used throughout the system:
//! - Blood-pressure readings, thresholds and classifications
//! - Ultrafiltration inputs and safety levels
//! - Trend inputs and results
//! - Subscription plans, resource/feature keys and usage items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Blood Pressure Types
// ============================================================================

/// Where a reading was taken relative to a dialysis session
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    PreDialysis,
    PostDialysis,
    Home,
    #[default]
    Unknown,
}

impl ReadingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingSource::PreDialysis => "pre_dialysis",
            ReadingSource::PostDialysis => "post_dialysis",
            ReadingSource::Home => "home",
            ReadingSource::Unknown => "unknown",
        }
    }
}

impl FromStr for ReadingSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre_dialysis" | "pre" => Ok(ReadingSource::PreDialysis),
            "post_dialysis" | "post" => Ok(ReadingSource::PostDialysis),
            "home" => Ok(ReadingSource::Home),
            "unknown" | "" => Ok(ReadingSource::Unknown),
            other => Err(Error::UnknownKey {
                kind: "reading source",
                key: other.to_string(),
            }),
        }
    }
}

/// A recorded blood-pressure reading (mmHg)
///
/// Immutable once recorded; use [`BloodPressureReading::new`] at input
/// boundaries so that non-finite or non-positive pressures never get in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BloodPressureReading {
    pub systolic: f64,
    pub diastolic: f64,
    pub taken_at: DateTime<Utc>,
    #[serde(default)]
    pub source: ReadingSource,
}

/// Per-user blood-pressure cutoffs in mmHg
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BpThresholds {
    pub normal_sys: f64,
    pub normal_dia: f64,
    pub elevated_sys: f64,
    pub elevated_dia: f64,
    pub stage1_sys: f64,
    pub stage1_dia: f64,
    pub stage2_sys: f64,
    pub stage2_dia: f64,
}

impl Default for BpThresholds {
    fn default() -> Self {
        Self {
            normal_sys: 120.0,
            normal_dia: 80.0,
            elevated_sys: 129.0,
            elevated_dia: 80.0,
            stage1_sys: 139.0,
            stage1_dia: 89.0,
            stage2_sys: 180.0,
            stage2_dia: 120.0,
        }
    }
}

/// Blood-pressure category produced by classification
///
/// Both hypertension stages share the "High" label; the stage is kept so
/// callers can tell which rule matched.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BpCategory {
    Low,
    Normal,
    Elevated,
    HighStage1,
    HighStage2,
    Crisis,
}

impl BpCategory {
    pub fn label(self) -> &'static str {
        match self {
            BpCategory::Low => "Low",
            BpCategory::Normal => "Normal",
            BpCategory::Elevated => "Elevated",
            BpCategory::HighStage1 | BpCategory::HighStage2 => "High",
            BpCategory::Crisis => "Crisis",
        }
    }

    /// Ordinal used for monotonic comparisons; Low sits below the
    /// hypertension scale.
    pub fn severity_rank(self) -> u8 {
        match self {
            BpCategory::Low => 0,
            BpCategory::Normal => 1,
            BpCategory::Elevated => 2,
            BpCategory::HighStage1 | BpCategory::HighStage2 => 3,
            BpCategory::Crisis => 4,
        }
    }
}

impl fmt::Display for BpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Result of classifying a single systolic/diastolic pair
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct BpClassification {
    pub category: BpCategory,
    pub label: &'static str,
    pub severity_rank: u8,
}

impl From<BpCategory> for BpClassification {
    fn from(category: BpCategory) -> Self {
        Self {
            category,
            label: category.label(),
            severity_rank: category.severity_rank(),
        }
    }
}

// ============================================================================
// Ultrafiltration Types
// ============================================================================

/// Fluid removal figures for one dialysis session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct UfInput {
    pub volume_removed_ml: f64,
    pub patient_weight_kg: f64,
    pub duration_minutes: f64,
}

/// UF rate bands in ml/kg/hr
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UfThresholds {
    /// Rates strictly below this are safe
    pub safe_below: f64,
    /// Rates strictly below this (and not safe) are caution; the rest are risk
    pub caution_below: f64,
}

impl Default for UfThresholds {
    fn default() -> Self {
        Self {
            safe_below: 10.0,
            caution_below: 13.0,
        }
    }
}

/// Safety tier of an ultrafiltration rate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Risk,
}

impl SafetyLevel {
    pub fn label(self) -> &'static str {
        match self {
            SafetyLevel::Safe => "Safe",
            SafetyLevel::Caution => "Caution",
            SafetyLevel::Risk => "Risk",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ============================================================================
// Trend Types
// ============================================================================

/// Minimal trend input: when a reading was taken and its systolic value
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub taken_at: DateTime<Utc>,
    pub systolic: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Up => "Rising",
            TrendDirection::Down => "Falling",
            TrendDirection::Stable => "Stable",
        }
    }
}

/// Direction of the systolic trend between the prior and recent windows
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub label: &'static str,
}

impl From<TrendDirection> for Trend {
    fn from(direction: TrendDirection) -> Self {
        Self {
            direction,
            label: direction.label(),
        }
    }
}

// ============================================================================
// Subscription Types
// ============================================================================

/// Subscription plan identifier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    Free,
    Basic,
    Premium,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Free, PlanId::Basic, PlanId::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::Basic => "basic",
            PlanId::Premium => "premium",
        }
    }
}

/// Countable resources a plan may cap
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKey {
    Sessions,
    Medications,
    NutritionScans,
    CareTeamMembers,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 4] = [
        ResourceKey::Sessions,
        ResourceKey::Medications,
        ResourceKey::NutritionScans,
        ResourceKey::CareTeamMembers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKey::Sessions => "sessions",
            ResourceKey::Medications => "medications",
            ResourceKey::NutritionScans => "nutrition_scans",
            ResourceKey::CareTeamMembers => "care_team_members",
        }
    }
}

/// Gated product features
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    SessionLogging,
    VitalsTracking,
    FluidTracking,
    TrendCharts,
    DataExport,
    NutriScanAI,
    CareTeamSharing,
    PrioritySupport,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 8] = [
        FeatureKey::SessionLogging,
        FeatureKey::VitalsTracking,
        FeatureKey::FluidTracking,
        FeatureKey::TrendCharts,
        FeatureKey::DataExport,
        FeatureKey::NutriScanAI,
        FeatureKey::CareTeamSharing,
        FeatureKey::PrioritySupport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::SessionLogging => "sessionLogging",
            FeatureKey::VitalsTracking => "vitalsTracking",
            FeatureKey::FluidTracking => "fluidTracking",
            FeatureKey::TrendCharts => "trendCharts",
            FeatureKey::DataExport => "dataExport",
            FeatureKey::NutriScanAI => "nutriScanAI",
            FeatureKey::CareTeamSharing => "careTeamSharing",
            FeatureKey::PrioritySupport => "prioritySupport",
        }
    }
}

macro_rules! impl_key_parsing {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| Error::UnknownKey {
                        kind: $kind,
                        key: wanted.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

impl_key_parsing!(PlanId, "plan");
impl_key_parsing!(ResourceKey, "resource");
impl_key_parsing!(FeatureKey, "feature");

/// Subscription status as reported by the billing service
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Canceled,
    PastDue,
    Trialing,
}

impl SubscriptionStatus {
    /// Whether the plan's entitlements currently apply
    pub fn is_entitled(self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

/// A subscription plan definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanConfig {
    pub id: PlanId,
    pub name: String,
    pub description: String,
    pub price_monthly: f64,
    pub price_yearly: f64,
    /// `None` means unlimited
    pub limits: BTreeMap<ResourceKey, Option<u32>>,
    pub features: BTreeSet<FeatureKey>,
}

/// Remaining allowance of a resource
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Remaining {
    Unlimited,
    Finite(u32),
}

impl Remaining {
    /// Whether at least one more item fits
    pub fn is_available(self) -> bool {
        match self {
            Remaining::Unlimited => true,
            Remaining::Finite(n) => n > 0,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Unlimited => f.write_str("unlimited"),
            Remaining::Finite(n) => write!(f, "{}", n),
        }
    }
}

/// Usage status of one resource against its plan limit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageItem {
    pub current: u32,
    pub limit: Option<u32>,
    pub remaining: Remaining,
    pub percent_used: u8,
    pub unlimited: bool,
    pub at_limit: bool,
    pub near_limit: bool,
}

/// Point-in-time usage counters from the billing service
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageSnapshot {
    #[serde(default)]
    pub counts: BTreeMap<ResourceKey, u32>,
    #[serde(default)]
    pub status: SubscriptionStatus,
}

/// The complete set of plans offered
#[derive(Clone, Debug)]
pub struct PlanTable {
    pub plans: BTreeMap<PlanId, PlanConfig>,
}
