//! Built-in subscription plan table.
//!
//! The table is the single source of truth for limits and features. Plans do
//! not inherit from one another: if Premium should have a Basic feature, the
//! Premium entry lists it.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

/// Cached default plan table - built once and reused across all operations
static DEFAULT_PLANS: Lazy<PlanTable> = Lazy::new(build_default_plans);

/// Get a reference to the cached default plan table
pub fn get_default_plans() -> &'static PlanTable {
    &DEFAULT_PLANS
}

/// Builds the default plan table
///
/// **Note**: For production use, prefer `get_default_plans()` which returns a
/// cached reference. This function is retained for testing and custom tables.
pub fn build_default_plans() -> PlanTable {
    use FeatureKey::*;
    use ResourceKey::*;

    let mut plans = BTreeMap::new();

    plans.insert(
        PlanId::Free,
        PlanConfig {
            id: PlanId::Free,
            name: "Free".into(),
            description: "Core session and vitals logging".into(),
            price_monthly: 0.0,
            price_yearly: 0.0,
            limits: limits(&[
                (Sessions, Some(12)),
                (Medications, Some(5)),
                (NutritionScans, Some(0)),
                (CareTeamMembers, Some(0)),
            ]),
            features: features(&[SessionLogging, VitalsTracking]),
        },
    );

    plans.insert(
        PlanId::Basic,
        PlanConfig {
            id: PlanId::Basic,
            name: "Basic".into(),
            description: "Fluid tracking, trend charts and data export".into(),
            price_monthly: 4.99,
            price_yearly: 49.99,
            limits: limits(&[
                (Sessions, Some(40)),
                (Medications, Some(20)),
                (NutritionScans, Some(10)),
                (CareTeamMembers, Some(1)),
            ]),
            features: features(&[
                SessionLogging,
                VitalsTracking,
                FluidTracking,
                TrendCharts,
                DataExport,
            ]),
        },
    );

    plans.insert(
        PlanId::Premium,
        PlanConfig {
            id: PlanId::Premium,
            name: "Premium".into(),
            description: "Unlimited logging, AI nutrition scanning and care team sharing"
                .into(),
            price_monthly: 9.99,
            price_yearly: 99.99,
            limits: limits(&[
                (Sessions, None),
                (Medications, None),
                (NutritionScans, None),
                (CareTeamMembers, Some(5)),
            ]),
            features: features(&[
                SessionLogging,
                VitalsTracking,
                FluidTracking,
                TrendCharts,
                DataExport,
                NutriScanAI,
                CareTeamSharing,
                PrioritySupport,
            ]),
        },
    );

    PlanTable { plans }
}

fn limits(entries: &[(ResourceKey, Option<u32>)]) -> BTreeMap<ResourceKey, Option<u32>> {
    entries.iter().copied().collect()
}

fn features(keys: &[FeatureKey]) -> BTreeSet<FeatureKey> {
    keys.iter().copied().collect()
}

impl PlanTable {
    /// Look up a plan by id
    pub fn get(&self, id: PlanId) -> Option<&PlanConfig> {
        self.plans.get(&id)
    }

    /// Plans in ascending monthly price; equal prices keep id order
    pub fn by_price(&self) -> Vec<&PlanConfig> {
        let mut plans: Vec<_> = self.plans.values().collect();
        plans.sort_by(|a, b| a.price_monthly.total_cmp(&b.price_monthly));
        plans
    }

    /// The most capable plan (highest monthly price)
    pub fn top_plan(&self) -> Option<&PlanConfig> {
        self.by_price().last().copied()
    }

    /// Validate the table for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for id in PlanId::ALL {
            if !self.plans.contains_key(&id) {
                errors.push(format!("Plan '{}' is missing from the table", id));
            }
        }

        for (id, plan) in &self.plans {
            if *id != plan.id {
                errors.push(format!(
                    "Plan key '{}' doesn't match plan.id '{}'",
                    id, plan.id
                ));
            }
            if plan.name.is_empty() {
                errors.push(format!("Plan '{}' has empty name", id));
            }
            if !plan.price_monthly.is_finite() || plan.price_monthly < 0.0 {
                errors.push(format!(
                    "Plan '{}' has invalid monthly price {}",
                    id, plan.price_monthly
                ));
            }
            if !plan.price_yearly.is_finite() || plan.price_yearly < 0.0 {
                errors.push(format!(
                    "Plan '{}' has invalid yearly price {}",
                    id, plan.price_yearly
                ));
            }

            // Every resource must have an explicit limit, even if unlimited
            for resource in ResourceKey::ALL {
                if !plan.limits.contains_key(&resource) {
                    errors.push(format!(
                        "Plan '{}' has no limit entry for resource '{}'",
                        id, resource
                    ));
                }
            }
        }

        // Every feature must be reachable through some plan
        for feature in FeatureKey::ALL {
            if !self.plans.values().any(|p| p.features.contains(&feature)) {
                errors.push(format!("Feature '{}' is not offered by any plan", feature));
            }
        }

        errors
    }
}
