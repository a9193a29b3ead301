//! Usage limits and feature gating against the plan table.
//!
//! A limit of `None` is unlimited and never takes part in arithmetic.

use crate::plans::get_default_plans;
use crate::{
    FeatureKey, PlanConfig, PlanId, PlanTable, Remaining, ResourceKey, UsageItem,
    UsageSnapshot,
};

/// Percent used at which a resource counts as nearly exhausted
pub const NEAR_LIMIT_PERCENT: u8 = 80;

/// Compute the usage status of a resource from its count and limit
pub fn compute_usage_item(current: u32, limit: Option<u32>) -> UsageItem {
    let Some(limit) = limit else {
        return UsageItem {
            current,
            limit: None,
            remaining: Remaining::Unlimited,
            percent_used: 0,
            unlimited: true,
            at_limit: false,
            near_limit: false,
        };
    };

    let remaining = limit.saturating_sub(current);
    let percent_used = if limit == 0 {
        100
    } else {
        let ratio = f64::from(current) / f64::from(limit) * 100.0;
        ratio.min(100.0).round() as u8
    };

    UsageItem {
        current,
        limit: Some(limit),
        remaining: Remaining::Finite(remaining),
        percent_used,
        unlimited: false,
        at_limit: remaining == 0,
        near_limit: percent_used >= NEAR_LIMIT_PERCENT,
    }
}

/// Whether one more item of the resource may be created
pub fn can_add_resource(usage: &UsageItem) -> bool {
    usage.unlimited || usage.remaining.is_available()
}

/// Literal membership test; plans never inherit features
pub fn has_feature(plan: &PlanConfig, feature: FeatureKey) -> bool {
    plan.features.contains(&feature)
}

/// Whether the user's current plan lacks the feature
pub fn requires_upgrade(current_plan: PlanId, feature: FeatureKey) -> bool {
    requires_upgrade_in(get_default_plans(), current_plan, feature)
}

/// [`requires_upgrade`] against an explicit table
pub fn requires_upgrade_in(table: &PlanTable, current_plan: PlanId, feature: FeatureKey) -> bool {
    match table.get(current_plan) {
        Some(plan) => !has_feature(plan, feature),
        None => {
            tracing::warn!("Plan '{}' not in table, treating as upgrade required", current_plan);
            true
        }
    }
}

/// Cheapest plan offering the feature
pub fn minimum_plan_for_feature(feature: FeatureKey) -> PlanId {
    minimum_plan_for_feature_in(get_default_plans(), feature)
}

/// [`minimum_plan_for_feature`] against an explicit table
///
/// Falls back to the most capable plan when no plan lists the feature.
pub fn minimum_plan_for_feature_in(table: &PlanTable, feature: FeatureKey) -> PlanId {
    let plans = table.by_price();

    if let Some(plan) = plans.iter().find(|p| has_feature(p, feature)) {
        return plan.id;
    }

    tracing::warn!(
        "No plan offers feature '{}', falling back to the top plan",
        feature
    );
    plans.last().map(|p| p.id).unwrap_or(PlanId::Premium)
}

/// Usage status of a resource under a plan
///
/// A resource missing from the plan's limits is treated as capped at zero.
pub fn usage_for(plan: &PlanConfig, resource: ResourceKey, current: u32) -> UsageItem {
    let limit = plan.limits.get(&resource).copied().unwrap_or(Some(0));
    compute_usage_item(current, limit)
}

/// Usage status of every resource for a snapshot, in resource order
///
/// Resources absent from the snapshot count as zero used.
pub fn usage_report(plan: &PlanConfig, snapshot: &UsageSnapshot) -> Vec<(ResourceKey, UsageItem)> {
    if !snapshot.status.is_entitled() {
        tracing::info!(
            "Subscription status is {:?}; limits shown for plan '{}'",
            snapshot.status,
            plan.id
        );
    }

    ResourceKey::ALL
        .into_iter()
        .map(|resource| {
            let current = snapshot.counts.get(&resource).copied().unwrap_or(0);
            (resource, usage_for(plan, resource, current))
        })
        .collect()
}
