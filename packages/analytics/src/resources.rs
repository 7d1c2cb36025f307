//! Deployed-resource estimate proportional to active-incident load.

use wildfire_impact_analytics_models::{ResourceAllocation, ResourceConfig};

use crate::capabilities::RandomSource;

/// Load factor for the given number of active incidents.
///
/// `active / load_divisor` clamped to `[min_factor, max_factor]`.
#[must_use]
pub fn load_factor(active_count: usize, config: &ResourceConfig) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let active = active_count as f64;
    (active / config.load_divisor)
        .max(config.min_factor)
        .min(config.max_factor)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Estimates deployed units for every configured category.
///
/// Draws one uniform value per category, in configuration order, scales it
/// by the load factor and the category multiplier, and adds the category's
/// large-incident bonus when the load factor exceeds the configured
/// threshold. The result is sorted by descending count; ties keep
/// configuration order.
#[must_use]
pub fn allocate(
    active_count: usize,
    config: &ResourceConfig,
    rng: &mut dyn RandomSource,
) -> Vec<ResourceAllocation> {
    let factor = load_factor(active_count, config);
    let large = factor > config.large_incident_factor;

    let mut allocations: Vec<ResourceAllocation> = config
        .categories
        .iter()
        .map(|bounds| {
            let drawn = rng.uniform(bounds.low, bounds.high);
            let mut count = to_count(drawn * factor * bounds.multiplier);
            if large {
                count += bounds.large_incident_bonus;
            }
            ResourceAllocation {
                category: bounds.category,
                count,
            }
        })
        .collect();

    allocations.sort_by(|a, b| b.count.cmp(&a.count));

    if log::log_enabled!(log::Level::Debug) {
        let summary: Vec<String> = allocations
            .iter()
            .map(|a| format!("{} {}", a.category.label(), a.count))
            .collect();
        log::debug!(
            "Allocated resources for {active_count} active incidents (factor {factor:.2}): {}",
            summary.join(", ")
        );
    }

    allocations
}

/// Sum of all allocated units.
#[must_use]
pub fn total_units(allocations: &[ResourceAllocation]) -> u64 {
    allocations.iter().map(|a| u64::from(a.count)).sum()
}
