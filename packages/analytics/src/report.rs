//! Report assembly.

use wildfire_impact_analytics_models::{ImpactConfig, Report};
use wildfire_impact_geography_models::RegionGeometry;
use wildfire_impact_incident_models::IncidentSet;
use wildfire_impact_spatial::RegionIndex;

use crate::{
    AnalyticsError,
    capabilities::{Clock, RandomSource},
    climate::regional_climate,
    config::validate,
    damage,
    regions::{active_counts_by_region, rank_indexed},
    resources::{allocate, total_units},
};

fn widen(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Computes a complete impact report for one incident snapshot.
///
/// Every part of the report is derived from `incidents` and `regions`
/// alone. The clock and random source only feed the climate and resource
/// estimates; with a fixed hour and a seeded source the whole report is
/// reproducible.
///
/// Random draws are consumed in a fixed order: climate for each ranked
/// region first, then resources.
///
/// # Errors
///
/// Returns [`AnalyticsError::Configuration`] if `config` fails validation.
/// Malformed regions and incidents are skipped and counted, never fatal.
pub fn assemble(
    incidents: &IncidentSet,
    regions: &[RegionGeometry],
    config: &ImpactConfig,
    clock: &dyn Clock,
    rng: &mut dyn RandomSource,
) -> Result<Report, AnalyticsError> {
    validate(config)?;

    let index = RegionIndex::build(regions);
    let damage = damage::estimate(incidents, config);
    let top_regions = rank_indexed(incidents, &index, config.top_regions);
    let climate = regional_climate(&top_regions, &index, clock, rng);
    let resources = allocate(incidents.active_count(), &config.resources, rng);
    let region_activity = active_counts_by_region(incidents, &index);

    let report = Report {
        burned_area_km2: damage.burned_area_km2,
        burned_hectares: damage.burned_hectares,
        population_at_risk: damage.population_at_risk,
        biomass_tonnes_at_risk: damage.biomass_tonnes_at_risk,
        top_regions,
        climate,
        total_resources: total_units(&resources),
        resources,
        region_activity,
        total_incidents: widen(incidents.len()),
        active_incidents: widen(incidents.active_count()),
        excluded_incidents: widen(incidents.excluded_count()),
        skipped_regions: widen(index.skipped().len()),
    };

    log::info!(
        "Assembled impact report: {} incidents ({} active), {:.1} km² burned, {} ranked regions",
        report.total_incidents,
        report.active_incidents,
        report.burned_area_km2,
        report.top_regions.len()
    );
    log::debug!(
        "Report details: population {:.0}, biomass {:.0} t, {} resource units, {} excluded incidents, {} skipped regions",
        report.population_at_risk,
        report.biomass_tonnes_at_risk,
        report.total_resources,
        report.excluded_incidents,
        report.skipped_regions
    );

    Ok(report)
}
