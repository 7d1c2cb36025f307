//! Environmental and social damage estimates.
//!
//! Incident footprints are circles. Burned area removes footprints that lie
//! entirely inside a larger one; partial overlaps are still counted twice.
//! This is a known approximation, not a polygon union.

use std::f64::consts::PI;

use wildfire_impact_analytics_models::{BiomassConfig, ImpactConfig, PopulationConfig};
use wildfire_impact_incident_models::{Incident, IncidentSet};

/// Damage figures for one incident snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageEstimate {
    /// Intensity-weighted burned area in km².
    pub burned_area_km2: f64,
    /// The same area in hectares.
    pub burned_hectares: f64,
    /// People inside active footprints.
    pub population_at_risk: f64,
    /// Biomass inside active footprints, in tonnes.
    pub biomass_tonnes_at_risk: f64,
}

/// Computes every damage figure for a snapshot.
///
/// Burned area uses the valid view; population and biomass use the active
/// view.
#[must_use]
pub fn estimate(incidents: &IncidentSet, config: &ImpactConfig) -> DamageEstimate {
    let burned_area_km2 = burned_area_km2(incidents.valid(), config.km_per_degree);

    DamageEstimate {
        burned_area_km2,
        burned_hectares: burned_area_km2 * config.hectares_per_km2,
        population_at_risk: population_at_risk(incidents.active(), &config.population),
        biomass_tonnes_at_risk: biomass_at_risk(
            incidents.active(),
            &config.biomass,
            config.hectares_per_km2,
        ),
    }
}

/// Area of a circle of the given radius, in km².
#[must_use]
pub fn circle_area_km2(radius_km: f64) -> f64 {
    PI * radius_km * radius_km
}

/// Flat-plane distance between two incident centers in km.
fn center_distance_km(a: &Incident, b: &Incident, km_per_degree: f64) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng) * km_per_degree
}

/// Whether `inner`'s footprint lies entirely inside `outer`'s.
#[must_use]
pub fn is_subsumed(inner: &Incident, outer: &Incident, km_per_degree: f64) -> bool {
    center_distance_km(inner, outer, km_per_degree) + inner.radius_km <= outer.radius_km
}

/// Intensity-weighted burned area with fully contained footprints removed.
///
/// Incidents are visited largest radius first (ties keep input order). Each
/// one is compared against every incident visited before it; if any of
/// those fully contains it, it adds nothing. Subsumed incidents still join
/// the visited list.
pub fn burned_area_km2<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    km_per_degree: f64,
) -> f64 {
    let mut by_size: Vec<&Incident> = incidents.into_iter().collect();
    by_size.sort_by(|a, b| b.radius_km.total_cmp(&a.radius_km));

    let mut visited: Vec<&Incident> = Vec::with_capacity(by_size.len());
    let mut total = 0.0;

    for current in by_size {
        let subsumed = visited
            .iter()
            .any(|larger| is_subsumed(current, larger, km_per_degree));

        if subsumed {
            log::trace!("Incident {} lies inside a larger footprint", current.id);
        } else {
            total += circle_area_km2(current.radius_km) * current.intensity;
        }

        visited.push(current);
    }

    total
}

/// Persons per km² for a footprint of the given radius.
#[must_use]
pub fn density_for_radius(radius_km: f64, population: &PopulationConfig) -> f64 {
    population
        .tiers
        .iter()
        .find(|tier| radius_km < tier.max_radius_km)
        .map_or(population.fallback_density, |tier| tier.density)
}

/// Estimated people inside the given footprints.
pub fn population_at_risk<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    population: &PopulationConfig,
) -> f64 {
    incidents
        .into_iter()
        .map(|incident| {
            let area = circle_area_km2(incident.radius_km);
            let density = density_for_radius(incident.radius_km, population);
            let intensity = incident.intensity.max(population.min_effective_intensity);
            (area * density * intensity).max(0.0)
        })
        .fold(0.0, |total, people| total + people)
}

/// Fuel load in tonnes per hectare at the given latitude.
#[must_use]
pub fn tonnes_per_hectare(lat: f64, biomass: &BiomassConfig) -> f64 {
    biomass
        .tiers
        .iter()
        .find(|tier| lat < tier.below_latitude)
        .map_or(biomass.fallback_tonnes_per_hectare, |tier| {
            tier.tonnes_per_hectare
        })
}

/// Estimated combustible biomass inside the given footprints, in tonnes.
pub fn biomass_at_risk<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    biomass: &BiomassConfig,
    hectares_per_km2: f64,
) -> f64 {
    incidents
        .into_iter()
        .map(|incident| {
            let hectares = circle_area_km2(incident.radius_km) * hectares_per_km2;
            hectares * tonnes_per_hectare(incident.lat, biomass) * incident.intensity
        })
        .fold(0.0, |total, tonnes| total + tonnes)
}
