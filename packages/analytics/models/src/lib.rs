#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Impact report types and analytics configuration.
//!
//! Defines the immutable [`Report`] snapshot handed to the dashboard, the
//! derived climate and resource records it carries, and the
//! [`ImpactConfig`] tables that parameterize the estimates.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use wildfire_impact_geography_models::{RegionActivity, RegionImpact};

/// Which fire-weather thresholds a region's sampled conditions exceed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerFlags {
    /// Temperature above 30 °C.
    pub heat: bool,
    /// Relative humidity below 30 %.
    pub dryness: bool,
    /// Wind above 30 km/h.
    pub wind: bool,
}

impl DangerFlags {
    /// Number of raised flags.
    #[must_use]
    pub fn count(self) -> u8 {
        u8::from(self.heat) + u8::from(self.dryness) + u8::from(self.wind)
    }
}

/// Simulated weather for one ranked region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateMetric {
    /// Region identifier.
    pub region_id: String,
    /// Region name.
    pub region_name: String,
    /// Air temperature in °C.
    pub temperature_c: i32,
    /// Relative humidity in percent (never below 5).
    pub humidity_pct: i32,
    /// Wind speed in km/h.
    pub wind_kmh: i32,
    /// Threshold exceedances.
    pub danger_flags: DangerFlags,
}

/// Deployed-resource categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceCategory {
    /// Firefighting ground personnel
    GroundCrew,
    /// Fire engines and brigade units
    FireApparatus,
    /// Helicopters and air tankers
    Aircraft,
    /// Bulldozers and other heavy equipment
    HeavyMachinery,
}

impl ResourceCategory {
    /// Label shown on the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GroundCrew => "Ground crew",
            Self::FireApparatus => "Fire apparatus",
            Self::Aircraft => "Aerial units",
            Self::HeavyMachinery => "Heavy machinery",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GroundCrew,
            Self::FireApparatus,
            Self::Aircraft,
            Self::HeavyMachinery,
        ]
    }
}

/// Estimated count of one deployed resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    /// Resource category.
    pub category: ResourceCategory,
    /// Estimated units deployed.
    pub count: u32,
}

/// The consolidated impact snapshot consumed by the dashboard.
///
/// Assembled fresh for each computation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Overlap-corrected, intensity-weighted burned area in km².
    pub burned_area_km2: f64,
    /// The same area in hectares.
    pub burned_hectares: f64,
    /// Estimated people inside active fire footprints.
    pub population_at_risk: f64,
    /// Estimated combustible biomass inside active footprints, in tonnes.
    pub biomass_tonnes_at_risk: f64,
    /// Most affected regions, most incidents first.
    pub top_regions: Vec<RegionImpact>,
    /// Simulated weather for each entry of `top_regions`.
    pub climate: Vec<ClimateMetric>,
    /// Resource estimate, largest first.
    pub resources: Vec<ResourceAllocation>,
    /// Sum of all resource counts.
    pub total_resources: u64,
    /// Active-incident counts for every attributable region, in input order.
    pub region_activity: Vec<RegionActivity>,
    /// Records in the analysed snapshot, false alarms included.
    pub total_incidents: u64,
    /// Records in the active view.
    pub active_incidents: u64,
    /// Malformed incident records dropped before analysis.
    pub excluded_incidents: u64,
    /// Region geometries that failed validation and were not attributed.
    pub skipped_regions: u64,
}

/// One density band of the population estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityTier {
    /// Applies to incidents with `radius_km` strictly below this value.
    pub max_radius_km: f64,
    /// Persons per km².
    pub density: f64,
}

/// Population estimate parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Bands checked in order; the first match wins.
    pub tiers: Vec<DensityTier>,
    /// Persons per km² when no band matches.
    pub fallback_density: f64,
    /// Floor applied to incident intensity.
    pub min_effective_intensity: f64,
}

/// One latitude band of the biomass estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomassTier {
    /// Applies to incidents with latitude strictly below this value.
    pub below_latitude: f64,
    /// Fuel load in tonnes per hectare.
    pub tonnes_per_hectare: f64,
}

/// Biomass estimate parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomassConfig {
    /// Bands checked in order; the first match wins.
    pub tiers: Vec<BiomassTier>,
    /// Fuel load when no band matches.
    pub fallback_tonnes_per_hectare: f64,
}

/// Sampling bounds for one resource category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceBounds {
    /// Category these bounds apply to.
    pub category: ResourceCategory,
    /// Lower bound of the uniform draw.
    pub low: f64,
    /// Upper bound of the uniform draw.
    pub high: f64,
    /// Scale applied after the load factor.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Units added when the load factor exceeds the large-incident threshold.
    #[serde(default)]
    pub large_incident_bonus: u32,
}

const fn default_multiplier() -> f64 {
    1.0
}

/// Resource allocation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Active incidents per unit of load factor.
    pub load_divisor: f64,
    /// Lower clamp of the load factor.
    pub min_factor: f64,
    /// Upper clamp of the load factor.
    pub max_factor: f64,
    /// Load factor above which large-incident bonuses apply.
    pub large_incident_factor: f64,
    /// Exactly one entry per [`ResourceCategory`].
    pub categories: Vec<ResourceBounds>,
}

/// Tables and constants parameterizing the impact estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Maximum number of ranked regions.
    pub top_regions: usize,
    /// Flat-plane conversion from degrees to kilometers.
    pub km_per_degree: f64,
    /// Hectares in one km².
    pub hectares_per_km2: f64,
    /// Population estimate.
    pub population: PopulationConfig,
    /// Biomass estimate.
    pub biomass: BiomassConfig,
    /// Resource estimate.
    pub resources: ResourceConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_flag_count() {
        let flags = DangerFlags {
            heat: true,
            dryness: false,
            wind: true,
        };
        assert_eq!(flags.count(), 2);
        assert_eq!(DangerFlags::default().count(), 0);
    }

    #[test]
    fn resource_category_round_trips_through_strings() {
        for category in ResourceCategory::all() {
            let parsed: ResourceCategory = category.as_ref().parse().unwrap();
            assert_eq!(parsed, *category);
            assert!(!category.label().is_empty());
        }
    }

    #[test]
    fn resource_bounds_default_multiplier() {
        let bounds: ResourceBounds =
            serde_json::from_str(r#"{"category":"aircraft","low":5.0,"high":15.0}"#).unwrap();
        assert!((bounds.multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(bounds.large_incident_bonus, 0);
    }

    #[test]
    fn climate_metric_serializes_camel_case() {
        let metric = ClimateMetric {
            region_id: "7".to_string(),
            region_name: "Maule".to_string(),
            temperature_c: 34,
            humidity_pct: 12,
            wind_kmh: 41,
            danger_flags: DangerFlags {
                heat: true,
                dryness: true,
                wind: true,
            },
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["temperatureC"], 34);
        assert_eq!(json["dangerFlags"]["dryness"], true);
    }
}
