//! Loading and validation of the estimate tables.
//!
//! The default tables ship inside the binary (`config/default.toml`).
//! Operators may supply their own TOML file with the same schema; either
//! way the tables are checked by [`validate`] before any estimate runs.

use std::collections::BTreeSet;
use std::path::Path;

use wildfire_impact_analytics_models::{ImpactConfig, ResourceCategory};

use crate::AnalyticsError;

/// The embedded default tables.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Parses and validates the embedded default tables.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the embedded TOML is malformed or fails
/// validation. Both indicate a development error.
pub fn default_config() -> Result<ImpactConfig, AnalyticsError> {
    parse_config(DEFAULT_CONFIG_TOML)
}

/// Parses and validates tables from a TOML string.
///
/// # Errors
///
/// Returns [`AnalyticsError::Toml`] on syntax or schema errors and
/// [`AnalyticsError::Configuration`] if the tables are inconsistent.
pub fn parse_config(toml_str: &str) -> Result<ImpactConfig, AnalyticsError> {
    let config: ImpactConfig = toml::de::from_str(toml_str)?;
    validate(&config)?;
    Ok(config)
}

/// Reads, parses, and validates tables from a TOML file.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be read, parsed, or
/// validated.
pub fn load_config(path: &Path) -> Result<ImpactConfig, AnalyticsError> {
    let body = std::fs::read_to_string(path)?;
    let config = parse_config(&body)?;
    log::info!("Loaded impact configuration from {}", path.display());
    Ok(config)
}

fn misconfigured(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::Configuration {
        message: message.into(),
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Checks that every table needed by the estimates is present and sane.
///
/// # Errors
///
/// Returns [`AnalyticsError::Configuration`] describing the first problem
/// found.
pub fn validate(config: &ImpactConfig) -> Result<(), AnalyticsError> {
    if config.top_regions == 0 {
        return Err(misconfigured("top_regions must be at least 1"));
    }
    if !is_positive(config.km_per_degree) {
        return Err(misconfigured("km_per_degree must be positive"));
    }
    if !is_positive(config.hectares_per_km2) {
        return Err(misconfigured("hectares_per_km2 must be positive"));
    }

    validate_population(config)?;
    validate_biomass(config)?;
    validate_resources(config)
}

fn validate_population(config: &ImpactConfig) -> Result<(), AnalyticsError> {
    let population = &config.population;

    if population.tiers.is_empty() {
        return Err(misconfigured("population density tier table is empty"));
    }
    if !is_non_negative(population.fallback_density) {
        return Err(misconfigured("population fallback density must be >= 0"));
    }
    if !(0.0..=1.0).contains(&population.min_effective_intensity) {
        return Err(misconfigured(
            "population min_effective_intensity must be within 0.0-1.0",
        ));
    }

    let mut previous = 0.0;
    for tier in &population.tiers {
        if !is_positive(tier.max_radius_km) || tier.max_radius_km <= previous {
            return Err(misconfigured(format!(
                "population tier radius {} must be positive and ascending",
                tier.max_radius_km
            )));
        }
        if !is_non_negative(tier.density) {
            return Err(misconfigured(format!(
                "population tier density {} must be >= 0",
                tier.density
            )));
        }
        previous = tier.max_radius_km;
    }

    Ok(())
}

fn validate_biomass(config: &ImpactConfig) -> Result<(), AnalyticsError> {
    let biomass = &config.biomass;

    if biomass.tiers.is_empty() {
        return Err(misconfigured("biomass tonnage tier table is empty"));
    }
    if !is_non_negative(biomass.fallback_tonnes_per_hectare) {
        return Err(misconfigured("biomass fallback tonnage must be >= 0"));
    }

    let mut previous = f64::NEG_INFINITY;
    for tier in &biomass.tiers {
        if !tier.below_latitude.is_finite() || tier.below_latitude <= previous {
            return Err(misconfigured(format!(
                "biomass tier latitude {} must be finite and ascending",
                tier.below_latitude
            )));
        }
        if !is_non_negative(tier.tonnes_per_hectare) {
            return Err(misconfigured(format!(
                "biomass tier tonnage {} must be >= 0",
                tier.tonnes_per_hectare
            )));
        }
        previous = tier.below_latitude;
    }

    Ok(())
}

fn validate_resources(config: &ImpactConfig) -> Result<(), AnalyticsError> {
    let resources = &config.resources;

    if !is_positive(resources.load_divisor) {
        return Err(misconfigured("resource load_divisor must be positive"));
    }
    if !is_non_negative(resources.min_factor)
        || !resources.max_factor.is_finite()
        || resources.min_factor > resources.max_factor
    {
        return Err(misconfigured(
            "resource load factor bounds must satisfy 0 <= min_factor <= max_factor",
        ));
    }

    let mut seen = BTreeSet::new();
    for bounds in &resources.categories {
        if !seen.insert(bounds.category) {
            return Err(misconfigured(format!(
                "resource category {} is configured more than once",
                bounds.category
            )));
        }
        if !is_non_negative(bounds.low) || !bounds.high.is_finite() || bounds.low > bounds.high {
            return Err(misconfigured(format!(
                "resource category {} bounds must satisfy 0 <= low <= high",
                bounds.category
            )));
        }
        if !is_non_negative(bounds.multiplier) {
            return Err(misconfigured(format!(
                "resource category {} multiplier must be >= 0",
                bounds.category
            )));
        }
    }

    if let Some(missing) = ResourceCategory::all()
        .iter()
        .find(|category| !seen.contains(*category))
    {
        return Err(misconfigured(format!(
            "resource category {missing} has no bounds"
        )));
    }

    Ok(())
}
