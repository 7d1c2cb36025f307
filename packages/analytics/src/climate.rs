//! Simulated fire weather for ranked regions.
//!
//! Produces plausible temperature, humidity, and wind readings from the
//! hour of day, the region's latitude, and random events (heat waves, dead
//! calm, mountain gusts). Random draws happen in a fixed order so a seeded
//! source always yields the same readings: temperature (range, heat wave),
//! humidity (range), wind (calm check, then range and gust check).

use wildfire_impact_analytics_models::{ClimateMetric, DangerFlags};
use wildfire_impact_geography_models::RegionImpact;
use wildfire_impact_spatial::RegionIndex;

use crate::capabilities::{Clock, RandomSource};

/// Latitude at which the latitude adjustment vanishes.
const REFERENCE_LATITUDE: f64 = -33.0;

/// Degrees of adjustment per degree of latitude north of the reference.
const LATITUDE_FACTOR: f64 = 1.5;

/// Temperature above which the heat flag is raised, in °C.
pub const HEAT_THRESHOLD_C: i32 = 30;

/// Humidity below which the dryness flag is raised, in percent.
pub const DRYNESS_THRESHOLD_PCT: i32 = 30;

/// Wind above which the wind flag is raised, in km/h.
pub const WIND_THRESHOLD_KMH: i32 = 30;

/// Lowest humidity the simulator reports.
pub const MIN_HUMIDITY_PCT: f64 = 5.0;

/// Whether `hour` lies strictly between `after` and `before`.
const fn hour_between(hour: u32, after: u32, before: u32) -> bool {
    hour > after && hour < before
}

/// Latitude adjustment shared by temperature and humidity. Positive north
/// of the reference latitude (warmer, drier).
fn latitude_offset(centroid_latitude: f64) -> f64 {
    (centroid_latitude - REFERENCE_LATITUDE) * LATITUDE_FACTOR
}

#[allow(clippy::cast_possible_truncation)]
fn to_whole(value: f64) -> i32 {
    value.round() as i32
}

/// Air temperature in °C before rounding.
fn temperature(hour: u32, offset: f64, rng: &mut dyn RandomSource) -> f64 {
    let base = if hour_between(hour, 11, 19) { 32.0 } else { 22.0 };
    let mut value = base + rng.uniform(0.0, 8.0);
    // Heat wave, 30% of the time.
    if rng.unit() > 0.7 {
        value += 6.0;
    }
    value + offset
}

/// Relative humidity in percent before rounding.
fn humidity(hour: u32, offset: f64, rng: &mut dyn RandomSource) -> f64 {
    let dry_afternoon = hour_between(hour, 12, 20);
    let (base, spread) = if dry_afternoon { (8.0, 15.0) } else { (40.0, 30.0) };
    (base + rng.uniform(0.0, spread) - offset * 0.5).max(MIN_HUMIDITY_PCT)
}

/// Wind speed in km/h before rounding.
fn wind(hour: u32, rng: &mut dyn RandomSource) -> f64 {
    // Dead calm, 20% of the time.
    if rng.unit() < 0.2 {
        return rng.uniform(0.0, 2.0);
    }

    let base = if hour_between(hour, 15, 21) { 25.0 } else { 5.0 };
    let mut value = base + rng.uniform(0.0, 20.0);
    // Dry mountain gust, 20% of the time.
    if rng.unit() > 0.8 {
        value += 25.0;
    }
    value
}

/// Samples the weather for one region.
///
/// `centroid_latitude` is the latitude of the region's centroid. The
/// result depends only on the injected hour and random draws.
#[must_use]
pub fn sample_region_climate(
    region: &RegionImpact,
    centroid_latitude: f64,
    clock: &dyn Clock,
    rng: &mut dyn RandomSource,
) -> ClimateMetric {
    let hour = clock.current_hour();
    let offset = latitude_offset(centroid_latitude);

    let temperature_c = to_whole(temperature(hour, offset, rng));
    let humidity_pct = to_whole(humidity(hour, offset, rng));
    let wind_kmh = to_whole(wind(hour, rng));

    let danger_flags = DangerFlags {
        heat: temperature_c > HEAT_THRESHOLD_C,
        dryness: humidity_pct < DRYNESS_THRESHOLD_PCT,
        wind: wind_kmh > WIND_THRESHOLD_KMH,
    };
    log::debug!(
        "Region {} at {hour}:00: {temperature_c} °C, {humidity_pct}% humidity, {wind_kmh} km/h wind, {} danger flags",
        region.id,
        danger_flags.count()
    );

    ClimateMetric {
        region_id: region.id.clone(),
        region_name: region.name.clone(),
        temperature_c,
        humidity_pct,
        wind_kmh,
        danger_flags,
    }
}

/// Samples the weather for every ranked region, in ranking order.
///
/// Regions with no geometry in `index` are skipped.
#[must_use]
pub fn regional_climate(
    ranked: &[RegionImpact],
    index: &RegionIndex,
    clock: &dyn Clock,
    rng: &mut dyn RandomSource,
) -> Vec<ClimateMetric> {
    ranked
        .iter()
        .filter_map(|region| {
            let Some((_, lat)) = index.centroid(&region.id) else {
                log::warn!("No geometry for ranked region {}, skipping climate", region.id);
                return None;
            };
            Some(sample_region_climate(region, lat, clock, rng))
        })
        .collect()
}
