//! Normalizes raw `GeoJSON` features into [`RegionGeometry`] values.
//!
//! Uses a [`RegionFieldMapping`] to extract the region id and name from
//! each feature, regardless of the publisher-specific property naming.

use std::path::Path;

use geojson::{Feature, GeoJson, PolygonType, feature::Id};
use regex::Regex;
use wildfire_impact_geography_models::{Position, RegionGeometry, Ring};

use crate::GeoError;

/// Name given to regions whose features carry no usable name property.
pub const UNKNOWN_REGION_NAME: &str = "Unknown";

/// Property keys to try, in order, when extracting region ids and names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFieldMapping {
    /// Candidate id properties. The feature-level `id` member is the fallback.
    pub id_properties: Vec<String>,
    /// Candidate name properties.
    pub name_properties: Vec<String>,
}

impl Default for RegionFieldMapping {
    fn default() -> Self {
        Self {
            id_properties: vec!["codregion".to_string(), "id".to_string()],
            name_properties: vec![
                "Region".to_string(),
                "NOM_REG".to_string(),
                "name".to_string(),
            ],
        }
    }
}

/// Reads a `GeoJSON` file and normalizes its features.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read or is not valid `GeoJSON`.
pub fn load_regions(
    path: &Path,
    fields: &RegionFieldMapping,
) -> Result<Vec<RegionGeometry>, GeoError> {
    let body = std::fs::read_to_string(path)?;
    let regions = normalize_geojson_str(&body, fields)?;
    log::info!(
        "Loaded {} regions from {}",
        regions.len(),
        path.display()
    );
    Ok(regions)
}

/// Parses a `GeoJSON` document and normalizes its features.
///
/// Accepts a `FeatureCollection` or a single `Feature`. Features without a
/// polygonal geometry or an identifiable id are skipped.
///
/// # Errors
///
/// Returns [`GeoError`] if the document is not valid `GeoJSON` or is a bare
/// geometry with no feature wrapper.
pub fn normalize_geojson_str(
    body: &str,
    fields: &RegionFieldMapping,
) -> Result<Vec<RegionGeometry>, GeoError> {
    let features = match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(GeoError::Conversion {
                message: "expected a Feature or FeatureCollection, found a bare geometry"
                    .to_string(),
            });
        }
    };

    Ok(normalize_features(&features, fields))
}

/// Normalizes a list of `GeoJSON` features into region geometries.
#[must_use]
pub fn normalize_features(features: &[Feature], fields: &RegionFieldMapping) -> Vec<RegionGeometry> {
    let cleaner = NameCleaner::new();
    let regions: Vec<RegionGeometry> = features
        .iter()
        .filter_map(|feature| normalize_feature(feature, fields, &cleaner))
        .collect();

    let dropped = features.len() - regions.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} features without an id or polygonal geometry");
    }

    regions
}

/// Normalizes a single `GeoJSON` feature.
fn normalize_feature(
    feature: &Feature,
    fields: &RegionFieldMapping,
    cleaner: &NameCleaner,
) -> Option<RegionGeometry> {
    let id = extract_id(feature, fields)?;

    let name = fields
        .name_properties
        .iter()
        .find_map(|key| property_string(feature, key))
        .map_or_else(|| UNKNOWN_REGION_NAME.to_string(), |raw| cleaner.clean(&raw));

    let polygons = match &feature.geometry.as_ref()?.value {
        geojson::Value::Polygon(rings) => vec![convert_rings(rings)],
        geojson::Value::MultiPolygon(polygons) => {
            polygons.iter().map(|rings| convert_rings(rings)).collect()
        }
        _ => {
            log::debug!("Region {id} has non-polygonal geometry, skipping");
            return None;
        }
    };

    Some(RegionGeometry { id, name, polygons })
}

/// Configured id properties first, then the feature-level `id` member.
fn extract_id(feature: &Feature, fields: &RegionFieldMapping) -> Option<String> {
    fields
        .id_properties
        .iter()
        .find_map(|key| property_string(feature, key))
        .or_else(|| {
            feature
                .id
                .as_ref()
                .map(|id| match id {
                    Id::String(s) => s.trim().to_string(),
                    Id::Number(n) => n.to_string(),
                })
                .filter(|s| !s.is_empty())
        })
}

/// Reads a property as a trimmed, non-empty string. Numeric codes are
/// rendered in their JSON form.
fn property_string(feature: &Feature, key: &str) -> Option<String> {
    let value = feature.property(key)?;
    let s = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(s).filter(|s| !s.is_empty())
}

fn convert_rings(rings: &PolygonType) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| ring.iter().filter_map(|p| to_position(p)).collect())
        .collect()
}

fn to_position(coords: &[f64]) -> Option<Position> {
    match coords {
        [lng, lat, ..] => Some([*lng, *lat]),
        _ => None,
    }
}

/// Shortens official region names to the form shown on the dashboard.
struct NameCleaner {
    affixes: Regex,
}

impl NameCleaner {
    fn new() -> Self {
        Self {
            affixes: Regex::new(r"(?i)^Región(?:\s+de)?(?:l\s+|\s+)|\s+de\s+Santiago$")
                .unwrap_or_else(|_| unreachable!()),
        }
    }

    fn clean(&self, raw: &str) -> String {
        self.affixes
            .replace_all(raw.trim(), "")
            .replace("Libertador Bernardo O'Higgins", "O'Higgins")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "codregion": 13, "Region": "Región Metropolitana de Santiago" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.0, -34.0], [-70.0, -34.0], [-70.0, -33.0], [-71.0, -33.0], [-71.0, -34.0]]]
                }
            },
            {
                "type": "Feature",
                "id": "8",
                "properties": { "NOM_REG": "Región del Biobío" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-73.0, -38.0], [-72.0, -38.0], [-72.0, -37.0], [-73.0, -37.0], [-73.0, -38.0]]],
                        [[[-74.0, -38.0], [-73.5, -38.0], [-73.5, -37.5], [-74.0, -37.5], [-74.0, -38.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "codregion": 99 },
                "geometry": { "type": "Point", "coordinates": [-70.0, -30.0] }
            },
            {
                "type": "Feature",
                "properties": { "Region": "No id here" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn normalizes_collection() {
        let regions = normalize_geojson_str(COLLECTION, &RegionFieldMapping::default()).unwrap();

        assert_eq!(regions.len(), 2);

        assert_eq!(regions[0].id, "13");
        assert_eq!(regions[0].name, "Metropolitana");
        assert_eq!(regions[0].polygons.len(), 1);
        assert_eq!(regions[0].polygons[0][0].len(), 5);

        assert_eq!(regions[1].id, "8");
        assert_eq!(regions[1].name, "Biobío");
        assert_eq!(regions[1].polygons.len(), 2);
    }

    #[test]
    fn missing_name_falls_back_to_unknown() {
        let body = r#"{
            "type": "Feature",
            "properties": { "id": "x" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }
        }"#;
        let regions = normalize_geojson_str(body, &RegionFieldMapping::default()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, UNKNOWN_REGION_NAME);
    }

    #[test]
    fn bare_geometry_is_rejected() {
        let body = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(matches!(
            normalize_geojson_str(body, &RegionFieldMapping::default()),
            Err(GeoError::Conversion { .. })
        ));
    }

    #[test]
    fn id_property_wins_over_feature_id() {
        let body = r#"{
            "type": "Feature",
            "id": 0,
            "properties": { "codregion": 7, "Region": "Región del Maule" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }
        }"#;
        let regions = normalize_geojson_str(body, &RegionFieldMapping::default()).unwrap();
        assert_eq!(regions[0].id, "7");
        assert_eq!(regions[0].name, "Maule");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(normalize_geojson_str("not json", &RegionFieldMapping::default()).is_err());
    }

    #[test]
    fn cleans_official_names() {
        let cleaner = NameCleaner::new();
        assert_eq!(cleaner.clean("Región de Valparaíso"), "Valparaíso");
        assert_eq!(cleaner.clean("Región del Maule"), "Maule");
        assert_eq!(
            cleaner.clean("Región del Libertador Bernardo O'Higgins"),
            "O'Higgins"
        );
        assert_eq!(cleaner.clean("Región de La Araucanía"), "La Araucanía");
        assert_eq!(cleaner.clean("Ñuble"), "Ñuble");
    }
}
