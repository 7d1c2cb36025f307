#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region geometry and regional impact types.
//!
//! These types represent the polygonal regions incidents are attributed to
//! and the per-region summaries derived from that attribution. Geometries
//! always arrive here in canonical form; property-name differences between
//! boundary sources are resolved during ingestion.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A `[lng, lat]` position, in `GeoJSON` order.
pub type Position = [f64; 2];

/// A closed ring of positions. The closing position may be omitted.
pub type Ring = Vec<Position>;

/// Minimum number of positions for a ring to enclose any area.
pub const MIN_RING_POSITIONS: usize = 3;

/// An administrative region boundary in canonical form.
///
/// `polygons` uses `GeoJSON` `MultiPolygon` coordinate nesting: each
/// polygon is a list of rings where the first ring is the exterior and any
/// following rings are holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGeometry {
    /// Region identifier (e.g. the official region code).
    pub id: String,
    /// Human-readable region name.
    pub name: String,
    /// Polygons making up the region.
    pub polygons: Vec<Vec<Ring>>,
}

impl RegionGeometry {
    /// Runs the minimal shape checks required before attribution.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionValidationError`] if the id is empty, there are no
    /// polygons, a polygon has no rings, or a ring has fewer than
    /// [`MIN_RING_POSITIONS`] positions.
    pub fn validate(&self) -> Result<(), RegionValidationError> {
        let fail = |reason| {
            Err(RegionValidationError {
                id: self.id.clone(),
                reason,
            })
        };

        if self.id.trim().is_empty() {
            return fail(RegionDefect::MissingId);
        }
        if self.polygons.is_empty() {
            return fail(RegionDefect::NoPolygons);
        }
        for (index, polygon) in self.polygons.iter().enumerate() {
            if polygon.is_empty() {
                return fail(RegionDefect::EmptyRingList { polygon: index });
            }
            if polygon
                .iter()
                .any(|ring| ring.len() < MIN_RING_POSITIONS)
            {
                return fail(RegionDefect::DegenerateRing { polygon: index });
            }
        }

        Ok(())
    }
}

/// What is wrong with a rejected region geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionDefect {
    /// The id is empty or whitespace.
    MissingId,
    /// The region has no polygons at all.
    NoPolygons,
    /// A polygon has an empty ring list.
    EmptyRingList {
        /// Index of the polygon within the region.
        polygon: usize,
    },
    /// A ring has too few positions to enclose an area.
    DegenerateRing {
        /// Index of the polygon within the region.
        polygon: usize,
    },
}

/// Error returned when a region geometry fails its shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionValidationError {
    /// Id of the offending region (may be empty).
    pub id: String,
    /// The failed check.
    pub reason: RegionDefect,
}

impl std::fmt::Display for RegionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            RegionDefect::MissingId => write!(f, "region geometry has no id"),
            RegionDefect::NoPolygons => write!(f, "region {} has no polygons", self.id),
            RegionDefect::EmptyRingList { polygon } => {
                write!(f, "region {} polygon {polygon} has no rings", self.id)
            }
            RegionDefect::DegenerateRing { polygon } => write!(
                f,
                "region {} polygon {polygon} has a ring with fewer than {MIN_RING_POSITIONS} positions",
                self.id
            ),
        }
    }
}

impl std::error::Error for RegionValidationError {}

/// Coarse classification of a region's active-incident load.
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
pub enum RiskLevel {
    /// No active incidents
    Low,
    /// One or two active incidents
    Medium,
    /// Three or more active incidents
    High,
}

impl RiskLevel {
    /// Active-incident count at which a region becomes high risk.
    pub const HIGH_THRESHOLD: u32 = 3;

    /// Classifies a region by its active-incident count.
    #[must_use]
    pub const fn from_active_count(active: u32) -> Self {
        if active >= Self::HIGH_THRESHOLD {
            Self::High
        } else if active > 0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Per-region attribution summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionImpact {
    /// Region identifier.
    pub id: String,
    /// Region name.
    pub name: String,
    /// Valid incidents whose center lies inside the region.
    pub incident_count: u32,
    /// The subset of those incidents in the active view.
    pub active_incident_count: u32,
    /// Classification derived from `active_incident_count`.
    pub risk_level: RiskLevel,
}

impl RegionImpact {
    /// Builds a summary, deriving the risk level from the active count.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        incident_count: u32,
        active_incident_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            incident_count,
            active_incident_count,
            risk_level: RiskLevel::from_active_count(active_incident_count),
        }
    }
}

/// Active-incident count for one region, used by choropleth layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionActivity {
    /// Region identifier.
    pub id: String,
    /// Active incidents inside the region.
    pub active_incident_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_active_count(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_active_count(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_active_count(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_active_count(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_active_count(40), RiskLevel::High);
    }

    #[test]
    fn valid_geometry_passes() {
        let region = RegionGeometry {
            id: "13".to_string(),
            name: "Metropolitana".to_string(),
            polygons: vec![vec![square()]],
        };
        assert!(region.validate().is_ok());
    }

    #[test]
    fn rejects_missing_id_and_empty_rings() {
        let mut region = RegionGeometry {
            id: String::new(),
            name: "Nowhere".to_string(),
            polygons: vec![vec![square()]],
        };
        assert_eq!(
            region.validate().unwrap_err().reason,
            RegionDefect::MissingId
        );

        region.id = "5".to_string();
        region.polygons = vec![];
        assert_eq!(
            region.validate().unwrap_err().reason,
            RegionDefect::NoPolygons
        );

        region.polygons = vec![vec![square()], vec![]];
        assert_eq!(
            region.validate().unwrap_err().reason,
            RegionDefect::EmptyRingList { polygon: 1 }
        );

        region.polygons = vec![vec![vec![[0.0, 0.0], [1.0, 1.0]]]];
        assert_eq!(
            region.validate().unwrap_err().reason,
            RegionDefect::DegenerateRing { polygon: 0 }
        );
    }

    #[test]
    fn impact_serializes_camel_case() {
        let impact = RegionImpact::new("8", "Biobío", 4, 3);
        let json = serde_json::to_value(&impact).unwrap();
        assert_eq!(json["incidentCount"], 4);
        assert_eq!(json["activeIncidentCount"], 3);
        assert_eq!(json["riskLevel"], "high");
    }
}
