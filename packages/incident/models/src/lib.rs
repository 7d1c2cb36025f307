#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wildfire incident records and status taxonomy.
//!
//! This crate defines the canonical incident record consumed by the impact
//! analytics pipeline, and [`IncidentSet`], the read-only snapshot every
//! report is computed from. Upstream data sources (including the synthetic
//! generator) produce plain [`Incident`] values; the set validates them once
//! at construction and exposes the `valid` and `active` views.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle status of a wildfire incident.
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
pub enum IncidentStatus {
    /// Reported by a sensor or observer, not yet verified
    Detected,
    /// Verified and burning uncontrolled
    Confirmed,
    /// Still burning but under control
    Contained,
    /// Resolved
    Extinguished,
    /// Turned out not to be a fire
    FalseAlarm,
}

impl IncidentStatus {
    /// Whether incidents with this status take part in any aggregate.
    ///
    /// Only false alarms are excluded.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::FalseAlarm)
    }

    /// Whether incidents with this status belong to the active view.
    ///
    /// The active view is the valid view minus contained incidents. It drives
    /// the population, biomass, resource-load and regional risk figures.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.is_valid() && !matches!(self, Self::Contained)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Detected,
            Self::Confirmed,
            Self::Contained,
            Self::Extinguished,
            Self::FalseAlarm,
        ]
    }
}

/// A single wildfire occurrence with location, extent, and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Source-assigned identifier.
    pub id: String,
    /// Latitude of the fire center, in degrees.
    pub lat: f64,
    /// Longitude of the fire center, in degrees.
    pub lng: f64,
    /// Fire intensity in `[0, 1]`.
    pub intensity: f64,
    /// Current lifecycle status.
    pub status: IncidentStatus,
    /// Radius of the circular footprint in kilometers (strictly positive).
    pub radius_km: f64,
    /// Optional human-readable place name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Incident {
    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidIncidentError`] describing the first violated
    /// invariant: an empty id, non-finite coordinates, an intensity outside
    /// `[0, 1]`, or a radius that is not a finite positive number.
    pub fn validate(&self) -> Result<(), InvalidIncidentError> {
        let defect = if self.id.trim().is_empty() {
            Some(IncidentDefect::MissingId)
        } else if !self.lat.is_finite() || !self.lng.is_finite() {
            Some(IncidentDefect::NonFiniteCoordinates)
        } else if !(0.0..=1.0).contains(&self.intensity) {
            Some(IncidentDefect::IntensityOutOfRange(self.intensity))
        } else if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            Some(IncidentDefect::NonPositiveRadius(self.radius_km))
        } else {
            None
        };

        defect.map_or(Ok(()), |defect| {
            Err(InvalidIncidentError {
                id: self.id.clone(),
                defect,
            })
        })
    }

    /// The incident center as an `(lng, lat)` pair, matching `GeoJSON`
    /// position order.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

/// What is wrong with a rejected incident record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IncidentDefect {
    /// The id is empty or whitespace.
    MissingId,
    /// Latitude or longitude is NaN or infinite.
    NonFiniteCoordinates,
    /// Intensity lies outside `[0, 1]`.
    IntensityOutOfRange(f64),
    /// Radius is zero, negative, or not finite.
    NonPositiveRadius(f64),
}

/// Error returned when an incident record violates the data model.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidIncidentError {
    /// Id of the offending record (may be empty).
    pub id: String,
    /// The violated invariant.
    pub defect: IncidentDefect,
}

impl std::fmt::Display for InvalidIncidentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.defect {
            IncidentDefect::MissingId => write!(f, "incident record has no id"),
            IncidentDefect::NonFiniteCoordinates => {
                write!(f, "incident {} has non-finite coordinates", self.id)
            }
            IncidentDefect::IntensityOutOfRange(value) => write!(
                f,
                "incident {} has intensity {value}: expected 0.0-1.0",
                self.id
            ),
            IncidentDefect::NonPositiveRadius(value) => write!(
                f,
                "incident {} has radius {value} km: expected a positive value",
                self.id
            ),
        }
    }
}

impl std::error::Error for InvalidIncidentError {}

/// Read-only snapshot of incident records for one report computation.
///
/// Records that fail [`Incident::validate`] are dropped at construction and
/// counted in [`IncidentSet::excluded_count`]. After construction the set is
/// never mutated; a refreshed snapshot is a new set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentSet {
    incidents: Vec<Incident>,
    excluded: usize,
}

impl IncidentSet {
    /// Builds a set from raw records, excluding malformed ones.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = Incident>) -> Self {
        let mut incidents = Vec::new();
        let mut excluded = 0;

        for record in records {
            match record.validate() {
                Ok(()) => incidents.push(record),
                Err(e) => {
                    log::warn!("Excluding incident record: {e}");
                    excluded += 1;
                }
            }
        }

        Self {
            incidents,
            excluded,
        }
    }

    /// The full collection, including false alarms, in input order.
    #[must_use]
    pub fn all(&self) -> &[Incident] {
        &self.incidents
    }

    /// Incidents taking part in aggregates (false alarms removed).
    pub fn valid(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.incidents.iter().filter(|i| i.status.is_valid())
    }

    /// The valid view minus contained incidents.
    pub fn active(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.incidents.iter().filter(|i| i.status.is_active())
    }

    /// Number of incidents in the active view.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Number of records in the snapshot (false alarms included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Number of malformed records dropped at construction.
    #[must_use]
    pub const fn excluded_count(&self) -> usize {
        self.excluded
    }
}

impl FromIterator<Incident> for IncidentSet {
    fn from_iter<T: IntoIterator<Item = Incident>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}
