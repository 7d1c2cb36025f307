#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wildfire impact analytics pipeline.
//!
//! Each module computes one part of the dashboard report from an
//! [`IncidentSet`](wildfire_impact_incident_models::IncidentSet) and the
//! region geometries:
//!
//! * [`damage`]: overlap-aware burned area, population and biomass at risk
//! * [`regions`]: point-in-polygon attribution and regional ranking
//! * [`climate`]: simulated fire weather for the ranked regions
//! * [`resources`]: deployed-resource estimate from the active load
//! * [`report`]: composition of all of the above into one [`Report`]
//!
//! Time and randomness are never read from ambient state; callers pass a
//! [`capabilities::Clock`] and a [`capabilities::RandomSource`] so seeded
//! runs are reproducible.
//!
//! [`Report`]: wildfire_impact_analytics_models::Report

pub mod capabilities;
pub mod climate;
pub mod config;
pub mod damage;
pub mod regions;
pub mod report;
pub mod resources;
pub mod snapshot;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Estimate tables are missing or inconsistent.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what went wrong.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
