#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary ingestion.
//!
//! Boundary files come from several publishers that disagree on where the
//! region code and name live in each feature. This crate normalizes
//! `GeoJSON` features into the canonical
//! [`RegionGeometry`](wildfire_impact_geography_models::RegionGeometry)
//! shape before they reach the analytics pipeline.

pub mod normalize;

use thiserror::Error;

/// Errors that can occur during region ingestion.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

