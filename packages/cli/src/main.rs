#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the wildfire impact report.
//!
//! ```text
//! wildfire_impact report --incidents fires.json --regions regions.geojson \
//!     [--config tables.toml] [--seed 42] [--hour 15] [--top-n 5]
//! wildfire_impact regions --regions regions.geojson
//! ```
//!
//! Set `RUST_LOG` to control log output (e.g. `RUST_LOG=debug`).

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use wildfire_impact_analytics::{
    capabilities::{Clock, FixedClock, RngSource, SystemClock},
    config::{default_config, load_config},
    report::assemble,
};
use wildfire_impact_analytics_models::ImpactConfig;
use wildfire_impact_geography::normalize::{RegionFieldMapping, load_regions};
use wildfire_impact_incident_models::{Incident, IncidentSet};

#[derive(Parser)]
#[command(
    name = "wildfire_impact",
    about = "Compute wildfire impact reports from incident snapshots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the impact report and print it as JSON
    Report {
        /// Incident records (JSON array)
        #[arg(long)]
        incidents: PathBuf,

        #[command(flatten)]
        regions: RegionArgs,

        /// Estimate tables (TOML); the built-in tables are used if omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for the climate and resource simulation
        #[arg(long)]
        seed: Option<u64>,

        /// Hour of day (0-23) to simulate; defaults to the local time
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,

        /// Number of ranked regions to report
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Print the normalized region geometries as JSON
    Regions {
        #[command(flatten)]
        regions: RegionArgs,
    },
}

#[derive(Args)]
struct RegionArgs {
    /// Region boundaries (GeoJSON `FeatureCollection`)
    #[arg(long)]
    regions: PathBuf,

    /// Property holding the region id (repeatable, tried in order)
    #[arg(long = "id-property")]
    id_properties: Vec<String>,

    /// Property holding the region name (repeatable, tried in order)
    #[arg(long = "name-property")]
    name_properties: Vec<String>,
}

impl RegionArgs {
    fn field_mapping(&self) -> RegionFieldMapping {
        let mut fields = RegionFieldMapping::default();
        if !self.id_properties.is_empty() {
            fields.id_properties.clone_from(&self.id_properties);
        }
        if !self.name_properties.is_empty() {
            fields.name_properties.clone_from(&self.name_properties);
        }
        fields
    }
}

fn read_incidents(path: &Path) -> Result<IncidentSet, Box<dyn std::error::Error>> {
    let body = std::fs::read_to_string(path)?;
    let records: Vec<Incident> = serde_json::from_str(&body)?;
    let incidents = IncidentSet::from_records(records);

    log::info!(
        "Loaded {} incident records from {} ({} excluded)",
        incidents.len(),
        path.display(),
        incidents.excluded_count()
    );

    Ok(incidents)
}

fn resolve_config(
    path: Option<&Path>,
    top_n: Option<usize>,
) -> Result<ImpactConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(top_n) = top_n {
        config.top_regions = top_n;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            incidents,
            regions,
            config,
            seed,
            hour,
            top_n,
        } => {
            let incidents = read_incidents(&incidents)?;
            let geometries = load_regions(&regions.regions, &regions.field_mapping())?;
            let config = resolve_config(config.as_deref(), top_n)?;

            let clock: Box<dyn Clock> = match hour {
                Some(hour) => Box::new(FixedClock::new(hour)),
                None => Box::new(SystemClock),
            };
            let mut rng = seed.map_or_else(RngSource::from_entropy, RngSource::seeded);

            let report = assemble(&incidents, &geometries, &config, clock.as_ref(), &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Regions { regions } => {
            let geometries = load_regions(&regions.regions, &regions.field_mapping())?;
            log::info!("Normalized {} regions", geometries.len());
            println!("{}", serde_json::to_string_pretty(&geometries)?);
        }
    }

    Ok(())
}
