#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for flood impact analysis.
//!
//! Reads household and flood exports from disk, scopes them with the
//! municipality's district registry, and prints, exports, or renders
//! reports. Export and print are gated by the municipality's PIN when one
//! is configured.

mod commands;
mod gate;

use std::convert::Infallible;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use flood_map_ingest::{IngestError, JsonFileRepository};
use flood_map_municipality::{ConfigError, LocationError, MunicipalityConfig};
use flood_map_report::{ExportEntity, ReportError, SortDirection, SortKey};

use crate::commands::TableRequest;

/// Errors surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded or a district is unknown.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Records could not be read.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A report could not be rendered.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A location was rejected.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Prompting for input failed.
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `--from` is after `--to`.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Requested start.
        from: NaiveDate,
        /// Requested end.
        to: NaiveDate,
    },

    /// The export PIN was wrong.
    #[error("Incorrect PIN")]
    PinRejected,
}

impl From<Infallible> for CliError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

#[derive(Parser)]
#[command(name = "flood_map", about = "Flood impact analysis and reporting")]
struct Cli {
    /// Municipality config file (overrides `FLOOD_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Household export (JSON array or id-keyed object)
    #[arg(long, global = true, default_value = "data/households.json")]
    households: PathBuf,
    /// Flood export (JSON array or id-keyed object)
    #[arg(long, global = true, default_value = "data/floods.json")]
    floods: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// District id (e.g. "`bagongSilangPob`"); all districts if omitted
    #[arg(long)]
    district: Option<String>,
    /// First flood date included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last flood date included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
struct TableArgs {
    /// What to report: households, floods, summary, impact
    entity: ExportEntity,
    #[command(flatten)]
    filter: FilterArgs,
    /// Sort column: district, date, severity, water-level, rainfall,
    /// house-number, head-name
    #[arg(long, default_value = "district")]
    sort: SortKey,
    /// Sort direction: ascending (asc) or descending (desc)
    #[arg(long, default_value = "ascending")]
    direction: SortDirection,
    /// Include archived households in household listings
    #[arg(long)]
    include_archived: bool,
    /// Export PIN; prompted for when required and omitted
    #[arg(long)]
    pin: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered districts
    Districts {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check whether a location is inside the municipality
    Validate {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
    /// Analyze which households are affected by floods
    Analyze {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show headline household counts, regardless of flooding
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export a report as CSV
    Export {
        #[command(flatten)]
        table: TableArgs,
        /// Directory to write the CSV file into
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Render a report as a printable HTML page
    Print {
        #[command(flatten)]
        table: TableArgs,
        /// File to write; stdout if omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn table_request(
    config: &MunicipalityConfig,
    args: TableArgs,
) -> Result<(TableRequest, ExportEntity, Option<String>), CliError> {
    let filter = commands::build_filter(
        config,
        args.filter.district,
        args.filter.from,
        args.filter.to,
    )?;
    Ok((
        TableRequest {
            filter,
            sort: args.sort,
            direction: args.direction,
            include_archived: args.include_archived,
        },
        args.entity,
        args.pin,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = MunicipalityConfig::load(cli.config.as_deref())?;
    let repo = JsonFileRepository::new(cli.households, cli.floods);

    match cli.command {
        Commands::Districts { json } => commands::districts(&config, json)?,
        Commands::Validate { lat, lng } => commands::validate(&config, lat, lng)?,
        Commands::Analyze { filter, json } => {
            let filter = commands::build_filter(&config, filter.district, filter.from, filter.to)?;
            commands::analyze(&repo, &filter, json).await?;
        }
        Commands::Summary { filter, json } => {
            let filter = commands::build_filter(&config, filter.district, filter.from, filter.to)?;
            commands::summary(&repo, &filter, json).await?;
        }
        Commands::Export { table, output_dir } => {
            let (request, entity, pin) = table_request(&config, table)?;
            gate::require_pin(&config, pin.as_deref())?;
            let today = chrono::Local::now().date_naive();
            let path = commands::export(&repo, entity, &request, &output_dir, today).await?;
            println!("{}", path.display());
        }
        Commands::Print { table, output } => {
            let (request, entity, pin) = table_request(&config, table)?;
            gate::require_pin(&config, pin.as_deref())?;
            commands::print(&repo, entity, &request, output.as_deref()).await?;
        }
    }

    Ok(())
}
