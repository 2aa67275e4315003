//! Subcommand implementations.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flood_map_geography_models::GeoPoint;
use flood_map_household_models::HouseholdRecord;
use flood_map_impact::DisasterRepository;
use flood_map_impact_models::RecordFilter;
use flood_map_municipality::{MunicipalityConfig, validate_location};
use flood_map_report::{
    ExportEntity, ReportTable, SortDirection, SortKey, camel_case_to_title_case,
    district_summary_table, export_file_name, flood_table, household_table, impact_table,
    summary_table,
};

use crate::CliError;

/// Which records to include and how to order them.
#[derive(Debug, Clone, Default)]
pub struct TableRequest {
    /// District and date scope.
    pub filter: RecordFilter,
    /// Sort column.
    pub sort: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// Include archived households in household listings.
    pub include_archived: bool,
}

/// Builds the filter for a run, checking the district is registered and
/// the date range is ordered.
pub fn build_filter(
    config: &MunicipalityConfig,
    district: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<RecordFilter, CliError> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(CliError::InvalidDateRange { from, to });
    }
    if let Some(district) = &district {
        config.require_district(district)?;
    }

    Ok(RecordFilter {
        district,
        date_from: from,
        date_to: to,
    })
}

/// Lists registered districts.
pub fn districts(config: &MunicipalityConfig, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.districts)?);
        return Ok(());
    }

    println!("{} ({} district(s))", config.name, config.districts.len());
    println!("{:<20} {:<28} BOUNDARY", "ID", "NAME");
    println!("{}", "-".repeat(60));
    for district in &config.districts {
        let name = district
            .name
            .clone()
            .unwrap_or_else(|| camel_case_to_title_case(&district.id));
        let boundary = if district.boundary.is_some() { "yes" } else { "no" };
        println!("{:<20} {name:<28} {boundary}", district.id);
    }

    Ok(())
}

/// Checks a picked location against the municipal boundary.
pub fn validate(config: &MunicipalityConfig, lat: f64, lng: f64) -> Result<(), CliError> {
    let point = validate_location(config, GeoPoint::new(lat, lng))?;

    match config.district_at(point) {
        Some(district) => println!(
            "({lat}, {lng}) is inside {} in {}",
            config.name,
            camel_case_to_title_case(&district.id)
        ),
        None => println!("({lat}, {lng}) is inside {}", config.name),
    }

    Ok(())
}

/// Runs impact analysis and prints the summary and per-flood tables.
pub async fn analyze<R>(repo: &R, filter: &RecordFilter, json: bool) -> Result<(), CliError>
where
    R: DisasterRepository,
    CliError: From<R::Error>,
{
    let report = flood_map_impact::run_analysis(repo, filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_table(&summary_table(&report.summary, "Affected Population"));
    println!();
    print_table(&impact_table(&report, SortKey::Date, SortDirection::Ascending));
    if report.skipped_point_floods > 0 {
        println!();
        println!(
            "{} marker-only flood(s) have no area and were not analyzed",
            report.skipped_point_floods
        );
    }

    Ok(())
}

/// Prints dashboard headline counts.
pub async fn summary<R>(repo: &R, filter: &RecordFilter, json: bool) -> Result<(), CliError>
where
    R: DisasterRepository,
    CliError: From<R::Error>,
{
    let summary = flood_map_impact::run_district_summary(repo, filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_table(&district_summary_table(
            &summary,
            filter.district.as_deref(),
        ));
    }

    Ok(())
}

/// Builds the table for `entity`. Export and print both go through here.
pub async fn build_table<R>(
    repo: &R,
    entity: ExportEntity,
    request: &TableRequest,
) -> Result<ReportTable, CliError>
where
    R: DisasterRepository,
    CliError: From<R::Error>,
{
    let filter = &request.filter;
    let district = filter.district.as_deref();

    let table = match entity {
        ExportEntity::Households => {
            let mut households = repo.fetch_households(filter).await?;
            if !request.include_archived {
                households.retain(HouseholdRecord::is_active);
            }
            household_table(&households, district, request.sort, request.direction)
        }
        ExportEntity::Floods => {
            let floods = repo.fetch_floods(filter).await?;
            flood_table(&floods, district, request.sort, request.direction)
        }
        ExportEntity::Summary => {
            let report = flood_map_impact::run_analysis(repo, filter).await?;
            summary_table(
                &report.summary,
                format!(
                    "Affected Population ({}, {})",
                    flood_map_report::district_label(district),
                    filter.describe_date_range()
                ),
            )
        }
        ExportEntity::Impact => {
            let report = flood_map_impact::run_analysis(repo, filter).await?;
            impact_table(&report, request.sort, request.direction)
        }
    };

    Ok(table)
}

/// Writes the CSV export into `output_dir` and returns its path.
pub async fn export<R>(
    repo: &R,
    entity: ExportEntity,
    request: &TableRequest,
    output_dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf, CliError>
where
    R: DisasterRepository,
    CliError: From<R::Error>,
{
    let table = build_table(repo, entity, request).await?;
    let bytes = flood_map_report::to_csv(&table)?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(export_file_name(
        entity,
        request.filter.district.as_deref(),
        today,
    ));
    tokio::fs::write(&path, bytes).await?;

    log::info!("Exported {} row(s) to {}", table.len(), path.display());
    Ok(path)
}

/// Renders the printable HTML page, writing it to `output` or stdout.
pub async fn print<R>(
    repo: &R,
    entity: ExportEntity,
    request: &TableRequest,
    output: Option<&Path>,
) -> Result<(), CliError>
where
    R: DisasterRepository,
    CliError: From<R::Error>,
{
    let table = build_table(repo, entity, request).await?;
    let html = flood_map_report::to_html(&table);

    match output {
        Some(path) => {
            tokio::fs::write(path, html).await?;
            log::info!("Wrote printable report to {}", path.display());
        }
        None => print!("{html}"),
    }

    Ok(())
}

/// Prints a table as aligned plain text.
pub fn print_table(table: &ReportTable) {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", table.title);
    println!("{}", line(&table.headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &table.rows {
        println!("{}", line(row));
    }
}
