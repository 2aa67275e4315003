//! Row building. CSV and HTML output both render from the [`ReportTable`]
//! built here, so an export and a printout of the same data always agree.

use flood_map_flood_models::FloodRecord;
use flood_map_household_models::{Gender, HouseholdRecord, HouseholdStatus};
use flood_map_impact_models::{
    AgeBucket, DemographicSummary, DistrictSummary, FloodImpact, ImpactReport,
};
use serde::{Deserialize, Serialize};

use crate::format::{camel_case_to_title_case, decimal, district_label};
use crate::sort::{SortDirection, SortKey, sort_records};

/// A titled, rectangular table of display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Heading shown above the printed table.
    pub title: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Rows, each with one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Creates an empty table with the given headers.
    #[must_use]
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const HOUSEHOLD_HEADERS: &[&str] = &[
    "House No.",
    "Head of Household",
    "District",
    "Members",
    "Female",
    "Male",
    "PWD",
    "Indigenous",
    "Pregnant",
    "Latitude",
    "Longitude",
    "Contact",
    "Status",
];

const FLOOD_HEADERS: &[&str] = &[
    "Date",
    "District",
    "Extent",
    "Severity",
    "Water Level (m)",
    "Rainfall (mm)",
    "Cause",
    "Casualties",
];

/// Builds the household listing, sorted by `key` in `direction`.
#[must_use]
pub fn household_table(
    households: &[HouseholdRecord],
    district: Option<&str>,
    key: SortKey,
    direction: SortDirection,
) -> ReportTable {
    let mut sorted: Vec<&HouseholdRecord> = households.iter().collect();
    sort_records(&mut sorted, key, direction);

    let mut table = ReportTable::new(
        format!("Household Report ({})", district_label(district)),
        HOUSEHOLD_HEADERS,
    );

    for h in sorted {
        let total = h.total_members();
        let female = h.female_count().min(total);
        table.push_row(vec![
            h.house_number.clone().unwrap_or_default(),
            h.head.name.clone(),
            camel_case_to_title_case(&h.district),
            total.to_string(),
            female.to_string(),
            (total - female).to_string(),
            h.pwd_count().to_string(),
            h.indigenous_count().to_string(),
            h.pregnant_count().to_string(),
            format!("{:.6}", h.position.lat),
            format!("{:.6}", h.position.lng),
            h.head.contact.clone().unwrap_or_default(),
            match h.status {
                HouseholdStatus::Active => "Active".to_string(),
                HouseholdStatus::Archived => "Archived".to_string(),
            },
        ]);
    }

    log::debug!("Built household table with {} row(s)", table.len());
    table
}

/// Builds the flood listing, sorted by `key` in `direction`.
#[must_use]
pub fn flood_table(
    floods: &[FloodRecord],
    district: Option<&str>,
    key: SortKey,
    direction: SortDirection,
) -> ReportTable {
    let mut sorted: Vec<&FloodRecord> = floods.iter().collect();
    sort_records(&mut sorted, key, direction);

    let mut table = ReportTable::new(
        format!("Flood Report ({})", district_label(district)),
        FLOOD_HEADERS,
    );

    for f in sorted {
        table.push_row(vec![
            f.date.format("%Y-%m-%d").to_string(),
            camel_case_to_title_case(&f.district),
            f.extent.label().to_string(),
            f.severity().label().to_string(),
            decimal(f.water_level_m(), 2),
            decimal(f.rainfall_mm, 1),
            f.cause.clone().unwrap_or_default(),
            f.casualties.map(|c| c.to_string()).unwrap_or_default(),
        ]);
    }

    log::debug!("Built flood table with {} row(s)", table.len());
    table
}

/// Builds the gender-by-age table for affected households, followed by
/// the household, flag, and unrecorded totals.
#[must_use]
pub fn summary_table(summary: &DemographicSummary, title: impl Into<String>) -> ReportTable {
    let mut table = ReportTable::new(title, &["Age Group", "Male", "Female", "Total"]);
    let cells = &summary.by_gender_age;

    for bucket in AgeBucket::all() {
        table.push_row(vec![
            bucket.label(),
            cells.get(Gender::Male, bucket).to_string(),
            cells.get(Gender::Female, bucket).to_string(),
            cells.bucket_total(bucket).to_string(),
        ]);
    }
    table.push_row(vec![
        "All Ages".to_string(),
        cells.gender_total(Gender::Male).to_string(),
        cells.gender_total(Gender::Female).to_string(),
        cells.total().to_string(),
    ]);

    for (label, count) in [
        ("Age or Gender Not Recorded", summary.unbucketed),
        ("Persons with Disability", summary.pwd),
        ("Indigenous Persons", summary.indigenous),
        ("Pregnant", summary.pregnant),
        ("Total Persons", summary.total_persons),
        ("Total Households", summary.total_households),
    ] {
        table.push_row(vec![
            label.to_string(),
            String::new(),
            String::new(),
            count.to_string(),
        ]);
    }

    table
}

/// Builds the per-flood breakdown of an analysis run.
///
/// Only district, date, and severity order impact rows; other keys keep
/// the analysis order.
#[must_use]
pub fn impact_table(report: &ImpactReport, key: SortKey, direction: SortDirection) -> ReportTable {
    let mut sorted: Vec<&FloodImpact> = report.floods.iter().collect();
    sort_records(&mut sorted, key, direction);

    let mut table = ReportTable::new(
        format!(
            "Flood Impact ({}, {})",
            district_label(report.filter.district.as_deref()),
            report.filter.describe_date_range()
        ),
        &[
            "Date",
            "District",
            "Severity",
            "Affected Households",
            "Affected Persons",
        ],
    );

    for impact in sorted {
        table.push_row(vec![
            impact.date.format("%Y-%m-%d").to_string(),
            camel_case_to_title_case(&impact.district),
            impact.severity.label().to_string(),
            impact.affected_households.to_string(),
            impact.affected_persons.to_string(),
        ]);
    }

    table
}

/// Builds the dashboard headline counts as a two-column table.
#[must_use]
pub fn district_summary_table(summary: &DistrictSummary, district: Option<&str>) -> ReportTable {
    let mut table = ReportTable::new(
        format!("District Summary ({})", district_label(district)),
        &["Metric", "Count"],
    );

    for (label, count) in [
        ("Households", summary.total_households),
        ("Persons", summary.total_persons),
        ("Female", summary.total_female),
        ("Male", summary.total_male),
        ("Persons with Disability", summary.total_disabled),
        ("Indigenous Persons", summary.total_indigenous),
    ] {
        table.push_row(vec![label.to_string(), count.to_string()]);
    }

    table
}
