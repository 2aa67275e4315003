#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Affected-population analysis for flood events.
//!
//! The analysis is a strict pipeline over one snapshot of records:
//! households are classified against flood areas
//! ([`affected::affected_households`]), then the affected set is rolled up
//! ([`aggregate::aggregate`]). Report assembly happens downstream in
//! `flood_map_report`. Every stage is pure and synchronous; only fetching
//! the snapshot through a [`DisasterRepository`] is async.

pub mod affected;
pub mod aggregate;
pub mod pipeline;

use async_trait::async_trait;
use flood_map_flood_models::FloodRecord;
use flood_map_household_models::HouseholdRecord;
use flood_map_impact_models::{DistrictSummary, ImpactReport, RecordFilter};

pub use affected::{AffectedSet, affected_households};
pub use aggregate::{aggregate, summary_across_district};
pub use pipeline::analyze;

/// Source of household and flood records.
///
/// Implementations may push the filter down to their store; the pipeline
/// re-applies it regardless, so returning a superset is allowed.
#[async_trait]
pub trait DisasterRepository: Send + Sync {
    /// Error produced when fetching fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches households, scoped by the filter's district.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the records cannot be read.
    async fn fetch_households(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<HouseholdRecord>, Self::Error>;

    /// Fetches floods, scoped by the filter's district and date range.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the records cannot be read.
    async fn fetch_floods(&self, filter: &RecordFilter) -> Result<Vec<FloodRecord>, Self::Error>;
}

/// Fetches a snapshot from `repo` and runs the impact pipeline over it.
///
/// # Errors
///
/// Returns the repository's error if either fetch fails.
pub async fn run_analysis<R: DisasterRepository + ?Sized>(
    repo: &R,
    filter: &RecordFilter,
) -> Result<ImpactReport, R::Error> {
    let households = repo.fetch_households(filter).await?;
    let floods = repo.fetch_floods(filter).await?;

    log::info!(
        "Analyzing {} household(s) and {} flood(s) for {} ({})",
        households.len(),
        floods.len(),
        filter.district.as_deref().unwrap_or("all districts"),
        filter.describe_date_range(),
    );

    let report = analyze(&households, &floods, filter);

    log::info!(
        "{} household(s) and {} person(s) affected",
        report.summary.total_households,
        report.summary.total_persons
    );

    Ok(report)
}

/// Fetches households from `repo` and computes dashboard headline counts
/// over the active ones.
///
/// # Errors
///
/// Returns the repository's error if the fetch fails.
pub async fn run_district_summary<R: DisasterRepository + ?Sized>(
    repo: &R,
    filter: &RecordFilter,
) -> Result<DistrictSummary, R::Error> {
    let households = repo.fetch_households(filter).await?;
    let active: Vec<&HouseholdRecord> = households
        .iter()
        .filter(|h| h.is_active() && filter.matches_district(&h.district))
        .collect();

    log::debug!(
        "Summarizing {} active household(s) of {} fetched",
        active.len(),
        households.len()
    );

    Ok(summary_across_district(&active))
}
