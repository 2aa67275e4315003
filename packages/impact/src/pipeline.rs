//! The classify-then-aggregate pipeline over one snapshot of records.

use flood_map_flood_models::FloodRecord;
use flood_map_household_models::HouseholdRecord;
use flood_map_impact_models::{FloodImpact, ImpactReport, RecordFilter};

use crate::{affected::affected_households, aggregate::aggregate};

/// Runs impact analysis over already-fetched records.
///
/// The filter is re-applied here even when the repository already pushed it
/// down: the district filter scopes both households and floods, the date
/// range scopes floods. Archived households are excluded. Classification
/// completes before aggregation starts; the whole run is recomputed on every
/// call.
#[must_use]
pub fn analyze(
    households: &[HouseholdRecord],
    floods: &[FloodRecord],
    filter: &RecordFilter,
) -> ImpactReport {
    let households: Vec<&HouseholdRecord> = households
        .iter()
        .filter(|h| h.is_active() && filter.matches_district(&h.district))
        .collect();
    let floods: Vec<&FloodRecord> = floods
        .iter()
        .filter(|f| filter.matches_district(&f.district) && filter.matches_date(f.date))
        .collect();

    log::debug!(
        "Classifying {} household(s) against {} flood(s) ({})",
        households.len(),
        floods.len(),
        filter.describe_date_range(),
    );

    let affected = affected_households(&households, &floods);

    let affected_records: Vec<&HouseholdRecord> =
        affected.households.iter().map(|&i| households[i]).collect();
    let summary = aggregate(&affected_records);

    let flood_impacts = affected
        .by_flood
        .iter()
        .map(|(flood_idx, members)| {
            let flood = floods[*flood_idx];
            FloodImpact {
                flood_id: flood.id.clone(),
                date: flood.date,
                district: flood.district.clone(),
                severity: flood.severity(),
                affected_households: members.len() as u64,
                affected_persons: members
                    .iter()
                    .map(|&i| u64::from(households[i].total_members()))
                    .sum(),
            }
        })
        .collect();

    let mut affected_household_ids: Vec<String> =
        affected_records.iter().map(|h| h.id.clone()).collect();
    affected_household_ids.sort();

    log::debug!(
        "{} household(s), {} person(s) affected",
        summary.total_households,
        summary.total_persons
    );

    ImpactReport {
        filter: filter.clone(),
        summary,
        floods: flood_impacts,
        affected_household_ids,
        skipped_point_floods: affected.skipped_point_floods,
    }
}
