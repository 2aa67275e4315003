#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for flood impact analysis.
//!
//! Defines the age buckets, demographic summaries, and per-flood impact
//! rows produced by `flood_map_impact`, plus the [`RecordFilter`] that
//! scopes an analysis run.

use chrono::NaiveDate;
use flood_map_flood_models::Severity;
use flood_map_household_models::Gender;
use serde::{Deserialize, Serialize};

/// Number of ten-year age buckets; the last one is open-ended.
pub const AGE_BUCKET_COUNT: usize = 10;

/// A ten-year age range: `[0,10)`, `[10,20)`, ... `[90,∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgeBucket(u8);

impl AgeBucket {
    /// Maps an age to its bucket: `min(age / 10, 9)`.
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        Self(u8::try_from((age / 10).min(9)).unwrap_or(9))
    }

    /// Creates the bucket at `index`, if it is in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < AGE_BUCKET_COUNT)
            .map(Self)
    }

    /// Position of the bucket, `0..AGE_BUCKET_COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Inclusive lower bound in years.
    #[must_use]
    pub const fn lower(self) -> u32 {
        self.0 as u32 * 10
    }

    /// Exclusive upper bound in years, or `None` for the last bucket.
    #[must_use]
    pub const fn upper(self) -> Option<u32> {
        if self.index() + 1 == AGE_BUCKET_COUNT {
            None
        } else {
            Some(self.lower() + 10)
        }
    }

    /// Report label, e.g. `"10-19"` or `"90+"`.
    #[must_use]
    pub fn label(self) -> String {
        self.upper().map_or_else(
            || format!("{}+", self.lower()),
            |upper| format!("{}-{}", self.lower(), upper - 1),
        )
    }

    /// All buckets in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..AGE_BUCKET_COUNT).filter_map(Self::from_index)
    }
}

/// Person counts by gender and age bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderAgeTable {
    /// Male counts per bucket.
    pub male: [u64; AGE_BUCKET_COUNT],
    /// Female counts per bucket.
    pub female: [u64; AGE_BUCKET_COUNT],
}

impl GenderAgeTable {
    /// Adds one person to a cell.
    pub const fn add(&mut self, gender: Gender, bucket: AgeBucket) {
        self.row_mut(gender)[bucket.index()] += 1;
    }

    /// Count in a single cell.
    #[must_use]
    pub const fn get(&self, gender: Gender, bucket: AgeBucket) -> u64 {
        self.row(gender)[bucket.index()]
    }

    /// All bucket counts for one gender.
    #[must_use]
    pub const fn row(&self, gender: Gender) -> &[u64; AGE_BUCKET_COUNT] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    const fn row_mut(&mut self, gender: Gender) -> &mut [u64; AGE_BUCKET_COUNT] {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        }
    }

    /// Total for one gender across all buckets.
    #[must_use]
    pub fn gender_total(&self, gender: Gender) -> u64 {
        self.row(gender).iter().sum()
    }

    /// Total for one bucket across both genders.
    #[must_use]
    pub const fn bucket_total(&self, bucket: AgeBucket) -> u64 {
        self.male[bucket.index()] + self.female[bucket.index()]
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.gender_total(Gender::Male) + self.gender_total(Gender::Female)
    }
}

/// Demographic roll-up over a set of households.
///
/// `by_gender_age.total() + unbucketed == total_persons` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicSummary {
    /// Households included.
    pub total_households: u64,
    /// People in those households, heads included.
    pub total_persons: u64,
    /// People with a known age and gender, by cell.
    pub by_gender_age: GenderAgeTable,
    /// People with disability.
    pub pwd: u64,
    /// Indigenous people.
    pub indigenous: u64,
    /// Pregnant people.
    pub pregnant: u64,
    /// People counted in `total_persons` but missing from `by_gender_age`
    /// (absent age or gender, or only stored as a household count).
    pub unbucketed: u64,
}

/// Unfiltered headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummary {
    /// Households.
    pub total_households: u64,
    /// People, heads included.
    pub total_persons: u64,
    /// Indigenous people.
    pub total_indigenous: u64,
    /// People with disability.
    pub total_disabled: u64,
    /// Female people.
    pub total_female: u64,
    /// Everyone not counted as female.
    pub total_male: u64,
}

/// Scopes an analysis run to a district and an inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// District identifier; `None` means every district.
    pub district: Option<String>,
    /// First day included.
    pub date_from: Option<NaiveDate>,
    /// Last day included.
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    /// Returns `true` if `district` passes the district filter.
    #[must_use]
    pub fn matches_district(&self, district: &str) -> bool {
        self.district.as_deref().is_none_or(|d| d == district)
    }

    /// Returns `true` if `date` falls within the date range.
    #[must_use]
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }

    /// Human-readable description of the date range.
    #[must_use]
    pub fn describe_date_range(&self) -> String {
        match (self.date_from, self.date_to) {
            (Some(f), Some(t)) => format!("{f} to {t}"),
            (Some(f), None) => format!("since {f}"),
            (None, Some(t)) => format!("through {t}"),
            (None, None) => "all time".to_string(),
        }
    }
}

/// Impact of a single flood event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodImpact {
    /// Flood identifier.
    pub flood_id: String,
    /// Day of the flood.
    pub date: NaiveDate,
    /// District the flood was recorded in.
    pub district: String,
    /// Severity classification.
    pub severity: Severity,
    /// Households inside the flood's area.
    pub affected_households: u64,
    /// People in those households.
    pub affected_persons: u64,
}

/// Full output of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    /// Filter the run was scoped to.
    pub filter: RecordFilter,
    /// Roll-up over every affected household, each counted once.
    pub summary: DemographicSummary,
    /// Per-flood breakdown for area floods, in input order.
    pub floods: Vec<FloodImpact>,
    /// Identifiers of affected households, sorted.
    pub affected_household_ids: Vec<String>,
    /// Marker-only floods left out because they have no area.
    pub skipped_point_floods: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_buckets_map_by_decade() {
        assert_eq!(AgeBucket::from_age(0).index(), 0);
        assert_eq!(AgeBucket::from_age(9).index(), 0);
        assert_eq!(AgeBucket::from_age(10).index(), 1);
        assert_eq!(AgeBucket::from_age(89).index(), 8);
        assert_eq!(AgeBucket::from_age(90).index(), 9);
        assert_eq!(AgeBucket::from_age(134).index(), 9);
        assert_eq!(AgeBucket::from_age(u32::MAX).index(), 9);
    }

    #[test]
    fn age_bucket_labels() {
        let labels: Vec<String> = AgeBucket::all().map(AgeBucket::label).collect();
        assert_eq!(labels.len(), AGE_BUCKET_COUNT);
        assert_eq!(labels[0], "0-9");
        assert_eq!(labels[3], "30-39");
        assert_eq!(labels[9], "90+");
        assert!(AgeBucket::from_index(10).is_none());
    }

    #[test]
    fn table_totals() {
        let mut table = GenderAgeTable::default();
        table.add(Gender::Male, AgeBucket::from_age(5));
        table.add(Gender::Female, AgeBucket::from_age(5));
        table.add(Gender::Female, AgeBucket::from_age(95));

        assert_eq!(table.get(Gender::Female, AgeBucket::from_age(99)), 1);
        assert_eq!(table.bucket_total(AgeBucket::from_age(1)), 2);
        assert_eq!(table.gender_total(Gender::Female), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn filter_matching() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 7, day).unwrap();
        let filter = RecordFilter {
            district: Some("tubili".to_string()),
            date_from: Some(d(10)),
            date_to: Some(d(20)),
        };

        assert!(filter.matches_district("tubili"));
        assert!(!filter.matches_district("bagongSilangPob"));
        assert!(filter.matches_date(d(10)));
        assert!(filter.matches_date(d(20)));
        assert!(!filter.matches_date(d(21)));
        assert_eq!(filter.describe_date_range(), "2024-07-10 to 2024-07-20");

        let open = RecordFilter::default();
        assert!(open.matches_district("anything"));
        assert!(open.matches_date(d(1)));
        assert_eq!(open.describe_date_range(), "all time");
    }

    #[test]
    fn table_serializes_by_gender() {
        let json = serde_json::to_value(GenderAgeTable::default()).unwrap();
        assert_eq!(json["male"].as_array().unwrap().len(), AGE_BUCKET_COUNT);
        assert!(json.get("female").is_some());
    }
}
