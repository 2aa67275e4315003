//! Stable, direction-aware ordering of report records.
//!
//! Keys are extracted once per record and compared through [`SortValue`]'s
//! total order. Descending order reverses the comparator instead of the
//! output, so records with equal keys keep their input order either way
//! and re-sorting a sorted slice leaves it unchanged.

use std::cmp::Ordering;

use chrono::NaiveDate;
use flood_map_flood_models::FloodRecord;
use flood_map_household_models::HouseholdRecord;
use flood_map_impact_models::FloodImpact;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Column a report can be ordered by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortKey {
    /// District identifier.
    #[default]
    District,
    /// Flood date.
    Date,
    /// Flood severity.
    Severity,
    /// Flood water level.
    WaterLevel,
    /// Flood rainfall amount.
    Rainfall,
    /// Household house number.
    HouseNumber,
    /// Household head's name.
    HeadName,
}

/// Sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortDirection {
    /// Smallest first; missing values lead.
    #[default]
    #[strum(to_string = "ascending", serialize = "asc")]
    Ascending,
    /// Largest first; missing values trail.
    #[strum(to_string = "descending", serialize = "desc")]
    Descending,
}

/// House number ordering: numeric house numbers come first in numeric
/// order, the rest follow case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum HouseNumberKey {
    /// Parsed as a non-negative integer.
    Numeric(u64),
    /// Anything else, lowercased.
    Text(String),
}

impl HouseNumberKey {
    /// Builds the key for a raw house number.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<u64>()
            .map_or_else(|_| Self::Text(raw.to_lowercase()), Self::Numeric)
    }
}

/// A comparable key extracted from a record.
#[derive(Debug, Clone)]
pub enum SortValue {
    /// Case-folded text.
    Text(String),
    /// Numeric value, ordered by [`f64::total_cmp`].
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// House number.
    HouseNumber(HouseNumberKey),
}

impl SortValue {
    /// Case-folds `s` into a text key.
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::Text(s.trim().to_lowercase())
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Text(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::HouseNumber(_) => 3,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::HouseNumber(a), Self::HouseNumber(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

/// A record that can be ordered by [`SortKey`].
pub trait Sortable {
    /// The record's value for `key`, or `None` when it has none.
    ///
    /// Keys that don't apply to the record type return `None` for every
    /// record, which leaves the input order untouched.
    fn sort_value(&self, key: SortKey) -> Option<SortValue>;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        (**self).sort_value(key)
    }
}

impl Sortable for HouseholdRecord {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::District => Some(SortValue::text(&self.district)),
            SortKey::HouseNumber => self
                .house_number
                .as_deref()
                .map(|n| SortValue::HouseNumber(HouseNumberKey::new(n))),
            SortKey::HeadName => Some(SortValue::text(&self.head.name)),
            SortKey::Date | SortKey::Severity | SortKey::WaterLevel | SortKey::Rainfall => None,
        }
    }
}

impl Sortable for FloodRecord {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::District => Some(SortValue::text(&self.district)),
            SortKey::Date => Some(SortValue::Date(self.date)),
            SortKey::Severity => Some(SortValue::Number(f64::from(self.severity().value()))),
            SortKey::WaterLevel => self.water_level_m().map(SortValue::Number),
            SortKey::Rainfall => self.rainfall_mm.map(SortValue::Number),
            SortKey::HouseNumber | SortKey::HeadName => None,
        }
    }
}

impl Sortable for FloodImpact {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::District => Some(SortValue::text(&self.district)),
            SortKey::Date => Some(SortValue::Date(self.date)),
            SortKey::Severity => Some(SortValue::Number(f64::from(self.severity.value()))),
            SortKey::WaterLevel
            | SortKey::Rainfall
            | SortKey::HouseNumber
            | SortKey::HeadName => None,
        }
    }
}

/// Compares two optional keys; `None` orders before any value.
#[must_use]
pub fn compare(a: Option<&SortValue>, b: Option<&SortValue>, direction: SortDirection) -> Ordering {
    let ordering = a.cmp(&b);
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stably sorts `records` in place.
pub fn sort_records<T: Sortable>(records: &mut [T], key: SortKey, direction: SortDirection) {
    let mut keyed: Vec<(Option<SortValue>, usize)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.sort_value(key), i))
        .collect();

    // `sort_by` is stable, so equal keys keep their input order.
    keyed.sort_by(|(a, _), (b, _)| compare(a.as_ref(), b.as_ref(), direction));

    apply_permutation(records, keyed.into_iter().map(|(_, i)| i).collect());
}

/// Reorders `items` so that position `i` holds what was at `order[i]`.
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != start {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flood_map_flood_models::FloodExtent;
    use flood_map_geography_models::GeoPoint;
    use flood_map_household_models::Person;

    fn house(id: &str, head: &str) -> HouseholdRecord {
        HouseholdRecord::new(id, GeoPoint::new(0.0, 0.0), "tubili", Person::named(head))
    }

    fn ids(records: &[HouseholdRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn fixture() -> Vec<HouseholdRecord> {
        vec![
            house("1", "maria"),
            house("2", "Andres"),
            house("3", "Maria"),
            house("4", "zeny"),
            house("5", "Carlo"),
        ]
    }

    #[test]
    fn head_name_descending_reverses_ascending_with_ties_stable() {
        let mut asc = fixture();
        sort_records(&mut asc, SortKey::HeadName, SortDirection::Ascending);
        assert_eq!(ids(&asc), vec!["2", "5", "1", "3", "4"]);

        let mut desc = fixture();
        sort_records(&mut desc, SortKey::HeadName, SortDirection::Descending);
        assert_eq!(ids(&desc), vec!["4", "1", "3", "5", "2"]);
    }

    #[test]
    fn distinct_keys_descending_is_exact_reverse() {
        let mut asc = vec![
            house("a", "Eve"),
            house("b", "bob"),
            house("c", "Dan"),
            house("d", "alice"),
            house("e", "Carol"),
        ];
        let mut desc = asc.clone();
        sort_records(&mut asc, SortKey::HeadName, SortDirection::Ascending);
        sort_records(&mut desc, SortKey::HeadName, SortDirection::Descending);

        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut once = fixture();
        sort_records(&mut once, SortKey::HeadName, SortDirection::Descending);
        let mut twice = once.clone();
        sort_records(&mut twice, SortKey::HeadName, SortDirection::Descending);
        assert_eq!(once, twice);
    }

    #[test]
    fn inapplicable_key_keeps_input_order() {
        let mut records = fixture();
        sort_records(&mut records, SortKey::Rainfall, SortDirection::Descending);
        assert_eq!(ids(&records), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn house_numbers_compare_numerically_then_as_text() {
        let mut records: Vec<HouseholdRecord> = ["10", "2", "B-3", "a-1", "", "1"]
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mut h = house(&i.to_string(), "x");
                if !n.is_empty() {
                    h.house_number = Some((*n).to_string());
                }
                h
            })
            .collect();

        sort_records(&mut records, SortKey::HouseNumber, SortDirection::Ascending);
        let numbers: Vec<Option<&str>> =
            records.iter().map(|r| r.house_number.as_deref()).collect();
        assert_eq!(
            numbers,
            vec![None, Some("1"), Some("2"), Some("10"), Some("a-1"), Some("B-3")]
        );
    }

    #[test]
    fn missing_numbers_lead_ascending_and_trail_descending() {
        let day = NaiveDate::from_ymd_opt(2024, 7, 24).unwrap();
        let flood = |id: &str| {
            FloodRecord::new(id, day, "tubili", FloodExtent::Point(GeoPoint::new(0.0, 0.0)))
        };
        let mut floods = vec![
            flood("high").with_water_level(2.0),
            flood("none"),
            flood("low").with_water_level(0.2),
        ];

        sort_records(&mut floods, SortKey::WaterLevel, SortDirection::Ascending);
        let order: Vec<&str> = floods.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["none", "low", "high"]);

        sort_records(&mut floods, SortKey::WaterLevel, SortDirection::Descending);
        let order: Vec<&str> = floods.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["high", "low", "none"]);
    }

    #[test]
    fn sorts_through_references() {
        let records = fixture();
        let mut refs: Vec<&HouseholdRecord> = records.iter().collect();
        sort_records(&mut refs, SortKey::HeadName, SortDirection::Ascending);
        assert_eq!(refs[0].id, "2");
    }

    #[test]
    fn keys_parse_from_kebab_case() {
        assert_eq!("water-level".parse::<SortKey>().unwrap(), SortKey::WaterLevel);
        assert_eq!("Head-Name".parse::<SortKey>().unwrap(), SortKey::HeadName);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!(SortKey::HouseNumber.to_string(), "house-number");
    }
}
