//! Display formatting shared by every report surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// What an export file contains.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportEntity {
    /// Household listing.
    Households,
    /// Flood event listing.
    Floods,
    /// Demographic summary of affected households.
    Summary,
    /// Per-flood affected counts.
    Impact,
}

/// Renders a stored camel-case identifier as space-separated title case.
///
/// `"bagongSilangPob"` becomes `"Bagong Silang Pob"`. A word boundary is an
/// uppercase letter following a lowercase letter or digit, or a run of
/// whitespace; each boundary becomes exactly one space and each word starts
/// uppercase. Input that is already title case is returned unchanged.
#[must_use]
pub fn camel_case_to_title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if c.is_whitespace() {
            prev = None;
            continue;
        }

        let word_start =
            prev.is_none_or(|p| c.is_uppercase() && (p.is_lowercase() || p.is_numeric()));
        if word_start {
            if !out.is_empty() {
                out.push(' ');
            }
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Display name for an optional district filter.
#[must_use]
pub fn district_label(district: Option<&str>) -> String {
    district.map_or_else(|| "All Districts".to_string(), camel_case_to_title_case)
}

/// File name for an export: `<entity>_<district or "all">_<YYYY-MM-DD>.csv`.
///
/// Characters outside `[A-Za-z0-9-]` in the district are replaced with `-`
/// so the name is safe on every filesystem.
#[must_use]
pub fn export_file_name(entity: ExportEntity, district: Option<&str>, date: NaiveDate) -> String {
    let district = district.map_or_else(
        || "all".to_string(),
        |d| {
            d.trim()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
                .collect()
        },
    );
    format!("{entity}_{district}_{}.csv", date.format("%Y-%m-%d"))
}

/// Formats an optional number with a fixed number of decimals.
pub(crate) fn decimal(value: Option<f64>, places: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.places$}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_district_ids() {
        assert_eq!(camel_case_to_title_case("bagongSilangPob"), "Bagong Silang Pob");
        assert_eq!(camel_case_to_title_case(""), "");
        assert_eq!(camel_case_to_title_case("tubili"), "Tubili");
    }

    #[test]
    fn title_case_leaves_title_case_alone() {
        assert_eq!(camel_case_to_title_case("Bagong Silang Pob"), "Bagong Silang Pob");
        assert_eq!(camel_case_to_title_case("BagongSilangPob"), "Bagong Silang Pob");
        assert_eq!(camel_case_to_title_case("  san   Isidro "), "San Isidro");
    }

    #[test]
    fn title_case_keeps_acronyms_together() {
        assert_eq!(camel_case_to_title_case("NHA"), "NHA");
        assert_eq!(camel_case_to_title_case("zone1Proper"), "Zone1 Proper");
    }

    #[test]
    fn export_names_follow_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 24).unwrap();
        assert_eq!(
            export_file_name(ExportEntity::Households, Some("tubili"), date),
            "households_tubili_2024-07-24.csv"
        );
        assert_eq!(
            export_file_name(ExportEntity::Floods, None, date),
            "floods_all_2024-07-24.csv"
        );
        assert_eq!(
            export_file_name(ExportEntity::Summary, Some("san isidro/2"), date),
            "summary_san-isidro-2_2024-07-24.csv"
        );
    }

    #[test]
    fn district_label_defaults_to_all() {
        assert_eq!(district_label(None), "All Districts");
        assert_eq!(district_label(Some("bagongSilangPob")), "Bagong Silang Pob");
    }
}
