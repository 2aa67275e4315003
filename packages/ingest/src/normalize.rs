//! Resolves raw documents into model records.
//!
//! All defaulting happens here, once, so downstream code never sees a
//! half-populated record:
//!
//! * ages that are missing, negative, or unparseable become `None`
//! * unrecognized gender strings become `None`
//! * missing flags are `false`
//! * a member list (`members` or `member`) wins over precomputed counts;
//!   counts are only used when no list was stored
//! * negative or non-finite measurements are dropped
//!
//! Documents missing an id, a position, or (for floods) a date and extent
//! are skipped with a warning.

use chrono::NaiveDate;
use flood_map_flood_models::{FloodExtent, FloodRecord, Severity};
use flood_map_household_models::{
    Gender, HouseholdComposition, HouseholdCounts, HouseholdRecord, HouseholdStatus, Person,
};

use crate::IngestError;
use crate::document::{FloodDocument, HouseholdDocument, MemberDocument};

/// Normalizes household documents, skipping ones that can't be placed.
#[must_use]
pub fn normalize_households(documents: Vec<HouseholdDocument>) -> Vec<HouseholdRecord> {
    documents
        .into_iter()
        .filter_map(|doc| match normalize_household(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping household document: {e}");
                None
            }
        })
        .collect()
}

/// Normalizes flood documents, skipping ones without a date or extent.
#[must_use]
pub fn normalize_floods(documents: Vec<FloodDocument>) -> Vec<FloodRecord> {
    documents
        .into_iter()
        .filter_map(|doc| match normalize_flood(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping flood document: {e}");
                None
            }
        })
        .collect()
}

/// Normalizes a single household document.
///
/// # Errors
///
/// Returns [`IngestError::Normalization`] if the document has no id or no
/// finite location.
pub fn normalize_household(doc: HouseholdDocument) -> Result<HouseholdRecord, IngestError> {
    let id = required_id(doc.id)?;
    let position = doc
        .location
        .filter(flood_map_geography_models::GeoPoint::is_finite)
        .ok_or_else(|| IngestError::Normalization {
            message: format!("household {id} has no usable location"),
        })?;

    let head = Person {
        name: doc.head_name.unwrap_or_default().trim().to_string(),
        age: doc.age.as_ref().and_then(parse_age),
        gender: doc.gender.as_deref().and_then(parse_gender),
        contact: doc.contact.as_ref().and_then(value_to_text),
        is_pwd: doc.is_pwd.unwrap_or(false),
        is_indigenous: doc.is_indigenous.unwrap_or(false),
        is_pregnant: doc.is_pregnant.unwrap_or(false),
    };

    let composition = match (doc.members, doc.total_members.as_ref().and_then(parse_count)) {
        (Some(members), _) => {
            HouseholdComposition::Enumerated(members.into_iter().map(normalize_member).collect())
        }
        (None, Some(total)) => HouseholdComposition::Counted(HouseholdCounts {
            female: doc.female_count.as_ref().and_then(parse_count).unwrap_or(0),
            pwd: doc.pwd_count.as_ref().and_then(parse_count).unwrap_or(0),
            indigenous: doc.indigenous_count.as_ref().and_then(parse_count).unwrap_or(0),
            pregnant: doc.pregnant_count.as_ref().and_then(parse_count).unwrap_or(0),
            ..HouseholdCounts::new(total)
        }),
        (None, None) => HouseholdComposition::Enumerated(Vec::new()),
    };

    let archived = doc.archived.unwrap_or(false)
        || doc
            .status
            .as_deref()
            .and_then(|s| s.trim().parse::<HouseholdStatus>().ok())
            == Some(HouseholdStatus::Archived);

    Ok(HouseholdRecord {
        id,
        house_number: doc.house_number.as_ref().and_then(value_to_text),
        position,
        district: doc.district.unwrap_or_default().trim().to_string(),
        head,
        composition,
        status: if archived {
            HouseholdStatus::Archived
        } else {
            HouseholdStatus::Active
        },
    })
}

fn normalize_member(doc: MemberDocument) -> Person {
    Person {
        name: doc.name.unwrap_or_default().trim().to_string(),
        age: doc.age.as_ref().and_then(parse_age),
        gender: doc.gender.as_deref().and_then(parse_gender),
        contact: doc.contact.as_ref().and_then(value_to_text),
        is_pwd: doc.is_pwd.unwrap_or(false),
        is_indigenous: doc.is_indigenous.unwrap_or(false),
        is_pregnant: doc.is_pregnant.unwrap_or(false),
    }
}

/// Normalizes a single flood document.
///
/// Extent precedence: `geojson`, then the `area` ring, then the marker
/// `location`. Severity comes from the water level when one was measured,
/// otherwise from the stored marker, otherwise [`Severity::Low`].
///
/// # Errors
///
/// Returns [`IngestError::Normalization`] if the document has no id, no
/// parseable date, or no extent, or if its `GeoJSON` is invalid.
pub fn normalize_flood(doc: FloodDocument) -> Result<FloodRecord, IngestError> {
    let id = required_id(doc.id)?;

    let date = doc
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| IngestError::Normalization {
            message: format!("flood {id} has no valid date"),
        })?;

    let extent = if let Some(geojson) = doc.geojson.as_deref() {
        let polygon = flood_map_spatial::polygon_from_geojson(geojson).map_err(|e| {
            IngestError::Normalization {
                message: format!("flood {id} has invalid GeoJSON: {e}"),
            }
        })?;
        FloodExtent::Area(polygon)
    } else if let Some(ring) = doc.area.filter(|ring| !ring.is_empty()) {
        FloodExtent::Area(ring.into())
    } else if let Some(point) = doc.location {
        FloodExtent::Point(point)
    } else {
        return Err(IngestError::Normalization {
            message: format!("flood {id} has neither an area nor a location"),
        });
    };

    let mut record = FloodRecord::new(
        id,
        date,
        doc.district.unwrap_or_default().trim(),
        extent,
    );

    if let Some(marker) = doc
        .severity
        .as_deref()
        .and_then(|s| s.trim().parse::<Severity>().ok())
    {
        record = record.with_marker_severity(marker);
    }
    record.set_water_level(doc.water_level.as_ref().and_then(parse_measurement));

    if let Some(rainfall) = doc.rainfall_amount.as_ref().and_then(parse_measurement) {
        record = record.with_rainfall(rainfall);
    }
    if let Some(cause) = non_empty(doc.cause) {
        record = record.with_cause(cause);
    }
    if let Some(casualties) = doc.casualties.as_ref().and_then(parse_count) {
        record = record.with_casualties(casualties);
    }

    Ok(record)
}

fn required_id(id: Option<String>) -> Result<String, IngestError> {
    id.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IngestError::Normalization {
            message: "document has no id".to_string(),
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses `2024-07-24`, ignoring anything after the day.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
}

fn parse_gender(s: &str) -> Option<Gender> {
    match s.trim() {
        "M" | "m" => Some(Gender::Male),
        "F" | "f" => Some(Gender::Female),
        other => other.parse().ok(),
    }
}

/// Reads a non-negative finite number from a JSON number or numeric string.
fn parse_measurement(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// Reads a whole, non-negative count; fractional values are truncated.
fn parse_count(value: &serde_json::Value) -> Option<u32> {
    let n = parse_measurement(value)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n.trunc().min(f64::from(u32::MAX)) as u32;
    Some(n)
}

fn parse_age(value: &serde_json::Value) -> Option<u32> {
    parse_count(value)
}

fn value_to_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => non_empty(Some(s.clone())),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
