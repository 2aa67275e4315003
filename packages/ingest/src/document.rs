//! Raw document shapes as exported from the document store.
//!
//! Field presence and types drifted over the years (`member` vs `members`,
//! ages stored as strings, precomputed counts instead of member lists), so
//! every field here is optional and loosely typed. [`crate::normalize`]
//! resolves them into the strict model types.

use flood_map_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};

/// A stored household document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseholdDocument {
    /// Document identifier.
    pub id: Option<String>,
    /// House number; older forms stored it as a number.
    pub house_number: Option<serde_json::Value>,
    /// Dwelling location.
    #[serde(alias = "position", alias = "coordinates")]
    pub location: Option<GeoPoint>,
    /// District identifier.
    #[serde(alias = "barangay")]
    pub district: Option<String>,
    /// Household head's name.
    #[serde(alias = "name")]
    pub head_name: Option<String>,
    /// Head's age (number or numeric string).
    pub age: Option<serde_json::Value>,
    /// Head's gender.
    pub gender: Option<String>,
    /// Head's contact number; sometimes stored as a number.
    #[serde(alias = "contactNumber")]
    pub contact: Option<serde_json::Value>,
    /// Head has a disability.
    #[serde(alias = "isPWD", alias = "pwd")]
    pub is_pwd: Option<bool>,
    /// Head is indigenous.
    #[serde(alias = "isIP", alias = "ip")]
    pub is_indigenous: Option<bool>,
    /// Head is pregnant.
    #[serde(alias = "pregnant")]
    pub is_pregnant: Option<bool>,
    /// Member list; some documents call it `member`.
    #[serde(alias = "member")]
    pub members: Option<Vec<MemberDocument>>,
    /// Precomputed household size, head included.
    pub total_members: Option<serde_json::Value>,
    /// Precomputed female count.
    pub female_count: Option<serde_json::Value>,
    /// Precomputed disability count.
    #[serde(alias = "pwdCount")]
    pub pwd_count: Option<serde_json::Value>,
    /// Precomputed indigenous count.
    #[serde(alias = "ipCount")]
    pub indigenous_count: Option<serde_json::Value>,
    /// Precomputed pregnancy count.
    pub pregnant_count: Option<serde_json::Value>,
    /// `"active"` or `"archived"`.
    pub status: Option<String>,
    /// Legacy archive flag.
    pub archived: Option<bool>,
}

/// A member entry inside a household document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberDocument {
    /// Full name.
    pub name: Option<String>,
    /// Age (number or numeric string).
    pub age: Option<serde_json::Value>,
    /// Gender.
    pub gender: Option<String>,
    /// Contact number (string or number).
    #[serde(alias = "contactNumber")]
    pub contact: Option<serde_json::Value>,
    /// Has a disability.
    #[serde(alias = "isPWD", alias = "pwd")]
    pub is_pwd: Option<bool>,
    /// Indigenous.
    #[serde(alias = "isIP", alias = "ip")]
    pub is_indigenous: Option<bool>,
    /// Pregnant.
    #[serde(alias = "pregnant")]
    pub is_pregnant: Option<bool>,
}

/// A stored flood report document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloodDocument {
    /// Document identifier.
    pub id: Option<String>,
    /// ISO 8601 date; a trailing time component is ignored.
    pub date: Option<String>,
    /// District identifier.
    #[serde(alias = "barangay")]
    pub district: Option<String>,
    /// Flooded-area ring.
    #[serde(alias = "polygon", alias = "coordinates")]
    pub area: Option<Vec<GeoPoint>>,
    /// Flooded area as a `GeoJSON` geometry string.
    pub geojson: Option<String>,
    /// Marker position for point-style reports.
    #[serde(alias = "position")]
    pub location: Option<GeoPoint>,
    /// Water level in meters.
    pub water_level: Option<serde_json::Value>,
    /// Rainfall in millimeters.
    #[serde(alias = "rainfall")]
    pub rainfall_amount: Option<serde_json::Value>,
    /// Stored severity marker (`low`, `moderate`, `high`).
    pub severity: Option<String>,
    /// Cause or category.
    #[serde(alias = "category")]
    pub cause: Option<String>,
    /// Reported casualties.
    pub casualties: Option<serde_json::Value>,
}
