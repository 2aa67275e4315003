#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Flood event records and severity definitions.
//!
//! Severity is derived from the measured water level through a single
//! threshold function, [`Severity::from_water_level`]. Every code path that
//! sets a water level goes through [`FloodRecord`], which re-derives the
//! severity, so records created and records edited always agree.

use chrono::NaiveDate;
use flood_map_geography_models::{GeoPoint, Polygon};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upper bound (inclusive) of the low band, in meters.
pub const LOW_MAX_WATER_LEVEL_M: f64 = 0.5;

/// Upper bound (inclusive) of the moderate band, in meters.
pub const MODERATE_MAX_WATER_LEVEL_M: f64 = 1.5;

/// Ordinal flood intensity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Water level up to and including 0.5 m.
    #[default]
    Low = 1,
    /// Water level above 0.5 m up to and including 1.5 m.
    Moderate = 2,
    /// Water level above 1.5 m.
    High = 3,
}

impl Severity {
    /// Classifies a water level in meters.
    ///
    /// `<= 0.5` is low, `<= 1.5` is moderate, anything higher is high.
    /// A NaN level compares false against both cutoffs and lands in
    /// [`Severity::Low`].
    #[must_use]
    pub fn from_water_level(level_m: f64) -> Self {
        if level_m > MODERATE_MAX_WATER_LEVEL_M {
            Self::High
        } else if level_m > LOW_MAX_WATER_LEVEL_M {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Returns the numeric rank of this severity (1-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Moderate, Self::High]
    }
}

/// Spatial footprint of a flood event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodExtent {
    /// A single marker. Markers have no area and never contain households.
    Point(GeoPoint),
    /// The flooded area's boundary.
    Area(Polygon),
}

impl FloodExtent {
    /// The flooded area, if this extent has one.
    #[must_use]
    pub const fn area(&self) -> Option<&Polygon> {
        match self {
            Self::Point(_) => None,
            Self::Area(polygon) => Some(polygon),
        }
    }

    /// Human-readable kind for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::Area(_) => "Area",
        }
    }
}

/// One recorded flood event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodRecord {
    /// Document identifier.
    pub id: String,
    /// Day the flood occurred.
    pub date: NaiveDate,
    /// District (barangay) identifier in stored camel-case form.
    pub district: String,
    /// Marker position or flooded area.
    pub extent: FloodExtent,
    /// Rainfall amount in millimeters.
    pub rainfall_mm: Option<f64>,
    /// Free-form cause or category (e.g. "typhoon").
    pub cause: Option<String>,
    /// Reported casualties.
    pub casualties: Option<u32>,
    water_level_m: Option<f64>,
    severity: Severity,
}

impl FloodRecord {
    /// Creates a record with no measurements and [`Severity::Low`].
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        district: impl Into<String>,
        extent: FloodExtent,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            district: district.into(),
            extent,
            rainfall_mm: None,
            cause: None,
            casualties: None,
            water_level_m: None,
            severity: Severity::Low,
        }
    }

    /// Sets the water level, deriving severity from it.
    #[must_use]
    pub fn with_water_level(mut self, level_m: f64) -> Self {
        self.set_water_level(Some(level_m));
        self
    }

    /// Sets a recorded severity marker. Ignored while a water level is
    /// present, since the measured level is authoritative.
    #[must_use]
    pub fn with_marker_severity(mut self, severity: Severity) -> Self {
        if self.water_level_m.is_none() {
            self.severity = severity;
        }
        self
    }

    /// Sets the rainfall amount.
    #[must_use]
    pub fn with_rainfall(mut self, rainfall_mm: f64) -> Self {
        self.rainfall_mm = Some(rainfall_mm);
        self
    }

    /// Sets the cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sets the casualty count.
    #[must_use]
    pub fn with_casualties(mut self, casualties: u32) -> Self {
        self.casualties = Some(casualties);
        self
    }

    /// Updates the water level on edit.
    ///
    /// Negative or non-finite levels are treated as unmeasured. Clearing the
    /// level keeps the last derived severity as the marker.
    pub fn set_water_level(&mut self, level_m: Option<f64>) {
        self.water_level_m = level_m.filter(|m| m.is_finite() && *m >= 0.0);
        if let Some(m) = self.water_level_m {
            self.severity = Severity::from_water_level(m);
        }
    }

    /// Measured water level in meters.
    #[must_use]
    pub const fn water_level_m(&self) -> Option<f64> {
        self.water_level_m
    }

    /// Current severity classification.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 24).unwrap()
    }

    #[test]
    fn threshold_boundaries_are_upper_inclusive() {
        assert_eq!(Severity::from_water_level(0.0), Severity::Low);
        assert_eq!(Severity::from_water_level(0.5), Severity::Low);
        assert_eq!(Severity::from_water_level(0.51), Severity::Moderate);
        assert_eq!(Severity::from_water_level(1.5), Severity::Moderate);
        assert_eq!(Severity::from_water_level(1.51), Severity::High);
        assert_eq!(Severity::from_water_level(4.0), Severity::High);
    }

    #[test]
    fn nan_water_level_is_low() {
        assert_eq!(Severity::from_water_level(f64::NAN), Severity::Low);
    }

    #[test]
    fn creation_and_edit_use_the_same_rule() {
        let mut record =
            FloodRecord::new("f1", date(), "tubili", FloodExtent::Area(Polygon::default()))
                .with_water_level(0.5);
        assert_eq!(record.severity(), Severity::Low);

        for level in [0.5, 0.51, 1.5, 1.51] {
            record.set_water_level(Some(level));
            assert_eq!(record.severity(), Severity::from_water_level(level));
        }
    }

    #[test]
    fn water_level_overrides_marker() {
        let record =
            FloodRecord::new("f1", date(), "tubili", FloodExtent::Point(GeoPoint::new(1.0, 2.0)))
                .with_water_level(2.0)
                .with_marker_severity(Severity::Low);
        assert_eq!(record.severity(), Severity::High);

        let marker_only =
            FloodRecord::new("f2", date(), "tubili", FloodExtent::Point(GeoPoint::new(1.0, 2.0)))
                .with_marker_severity(Severity::Moderate);
        assert_eq!(marker_only.severity(), Severity::Moderate);
        assert_eq!(marker_only.water_level_m(), None);
    }

    #[test]
    fn invalid_water_levels_are_dropped() {
        let mut record =
            FloodRecord::new("f1", date(), "tubili", FloodExtent::Area(Polygon::default()))
                .with_water_level(1.0);
        record.set_water_level(Some(-1.0));
        assert_eq!(record.water_level_m(), None);
        assert_eq!(record.severity(), Severity::Moderate);

        record.set_water_level(Some(f64::INFINITY));
        assert_eq!(record.water_level_m(), None);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("moderate".parse::<Severity>().unwrap(), Severity::Moderate);
        assert!("severe".parse::<Severity>().is_err());
        assert_eq!(Severity::Moderate.to_string(), "moderate");
    }

    #[test]
    fn extent_serializes_with_kind_tag() {
        let json = serde_json::to_value(FloodExtent::Point(GeoPoint::new(1.0, 2.0))).unwrap();
        assert_eq!(json, serde_json::json!({ "point": { "lat": 1.0, "lng": 2.0 } }));
    }
}
