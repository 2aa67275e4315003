#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality configuration and location validation.
//!
//! Validating a picked location uses the same containment rule as flood
//! impact analysis ([`flood_map_spatial::contains`]), so a point on the
//! municipal boundary is accepted exactly as a household on a flood edge
//! is counted as affected.

pub mod config;
pub mod pin;

use flood_map_geography_models::GeoPoint;

pub use config::{CONFIG_ENV_VAR, District, MunicipalityConfig};
pub use pin::{ExportPin, InvalidPin, PIN_LENGTH};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed, including malformed PINs.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A boundary ring has no interior or non-finite points.
    #[error("Boundary of {owner} is invalid ({points} point(s))")]
    InvalidBoundary {
        /// Municipality name or district id.
        owner: String,
        /// Number of points in the ring.
        points: usize,
    },

    /// A district has an empty id.
    #[error("District id must not be empty")]
    EmptyDistrictId,

    /// Two districts share an id.
    #[error("Duplicate district id: {id}")]
    DuplicateDistrict {
        /// The repeated id.
        id: String,
    },

    /// A district id isn't registered.
    #[error("Unknown district: {id}")]
    UnknownDistrict {
        /// The requested id.
        id: String,
    },
}

/// A location that can't be recorded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// Latitude or longitude is NaN or infinite.
    #[error("Location ({lat}, {lng}) is not a valid coordinate")]
    NotFinite {
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
    },

    /// The point is outside the municipal boundary.
    #[error("Location ({lat}, {lng}) is outside {municipality}")]
    OutsideBoundary {
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
        /// Municipality name.
        municipality: String,
    },
}

/// Accepts `point` if it is inside (or on) the municipal boundary.
///
/// # Errors
///
/// Returns [`LocationError`] if the point is not finite or lies outside
/// the boundary.
pub fn validate_location(
    config: &MunicipalityConfig,
    point: GeoPoint,
) -> Result<GeoPoint, LocationError> {
    if !point.is_finite() {
        return Err(LocationError::NotFinite {
            lat: point.lat,
            lng: point.lng,
        });
    }

    if flood_map_spatial::contains(point, &config.boundary) {
        Ok(point)
    } else {
        log::debug!(
            "Rejected location ({}, {}) outside {}",
            point.lat,
            point.lng,
            config.name
        );
        Err(LocationError::OutsideBoundary {
            lat: point.lat,
            lng: point.lng,
            municipality: config.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MunicipalityConfig {
        MunicipalityConfig::embedded().unwrap()
    }

    #[test]
    fn accepts_points_inside_boundary() {
        let point = GeoPoint::new(14.58, 121.03);
        assert_eq!(validate_location(&config(), point), Ok(point));
    }

    #[test]
    fn accepts_points_on_boundary_edge() {
        let point = GeoPoint::new(14.52, 121.03);
        assert!(validate_location(&config(), point).is_ok());
    }

    #[test]
    fn rejects_points_outside_boundary() {
        assert!(matches!(
            validate_location(&config(), GeoPoint::new(10.0, 120.0)),
            Err(LocationError::OutsideBoundary { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_points() {
        assert!(matches!(
            validate_location(&config(), GeoPoint::new(f64::NAN, 121.0)),
            Err(LocationError::NotFinite { .. })
        ));
    }
}
