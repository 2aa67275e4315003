#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Point-in-polygon classification for hazard analysis and location
//! validation.
//!
//! Coordinates are treated as planar: longitude is `x`, latitude is `y`.
//! At municipal scale (tens of kilometers) the distortion from ignoring
//! earth curvature is far below the precision of the recorded boundaries,
//! so no projection is applied.
//!
//! Points lying exactly on a polygon edge or vertex are classified as
//! inside. The same rule applies to boundary validation and to impact
//! analysis.

pub mod index;
pub mod parse;

use flood_map_geography_models::{GeoPoint, Polygon};

pub use index::{HazardIndex, classify_all};
pub use parse::{polygon_from_geojson, polygon_from_geometry};

/// Collinearity tolerance for the on-edge check, in squared degrees.
const EDGE_EPSILON: f64 = 1e-12;

/// Errors that can occur while reading polygon geometry.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// The `GeoJSON` text could not be parsed.
    #[error("GeoJSON parse error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The `GeoJSON` parsed but does not describe an area.
    #[error("Unsupported geometry: {kind}")]
    UnsupportedGeometry {
        /// The geometry type that was found.
        kind: String,
    },

    /// A position did not carry both a longitude and a latitude.
    #[error("Invalid position with {len} coordinate(s)")]
    InvalidPosition {
        /// Number of coordinates the position had.
        len: usize,
    },
}

/// Returns `true` if `point` lies inside `polygon` or on its boundary.
///
/// Uses even-odd ray casting after an explicit on-edge check. Polygons with
/// fewer than three vertices have no interior and never contain anything.
/// Non-finite points are never contained.
#[must_use]
pub fn contains(point: GeoPoint, polygon: &Polygon) -> bool {
    if !polygon.has_interior() || !point.is_finite() {
        return false;
    }

    if polygon.edges().any(|(a, b)| on_segment(point, a, b)) {
        return true;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;

    for (a, b) in polygon.edges() {
        if (a.lat > y) != (b.lat > y) {
            let crossing = (b.lng - a.lng) * (y - a.lat) / (b.lat - a.lat) + a.lng;
            if x < crossing {
                inside = !inside;
            }
        }
    }

    inside
}

/// Returns `true` if `p` lies on the segment from `a` to `b`.
fn on_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }

    p.lng >= a.lng.min(b.lng) - EDGE_EPSILON
        && p.lng <= a.lng.max(b.lng) + EDGE_EPSILON
        && p.lat >= a.lat.min(b.lat) - EDGE_EPSILON
        && p.lat <= a.lat.max(b.lat) + EDGE_EPSILON
}
