#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic value types shared by every flood-map crate.
//!
//! Coordinates are plain latitude/longitude degrees. Geometry predicates
//! over these types live in `flood_map_spatial`; this crate only defines
//! the shapes that cross crate boundaries.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees (north positive).
    pub lat: f64,
    /// Longitude in degrees (east positive).
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A closed ring of points bounding an area.
///
/// The ring closes implicitly: the last point connects back to the first,
/// so callers don't need to repeat the first point (a repeated closing
/// point is harmless). Rings with fewer than three points have no
/// interior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<GeoPoint>,
}

impl Polygon {
    /// Creates a polygon from its ring of vertices.
    #[must_use]
    pub const fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// The ring's vertices in order.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of vertices in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the ring has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if the ring has enough vertices to enclose an area.
    #[must_use]
    pub fn has_interior(&self) -> bool {
        self.points.len() >= 3
    }

    /// Iterates over the ring's edges as `(start, end)` pairs, including
    /// the closing edge from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounds of the ring, or `None` when it is empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bbox = BoundingBox {
            min_lat: first.lat,
            min_lng: first.lng,
            max_lat: first.lat,
            max_lng: first.lng,
        };
        for p in &self.points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.max_lng = bbox.max_lng.max(p.lng);
        }
        Some(bbox)
    }
}

impl From<Vec<GeoPoint>> for Polygon {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<GeoPoint> for Polygon {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns `true` if the point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}
