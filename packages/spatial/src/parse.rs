//! Reading polygons from `GeoJSON`.
//!
//! Positions are `[lng, lat]` per RFC 7946. Only the outer ring is kept;
//! holes are not used by flood extents or district boundaries.

use flood_map_geography_models::{GeoPoint, Polygon};
use geojson::{GeoJson, Geometry, Value};

use crate::SpatialError;

/// Parses a `GeoJSON` `Polygon` or `MultiPolygon` into a [`Polygon`].
///
/// Accepts a bare geometry or a feature wrapping one. For a
/// `MultiPolygon`, the first polygon's outer ring is used.
///
/// # Errors
///
/// Returns [`SpatialError`] if the text is not valid `GeoJSON`, does not
/// describe an area, or has a position with fewer than two coordinates.
pub fn polygon_from_geojson(geojson_str: &str) -> Result<Polygon, SpatialError> {
    let geojson: GeoJson = geojson_str.parse()?;

    let geometry = match geojson {
        GeoJson::Geometry(geom) => Some(geom),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(_) => {
            return Err(SpatialError::UnsupportedGeometry {
                kind: "FeatureCollection".to_string(),
            });
        }
    };

    let Some(geometry) = geometry else {
        return Err(SpatialError::UnsupportedGeometry {
            kind: "null".to_string(),
        });
    };

    polygon_from_geometry(geometry)
}

/// Converts an already-parsed `Polygon` or `MultiPolygon` geometry.
///
/// Geometries built in code skip the parser's position checks, so short
/// positions are rejected here.
///
/// # Errors
///
/// Returns [`SpatialError`] if the geometry does not describe an area or
/// has a position with fewer than two coordinates.
pub fn polygon_from_geometry(geometry: Geometry) -> Result<Polygon, SpatialError> {
    let outer = match geometry.value {
        Value::Polygon(rings) => rings.into_iter().next(),
        Value::MultiPolygon(polygons) => polygons
            .into_iter()
            .next()
            .and_then(|rings| rings.into_iter().next()),
        other => {
            return Err(SpatialError::UnsupportedGeometry {
                kind: geometry_kind(&other).to_string(),
            });
        }
    };

    outer
        .unwrap_or_default()
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok(GeoPoint::new(*lat, *lng)),
            _ => Err(SpatialError::InvalidPosition {
                len: position.len(),
            }),
        })
        .collect()
}

const fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_polygon_geometry() {
        let poly = polygon_from_geojson(
            r#"{"type":"Polygon","coordinates":[[[121.0,14.5],[121.1,14.5],[121.1,14.6],[121.0,14.5]]]}"#,
        )
        .unwrap();
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.points()[1], GeoPoint::new(14.5, 121.1));
    }

    #[test]
    fn parses_feature_with_multipolygon() {
        let poly = polygon_from_geojson(
            r#"{"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[[[[1.0,2.0],[3.0,2.0],[3.0,4.0]]],[[[9.0,9.0],[9.5,9.0],[9.5,9.5]]]]}}"#,
        )
        .unwrap();
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.points()[0], GeoPoint::new(2.0, 1.0));
    }

    #[test]
    fn rejects_point_geometry() {
        let err = polygon_from_geojson(r#"{"type":"Point","coordinates":[121.0,14.5]}"#)
            .unwrap_err();
        assert!(matches!(err, SpatialError::UnsupportedGeometry { .. }));
    }

    #[test]
    fn parser_rejects_short_positions() {
        let err = polygon_from_geojson(r#"{"type":"Polygon","coordinates":[[[121.0],[1.0,2.0]]]}"#)
            .unwrap_err();
        assert!(matches!(err, SpatialError::Geojson(_)));
    }

    #[test]
    fn built_geometry_with_short_position_is_rejected() {
        let geometry = Geometry::new(Value::Polygon(vec![vec![
            vec![121.0],
            vec![121.1, 14.5],
            vec![121.1, 14.6],
        ]]));
        let err = polygon_from_geometry(geometry).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidPosition { len: 1 }));
    }

    #[test]
    fn built_geometry_converts_outer_ring() {
        let geometry = Geometry::new(Value::Polygon(vec![
            vec![vec![121.0, 14.5], vec![121.1, 14.5], vec![121.1, 14.6]],
            vec![vec![121.05, 14.52], vec![121.06, 14.52], vec![121.06, 14.53]],
        ]));
        let poly = polygon_from_geometry(geometry).unwrap();
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.points()[2], GeoPoint::new(14.6, 121.1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            polygon_from_geojson("not json"),
            Err(SpatialError::Geojson(_))
        ));
    }
}
