//! R-tree backed batch classification.
//!
//! Bounding boxes of the hazard polygons are bulk-loaded into an R-tree so
//! each point only runs the exact [`contains`](crate::contains) test
//! against polygons whose envelope it falls in.

use std::collections::{BTreeMap, BTreeSet};

use flood_map_geography_models::{GeoPoint, Polygon};
use rstar::{AABB, RTree, RTreeObject};

/// A hazard polygon stored in the R-tree with its identifier.
struct HazardEntry<Id> {
    id: Id,
    envelope: AABB<[f64; 2]>,
    polygon: Polygon,
}

impl<Id> RTreeObject for HazardEntry<Id> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over a set of identified hazard polygons.
///
/// Polygons without an interior are dropped at build time since they can
/// never contain a point.
pub struct HazardIndex<Id> {
    tree: RTree<HazardEntry<Id>>,
}

impl<Id> HazardIndex<Id> {
    /// Builds the index from `(id, polygon)` pairs.
    pub fn new(polygons: impl IntoIterator<Item = (Id, Polygon)>) -> Self {
        let mut skipped = 0_usize;
        let entries: Vec<_> = polygons
            .into_iter()
            .filter_map(|(id, polygon)| {
                let Some(bbox) = polygon.bounding_box().filter(|_| polygon.has_interior()) else {
                    skipped += 1;
                    return None;
                };
                Some(HazardEntry {
                    id,
                    envelope: AABB::from_corners(
                        [bbox.min_lng, bbox.min_lat],
                        [bbox.max_lng, bbox.max_lat],
                    ),
                    polygon,
                })
            })
            .collect();

        if skipped > 0 {
            log::debug!("Skipped {skipped} polygon(s) with fewer than 3 points");
        }

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if no polygon was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Returns the ids of every indexed polygon containing `point`.
    ///
    /// Order follows the R-tree traversal and is not meaningful.
    pub fn containing(&self, point: GeoPoint) -> impl Iterator<Item = &Id> + '_ {
        let query_env = AABB::from_point([point.lng, point.lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(move |entry| crate::contains(point, &entry.polygon))
            .map(|entry| &entry.id)
    }
}

/// Classifies every point against every polygon.
///
/// Each point id appears in the result, mapped to the (possibly empty) set
/// of polygon ids containing it. Overlapping polygons are expected; a point
/// inside several of them maps to all of their ids.
#[must_use]
pub fn classify_all<P, G>(
    points: &[(P, GeoPoint)],
    polygons: &[(G, Polygon)],
) -> BTreeMap<P, BTreeSet<G>>
where
    P: Clone + Ord,
    G: Clone + Ord,
{
    let index = HazardIndex::new(polygons.iter().cloned());

    points
        .iter()
        .map(|(point_id, point)| {
            let hits: BTreeSet<G> = index.containing(*point).cloned().collect();
            (point_id.clone(), hits)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Polygon {
        vec![
            GeoPoint::new(min_lat, min_lng),
            GeoPoint::new(min_lat, max_lng),
            GeoPoint::new(max_lat, max_lng),
            GeoPoint::new(max_lat, min_lng),
        ]
        .into()
    }

    fn naive(
        points: &[(u32, GeoPoint)],
        polygons: &[(&'static str, Polygon)],
    ) -> BTreeMap<u32, BTreeSet<&'static str>> {
        points
            .iter()
            .map(|(pid, p)| {
                let hits: BTreeSet<&'static str> = polygons
                    .iter()
                    .filter(|(_, poly)| crate::contains(*p, poly))
                    .map(|(gid, _)| *gid)
                    .collect();
                (*pid, hits)
            })
            .collect()
    }

    #[test]
    fn overlapping_polygons_report_every_hit() {
        let polygons = vec![
            ("north", rect(14.60, 121.00, 14.70, 121.10)),
            ("center", rect(14.55, 121.05, 14.65, 121.15)),
        ];
        let points = vec![
            (1, GeoPoint::new(14.62, 121.07)),
            (2, GeoPoint::new(14.68, 121.01)),
            (3, GeoPoint::new(14.40, 121.00)),
        ];

        let result = classify_all(&points, &polygons);

        assert_eq!(result[&1], BTreeSet::from(["center", "north"]));
        assert_eq!(result[&2], BTreeSet::from(["north"]));
        assert!(result[&3].is_empty());
    }

    #[test]
    fn matches_naive_nested_loop() {
        let polygons = vec![
            ("a", rect(0.0, 0.0, 4.0, 4.0)),
            ("b", rect(2.0, 2.0, 6.0, 6.0)),
            ("c", rect(5.0, 0.0, 9.0, 3.0)),
            (
                "tri",
                vec![
                    GeoPoint::new(0.0, 5.0),
                    GeoPoint::new(0.0, 9.0),
                    GeoPoint::new(4.0, 9.0),
                ]
                .into(),
            ),
        ];
        let mut points = Vec::new();
        let mut id = 0;
        for i in 0..20 {
            for j in 0..20 {
                points.push((
                    id,
                    GeoPoint::new(f64::from(i) * 0.5, f64::from(j) * 0.5),
                ));
                id += 1;
            }
        }

        assert_eq!(classify_all(&points, &polygons), naive(&points, &polygons));
    }

    #[test]
    fn degenerate_polygons_are_not_indexed() {
        let index = HazardIndex::new(vec![
            ("line", vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)].into()),
            ("empty", Polygon::default()),
            ("square", rect(0.0, 0.0, 1.0, 1.0)),
        ]);
        assert_eq!(index.len(), 1);

        let hits: Vec<_> = index.containing(GeoPoint::new(0.5, 0.5)).collect();
        assert_eq!(hits, vec![&"square"]);
    }

    #[test]
    fn empty_inputs_produce_empty_sets() {
        let points = vec![(7, GeoPoint::new(1.0, 1.0))];
        let polygons: Vec<(&str, Polygon)> = Vec::new();

        let result = classify_all(&points, &polygons);
        assert_eq!(result.len(), 1);
        assert!(result[&7].is_empty());

        let none: Vec<(u32, GeoPoint)> = Vec::new();
        assert!(classify_all(&none, &[("a", rect(0.0, 0.0, 1.0, 1.0))]).is_empty());
    }
}
