//! Which households sit inside which flood areas.

use std::borrow::Borrow;
use std::collections::BTreeSet;

use flood_map_flood_models::FloodRecord;
use flood_map_geography_models::{GeoPoint, Polygon};
use flood_map_household_models::HouseholdRecord;

/// Households affected by a set of floods.
///
/// Indices refer to positions in the slices passed to
/// [`affected_households`], so duplicate document ids can't collide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedSet {
    /// Indices of households inside at least one flood area, ascending.
    pub households: BTreeSet<usize>,
    /// For each area flood (by flood index, ascending), the indices of the
    /// households inside it.
    pub by_flood: Vec<(usize, BTreeSet<usize>)>,
    /// Marker-only floods that could not be analyzed.
    pub skipped_point_floods: u64,
}

/// Classifies active households against the area floods in `floods`.
///
/// Marker-only floods have no area and are skipped. Archived households
/// are never affected. A household inside several overlapping floods
/// appears once in [`AffectedSet::households`] and under each flood in
/// [`AffectedSet::by_flood`].
#[must_use]
pub fn affected_households<H, F>(households: &[H], floods: &[F]) -> AffectedSet
where
    H: Borrow<HouseholdRecord>,
    F: Borrow<FloodRecord>,
{
    let points: Vec<(usize, GeoPoint)> = households
        .iter()
        .map(Borrow::<HouseholdRecord>::borrow)
        .enumerate()
        .filter(|(_, h)| h.is_active())
        .map(|(i, h)| (i, h.position))
        .collect();

    let mut skipped_point_floods = 0_u64;
    let polygons: Vec<(usize, Polygon)> = floods
        .iter()
        .map(Borrow::<FloodRecord>::borrow)
        .enumerate()
        .filter_map(|(i, flood)| {
            if let Some(area) = flood.extent.area() {
                Some((i, area.clone()))
            } else {
                skipped_point_floods += 1;
                None
            }
        })
        .collect();

    if skipped_point_floods > 0 {
        log::debug!("Skipping {skipped_point_floods} marker-only flood(s) with no area");
    }

    let membership = flood_map_spatial::classify_all(&points, &polygons);

    let mut by_flood: Vec<(usize, BTreeSet<usize>)> = polygons
        .iter()
        .map(|(flood_idx, _)| (*flood_idx, BTreeSet::new()))
        .collect();
    let mut affected = BTreeSet::new();

    for (household_idx, flood_indices) in membership {
        if flood_indices.is_empty() {
            continue;
        }
        affected.insert(household_idx);
        for flood_idx in flood_indices {
            // `polygons` is built in ascending flood order, so `by_flood` is too.
            if let Ok(slot) = by_flood.binary_search_by_key(&flood_idx, |(i, _)| *i) {
                by_flood[slot].1.insert(household_idx);
            }
        }
    }

    AffectedSet {
        households: affected,
        by_flood,
        skipped_point_floods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use flood_map_flood_models::FloodExtent;
    use flood_map_household_models::Person;

    fn rect(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Polygon {
        vec![
            GeoPoint::new(min_lat, min_lng),
            GeoPoint::new(min_lat, max_lng),
            GeoPoint::new(max_lat, max_lng),
            GeoPoint::new(max_lat, min_lng),
        ]
        .into()
    }

    fn house(id: &str, lat: f64, lng: f64) -> HouseholdRecord {
        HouseholdRecord::new(id, GeoPoint::new(lat, lng), "tubili", Person::named(id))
    }

    fn flood(id: &str, extent: FloodExtent) -> FloodRecord {
        FloodRecord::new(
            id,
            NaiveDate::from_ymd_opt(2024, 7, 24).unwrap(),
            "tubili",
            extent,
        )
    }

    #[test]
    fn overlapping_floods_count_household_once() {
        let households = vec![house("a", 1.0, 1.0), house("b", 3.0, 3.0), house("c", 9.0, 9.0)];
        let floods = vec![
            flood("f1", FloodExtent::Area(rect(0.0, 0.0, 2.0, 2.0))),
            flood("f2", FloodExtent::Area(rect(0.0, 0.0, 4.0, 4.0))),
        ];

        let set = affected_households(&households, &floods);

        assert_eq!(set.households, BTreeSet::from([0, 1]));
        assert_eq!(
            set.by_flood,
            vec![(0, BTreeSet::from([0])), (1, BTreeSet::from([0, 1]))]
        );
        assert_eq!(set.skipped_point_floods, 0);
    }

    #[test]
    fn point_floods_are_skipped() {
        let households = vec![house("a", 1.0, 1.0)];
        let floods = vec![
            flood("marker", FloodExtent::Point(GeoPoint::new(1.0, 1.0))),
            flood("area", FloodExtent::Area(rect(0.0, 0.0, 2.0, 2.0))),
        ];

        let set = affected_households(&households, &floods);
        assert_eq!(set.skipped_point_floods, 1);
        assert_eq!(set.by_flood, vec![(1, BTreeSet::from([0]))]);
    }

    #[test]
    fn archived_households_are_never_affected() {
        let mut archived = house("a", 1.0, 1.0);
        archived.archive().unwrap();
        let households = vec![archived, house("b", 1.5, 1.5)];
        let floods = vec![flood("f1", FloodExtent::Area(rect(0.0, 0.0, 2.0, 2.0)))];

        let set = affected_households(&households, &floods);
        assert_eq!(set.households, BTreeSet::from([1]));
    }

    #[test]
    fn degenerate_flood_area_affects_nobody() {
        let households = vec![house("a", 0.0, 0.0)];
        let floods = vec![flood(
            "f1",
            FloodExtent::Area(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)].into()),
        )];

        let set = affected_households(&households, &floods);
        assert!(set.households.is_empty());
        assert_eq!(set.by_flood, vec![(0, BTreeSet::new())]);
    }

    #[test]
    fn borrowed_records_classify_like_owned_ones() {
        let households = vec![house("a", 1.0, 1.0), house("b", 3.0, 3.0)];
        let floods = vec![flood("f1", FloodExtent::Area(rect(0.0, 0.0, 2.0, 2.0)))];
        let household_refs: Vec<&HouseholdRecord> = households.iter().collect();
        let flood_refs: Vec<&FloodRecord> = floods.iter().collect();

        assert_eq!(
            affected_households(&household_refs, &flood_refs),
            affected_households(&households, &floods)
        );
    }
}
