#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for region attribution.
//!
//! Converts canonical [`RegionGeometry`] values into `geo` multi-polygons,
//! builds an R-tree over their bounding boxes, and answers exact
//! point-in-polygon queries. The bounding-box tree only narrows the
//! candidate set; every hit is confirmed with a full containment test that
//! honors holes and multi-part regions.

use std::collections::BTreeMap;

use geo::{BoundingRect, Centroid, Contains, LineString, MultiPolygon, Point, Polygon};
use rstar::{AABB, RTree, RTreeObject};
use wildfire_impact_geography_models::{RegionGeometry, RegionValidationError, Ring};

/// Bounding box of one region stored in the R-tree.
struct RegionEnvelope {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A validated region with its converted geometry.
struct IndexedRegion {
    /// Position of the region in the caller's input slice.
    input_index: usize,
    id: String,
    name: String,
    polygon: MultiPolygon<f64>,
}

/// Pre-built spatial index over a set of region geometries.
///
/// Built once per report from the caller's region list. Regions failing
/// [`RegionGeometry::validate`] are left out and recorded in
/// [`RegionIndex::skipped`].
pub struct RegionIndex {
    regions: Vec<IndexedRegion>,
    tree: RTree<RegionEnvelope>,
    /// region id -> slot of the first region with that id
    by_id: BTreeMap<String, usize>,
    skipped: Vec<RegionValidationError>,
}

impl RegionIndex {
    /// Validates and indexes the given regions.
    #[must_use]
    pub fn build(regions: &[RegionGeometry]) -> Self {
        let mut indexed = Vec::with_capacity(regions.len());
        let mut skipped = Vec::new();

        for (input_index, region) in regions.iter().enumerate() {
            if let Err(e) = region.validate() {
                log::warn!("Skipping region from attribution: {e}");
                skipped.push(e);
                continue;
            }

            indexed.push(IndexedRegion {
                input_index,
                id: region.id.clone(),
                name: region.name.clone(),
                polygon: to_multi_polygon(&region.polygons),
            });
        }

        let envelopes = indexed
            .iter()
            .enumerate()
            .map(|(slot, region)| RegionEnvelope {
                slot,
                envelope: compute_envelope(&region.polygon),
            })
            .collect();

        let mut by_id = BTreeMap::new();
        for (slot, region) in indexed.iter().enumerate() {
            by_id.entry(region.id.clone()).or_insert(slot);
        }

        log::debug!(
            "Indexed {} regions ({} skipped)",
            indexed.len(),
            skipped.len()
        );

        Self {
            regions: indexed,
            tree: RTree::bulk_load(envelopes),
            by_id,
            skipped,
        }
    }

    /// Number of regions that passed validation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no region passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Validation failures for the regions left out of the index.
    #[must_use]
    pub fn skipped(&self) -> &[RegionValidationError] {
        &self.skipped
    }

    /// Indexed regions as `(slot, id, name)` in input order.
    pub fn regions(&self) -> impl Iterator<Item = (usize, &str, &str)> + '_ {
        self.regions
            .iter()
            .enumerate()
            .map(|(slot, r)| (slot, r.id.as_str(), r.name.as_str()))
    }

    /// Position in the caller's input slice of the region at `slot`.
    #[must_use]
    pub fn input_index(&self, slot: usize) -> Option<usize> {
        self.regions.get(slot).map(|r| r.input_index)
    }

    /// Slots of every region whose geometry contains the point.
    ///
    /// Regions may overlap, so more than one slot can be returned. Slots
    /// are returned in ascending order. Points exactly on a boundary are
    /// not contained.
    #[must_use]
    pub fn containing(&self, lng: f64, lat: f64) -> Vec<usize> {
        let point = Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| self.regions[entry.slot].polygon.contains(&point))
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Whether the region with the given id contains the point.
    #[must_use]
    pub fn region_contains(&self, id: &str, lng: f64, lat: f64) -> bool {
        self.by_id
            .get(id)
            .is_some_and(|&slot| self.regions[slot].polygon.contains(&Point::new(lng, lat)))
    }

    /// Planar centroid of the region with the given id, as `(lng, lat)`.
    #[must_use]
    pub fn centroid(&self, id: &str) -> Option<(f64, f64)> {
        let slot = *self.by_id.get(id)?;
        self.regions[slot]
            .polygon
            .centroid()
            .map(|p| (p.x(), p.y()))
    }
}

/// Converts `GeoJSON`-nested polygon coordinates into a [`MultiPolygon`].
///
/// The first ring of each polygon is the exterior, the rest are holes.
/// Rings are closed automatically.
#[must_use]
pub fn to_multi_polygon(polygons: &[Vec<Ring>]) -> MultiPolygon<f64> {
    MultiPolygon(
        polygons
            .iter()
            .filter_map(|rings| {
                let (exterior, holes) = rings.split_first()?;
                Some(Polygon::new(
                    LineString::from(exterior.clone()),
                    holes.iter().cloned().map(LineString::from).collect(),
                ))
            })
            .collect(),
    )
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
    }

    fn region(id: &str, polygons: Vec<Vec<Ring>>) -> RegionGeometry {
        RegionGeometry {
            id: id.to_string(),
            name: format!("Region {id}"),
            polygons,
        }
    }

    #[test]
    fn hole_is_excluded() {
        let index = RegionIndex::build(&[region(
            "donut",
            vec![vec![rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)]],
        )]);

        assert!(index.region_contains("donut", 2.0, 2.0));
        assert!(!index.region_contains("donut", 5.0, 5.0));
        assert!(index.containing(5.0, 5.0).is_empty());
    }

    #[test]
    fn multi_polygon_parts_both_count() {
        let index = RegionIndex::build(&[region(
            "islands",
            vec![
                vec![rect(0.0, 0.0, 1.0, 1.0)],
                vec![rect(5.0, 5.0, 6.0, 6.0)],
            ],
        )]);

        assert!(index.region_contains("islands", 0.5, 0.5));
        assert!(index.region_contains("islands", 5.5, 5.5));
        // Inside the combined bounding box but in neither part.
        assert!(!index.region_contains("islands", 3.0, 3.0));
    }

    #[test]
    fn concave_notch_is_outside() {
        // An L-shape: the upper-right quadrant of its bounding box is empty.
        let l_shape = vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 2.0],
            [2.0, 2.0],
            [2.0, 4.0],
            [0.0, 4.0],
        ];
        let index = RegionIndex::build(&[region("l", vec![vec![l_shape]])]);

        assert!(index.region_contains("l", 1.0, 3.0));
        assert!(index.region_contains("l", 3.0, 1.0));
        assert!(!index.region_contains("l", 3.0, 3.0));
    }

    #[test]
    fn overlapping_regions_return_all_slots() {
        let index = RegionIndex::build(&[
            region("a", vec![vec![rect(0.0, 0.0, 2.0, 2.0)]]),
            region("b", vec![vec![rect(1.0, 1.0, 3.0, 3.0)]]),
            region("c", vec![vec![rect(10.0, 10.0, 11.0, 11.0)]]),
        ]);

        assert_eq!(index.containing(1.5, 1.5), vec![0, 1]);
        assert_eq!(index.containing(0.5, 0.5), vec![0]);
        assert!(index.containing(5.0, 5.0).is_empty());
    }

    #[test]
    fn invalid_regions_are_skipped() {
        let index = RegionIndex::build(&[
            region("", vec![vec![rect(0.0, 0.0, 1.0, 1.0)]]),
            region("empty", vec![]),
            region("ok", vec![vec![rect(0.0, 0.0, 1.0, 1.0)]]),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped().len(), 2);
        assert_eq!(index.input_index(0), Some(2));
        let ids: Vec<&str> = index.regions().map(|(_, id, _)| id).collect();
        assert_eq!(ids, ["ok"]);
    }

    #[test]
    fn centroid_of_square() {
        let index = RegionIndex::build(&[region("sq", vec![vec![rect(-72.0, -36.0, -70.0, -34.0)]])]);
        let (lng, lat) = index.centroid("sq").unwrap();
        assert!((lng + 71.0).abs() < 1e-9);
        assert!((lat + 35.0).abs() < 1e-9);
        assert!(index.centroid("missing").is_none());
    }
}
