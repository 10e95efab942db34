#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index over administrative area polygons.
//!
//! Built once from the loaded area records, it answers "which area is this
//! point in" (map clicks) and computes the bounding box an area should be
//! framed with when the map flies to it.

use geo::{BoundingRect, Contains, MultiPolygon};
use geojson::Geometry;
use pharmacy_gap_area_models::{AreaFocus, AreaRecord};
use rstar::{AABB, RTree, RTreeObject};

/// An area polygon stored in the R-tree with the index of its record.
struct AreaEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for AreaEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree of area polygons.
pub struct AreaIndex {
    areas: RTree<AreaEntry>,
}

impl AreaIndex {
    /// Builds the index from area records. Records without a polygon
    /// geometry are left out.
    #[must_use]
    pub fn build(records: &[AreaRecord]) -> Self {
        let mut entries = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let Some(polygon) = record.geometry.as_ref().and_then(to_multipolygon) else {
                log::warn!(
                    "Area {} has no polygon geometry; skipping spatial index",
                    record.display_name()
                );
                continue;
            };

            entries.push(AreaEntry {
                position,
                envelope: compute_envelope(&polygon),
                polygon,
            });
        }

        let areas = RTree::bulk_load(entries);
        log::info!("Loaded {} areas into spatial index", areas.size());

        Self { areas }
    }

    /// Position of the record whose polygon contains the point.
    ///
    /// When polygons overlap, the earliest record in layer order wins.
    #[must_use]
    pub fn lookup(&self, lng: f64, lat: f64) -> Option<usize> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.areas
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(&point))
            .map(|entry| entry.position)
            .min()
    }

    /// Number of indexed areas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.size()
    }

    /// Whether no area has a usable polygon.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.size() == 0
    }
}

/// Bounding box and center of any geometry.
#[must_use]
pub fn focus_of(geometry: &Geometry) -> Option<AreaFocus> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    let rect = geo_geom.bounding_rect()?;
    let center = rect.center();

    Some(AreaFocus {
        center: [center.x, center.y],
        bounds: [rect.min().x, rect.min().y, rect.max().x, rect.max().y],
    })
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
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

    fn square(west: f64, south: f64, size: f64) -> Geometry {
        serde_json::from_value(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[
                [west, south],
                [west + size, south],
                [west + size, south + size],
                [west, south + size],
                [west, south],
            ]],
        }))
        .unwrap()
    }

    fn area(name: &str, geometry: Option<Geometry>) -> AreaRecord {
        AreaRecord {
            geometry,
            ..AreaRecord::new(name, 10_000, 1)
        }
    }

    #[test]
    fn looks_up_containing_area() {
        let records = vec![
            area("west", Some(square(119.40, -5.16, 0.01))),
            area("no-shape", None),
            area("east", Some(square(119.41, -5.16, 0.01))),
        ];
        let index = AreaIndex::build(&records);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(119.405, -5.155), Some(0));
        assert_eq!(index.lookup(119.415, -5.155), Some(2));
        assert_eq!(index.lookup(120.0, -5.155), None);
    }

    #[test]
    fn overlapping_areas_resolve_to_the_earliest_record() {
        let records: Vec<AreaRecord> = (0..40)
            .map(|i| {
                let offset = f64::from(i) * 0.001;
                area(&format!("area-{i}"), Some(square(119.40 - offset, -5.16, 0.05)))
            })
            .rev()
            .collect();
        let index = AreaIndex::build(&records);

        assert_eq!(index.len(), 40);
        assert_eq!(index.lookup(119.405, -5.14), Some(0));
        assert_eq!(index.lookup(119.365, -5.14), Some(0));
        // Only the eastmost twenty squares reach this far.
        assert_eq!(index.lookup(119.4305, -5.14), Some(20));
    }

    #[test]
    fn multipolygon_areas_are_indexed() {
        let geometry: Geometry = serde_json::from_value(serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]],
            ],
        }))
        .unwrap();
        let index = AreaIndex::build(&[area("islands", Some(geometry))]);

        assert_eq!(index.lookup(5.5, 5.5), Some(0));
        assert_eq!(index.lookup(3.0, 3.0), None);
    }

    #[test]
    fn point_geometries_are_not_indexed() {
        let point: Geometry = serde_json::from_value(serde_json::json!({
            "type": "Point",
            "coordinates": [119.43, -5.14],
        }))
        .unwrap();
        let index = AreaIndex::build(&[area("pin", Some(point))]);

        assert!(index.is_empty());
    }

    #[test]
    fn focus_is_bounding_box_center() {
        let focus = focus_of(&square(119.40, -5.16, 0.02)).unwrap();

        assert!((focus.center[0] - 119.41).abs() < 1e-9);
        assert!((focus.center[1] - -5.15).abs() < 1e-9);
        assert!((focus.bounds[0] - 119.40).abs() < 1e-9);
        assert!((focus.bounds[3] - -5.14).abs() < 1e-9);
    }
}
