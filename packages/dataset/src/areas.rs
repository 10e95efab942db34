//! Converts area layer features into [`AreaRecord`]s.
//!
//! Uses the layer's [`AreaFieldMapping`] to find each attribute, so the
//! loader works with any export regardless of its property names.

use geojson::{Feature, FeatureCollection};
use pharmacy_gap_area_models::AreaRecord;

use crate::config::AreaFieldMapping;
use crate::parsing::{count_or_zero, float_or_zero, int_or_zero, text};

/// Converts every feature of an area layer, in input order.
///
/// Never drops a feature: missing attributes become zero and a missing
/// name becomes empty.
#[must_use]
pub fn areas_from_collection(
    collection: &FeatureCollection,
    fields: &AreaFieldMapping,
) -> Vec<AreaRecord> {
    collection
        .features
        .iter()
        .map(|feature| area_from_feature(feature, fields))
        .collect()
}

/// Converts a single feature.
#[must_use]
pub fn area_from_feature(feature: &Feature, fields: &AreaFieldMapping) -> AreaRecord {
    let prop = |key: &str| feature.properties.as_ref().and_then(|props| props.get(key));

    AreaRecord {
        name: text(prop(&fields.name)).unwrap_or_default(),
        population: count_or_zero(prop(&fields.population)),
        existing_facilities: count_or_zero(prop(&fields.facilities)),
        hospitals: count_or_zero(prop(&fields.hospitals)),
        reported_deficit: int_or_zero(prop(&fields.reported_deficit)),
        density: float_or_zero(prop(&fields.density)),
        geometry: feature.geometry.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(value: &serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn maps_all_properties() {
        let fc = collection(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "nm_kelurah": "Mamajang Dalam",
                    "data_fin_1": "16541",
                    "JML_EXIST": 1,
                    "JML_RS": "2",
                    "DEFISIT": -1,
                    "Kepadataan": 21030.5
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[119.41, -5.16], [119.42, -5.16], [119.42, -5.15], [119.41, -5.16]]]
                }
            }]
        }));
        let areas = areas_from_collection(&fc, &AreaFieldMapping::default());

        assert_eq!(areas.len(), 1);
        let area = &areas[0];
        assert_eq!(area.name, "Mamajang Dalam");
        assert_eq!(area.population, 16_541);
        assert_eq!(area.existing_facilities, 1);
        assert_eq!(area.hospitals, 2);
        assert_eq!(area.reported_deficit, -1);
        assert!((area.density - 21_030.5).abs() < 1e-9);
        assert!(area.geometry.is_some());
    }

    #[test]
    fn malformed_properties_become_zero() {
        let fc = collection(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "nm_kelurah": "Lette", "data_fin_1": "tidak ada data" },
                    "geometry": null
                },
                {
                    "type": "Feature",
                    "properties": null,
                    "geometry": null
                }
            ]
        }));
        let areas = areas_from_collection(&fc, &AreaFieldMapping::default());

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name, "Lette");
        assert_eq!(areas[0].population, 0);
        assert_eq!(areas[0].existing_facilities, 0);
        assert_eq!(areas[1].name, "");
        assert_eq!(areas[1].display_name(), "Unknown");
        assert!(areas[1].geometry.is_none());
    }

    #[test]
    fn honours_custom_field_names() {
        let fc = collection(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "district": "Rappocini", "pop": 12000, "pharmacies": 3 },
                "geometry": null
            }]
        }));
        let fields = AreaFieldMapping {
            name: "district".to_string(),
            population: "pop".to_string(),
            facilities: "pharmacies".to_string(),
            ..AreaFieldMapping::default()
        };
        let areas = areas_from_collection(&fc, &fields);

        assert_eq!(areas[0].name, "Rappocini");
        assert_eq!(areas[0].population, 12_000);
        assert_eq!(areas[0].existing_facilities, 3);
    }
}
