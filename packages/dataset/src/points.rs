//! Facility point extraction (pharmacy and hospital markers).

use geojson::{FeatureCollection, Value};

use crate::config::LayerDefinition;
use crate::parsing::text;

/// A labelled facility location.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityPoint {
    /// Facility name, or the layer's fallback label.
    pub label: String,
    /// Location as `[lng, lat]`.
    pub coordinates: [f64; 2],
}

/// Extracts every `Point` feature of a points layer. Features with other
/// geometry types are skipped.
#[must_use]
pub fn facility_points(collection: &FeatureCollection, layer: &LayerDefinition) -> Vec<FacilityPoint> {
    let fallback = layer.fallback_label.as_deref().unwrap_or(&layer.name);

    collection
        .features
        .iter()
        .filter_map(|feature| {
            let geometry = feature.geometry.as_ref()?;
            let Value::Point(position) = &geometry.value else {
                return None;
            };
            let (&lng, &lat) = (position.first()?, position.get(1)?);

            let label = layer
                .label_fields
                .iter()
                .find_map(|field| {
                    text(feature.properties.as_ref().and_then(|props| props.get(field)))
                })
                .unwrap_or_else(|| fallback.to_string());

            Some(FacilityPoint {
                label,
                coordinates: [lng, lat],
            })
        })
        .collect()
}
