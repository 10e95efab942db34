#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the pharmacy gap server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine's borrowed ranking types so the API contract can
//! evolve independently.

use chrono::{DateTime, Utc};
use pharmacy_gap_area_models::{AreaFocus, DensityClass, MarketStatus};
use pharmacy_gap_dataset::{FacilityPoint, LayerKind, LayerProbe, LayerStatus, MapView};
use pharmacy_gap_ranking::diagnostics::NoFacilityPlacement;
use pharmacy_gap_ranking::{AreaDetail, RankedArea};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the area data loaded.
    pub data_ready: bool,
    /// When the area data was loaded.
    pub loaded_at: Option<DateTime<Utc>>,
}

/// One row of the underserved-area table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecommendation {
    /// 1-based rank.
    pub rank: usize,
    /// Area display name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Existing pharmacy count.
    pub existing_facilities: u64,
    /// Ideal pharmacy count.
    pub ideal_facility_count: u64,
    /// Pharmacies still needed.
    pub deficit: i64,
    /// Priority score the table is sorted by.
    pub priority_score: f64,
    /// Market status.
    pub status: MarketStatus,
    /// Whether the area has no pharmacy at all.
    pub no_facility: bool,
    /// Where to fly the map when the row is clicked.
    pub focus: Option<AreaFocus>,
}

impl ApiRecommendation {
    /// Builds a table row for a ranked area.
    #[must_use]
    pub fn new(rank: usize, area: &RankedArea<'_>, focus: Option<AreaFocus>) -> Self {
        Self {
            rank,
            name: area.record.display_name().to_string(),
            population: area.record.population,
            existing_facilities: area.record.existing_facilities,
            ideal_facility_count: area.metrics.ideal_facility_count,
            deficit: area.metrics.deficit,
            priority_score: area.priority_score,
            status: area.status(),
            no_facility: area.record.has_no_facility(),
            focus,
        }
    }
}

/// Every derived field of one area, ranked or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArea {
    /// Index in the area layer.
    pub position: usize,
    /// Area display name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Existing pharmacy count.
    pub existing_facilities: u64,
    /// Hospital count.
    pub hospitals: u64,
    /// Deficit as published in the dataset.
    pub reported_deficit: i64,
    /// Population per km².
    pub density: f64,
    /// Choropleth class of the density.
    pub density_class: DensityClass,
    /// Ideal pharmacy count.
    pub ideal_facility_count: u64,
    /// Pharmacies still needed.
    pub deficit: i64,
    /// Priority score.
    pub priority_score: f64,
    /// Whether the area is underserved.
    pub is_underserved: bool,
    /// Market status.
    pub status: MarketStatus,
    /// 1-based rank, absent when the area is not underserved.
    pub rank: Option<usize>,
}

impl ApiArea {
    /// Builds the full view of a derived area.
    #[must_use]
    pub fn new(area: &RankedArea<'_>, rank: Option<usize>) -> Self {
        Self {
            position: area.position,
            name: area.record.display_name().to_string(),
            population: area.record.population,
            existing_facilities: area.record.existing_facilities,
            hospitals: area.record.hospitals,
            reported_deficit: area.record.reported_deficit,
            density: area.record.density,
            density_class: DensityClass::for_density(area.record.density),
            ideal_facility_count: area.metrics.ideal_facility_count,
            deficit: area.metrics.deficit,
            priority_score: area.priority_score,
            is_underserved: area.is_underserved,
            status: area.status(),
            rank,
        }
    }
}

/// Single-area popup data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAreaDetail {
    /// Area display name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Existing pharmacy count.
    pub existing_facilities: u64,
    /// Hospital count.
    pub hospitals: u64,
    /// Ideal pharmacy count.
    pub ideal_facility_count: u64,
    /// Pharmacies still needed.
    pub deficit: i64,
    /// Pharmacies to open, at least one where none exist.
    pub needed_facilities: u64,
    /// Market status.
    pub status: MarketStatus,
    /// Human-readable status.
    pub status_label: String,
    /// Bounds and center of the area.
    pub focus: Option<AreaFocus>,
}

impl ApiAreaDetail {
    /// Builds the popup view.
    #[must_use]
    pub fn new(detail: &AreaDetail<'_>, focus: Option<AreaFocus>) -> Self {
        let status = detail.status();
        Self {
            name: detail.record.display_name().to_string(),
            population: detail.record.population,
            existing_facilities: detail.record.existing_facilities,
            hospitals: detail.record.hospitals,
            ideal_facility_count: detail.metrics.ideal_facility_count,
            deficit: detail.metrics.deficit,
            needed_facilities: detail.needed_facilities,
            status,
            status_label: status.label().to_string(),
            focus,
        }
    }
}

/// Placement of one facility-less area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNoFacilityPlacement {
    /// Area display name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Ideal pharmacy count.
    pub ideal_facility_count: u64,
    /// Pharmacies still needed.
    pub deficit: i64,
    /// Priority score.
    pub priority_score: f64,
    /// 1-based rank, absent when not ranked.
    pub rank: Option<usize>,
    /// Whether the area made the table.
    pub in_top: bool,
}

impl From<NoFacilityPlacement> for ApiNoFacilityPlacement {
    fn from(placement: NoFacilityPlacement) -> Self {
        Self {
            name: placement.name,
            population: placement.population,
            ideal_facility_count: placement.metrics.ideal_facility_count,
            deficit: placement.metrics.deficit,
            priority_score: placement.priority_score,
            rank: placement.rank,
            in_top: placement.in_top,
        }
    }
}

/// Initial map position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapView {
    /// Map center as `[lat, lng]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Zoom used when focusing one area.
    pub focus_zoom: u8,
}

impl From<MapView> for ApiMapView {
    fn from(view: MapView) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            focus_zoom: view.focus_zoom,
        }
    }
}

/// A layer the map can draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLayer {
    /// Layer id.
    pub id: String,
    /// Name shown in the layer control.
    pub name: String,
    /// What the layer contains.
    pub kind: LayerKind,
    /// Whether the layer starts switched on.
    pub visible_by_default: bool,
    /// Number of features.
    pub features: usize,
    /// Where the layer's `GeoJSON` is served.
    pub url: String,
}

/// A layer that failed to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUnavailableLayer {
    /// Layer id.
    pub id: String,
    /// Name of the layer.
    pub name: String,
    /// Why it is unavailable.
    pub reason: String,
}

/// Everything the map needs to build its layer control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLayerManifest {
    /// City the dashboard covers.
    pub city: String,
    /// Initial map view.
    pub view: ApiMapView,
    /// Base layers (the area choropleth).
    pub base_layers: Vec<ApiLayer>,
    /// Toggleable overlays.
    pub overlays: Vec<ApiLayer>,
    /// Layers left out of the control.
    pub unavailable: Vec<ApiUnavailableLayer>,
}

impl ApiLayerManifest {
    /// Splits probed layers into base layers, overlays and failures.
    #[must_use]
    pub fn new(city: &str, view: MapView, probes: &[LayerProbe]) -> Self {
        let mut manifest = Self {
            city: city.to_string(),
            view: view.into(),
            base_layers: Vec::new(),
            overlays: Vec::new(),
            unavailable: Vec::new(),
        };

        for probe in probes {
            let layer = &probe.layer;
            match &probe.status {
                LayerStatus::Available { features } => {
                    let entry = ApiLayer {
                        id: layer.id.clone(),
                        name: layer.name.clone(),
                        kind: layer.kind,
                        visible_by_default: layer.visible_by_default,
                        features: *features,
                        url: format!("/api/layers/{}", layer.id),
                    };
                    if layer.kind == LayerKind::Areas {
                        manifest.base_layers.push(entry);
                    } else {
                        manifest.overlays.push(entry);
                    }
                }
                LayerStatus::Unavailable { reason } => {
                    manifest.unavailable.push(ApiUnavailableLayer {
                        id: layer.id.clone(),
                        name: layer.name.clone(),
                        reason: reason.clone(),
                    });
                }
            }
        }

        manifest
    }
}

/// One choropleth legend entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegendEntry {
    /// Density class.
    pub class: DensityClass,
    /// Legend text.
    pub label: String,
    /// Fill colour.
    pub color: String,
    /// Exclusive lower bound, absent for the lowest class.
    pub min_density: Option<f64>,
}

impl From<DensityClass> for ApiLegendEntry {
    fn from(class: DensityClass) -> Self {
        Self {
            class,
            label: class.label().to_string(),
            color: class.color().to_string(),
            min_density: class.lower_bound(),
        }
    }
}

/// A pharmacy or hospital marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFacility {
    /// Popup label.
    pub label: String,
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
}

impl From<FacilityPoint> for ApiFacility {
    fn from(point: FacilityPoint) -> Self {
        Self {
            label: point.label,
            longitude: point.coordinates[0],
            latitude: point.coordinates[1],
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// What failed.
    pub error: String,
    /// Underlying cause, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Query parameters for the recommendations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    /// Maximum rows to return (default 10).
    pub limit: Option<usize>,
}

/// Query parameters for point lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointQuery {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}
