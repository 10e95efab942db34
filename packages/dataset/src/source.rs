//! Fetches layer `GeoJSON` from files or URLs.

use geojson::{FeatureCollection, GeoJson};
use pharmacy_gap_area_models::AreaRecord;

use crate::DatasetError;
use crate::areas::areas_from_collection;
use crate::config::{DashboardConfig, LayerDefinition, LayerKind, LayerSource};
use crate::points::{FacilityPoint, facility_points};
use crate::progress::ProgressCallback;

/// Outcome of loading one layer during a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerStatus {
    /// The layer loaded.
    Available {
        /// Number of features in the layer.
        features: usize,
    },
    /// The layer could not be loaded.
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
}

/// A layer together with its probe outcome.
#[derive(Debug, Clone)]
pub struct LayerProbe {
    /// The configured layer.
    pub layer: LayerDefinition,
    /// Whether it loaded.
    pub status: LayerStatus,
}

impl LayerProbe {
    /// Whether the layer loaded.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.status, LayerStatus::Available { .. })
    }
}

/// Loads the dashboard's layers as described by a [`DashboardConfig`].
pub struct DataSource {
    config: DashboardConfig,
    client: reqwest::Client,
}

impl DataSource {
    /// Creates a data source for a configuration.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The configuration this source reads from.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads the administrative areas.
    ///
    /// This is the dashboard's only required input: any failure here
    /// means the data is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the area layer cannot be fetched or is
    /// not a `FeatureCollection`.
    pub async fn load_areas(&self) -> Result<Vec<AreaRecord>, DatasetError> {
        let layer = self.config.area_layer()?;
        let collection = self.fetch_collection(layer).await?;
        let areas = areas_from_collection(&collection, &layer.fields);
        log::info!("Loaded {} areas from layer {}", areas.len(), layer.id);
        Ok(areas)
    }

    /// Loads any layer by id.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownLayer`] for an unconfigured id, or
    /// the fetch error.
    pub async fn load_layer(&self, id: &str) -> Result<FeatureCollection, DatasetError> {
        let layer = self
            .config
            .layer(id)
            .ok_or_else(|| DatasetError::UnknownLayer(id.to_string()))?;
        self.fetch_collection(layer).await
    }

    /// Loads the labelled points of a `points` layer.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownLayer`] if `id` is not a points
    /// layer, or the fetch error.
    pub async fn load_facilities(&self, id: &str) -> Result<Vec<FacilityPoint>, DatasetError> {
        let layer = self
            .config
            .layer(id)
            .filter(|layer| layer.kind == LayerKind::Points)
            .ok_or_else(|| DatasetError::UnknownLayer(id.to_string()))?;
        let collection = self.fetch_collection(layer).await?;
        Ok(facility_points(&collection, layer))
    }

    /// Loads every configured layer once and reports which are available.
    ///
    /// Optional layers that fail are logged and reported, never fatal.
    pub async fn probe_layers(&self, progress: &dyn ProgressCallback) -> Vec<LayerProbe> {
        progress.set_total(self.config.layers.len() as u64);
        let mut probes = Vec::with_capacity(self.config.layers.len());

        for layer in &self.config.layers {
            progress.set_message(format!("Loading {}", layer.name));

            let status = match self.fetch_collection(layer).await {
                Ok(collection) => LayerStatus::Available {
                    features: collection.features.len(),
                },
                Err(e) => {
                    if layer.required {
                        log::error!("Required layer {} failed to load: {e}", layer.id);
                    } else {
                        log::warn!("Layer {} not available: {e}", layer.id);
                    }
                    LayerStatus::Unavailable {
                        reason: e.to_string(),
                    }
                }
            };

            probes.push(LayerProbe {
                layer: layer.clone(),
                status,
            });
            progress.inc(1);
        }

        let available = probes.iter().filter(|p| p.is_available()).count();
        progress.finish(format!("{available}/{} layers available", probes.len()));

        probes
    }

    async fn fetch_collection(
        &self,
        layer: &LayerDefinition,
    ) -> Result<FeatureCollection, DatasetError> {
        let body = match &layer.source {
            LayerSource::File { path } => {
                let path = self.config.resolve_path(path);
                log::debug!("Reading layer {} from {}", layer.id, path.display());
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| DatasetError::Io { path, source })?
            }
            LayerSource::Url { url } => {
                log::debug!("Fetching layer {} from {url}", layer.id);
                let resp = self.client.get(url).send().await?;
                if !resp.status().is_success() {
                    return Err(DatasetError::Status {
                        url: url.clone(),
                        status: resp.status().as_u16(),
                    });
                }
                resp.text().await?
            }
        };

        let collection = parse_collection(&layer.id, &body)?;
        log::info!(
            "Loaded {} features from layer {}",
            collection.features.len(),
            layer.id
        );
        Ok(collection)
    }
}

/// Parses a layer body, requiring a top-level `FeatureCollection`.
///
/// # Errors
///
/// Returns [`DatasetError::GeoJson`] for invalid `GeoJSON` and
/// [`DatasetError::Malformed`] for any other top-level type.
pub fn parse_collection(layer_id: &str, body: &str) -> Result<FeatureCollection, DatasetError> {
    match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(DatasetError::Malformed {
            layer: layer_id.to_string(),
            message: "expected a FeatureCollection, found a single Feature".to_string(),
        }),
        GeoJson::Geometry(_) => Err(DatasetError::Malformed {
            layer: layer_id.to_string(),
            message: "expected a FeatureCollection, found a bare Geometry".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::MapView;
    use crate::progress::NullProgress;

    const AREAS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "nm_kelurah": "Bontoala", "data_fin_1": 100000, "JML_EXIST": 10 },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "nm_kelurah": "Gusung", "data_fin_1": "abc" },
                "geometry": null
            }
        ]
    }"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pharmacy-gap-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn layer(id: &str, kind: LayerKind, path: &str, required: bool) -> LayerDefinition {
        LayerDefinition {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            source: LayerSource::File { path: path.into() },
            required,
            visible_by_default: false,
            fields: crate::config::AreaFieldMapping::default(),
            label_fields: Vec::new(),
            fallback_label: None,
        }
    }

    fn config(data_dir: PathBuf) -> DashboardConfig {
        DashboardConfig {
            city: "Test".to_string(),
            data_dir,
            official_population: None,
            view: MapView {
                center: [0.0, 0.0],
                zoom: 12,
                focus_zoom: 14,
            },
            layers: vec![
                layer("areas", LayerKind::Areas, "areas.geojson", true),
                layer("roads", LayerKind::Overlay, "missing.geojson", false),
            ],
        }
    }

    #[test]
    fn rejects_non_collections() {
        let err = parse_collection(
            "areas",
            r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }), "{err}");

        assert!(matches!(
            parse_collection("areas", "<html>not found</html>"),
            Err(DatasetError::GeoJson(_))
        ));
    }

    #[tokio::test]
    async fn loads_areas_from_file() {
        let dir = scratch_dir("load-areas");
        std::fs::write(dir.join("areas.geojson"), AREAS).unwrap();

        let source = DataSource::new(config(dir));
        let areas = source.load_areas().await.unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].population, 100_000);
        assert_eq!(areas[0].existing_facilities, 10);
        assert_eq!(areas[1].population, 0);
        assert_eq!(areas[1].existing_facilities, 0);
    }

    #[tokio::test]
    async fn missing_area_file_is_an_error() {
        let dir = scratch_dir("missing-areas");
        let source = DataSource::new(config(dir.join("does-not-exist")));

        assert!(matches!(
            source.load_areas().await,
            Err(DatasetError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn probe_skips_missing_optional_layers() {
        let dir = scratch_dir("probe");
        std::fs::write(dir.join("areas.geojson"), AREAS).unwrap();

        let source = DataSource::new(config(dir));
        let probes = source.probe_layers(&NullProgress).await;

        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].status, LayerStatus::Available { features: 2 });
        assert!(!probes[1].is_available());
    }

    #[tokio::test]
    async fn unknown_layer_is_reported() {
        let source = DataSource::new(config(scratch_dir("unknown")));

        assert!(matches!(
            source.load_layer("nope").await,
            Err(DatasetError::UnknownLayer(id)) if id == "nope"
        ));
        assert!(matches!(
            source.load_facilities("areas").await,
            Err(DatasetError::UnknownLayer(_))
        ));
    }
}
