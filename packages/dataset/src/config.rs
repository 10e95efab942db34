//! Dashboard configuration.
//!
//! The default Makassar dashboard is embedded at compile time from
//! `dashboard.toml`. A different file can be supplied through
//! `PHARMACY_GAP_CONFIG` or the CLI's `--config` flag.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Environment variable pointing at an override config file.
pub const CONFIG_ENV_VAR: &str = "PHARMACY_GAP_CONFIG";

const EMBEDDED_CONFIG: &str = include_str!("../dashboard.toml");

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// City the dashboard covers.
    pub city: String,
    /// Directory that `file` layer paths are relative to.
    pub data_dir: PathBuf,
    /// Published population figure that replaces the summed area
    /// populations in statistics.
    #[serde(default)]
    pub official_population: Option<u64>,
    /// Initial map view.
    pub view: MapView,
    /// All map layers, in draw order.
    pub layers: Vec<LayerDefinition>,
}

/// Initial map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map center as `[lat, lng]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Zoom level used when flying to a single area.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
}

const fn default_focus_zoom() -> u8 {
    14
}

/// One map layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDefinition {
    /// Unique layer identifier (e.g., `"pharmacies"`).
    pub id: String,
    /// Human-readable name shown in the layer control.
    pub name: String,
    /// What the layer contains.
    pub kind: LayerKind,
    /// Where the layer's `GeoJSON` comes from.
    pub source: LayerSource,
    /// Whether a failure to load this layer is fatal.
    #[serde(default)]
    pub required: bool,
    /// Whether the layer is switched on when the map opens.
    #[serde(default)]
    pub visible_by_default: bool,
    /// Property names of the area attributes (`areas` layers only).
    #[serde(default)]
    pub fields: AreaFieldMapping,
    /// Properties tried in order for a point's label (`points` layers).
    #[serde(default)]
    pub label_fields: Vec<String>,
    /// Label used when none of `label_fields` is present.
    #[serde(default)]
    pub fallback_label: Option<String>,
}

/// Kind of map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Administrative area polygons carrying population and facility
    /// counts. Drawn as the choropleth base layer.
    Areas,
    /// Lines or polygons drawn over the base layer (roads, coverage).
    Overlay,
    /// Facility locations.
    Points,
}

/// Where a layer's `GeoJSON` is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSource {
    /// A file relative to [`DashboardConfig::data_dir`].
    File {
        /// Relative (or absolute) file path.
        path: PathBuf,
    },
    /// A URL returning a `GeoJSON` `FeatureCollection`.
    Url {
        /// Full URL.
        url: String,
    },
}

/// Property names holding each area attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaFieldMapping {
    /// Area name.
    pub name: String,
    /// Resident population.
    pub population: String,
    /// Existing pharmacy count.
    pub facilities: String,
    /// Hospital count.
    pub hospitals: String,
    /// Pre-computed deficit.
    pub reported_deficit: String,
    /// Population density per km².
    pub density: String,
}

impl Default for AreaFieldMapping {
    fn default() -> Self {
        Self {
            name: "nm_kelurah".to_string(),
            population: "data_fin_1".to_string(),
            facilities: "JML_EXIST".to_string(),
            hospitals: "JML_RS".to_string(),
            reported_deficit: "DEFISIT".to_string(),
            density: "Kepadataan".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the TOML is malformed or the layer set
    /// is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DatasetError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let toml_str = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading dashboard config from {}", path.display());
        Self::from_toml_str(&toml_str)
    }

    /// Loads the file named by `explicit`, else by [`CONFIG_ENV_VAR`],
    /// else the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the chosen configuration is invalid.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, DatasetError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Self::embedded(),
        }
    }

    /// Checks layer ids are unique and exactly one `areas` layer exists.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = BTreeSet::new();
        for layer in &self.layers {
            if layer.id.trim().is_empty() {
                return Err(DatasetError::Config {
                    message: format!("layer '{}' has an empty id", layer.name),
                });
            }
            if !seen.insert(layer.id.as_str()) {
                return Err(DatasetError::Config {
                    message: format!("duplicate layer id '{}'", layer.id),
                });
            }
        }

        let areas = self
            .layers
            .iter()
            .filter(|layer| layer.kind == LayerKind::Areas)
            .count();
        if areas != 1 {
            return Err(DatasetError::Config {
                message: format!("expected exactly one 'areas' layer, found {areas}"),
            });
        }

        Ok(())
    }

    /// The administrative area layer.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] if no `areas` layer is configured,
    /// which only happens for configurations built without [`Self::validate`].
    pub fn area_layer(&self) -> Result<&LayerDefinition, DatasetError> {
        self.layers
            .iter()
            .find(|layer| layer.kind == LayerKind::Areas)
            .ok_or_else(|| DatasetError::Config {
                message: "no 'areas' layer configured".to_string(),
            })
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Resolves a `file` layer path against [`Self::data_dir`].
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
