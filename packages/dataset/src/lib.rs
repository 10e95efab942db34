#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard configuration and `GeoJSON` layer loading.
//!
//! Layers are described by a TOML [`config::DashboardConfig`] embedded at
//! compile time. The area layer is converted into
//! [`pharmacy_gap_area_models::AreaRecord`]s with lenient property
//! parsing; every other layer is loaded on demand and may be missing
//! without failing the dashboard.

pub mod areas;
pub mod config;
pub mod parsing;
pub mod points;
pub mod progress;
pub mod source;

use std::path::PathBuf;

use thiserror::Error;

pub use config::{DashboardConfig, LayerDefinition, LayerKind, LayerSource, MapView};
pub use points::FacilityPoint;
pub use source::{DataSource, LayerProbe, LayerStatus};

/// Errors that can occur while loading configuration or layers.
///
/// Any of these raised for the area layer means the dashboard's data is
/// unavailable.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a local file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request returned a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The body is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The body is valid `GeoJSON` but not the expected shape.
    #[error("Malformed layer {layer}: {message}")]
    Malformed {
        /// Layer id.
        layer: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration TOML failed to parse.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration parsed but is invalid.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// No layer (of the requested kind) has this id.
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),
}
