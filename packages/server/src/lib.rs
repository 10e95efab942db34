#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the pharmacy gap dashboard.
//!
//! Loads the area layer once at startup and serves the ranked
//! underserved-area table, statistics, the layer manifest and raw layer
//! `GeoJSON` for the map frontend. If the area layer cannot be loaded the
//! server still starts, but every data endpoint answers `503`.

mod handlers;

use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{DateTime, Utc};
use pharmacy_gap_area_models::AreaRecord;
use pharmacy_gap_dataset::progress::NullProgress;
use pharmacy_gap_dataset::{DashboardConfig, DataSource, DatasetError, LayerProbe};
use pharmacy_gap_spatial::AreaIndex;
use thiserror::Error;

/// Directory holding the built frontend.
const STATIC_DIR: &str = "app/dist";

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The dashboard configuration is invalid.
    #[error(transparent)]
    Config(#[from] DatasetError),

    /// The HTTP server failed to bind or crashed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where to listen and which configuration to load.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Explicit configuration file; otherwise
    /// [`DashboardConfig::resolve`] decides.
    pub config_path: Option<PathBuf>,
}

impl ServerOptions {
    /// Reads `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default `8080`).
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            bind_addr,
            port,
            config_path: None,
        }
    }
}

/// Area data loaded at startup, immutable afterwards.
pub struct LoadedDashboard {
    /// Source the data came from; also serves the other layers.
    pub source: DataSource,
    /// Areas in layer order.
    pub records: Vec<AreaRecord>,
    /// Point-in-area index over `records`.
    pub index: AreaIndex,
    /// Availability of every configured layer.
    pub probes: Vec<LayerProbe>,
    /// When the data was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDashboard {
    /// Wraps loaded areas and builds their spatial index.
    #[must_use]
    pub fn new(source: DataSource, records: Vec<AreaRecord>, probes: Vec<LayerProbe>) -> Self {
        let index = AreaIndex::build(&records);
        Self {
            source,
            records,
            index,
            probes,
            loaded_at: Utc::now(),
        }
    }

    /// The configuration the data was loaded with.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        self.source.config()
    }
}

/// Outcome of the startup load.
pub enum DashboardState {
    /// The area layer loaded.
    Ready(Box<LoadedDashboard>),
    /// The area layer could not be loaded; terminal for this process.
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
}

impl DashboardState {
    /// Loads the area layer and probes all other layers.
    pub async fn load(source: DataSource) -> Self {
        match source.load_areas().await {
            Ok(records) => {
                let probes = source.probe_layers(&NullProgress).await;
                Self::Ready(Box::new(LoadedDashboard::new(source, records, probes)))
            }
            Err(e) => {
                log::error!("Area data unavailable: {e}");
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The loaded data, or the reason it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns the failure reason if the data did not load.
    pub fn ready(&self) -> Result<&LoadedDashboard, &str> {
        match self {
            Self::Ready(dashboard) => Ok(dashboard.as_ref()),
            Self::Unavailable { reason } => Err(reason.as_str()),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Loaded area data or the load failure.
    pub dashboard: DashboardState,
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/statistics", web::get().to(handlers::statistics))
            .route("/recommendations", web::get().to(handlers::recommendations))
            .route("/areas", web::get().to(handlers::areas))
            .route("/areas/at", web::get().to(handlers::area_at))
            .route("/areas/{name}", web::get().to(handlers::area_by_name))
            .route(
                "/diagnostics/no-facility",
                web::get().to(handlers::no_facility_diagnostics),
            )
            .route("/layers", web::get().to(handlers::layers))
            .route("/layers/{id}", web::get().to(handlers::layer))
            .route("/facilities/{id}", web::get().to(handlers::facilities))
            .route("/legend", web::get().to(handlers::legend)),
    );
}

/// Starts the dashboard API server.
///
/// Resolves the configuration, loads the area data once, and starts the
/// Actix-Web HTTP server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError::Config`] if the configuration is invalid, or
/// [`ServerError::Io`] if the HTTP server fails to bind or encounters a
/// runtime error. A failure to load the area data is not an error: the
/// server starts in the unavailable state.
#[allow(clippy::future_not_send)]
pub async fn run_server(options: ServerOptions) -> Result<(), ServerError> {
    let config = DashboardConfig::resolve(options.config_path.as_deref())?;
    let data_dir = config.data_dir.clone();
    log::info!("Loading {} dashboard data...", config.city);

    let state = web::Data::new(AppState {
        dashboard: DashboardState::load(DataSource::new(config)).await,
    });

    let serve_frontend = Path::new(STATIC_DIR).is_dir();
    if !serve_frontend {
        log::info!("No frontend build at {STATIC_DIR}, serving the API only");
    }

    log::info!("Starting server on {}:{}", options.bind_addr, options.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the raw layer files
            .service(Files::new("/data", data_dir.clone()).show_files_listing());

        if serve_frontend {
            app.service(Files::new("/", STATIC_DIR).index_file("index.html"))
        } else {
            app
        }
    })
    .bind((options.bind_addr, options.port))?
    .run()
    .await?;

    Ok(())
}
