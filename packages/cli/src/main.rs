#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the pharmacy gap dashboard.
//!
//! Ranks underserved areas, prints statistics and single-area details,
//! checks which map layers are available, and runs the API server.
//!
//! Uses `indicatif-log-bridge` (via [`pharmacy_gap_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pharmacy_gap_cli_utils::IndicatifProgress;
use pharmacy_gap_dataset::{DashboardConfig, DataSource, DatasetError};
use pharmacy_gap_ranking::diagnostics::no_facility_placements;
use pharmacy_gap_ranking::{DEFAULT_TOP_K, area_detail, compute_statistics, find_area, rank_areas};
use pharmacy_gap_server::{ServerOptions, run_server};

#[derive(Parser)]
#[command(name = "pharmacy_gap", about = "Pharmacy market gap dashboard")]
struct Cli {
    /// Dashboard config file (overrides `PHARMACY_GAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the underserved areas, highest priority first
    Rank {
        /// Number of areas to show
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        limit: usize,
    },
    /// Print population, pharmacy and deficit totals
    Stats,
    /// Print the detail view of one area
    Detail {
        /// Area name (case-insensitive)
        name: String,
    },
    /// Show where each area without a pharmacy landed in the ranking
    Diagnostics,
    /// Load every configured layer and report which are available
    Layers,
    /// Run the API server (default)
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = pharmacy_gap_cli_utils::init_logger();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve {
        bind: None,
        port: None,
    });
    let mut out = String::new();

    match command {
        Commands::Serve { bind, port } => {
            let mut options = ServerOptions::from_env();
            options.config_path = cli.config;
            if let Some(bind) = bind {
                options.bind_addr = bind;
            }
            if let Some(port) = port {
                options.port = port;
            }

            // The server uses actix-web's runtime, so run it in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(run_server(options))
            })
            .await??;
        }
        Commands::Layers => {
            let source = data_source(cli.config.as_deref())?;
            let progress = IndicatifProgress::steps_bar(&multi, "Loading layers");
            let probes = source.probe_layers(progress.as_ref()).await;
            report::write_layers(&mut out, &probes)?;
        }
        Commands::Rank { limit } => {
            let records = data_source(cli.config.as_deref())?.load_areas().await?;
            report::write_ranking(&mut out, &rank_areas(&records), limit)?;
        }
        Commands::Stats => {
            let source = data_source(cli.config.as_deref())?;
            let records = source.load_areas().await?;
            let config = source.config();
            let stats = compute_statistics(&records, config.official_population);
            report::write_statistics(&mut out, &config.city, &stats)?;
        }
        Commands::Detail { name } => {
            let records = data_source(cli.config.as_deref())?.load_areas().await?;
            let Some(record) = find_area(&records, &name) else {
                return Err(format!("Unknown area: {name}").into());
            };
            report::write_detail(&mut out, &area_detail(record))?;
        }
        Commands::Diagnostics => {
            let records = data_source(cli.config.as_deref())?.load_areas().await?;
            let ranking = rank_areas(&records);
            let placements = no_facility_placements(&ranking, DEFAULT_TOP_K);
            report::write_diagnostics(&mut out, &placements, DEFAULT_TOP_K)?;
        }
    }

    print!("{out}");

    Ok(())
}

fn data_source(config_path: Option<&Path>) -> Result<DataSource, DatasetError> {
    let config = DashboardConfig::resolve(config_path)?;
    log::info!("Using {} dashboard config", config.city);
    Ok(DataSource::new(config))
}
