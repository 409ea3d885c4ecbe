//! forecast-dashboard CLI
//!
//! `serve` hosts the dashboard page, `render` writes it once to a file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_dashboard::{AppState, DashboardConfig, OpenMeteoClient, Variant, logging, web};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "forecast-dashboard")]
#[command(author, version, about = "Open-Meteo forecast dashboard", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Port to listen on, overrides the configured port
        #[arg(short, long)]
        port: Option<u16>,

        /// Default dashboard variant (temperature-comparison or daily-range)
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// Fetch once and write the dashboard page to a file
    Render {
        /// Output HTML file
        #[arg(short, long, default_value = "forecast.html")]
        output: PathBuf,

        /// Dashboard variant (temperature-comparison or daily-range)
        #[arg(long)]
        variant: Option<Variant>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        DashboardConfig::load_from_path(cli.config.clone()).context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;
    info!(
        version = forecast_dashboard::VERSION,
        locations = config.locations.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Serve { port, variant } => {
            if let Some(variant) = variant {
                config.dashboard.variant = variant;
            }
            let port = port.unwrap_or(config.dashboard.port);
            let client = OpenMeteoClient::new(&config.weather)?;
            let state = AppState::new(config, Arc::new(client))?;
            web::run(state, port).await
        }
        Commands::Render { output, variant } => {
            let variant = variant.unwrap_or(config.dashboard.variant);
            let client = OpenMeteoClient::new(&config.weather)?;
            let state = AppState::new(config, Arc::new(client))?;

            let (dashboard, html) = state.page(variant).await?;
            tokio::fs::write(&output, html)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), "Dashboard written");

            for notice in dashboard.warnings() {
                warn!("{}", notice.message);
            }
            if dashboard.is_halted() {
                bail!("No weather data available.");
            }
            Ok(())
        }
    }
}
