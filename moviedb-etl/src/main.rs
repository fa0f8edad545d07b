//! moviedb-etl - movie metadata enrichment pipeline
//!
//! Reads movies and ratings from CSV, enriches movies from OMDb, and loads
//! Movies / Ratings / Genres into the destination database.

use anyhow::{Context, Result};
use clap::Parser;
use moviedb_common::config::load_toml_config;
use moviedb_common::db::redact_url;
use moviedb_etl::config::{resolve_log_level, Cli, PipelineConfig};
use moviedb_etl::RunReport;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read the TOML file before tracing so its log level applies, but report
    // a bad file only once logging is up
    let toml_config = load_toml_config(cli.config.as_deref());
    let log_level = match &toml_config {
        Ok(toml_config) => resolve_log_level(&cli, toml_config),
        Err(_) => resolve_log_level(&cli, &Default::default()),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    info!(
        "Starting moviedb-etl v{} [{}] ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );

    let toml_config = toml_config.context("Failed to load configuration file")?;
    let config =
        PipelineConfig::resolve(&cli, &toml_config).context("Invalid configuration")?;

    info!(
        movies = %config.movies_path.display(),
        ratings = %config.ratings_path.display(),
        destination = %redact_url(&config.database_url),
        "Sources and destination"
    );

    // Missing source files end the process here with a non-zero status
    let report = moviedb_etl::run(&config)
        .await
        .context("Pipeline aborted")?;

    log_report(&report);
    info!("Completed");

    Ok(())
}

fn log_report(report: &RunReport) {
    info!(
        movies = report.movies_read,
        ratings = report.ratings_read,
        genre_rows = report.genre_rows,
        "Run summary"
    );

    if report.enrichment.api_errors > 0 || report.enrichment.unavailable > 0 {
        warn!(
            api_errors = report.enrichment.api_errors,
            unavailable = report.enrichment.unavailable,
            "Some movies could not be enriched; their fields carry error markers"
        );
    }

    for load in &report.load.loaded {
        info!(table = %load.table, rows = load.rows, "Table loaded");
    }

    if let Some(failure) = &report.load.failure {
        let pending: Vec<String> = report
            .load
            .not_loaded()
            .iter()
            .map(ToString::to_string)
            .collect();
        error!(
            "Load failed: {}. Not loaded in this run: {}",
            failure,
            pending.join(", ")
        );
    }
}
