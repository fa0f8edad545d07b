//! Configuration resolution for moviedb-etl
//!
//! Provides per-option resolution with Command line → ENV → TOML → built-in
//! default priority. clap merges the first two; the TOML file and the
//! defaults are applied here.

use crate::services::enrichment::DEFAULT_REQUEST_DELAY;
use crate::services::loader::LoadMode;
use crate::services::omdb_client::OMDB_BASE_URL;
use clap::Parser;
use moviedb_common::config::TomlConfig;
use moviedb_common::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_MOVIES_PATH: &str = "movies.csv";
pub const DEFAULT_RATINGS_PATH: &str = "ratings.csv";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://moviedb.sqlite";
pub const DEFAULT_CACHE_TTL_DAYS: u32 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for moviedb-etl
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "moviedb-etl")]
#[command(about = "Enrich a movie/ratings dataset with OMDb metadata and load it into a relational store")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "MOVIEDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// OMDb API endpoint
    #[arg(long, env = "MOVIEDB_OMDB_URL")]
    pub omdb_url: Option<String>,

    /// OMDb API key
    #[arg(long, env = "MOVIEDB_OMDB_API_KEY", hide_env_values = true)]
    pub omdb_api_key: Option<String>,

    /// Movies CSV (movieId,title,genres)
    #[arg(long = "movies", env = "MOVIEDB_MOVIES_PATH")]
    pub movies_path: Option<PathBuf>,

    /// Ratings CSV (userId,movieId,rating,timestamp)
    #[arg(long = "ratings", env = "MOVIEDB_RATINGS_PATH")]
    pub ratings_path: Option<PathBuf>,

    /// Destination connection string (mysql://user:pw@host:port/db or sqlite://file)
    #[arg(long, env = "MOVIEDB_DATABASE_URL")]
    pub database_url: Option<String>,

    /// fail | append | replace
    #[arg(long, env = "MOVIEDB_LOAD_MODE")]
    pub load_mode: Option<String>,

    /// Pause after each OMDb call, in milliseconds
    #[arg(long, env = "MOVIEDB_REQUEST_DELAY_MS")]
    pub request_delay_ms: Option<u64>,

    /// Fetch cache file; caching is off when unset
    #[arg(long, env = "MOVIEDB_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    /// Days before a cached lookup expires
    #[arg(long, env = "MOVIEDB_CACHE_TTL_DAYS")]
    pub cache_ttl_days: Option<u32>,

    /// trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub omdb_base_url: String,
    pub omdb_api_key: String,
    pub movies_path: PathBuf,
    pub ratings_path: PathBuf,
    pub database_url: String,
    pub load_mode: LoadMode,
    pub request_delay: Duration,
    pub cache_path: Option<PathBuf>,
    pub cache_ttl_days: u32,
}

impl PipelineConfig {
    pub fn resolve(cli: &Cli, toml_config: &TomlConfig) -> Result<Self> {
        let omdb_api_key = resolve_api_key(
            cli.omdb_api_key.as_deref(),
            toml_config.omdb.api_key.as_deref(),
        )?;

        let load_mode = match cli
            .load_mode
            .as_deref()
            .or(toml_config.destination.load_mode.as_deref())
        {
            Some(raw) => raw.parse::<LoadMode>().map_err(Error::Config)?,
            None => LoadMode::default(),
        };

        let request_delay = cli
            .request_delay_ms
            .or(toml_config.omdb.request_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_DELAY);

        Ok(Self {
            omdb_base_url: cli
                .omdb_url
                .clone()
                .or_else(|| toml_config.omdb.base_url.clone())
                .unwrap_or_else(|| OMDB_BASE_URL.to_string()),
            omdb_api_key,
            movies_path: cli
                .movies_path
                .clone()
                .or_else(|| toml_config.source.movies_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MOVIES_PATH)),
            ratings_path: cli
                .ratings_path
                .clone()
                .or_else(|| toml_config.source.ratings_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RATINGS_PATH)),
            database_url: cli
                .database_url
                .clone()
                .or_else(|| toml_config.destination.url.clone())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            load_mode,
            request_delay,
            cache_path: cli
                .cache_path
                .clone()
                .or_else(|| toml_config.cache.path.clone()),
            cache_ttl_days: cli
                .cache_ttl_days
                .or(toml_config.cache.ttl_days)
                .unwrap_or(DEFAULT_CACHE_TTL_DAYS),
        })
    }
}

/// Log level: flag → TOML → default
pub fn resolve_log_level(cli: &Cli, toml_config: &TomlConfig) -> String {
    cli.log_level
        .clone()
        .or_else(|| toml_config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Resolve the OMDb API key
///
/// **Priority:** Command line / ENV → TOML
pub fn resolve_api_key(cli_or_env: Option<&str>, toml_key: Option<&str>) -> Result<String> {
    let cli_key = cli_or_env.filter(|key| is_valid_key(key));
    let toml_key = toml_key.filter(|key| is_valid_key(key));

    match (cli_key, toml_key) {
        (Some(key), toml) => {
            if toml.is_some() {
                warn!("OMDb API key found in multiple sources: command line/environment, TOML. Using command line/environment (highest priority).");
            }
            info!("OMDb API key loaded from command line/environment");
            Ok(key.trim().to_string())
        }
        (None, Some(key)) => {
            info!("OMDb API key loaded from TOML config");
            Ok(key.trim().to_string())
        }
        (None, None) => Err(Error::Config(
            "OMDb API key not configured. Please configure using one of:\n\
             1. Command line: --omdb-api-key your-key-here\n\
             2. Environment: MOVIEDB_OMDB_API_KEY=your-key-here\n\
             3. TOML config: ~/.config/moviedb/config.toml ([omdb] api_key = \"your-key\")\n\
             \n\
             Obtain API key at: https://www.omdbapi.com/apikey.aspx"
                .to_string(),
        )),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
