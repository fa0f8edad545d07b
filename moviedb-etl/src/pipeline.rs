//! Pipeline driver
//!
//! Source Reader → Enrichment → Transform → Loader, strictly in sequence.
//! Source and configuration problems abort the run with an error. Load
//! problems do not: they are recorded in the returned [`RunReport`].

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::services::enrichment::{Enricher, EnrichmentSummary};
use crate::services::fetch_cache::FetchCache;
use crate::services::loader::{load_destination, LoadReport};
use crate::services::omdb_client::OmdbClient;
use crate::services::source_reader::read_sources;
use crate::services::transform::transform;
use tracing::{info, warn};

/// Summary of one pipeline run
#[derive(Debug)]
pub struct RunReport {
    pub movies_read: usize,
    pub ratings_read: usize,
    pub enrichment: EnrichmentSummary,
    pub genre_rows: usize,
    pub load: LoadReport,
}

/// Run the whole pipeline once
pub async fn run(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    // 1. Extraction (CSV)
    let sources = read_sources(&config.movies_path, &config.ratings_path)?;
    let movies_read = sources.movies.len();
    let ratings_read = sources.ratings.len();

    // 2. Enrichment (OMDb)
    let client = OmdbClient::new(&config.omdb_base_url, config.omdb_api_key.clone())?;
    let cache = open_cache(config).await;

    let mut enricher = Enricher::new(&client, config.request_delay);
    if let Some(cache) = cache.as_ref() {
        enricher = enricher.with_cache(cache);
    }
    let (movies, enrichment) = enricher.enrich(sources.movies).await;

    if let Some(cache) = cache {
        cache.close().await;
    }

    // 3. Transformation (year, genres)
    let tables = transform(movies, sources.ratings);
    let genre_rows = tables.genres.len();

    // 4. Load
    info!(load_mode = %config.load_mode, "Starting load");
    let load = load_destination(&config.database_url, config.load_mode, &tables).await;

    Ok(RunReport {
        movies_read,
        ratings_read,
        enrichment,
        genre_rows,
        load,
    })
}

/// The cache only saves service calls, so a cache that cannot be opened
/// disables caching for this run instead of aborting it
async fn open_cache(config: &PipelineConfig) -> Option<FetchCache> {
    let path = config.cache_path.as_ref()?;

    match FetchCache::open(path, config.cache_ttl_days).await {
        Ok(cache) => {
            info!(path = %path.display(), ttl_days = config.cache_ttl_days, "Fetch cache enabled");
            Some(cache)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Fetch cache unavailable, continuing without it");
            None
        }
    }
}
