//! Pipeline stages
//!
//! Source Reader → Enrichment (Metadata Fetcher, fetch cache) → Transform → Loader

pub mod enrichment;
pub mod fetch_cache;
pub mod loader;
pub mod omdb_client;
pub mod source_reader;
pub mod title;
pub mod transform;

pub use enrichment::{left_join, Enricher, EnrichmentSummary};
pub use fetch_cache::FetchCache;
pub use loader::{load_destination, LoadMode, LoadReport, Loader, TableLoad};
pub use omdb_client::{OmdbClient, OmdbClientError};
pub use source_reader::{read_movies, read_ratings, read_sources, SourceData};
pub use title::{clean_title, extract_release_year};
pub use transform::{explode_genres, transform, NormalizedTables};
