//! Data models for moviedb-etl
//!
//! - Source rows as read from the flat files
//! - Per-movie lookup outcomes and the destination markers they map to
//! - Normalized rows handed to the loader

pub mod enrichment;
pub mod genre;
pub mod movie;
pub mod rating;

pub use enrichment::{EnrichmentFields, EnrichmentResult, FetchOutcome, Marker, MovieDetails, OutcomeKind};
pub use genre::GenreRow;
pub use movie::{EnrichedMovie, MovieRecord};
pub use rating::RatingRecord;
