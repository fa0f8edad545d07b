//! Movie rows

use crate::models::enrichment::EnrichmentFields;
use serde::{Deserialize, Serialize};

/// One row of the movies source file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    /// Display title, usually suffixed with `(YYYY)`
    pub title: String,
    /// Pipe-delimited genre list
    #[serde(default)]
    pub genres: String,
}

impl MovieRecord {
    pub fn new(movie_id: i64, title: impl Into<String>, genres: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres: genres.into(),
        }
    }
}

/// Movie after enrichment; `release_year` is filled in by the transform stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMovie {
    pub movie_id: i64,
    pub title: String,
    pub genres: String,
    pub director: String,
    pub plot: String,
    pub box_office: String,
    /// `None` means the year is unknown (stored as NULL)
    pub release_year: Option<i32>,
}

impl EnrichedMovie {
    /// Attach enrichment fields to a source movie
    pub fn from_record(record: MovieRecord, fields: EnrichmentFields) -> Self {
        Self {
            movie_id: record.movie_id,
            title: record.title,
            genres: record.genres,
            director: fields.director,
            plot: fields.plot,
            box_office: fields.box_office,
            release_year: None,
        }
    }
}
