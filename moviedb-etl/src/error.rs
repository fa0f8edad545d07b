//! Error types for moviedb-etl
//!
//! Run-level failures only. Per-record lookup failures never become errors:
//! they are carried as [`crate::models::FetchOutcome`] variants.

use crate::db::schema::DestinationTable;
use crate::services::omdb_client::OmdbClientError;
use std::path::PathBuf;
use thiserror::Error;

/// Source file errors; all are fatal to the run
#[derive(Debug, Error)]
pub enum SourceError {
    /// Path does not resolve to a readable file
    #[error("Source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// File exists but could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row or missing column
    #[error("Malformed data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Destination load errors; each aborts the remaining loads of the run
#[derive(Debug, Error)]
pub enum LoadError {
    /// Destination unreachable or connection string unusable
    #[error("Destination unreachable ({url}): {source}")]
    ConnectivityFailure {
        url: String,
        #[source]
        source: moviedb_common::Error,
    },

    /// Table already holds rows and the load mode forbids touching them
    #[error("{table} table already contains {existing_rows} rows")]
    LoadConflict {
        table: DestinationTable,
        existing_rows: i64,
    },

    /// Schema creation failed
    #[error("Creating destination tables failed: {0}")]
    Schema(#[source] sqlx::Error),

    /// Statement failed while loading a table (constraint violation, I/O, ...)
    #[error("Loading {table} table failed: {source}")]
    Statement {
        table: DestinationTable,
        #[source]
        source: moviedb_common::Error,
    },
}

/// Errors that abort the pipeline before the load phase
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Client(#[from] OmdbClientError),

    #[error(transparent)]
    Common(#[from] moviedb_common::Error),
}

impl PipelineError {
    /// True when the run was aborted because an input file is missing
    pub fn is_source_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::Source(SourceError::SourceNotFound { .. })
        )
    }
}
