//! moviedb-etl library interface
//!
//! Merges a local movies/ratings dataset with OMDb metadata, normalizes it
//! into Movies / Ratings / Genres relations, and loads them into a MySQL or
//! SQLite destination.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::config::{Cli, PipelineConfig};
pub use crate::error::{LoadError, PipelineError, SourceError};
pub use crate::pipeline::{run, RunReport};
