//! # MovieDB Common Library
//!
//! Shared code for the MovieDB pipeline crates including:
//! - Error types
//! - Bootstrap configuration (TOML file discovery and parsing)
//! - Destination database initialization helpers

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
