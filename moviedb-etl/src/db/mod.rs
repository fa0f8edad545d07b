//! Destination store access
//!
//! The destination connection is owned by a [`Destination`] value that is
//! created for the load phase and closed when that phase ends. Nothing else
//! holds a handle to it.

pub mod genres;
pub mod movies;
pub mod ratings;
pub mod schema;

use crate::error::LoadError;
use moviedb_common::db::{connect_any, redact_url};
use sqlx::AnyPool;
use tracing::info;

/// Open destination connection
pub struct Destination {
    pool: AnyPool,
}

impl Destination {
    /// Connect, creating the database if it does not exist yet
    ///
    /// `sqlite:` URLs open a local file; `mysql:` URLs reach a server, where
    /// the database named in the URL is created first.
    pub async fn connect(url: &str) -> Result<Self, LoadError> {
        let display_url = redact_url(url);
        info!(url = %display_url, "Connecting to database...");

        let pool = connect_any(url)
            .await
            .map_err(|source| LoadError::ConnectivityFailure {
                url: display_url,
                source,
            })?;

        info!("Database connection successful!");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Release the connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}
