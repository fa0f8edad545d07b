//! Destination schema

use serde::Serialize;
use sqlx::AnyPool;
use std::fmt;

/// The three destination tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DestinationTable {
    Movies,
    Ratings,
    Genres,
}

impl DestinationTable {
    /// Load order
    pub const ALL: [DestinationTable; 3] = [
        DestinationTable::Movies,
        DestinationTable::Ratings,
        DestinationTable::Genres,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DestinationTable::Movies => "Movies",
            DestinationTable::Ratings => "Ratings",
            DestinationTable::Genres => "Genres",
        }
    }
}

impl fmt::Display for DestinationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Create the destination tables if they don't exist
///
/// Ratings and Genres reference movies by `movieId` without a foreign key;
/// the reference is assumed, not enforced.
pub async fn create_tables(pool: &AnyPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Movies (
            movieId INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            release_year INTEGER,
            director TEXT NOT NULL,
            plot TEXT NOT NULL,
            box_office TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Ratings (
            userId INTEGER NOT NULL,
            movieId INTEGER NOT NULL,
            rating REAL NOT NULL,
            `timestamp` TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Genres (
            movieId INTEGER NOT NULL,
            genre TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("Destination tables ensured (Movies, Ratings, Genres)");

    Ok(())
}
