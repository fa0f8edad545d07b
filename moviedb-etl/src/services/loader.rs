//! Loader
//!
//! Writes Movies, Ratings and Genres in that order. Each table is loaded in
//! its own transaction, so a single table is all-or-nothing, but the three
//! loads are independent: a failure after Movies was committed leaves Movies
//! populated. The first failure stops the remaining loads. The connection is
//! closed before [`Loader::load`] returns, whatever happened.
//!
//! The default [`LoadMode::Fail`] expects an empty destination and refuses to
//! touch a table that already holds rows.

use crate::db::genres::insert_genres;
use crate::db::movies::insert_movies;
use crate::db::ratings::insert_ratings;
use crate::db::schema::{create_tables, DestinationTable};
use crate::db::Destination;
use crate::error::LoadError;
use crate::models::{EnrichedMovie, GenreRow, RatingRecord};
use crate::services::transform::NormalizedTables;
use moviedb_common::db::count_rows;
use serde::Serialize;
use sqlx::AnyConnection;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

/// What to do when a destination table already holds rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Abort with [`LoadError::LoadConflict`]
    #[default]
    Fail,
    /// Insert after the existing rows
    Append,
    /// Delete the existing rows, then insert, in one transaction
    Replace,
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(LoadMode::Fail),
            "append" => Ok(LoadMode::Append),
            "replace" => Ok(LoadMode::Replace),
            other => Err(format!(
                "unknown load mode '{}' (expected fail, append or replace)",
                other
            )),
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadMode::Fail => "fail",
            LoadMode::Append => "append",
            LoadMode::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// Rows committed to one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableLoad {
    pub table: DestinationTable,
    pub rows: u64,
}

/// Outcome of the load phase
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tables committed, in load order
    pub loaded: Vec<TableLoad>,
    /// First failure; later tables were not attempted
    pub failure: Option<LoadError>,
    /// Row counts read back after loading
    pub verification: Vec<(DestinationTable, i64)>,
}

impl LoadReport {
    fn failed(failure: LoadError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.loaded.len() == DestinationTable::ALL.len()
    }

    /// Tables that were not committed in this run
    pub fn not_loaded(&self) -> Vec<DestinationTable> {
        DestinationTable::ALL
            .into_iter()
            .filter(|table| !self.loaded.iter().any(|load| load.table == *table))
            .collect()
    }

    pub fn verified_count(&self, table: DestinationTable) -> Option<i64> {
        self.verification
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, count)| *count)
    }
}

/// Rows for one destination table
#[derive(Clone, Copy)]
enum TableRows<'a> {
    Movies(&'a [EnrichedMovie]),
    Ratings(&'a [RatingRecord]),
    Genres(&'a [GenreRow]),
}

impl TableRows<'_> {
    fn table(&self) -> DestinationTable {
        match self {
            TableRows::Movies(_) => DestinationTable::Movies,
            TableRows::Ratings(_) => DestinationTable::Ratings,
            TableRows::Genres(_) => DestinationTable::Genres,
        }
    }

    fn len(&self) -> usize {
        match self {
            TableRows::Movies(rows) => rows.len(),
            TableRows::Ratings(rows) => rows.len(),
            TableRows::Genres(rows) => rows.len(),
        }
    }

    async fn insert(&self, conn: &mut AnyConnection) -> Result<u64, sqlx::Error> {
        match self {
            TableRows::Movies(rows) => insert_movies(conn, rows).await,
            TableRows::Ratings(rows) => insert_ratings(conn, rows).await,
            TableRows::Genres(rows) => insert_genres(conn, rows).await,
        }
    }
}

/// Loads the normalized relations into one destination
pub struct Loader {
    destination: Destination,
    mode: LoadMode,
}

impl Loader {
    pub fn new(destination: Destination, mode: LoadMode) -> Self {
        Self { destination, mode }
    }

    /// Load all three tables, verify, and release the connection
    pub async fn load(self, tables: &NormalizedTables) -> LoadReport {
        let mut report = LoadReport::default();

        if let Err(e) = self.load_tables(tables, &mut report).await {
            error!(error = %e, "Error loading data");
            for table in report.not_loaded() {
                warn!(table = %table, "Table not loaded in this run");
            }
            report.failure = Some(e);
        }

        report.verification = self.verify().await;

        self.destination.close().await;
        info!("Load process completed");

        report
    }

    async fn load_tables(
        &self,
        tables: &NormalizedTables,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        create_tables(self.destination.pool())
            .await
            .map_err(LoadError::Schema)?;

        let steps = [
            TableRows::Movies(&tables.movies),
            TableRows::Ratings(&tables.ratings),
            TableRows::Genres(&tables.genres),
        ];

        for rows in steps {
            let written = self.load_table(rows).await?;
            report.loaded.push(TableLoad {
                table: rows.table(),
                rows: written,
            });
        }

        Ok(())
    }

    async fn load_table(&self, rows: TableRows<'_>) -> Result<u64, LoadError> {
        let table = rows.table();
        let statement = |source: sqlx::Error| LoadError::Statement {
            table,
            source: source.into(),
        };
        let pool = self.destination.pool();

        info!(table = %table, rows = rows.len(), "Loading table");

        let existing_rows = count_rows(pool, table.name())
            .await
            .map_err(|source| LoadError::Statement { table, source })?;

        if existing_rows > 0 {
            match self.mode {
                LoadMode::Fail => {
                    return Err(LoadError::LoadConflict {
                        table,
                        existing_rows,
                    })
                }
                LoadMode::Append => {
                    info!(table = %table, existing_rows, "Appending to populated table");
                }
                LoadMode::Replace => {
                    info!(table = %table, existing_rows, "Replacing existing rows");
                }
            }
        }

        let mut tx = pool.begin().await.map_err(statement)?;

        if self.mode == LoadMode::Replace && existing_rows > 0 {
            sqlx::query(&format!("DELETE FROM {}", table.name()))
                .execute(&mut *tx)
                .await
                .map_err(statement)?;
        }

        let written = rows.insert(&mut *tx).await.map_err(statement)?;
        tx.commit().await.map_err(statement)?;

        info!(table = %table, rows = written, "Table loaded");

        Ok(written)
    }

    async fn verify(&self) -> Vec<(DestinationTable, i64)> {
        let mut counts = Vec::with_capacity(DestinationTable::ALL.len());

        for table in DestinationTable::ALL {
            match count_rows(self.destination.pool(), table.name()).await {
                Ok(count) => {
                    info!(table = %table, rows = count, "Data verification");
                    counts.push((table, count));
                }
                Err(e) => warn!(table = %table, error = %e, "Row count failed"),
            }
        }

        counts
    }
}

/// Connect to `url` and load; connection failures end up in the report
pub async fn load_destination(url: &str, mode: LoadMode, tables: &NormalizedTables) -> LoadReport {
    match Destination::connect(url).await {
        Ok(destination) => Loader::new(destination, mode).load(tables).await,
        Err(e) => {
            error!(error = %e, "Error loading data");
            info!("Load process completed");
            LoadReport::failed(e)
        }
    }
}
