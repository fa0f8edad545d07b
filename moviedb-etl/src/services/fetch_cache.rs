//! Persistent lookup cache
//!
//! Maps a cleaned title to the last answer the service gave for it. Only
//! [`FetchOutcome::is_cacheable`] outcomes are stored. Entries older than the
//! TTL are treated as absent and removed, both lazily on read and in bulk
//! when the cache is opened.

use crate::models::FetchOutcome;
use chrono::{DateTime, Duration, Utc};
use moviedb_common::db::open_database_file;
use moviedb_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info, warn};

/// SQLite-backed fetch cache
pub struct FetchCache {
    pool: SqlitePool,
    ttl: Duration,
}

impl FetchCache {
    /// Open (or create) the cache file and drop expired entries
    pub async fn open(path: &Path, ttl_days: u32) -> Result<Self> {
        let pool = open_database_file(path).await?;
        let cache = Self::from_pool(pool, ttl_days).await?;

        let purged = cache.purge_expired().await?;
        if purged > 0 {
            info!(purged, "Removed expired fetch cache entries");
        }

        Ok(cache)
    }

    /// Use an existing pool, creating the cache table if needed
    pub async fn from_pool(pool: SqlitePool, ttl_days: u32) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS omdb_cache (
                title TEXT PRIMARY KEY,
                outcome TEXT NOT NULL,
                cached_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_omdb_cache_cached_at ON omdb_cache(cached_at)")
            .execute(&pool)
            .await?;

        Ok(Self {
            pool,
            ttl: Duration::days(i64::from(ttl_days)),
        })
    }

    /// Entries cached at or before this instant are expired. A TTL reaching
    /// past the earliest representable date means nothing expires.
    fn cutoff(&self) -> i64 {
        Utc::now()
            .checked_sub_signed(self.ttl)
            .map_or(i64::MIN, |cutoff| cutoff.timestamp())
    }

    /// Cached outcome for a cleaned title, if present and fresh
    pub async fn get(&self, title: &str) -> Result<Option<FetchOutcome>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT outcome, cached_at FROM omdb_cache WHERE title = ?")
                .bind(title)
                .fetch_optional(&self.pool)
                .await?;

        let Some((outcome_json, cached_at)) = row else {
            return Ok(None);
        };

        if cached_at <= self.cutoff() {
            debug!(title = %title, "Fetch cache entry expired");
            self.remove(title).await?;
            return Ok(None);
        }

        match serde_json::from_str::<FetchOutcome>(&outcome_json) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                warn!(title = %title, error = %e, "Discarding unreadable fetch cache entry");
                self.remove(title).await?;
                Ok(None)
            }
        }
    }

    /// Store an outcome; returns `false` when the outcome is not cacheable
    pub async fn put(&self, title: &str, outcome: &FetchOutcome) -> Result<bool> {
        self.put_at(title, outcome, Utc::now()).await
    }

    /// Store an outcome with an explicit cache time
    pub async fn put_at(
        &self,
        title: &str,
        outcome: &FetchOutcome,
        cached_at: DateTime<Utc>,
    ) -> Result<bool> {
        if !outcome.is_cacheable() {
            return Ok(false);
        }

        let outcome_json = serde_json::to_string(outcome)
            .map_err(|e| Error::InvalidInput(format!("Unserializable fetch outcome: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO omdb_cache (title, outcome, cached_at) VALUES (?, ?, ?)
            ON CONFLICT(title) DO UPDATE SET
                outcome = excluded.outcome,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(title)
        .bind(outcome_json)
        .bind(cached_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    async fn remove(&self, title: &str) -> Result<()> {
        sqlx::query("DELETE FROM omdb_cache WHERE title = ?")
            .bind(title)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every expired entry; returns how many were removed
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM omdb_cache WHERE cached_at <= ?")
            .bind(self.cutoff())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of stored entries, fresh or not
    pub async fn entry_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM omdb_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
