//! Database initialization
//!
//! Opens SQLite databases, creating the file when it does not exist yet, and
//! connects to destination databases by URL scheme (`sqlite:` or `mysql:`),
//! creating the target database first when the server supports it.

use crate::{Error, Result};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{AnyPool, ConnectOptions, Connection, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use url::Url;

/// Destination backend, chosen by URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    MySql,
}

impl DatabaseKind {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("sqlite:") {
            Ok(DatabaseKind::Sqlite)
        } else if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Ok(DatabaseKind::MySql)
        } else {
            Err(Error::InvalidInput(format!(
                "Unsupported database URL '{}': expected sqlite: or mysql:",
                redact_url(url)
            )))
        }
    }
}

/// Open a connection pool for a `sqlite:` URL, creating the database if absent
///
/// The pool holds a single connection: every caller in this workspace issues
/// statements strictly one after another.
pub async fn connect_url(url: &str) -> Result<SqlitePool> {
    if DatabaseKind::from_url(url)? != DatabaseKind::Sqlite {
        return Err(Error::InvalidInput(format!(
            "Unsupported database URL '{}': expected a sqlite: URL",
            redact_url(url)
        )));
    }

    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| Error::InvalidInput(format!("Invalid database URL '{}': {}", url, e)))?
        .create_if_missing(true);

    debug!("Connecting to database: {}", url);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Connect to a destination of either backend
///
/// SQLite files are created when missing. For MySQL the database named in
/// the URL path is created on the server before connecting to it.
pub async fn connect_any(url: &str) -> Result<AnyPool> {
    install_default_drivers();

    let connect_url = match DatabaseKind::from_url(url)? {
        DatabaseKind::Sqlite => with_create_mode(url),
        DatabaseKind::MySql => {
            ensure_mysql_database(url).await?;
            url.to_string()
        }
    };

    debug!("Connecting to database: {}", redact_url(url));

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&connect_url)
        .await?;

    Ok(pool)
}

/// SQLite only creates a missing file when asked to
fn with_create_mode(url: &str) -> String {
    if url.contains(":memory:") || url.contains("mode=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&mode=rwc", url)
    } else {
        format!("{}?mode=rwc", url)
    }
}

/// Split a `mysql://` URL into the server URL and the database name
pub fn split_mysql_database(url: &str) -> Result<(String, String)> {
    let mut parsed = Url::parse(url)
        .map_err(|e| Error::InvalidInput(format!("Invalid database URL '{}': {}", redact_url(url), e)))?;

    let database = parsed.path().trim_matches('/').to_string();
    if database.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Database URL '{}' names no database",
            redact_url(url)
        )));
    }
    if !database
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(Error::InvalidInput(format!(
            "Unsupported database name '{}'",
            database
        )));
    }

    parsed.set_path("/");
    Ok((parsed.to_string(), database))
}

async fn ensure_mysql_database(url: &str) -> Result<()> {
    let (server_url, database) = split_mysql_database(url)?;

    let options = MySqlConnectOptions::from_str(&server_url)
        .map_err(|e| Error::InvalidInput(format!("Invalid database URL '{}': {}", redact_url(url), e)))?;

    let mut conn = options.connect().await?;
    sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS `{}`", database))
        .execute(&mut conn)
        .await?;
    conn.close().await?;

    info!(database = %database, "Destination database ensured");
    Ok(())
}

/// URL with any password replaced, for logs and error messages
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // set_password only fails for URLs that cannot carry credentials
            if parsed.set_password(Some("***")).is_ok() {
                parsed.to_string()
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}

/// Open (or create) a SQLite database file
pub async fn open_database_file(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = connect_url(&format!("sqlite://{}?mode=rwc", db_path.display())).await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Count rows in a table
///
/// `table` is interpolated into the statement, so it must be a trusted
/// identifier (never user input). Backtick quoting is accepted by both
/// backends.
pub async fn count_rows(pool: &AnyPool, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM `{}`", table);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}
