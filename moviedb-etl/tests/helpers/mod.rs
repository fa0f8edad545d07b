//! Test Helper Utilities
//!
//! Shared utilities for testing moviedb-etl: a local stand-in for the OMDb
//! service, CSV fixtures, and destination inspection queries.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer for one title
#[derive(Clone)]
pub enum FakeResponse {
    /// 200 with this JSON body
    Json(Value),
    /// Bare status code, empty body
    Status(u16),
    /// Sleep, then answer 200 with a found body
    Delayed(Duration),
    /// 200 with this literal body
    Raw(String),
}

impl FakeResponse {
    pub fn found(director: &str, plot: &str, box_office: &str) -> Self {
        FakeResponse::Json(json!({
            "Response": "True",
            "Director": director,
            "Plot": plot,
            "BoxOffice": box_office,
        }))
    }
}

struct FakeState {
    responses: HashMap<String, FakeResponse>,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

/// Local OMDb stand-in bound to an ephemeral port
pub struct FakeOmdb {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeOmdb {
    /// Titles not in `responses` get `Response: False`
    pub async fn start(responses: Vec<(&str, FakeResponse)>) -> Self {
        let state = Arc::new(FakeState {
            responses: responses
                .into_iter()
                .map(|(title, response)| (title.to_string(), response))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", get(handle))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/", addr),
            state,
        }
    }

    /// Query parameters of every request received so far
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Titles (`t` parameter) requested so far, in order
    pub fn requested_titles(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|params| params.get("t").cloned().unwrap_or_default())
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.lock().unwrap().push(params.clone());

    let title = params.get("t").cloned().unwrap_or_default();
    match state.responses.get(&title).cloned() {
        Some(FakeResponse::Json(body)) => Json(body).into_response(),
        Some(FakeResponse::Status(code)) => StatusCode::from_u16(code).unwrap().into_response(),
        Some(FakeResponse::Delayed(delay)) => {
            tokio::time::sleep(delay).await;
            Json(json!({"Response": "True", "Director": "Late"})).into_response()
        }
        Some(FakeResponse::Raw(body)) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        None => Json(json!({"Response": "False", "Error": "Movie not found!"})).into_response(),
    }
}

/// Base URL of a port with nothing listening
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Write a fixture file and return its path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// `sqlite://` URL for a database file
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

pub type MovieRow = (i64, String, Option<i64>, String, String, String);

/// Movies table contents ordered by movieId
pub async fn movies_in(pool: &SqlitePool) -> Vec<MovieRow> {
    sqlx::query_as(
        "SELECT movieId, title, release_year, director, plot, box_office FROM Movies ORDER BY movieId",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// Genres table contents in insertion order
pub async fn genres_in(pool: &SqlitePool) -> Vec<(i64, String)> {
    sqlx::query_as("SELECT movieId, genre FROM Genres ORDER BY rowid")
        .fetch_all(pool)
        .await
        .unwrap()
}

/// Ratings table contents in insertion order
pub async fn ratings_in(pool: &SqlitePool) -> Vec<(i64, i64, f64, String)> {
    sqlx::query_as(r#"SELECT userId, movieId, rating, "timestamp" FROM Ratings ORDER BY rowid"#)
        .fetch_all(pool)
        .await
        .unwrap()
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
