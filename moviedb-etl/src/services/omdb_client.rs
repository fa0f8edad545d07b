//! OMDb API client
//!
//! One GET per title, no retries. Every way a lookup can end is folded into a
//! [`FetchOutcome`], so callers never see an error from [`OmdbClient::fetch`].

use crate::models::{FetchOutcome, MovieDetails};
use crate::services::title::clean_title;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default service endpoint
pub const OMDB_BASE_URL: &str = "http://www.omdbapi.com/";

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("moviedb-etl/", env!("CARGO_PKG_VERSION"));

/// OMDb client construction errors
#[derive(Debug, Error)]
pub enum OmdbClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid service URL '{0}'")]
    InvalidBaseUrl(String),
}

/// `Response` arrives as `"True"`/`"False"` but tolerate a JSON bool too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseFlag {
    Bool(bool),
    Text(String),
}

impl ResponseFlag {
    fn is_true(&self) -> bool {
        match self {
            ResponseFlag::Bool(b) => *b,
            ResponseFlag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Subset of the OMDb title response this pipeline uses
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<ResponseFlag>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "BoxOffice")]
    box_office: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Interpret the body of a 2xx response
fn outcome_from_body(body: &[u8]) -> FetchOutcome {
    let parsed: OmdbResponse = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) => return FetchOutcome::TransportError(format!("Invalid response body: {}", e)),
    };

    if parsed.response.as_ref().is_some_and(ResponseFlag::is_true) {
        FetchOutcome::Found(MovieDetails {
            director: parsed.director,
            plot: parsed.plot,
            box_office: parsed.box_office,
        })
    } else {
        if let Some(reason) = &parsed.error {
            tracing::debug!(reason = %reason, "OMDb reported no match");
        }
        FetchOutcome::NotFound
    }
}

/// OMDb API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    base_url: reqwest::Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, OmdbClientError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OmdbClientError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|_| OmdbClientError::InvalidBaseUrl(base_url.to_string()))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| OmdbClientError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Look up a source title; a trailing `(YYYY)` is stripped first
    pub async fn fetch(&self, title: &str) -> FetchOutcome {
        self.fetch_cleaned(&clean_title(title)).await
    }

    /// Look up an already-cleaned title
    pub async fn fetch_cleaned(&self, cleaned_title: &str) -> FetchOutcome {
        let params = [
            ("t", cleaned_title),
            ("apikey", self.api_key.as_str()),
            ("plot", "full"),
        ];

        tracing::debug!(title = %cleaned_title, "Querying OMDb API");

        let response = match self
            .http_client
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransportError(describe_transport_error(e)),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(title = %cleaned_title, status = status.as_u16(), "OMDb returned non-success status");
            return FetchOutcome::UnexpectedStatus(status.as_u16());
        }

        match response.bytes().await {
            Ok(body) => outcome_from_body(&body),
            Err(e) => FetchOutcome::TransportError(describe_transport_error(e)),
        }
    }
}

/// reqwest errors embed the full request URL, which carries the API key
fn describe_transport_error(error: reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_body() || error.is_decode() {
        "failed reading response body"
    } else {
        "request failed"
    };

    format!("{}: {}", kind, error.without_url())
}
