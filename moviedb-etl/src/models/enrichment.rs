//! Metadata lookup outcomes
//!
//! A lookup ends in exactly one [`FetchOutcome`]. Downstream code branches on
//! the variant; the literal marker strings only appear when the outcome is
//! flattened into destination columns by [`FetchOutcome::fields`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder values written in place of real metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Lookup succeeded but the service omitted the field
    NotAvailable,
    /// Service answered but had no matching title
    NotFound,
    /// Request failed at the transport level (connect, timeout, bad body)
    ApiError,
    /// Service answered with a non-success HTTP status
    Unavailable,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::NotAvailable => "N/A",
            Marker::NotFound => "Not Found",
            Marker::ApiError => "API Error",
            Marker::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields returned by a successful lookup; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
}

/// Result of one metadata lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FetchOutcome {
    Found(MovieDetails),
    NotFound,
    /// Network failure of any kind; carries the cause for reporting
    TransportError(String),
    /// Non-success HTTP status code
    UnexpectedStatus(u16),
}

/// Discriminant of [`FetchOutcome`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Found,
    NotFound,
    TransportError,
    UnexpectedStatus,
}

impl FetchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            FetchOutcome::Found(_) => OutcomeKind::Found,
            FetchOutcome::NotFound => OutcomeKind::NotFound,
            FetchOutcome::TransportError(_) => OutcomeKind::TransportError,
            FetchOutcome::UnexpectedStatus(_) => OutcomeKind::UnexpectedStatus,
        }
    }

    /// Only answers the service actually gave are worth remembering.
    /// Failures are retried on the next run.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, FetchOutcome::Found(_) | FetchOutcome::NotFound)
    }

    /// Flatten into destination column values
    pub fn fields(&self) -> EnrichmentFields {
        match self {
            FetchOutcome::Found(details) => EnrichmentFields {
                director: value_or_marker(&details.director),
                plot: value_or_marker(&details.plot),
                box_office: value_or_marker(&details.box_office),
            },
            FetchOutcome::NotFound => EnrichmentFields::filled(Marker::NotFound),
            FetchOutcome::TransportError(_) => EnrichmentFields::filled(Marker::ApiError),
            FetchOutcome::UnexpectedStatus(_) => EnrichmentFields::filled(Marker::Unavailable),
        }
    }
}

/// Blank values count as missing; anything else is kept verbatim
fn value_or_marker(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => Marker::NotAvailable.as_str().to_string(),
    }
}

/// Destination column values for the enrichment attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFields {
    pub director: String,
    pub plot: String,
    pub box_office: String,
}

impl EnrichmentFields {
    /// All three fields set to the same marker
    pub fn filled(marker: Marker) -> Self {
        Self {
            director: marker.as_str().to_string(),
            plot: marker.as_str().to_string(),
            box_office: marker.as_str().to_string(),
        }
    }
}

/// Lookup outcome for one movie, keyed for the join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub movie_id: i64,
    pub outcome: FetchOutcome,
}

impl EnrichmentResult {
    pub fn new(movie_id: i64, outcome: FetchOutcome) -> Self {
        Self { movie_id, outcome }
    }

    pub fn fields(&self) -> EnrichmentFields {
        self.outcome.fields()
    }
}
