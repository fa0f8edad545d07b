//! Enrichment stage
//!
//! Looks up every movie in input order, pausing after each service call, then
//! left-joins the outcomes back onto the movie list by `movie_id`.

use crate::models::{
    EnrichedMovie, EnrichmentFields, EnrichmentResult, FetchOutcome, Marker, MovieRecord,
    OutcomeKind,
};
use crate::services::fetch_cache::FetchCache;
use crate::services::omdb_client::OmdbClient;
use crate::services::title::clean_title;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// Progress is logged every this many movies
pub const PROGRESS_INTERVAL: usize = 10;

/// Default pause after each service call
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Tally of lookup outcomes for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub found: usize,
    pub not_found: usize,
    pub api_errors: usize,
    pub unavailable: usize,
    /// Lookups answered from the fetch cache (also counted by outcome)
    pub cache_hits: usize,
}

impl EnrichmentSummary {
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Found => self.found += 1,
            OutcomeKind::NotFound => self.not_found += 1,
            OutcomeKind::TransportError => self.api_errors += 1,
            OutcomeKind::UnexpectedStatus => self.unavailable += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.found + self.not_found + self.api_errors + self.unavailable
    }
}

/// Runs lookups for a movie list
pub struct Enricher<'a> {
    client: &'a OmdbClient,
    cache: Option<&'a FetchCache>,
    request_delay: Duration,
}

impl<'a> Enricher<'a> {
    pub fn new(client: &'a OmdbClient, request_delay: Duration) -> Self {
        Self {
            client,
            cache: None,
            request_delay,
        }
    }

    pub fn with_cache(mut self, cache: &'a FetchCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Look up every movie and join the results back on
    pub async fn enrich(&self, movies: Vec<MovieRecord>) -> (Vec<EnrichedMovie>, EnrichmentSummary) {
        let (results, summary) = self.fetch_all(&movies).await;
        let enriched = left_join(movies, results);

        info!(
            found = summary.found,
            not_found = summary.not_found,
            api_errors = summary.api_errors,
            unavailable = summary.unavailable,
            cache_hits = summary.cache_hits,
            "OMDb data enrichment completed"
        );

        (enriched, summary)
    }

    /// One lookup per movie, strictly sequential
    pub async fn fetch_all(&self, movies: &[MovieRecord]) -> (Vec<EnrichmentResult>, EnrichmentSummary) {
        let mut results = Vec::with_capacity(movies.len());
        let mut summary = EnrichmentSummary::default();

        info!(movies = movies.len(), "Fetching OMDb data");

        for (index, movie) in movies.iter().enumerate() {
            let cleaned = clean_title(&movie.title);

            let outcome = match self.cached(&cleaned).await {
                Some(outcome) => {
                    summary.cache_hits += 1;
                    outcome
                }
                None => {
                    let outcome = self.client.fetch_cleaned(&cleaned).await;
                    self.remember(&cleaned, &outcome).await;
                    // Throttle only real service calls
                    tokio::time::sleep(self.request_delay).await;
                    outcome
                }
            };

            match &outcome {
                FetchOutcome::TransportError(cause) => {
                    warn!(movie_id = movie.movie_id, title = %movie.title, cause = %cause, "API error");
                }
                FetchOutcome::UnexpectedStatus(status) => {
                    warn!(movie_id = movie.movie_id, title = %movie.title, status, "OMDb unavailable");
                }
                _ => {}
            }

            summary.record(outcome.kind());
            results.push(EnrichmentResult::new(movie.movie_id, outcome));

            if (index + 1) % PROGRESS_INTERVAL == 0 {
                info!(completed = index + 1, total = movies.len(), "Enrichment progress");
            }
        }

        (results, summary)
    }

    async fn cached(&self, cleaned_title: &str) -> Option<FetchOutcome> {
        let cache = self.cache?;
        match cache.get(cleaned_title).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(title = %cleaned_title, error = %e, "Fetch cache read failed");
                None
            }
        }
    }

    async fn remember(&self, cleaned_title: &str, outcome: &FetchOutcome) {
        if let Some(cache) = self.cache {
            if let Err(e) = cache.put(cleaned_title, outcome).await {
                warn!(title = %cleaned_title, error = %e, "Fetch cache write failed");
            }
        }
    }
}

/// Join lookup results onto movies by `movie_id`, keeping every movie
///
/// Output order and length follow `movies`. A movie with no result gets
/// "N/A" in all enrichment fields. When a movie id has several results the
/// first one wins.
pub fn left_join(movies: Vec<MovieRecord>, results: Vec<EnrichmentResult>) -> Vec<EnrichedMovie> {
    let mut by_id: HashMap<i64, EnrichmentFields> = HashMap::with_capacity(results.len());
    for result in results {
        by_id
            .entry(result.movie_id)
            .or_insert_with(|| result.fields());
    }

    movies
        .into_iter()
        .map(|movie| {
            let fields = by_id
                .get(&movie.movie_id)
                .cloned()
                .unwrap_or_else(|| EnrichmentFields::filled(Marker::NotAvailable));
            EnrichedMovie::from_record(movie, fields)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieDetails;

    fn found(director: &str) -> FetchOutcome {
        FetchOutcome::Found(MovieDetails {
            director: Some(director.to_string()),
            plot: Some("...".to_string()),
            box_office: None,
        })
    }

    #[test]
    fn test_left_join_keeps_every_movie_in_order() {
        let movies = vec![
            MovieRecord::new(3, "Heat (1995)", "Action"),
            MovieRecord::new(1, "Toy Story (1995)", "Animation"),
            MovieRecord::new(2, "Jumanji (1995)", "Adventure"),
        ];
        let results = vec![
            EnrichmentResult::new(1, found("John Lasseter")),
            EnrichmentResult::new(3, FetchOutcome::NotFound),
        ];

        let joined = left_join(movies, results);

        let ids: Vec<i64> = joined.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        assert_eq!(joined[0].director, "Not Found");
        assert_eq!(joined[1].director, "John Lasseter");
        assert_eq!(joined[1].box_office, "N/A");

        // No result at all
        assert_eq!(joined[2].director, "N/A");
        assert_eq!(joined[2].plot, "N/A");
        assert_eq!(joined[2].box_office, "N/A");
    }

    #[test]
    fn test_left_join_ignores_unmatched_results() {
        let movies = vec![MovieRecord::new(1, "Toy Story (1995)", "Animation")];
        let results = vec![
            EnrichmentResult::new(99, found("Nobody")),
            EnrichmentResult::new(1, FetchOutcome::UnexpectedStatus(500)),
        ];

        let joined = left_join(movies, results);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].director, "Unavailable");
    }

    #[test]
    fn test_left_join_first_result_wins() {
        let movies = vec![MovieRecord::new(1, "Toy Story (1995)", "Animation")];
        let results = vec![
            EnrichmentResult::new(1, FetchOutcome::TransportError("reset".into())),
            EnrichmentResult::new(1, found("John Lasseter")),
        ];

        let joined = left_join(movies, results);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].director, "API Error");
    }

    #[test]
    fn test_left_join_leaves_year_for_transform() {
        let joined = left_join(vec![MovieRecord::new(1, "Toy Story (1995)", "")], vec![]);
        assert_eq!(joined[0].release_year, None);
        assert_eq!(joined[0].title, "Toy Story (1995)");
    }

    #[test]
    fn test_summary_tally() {
        let mut summary = EnrichmentSummary::default();
        summary.record(OutcomeKind::Found);
        summary.record(OutcomeKind::Found);
        summary.record(OutcomeKind::NotFound);
        summary.record(OutcomeKind::TransportError);
        summary.record(OutcomeKind::UnexpectedStatus);

        assert_eq!(summary.found, 2);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.api_errors, 1);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.total(), 5);
    }
}
