//! OMDb client tests against a local fake service

mod helpers;

use helpers::{closed_port_url, FakeOmdb, FakeResponse};
use moviedb_etl::models::{FetchOutcome, Marker, MovieDetails};
use moviedb_etl::services::OmdbClient;
use std::time::Duration;

#[tokio::test]
async fn test_found_sends_cleaned_title_and_key() {
    let omdb = FakeOmdb::start(vec![(
        "Toy Story",
        FakeResponse::found("John Lasseter", "A cowboy doll...", "$223,225,679"),
    )])
    .await;
    let client = OmdbClient::new(&omdb.base_url, "test-key").unwrap();

    let outcome = client.fetch("Toy Story (1995)").await;

    assert_eq!(
        outcome,
        FetchOutcome::Found(MovieDetails {
            director: Some("John Lasseter".to_string()),
            plot: Some("A cowboy doll...".to_string()),
            box_office: Some("$223,225,679".to_string()),
        })
    );

    let requests = omdb.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("t").map(String::as_str), Some("Toy Story"));
    assert_eq!(requests[0].get("apikey").map(String::as_str), Some("test-key"));
    assert_eq!(requests[0].get("plot").map(String::as_str), Some("full"));
}

#[tokio::test]
async fn test_response_false_is_not_found() {
    let omdb = FakeOmdb::start(vec![]).await;
    let client = OmdbClient::new(&omdb.base_url, "test-key").unwrap();

    let outcome = client.fetch("Nonexistent Film (2001)").await;

    assert_eq!(outcome, FetchOutcome::NotFound);
    assert_eq!(outcome.fields().director, Marker::NotFound.as_str());
}

#[tokio::test]
async fn test_missing_fields_become_not_available() {
    let omdb = FakeOmdb::start(vec![(
        "Sparse",
        FakeResponse::Json(serde_json::json!({"Response": "True", "Director": "Someone"})),
    )])
    .await;
    let client = OmdbClient::new(&omdb.base_url, "test-key").unwrap();

    let fields = client.fetch("Sparse").await.fields();

    assert_eq!(fields.director, "Someone");
    assert_eq!(fields.plot, "N/A");
    assert_eq!(fields.box_office, "N/A");
}

#[tokio::test]
async fn test_server_error_is_unexpected_status() {
    let omdb = FakeOmdb::start(vec![("Broken", FakeResponse::Status(503))]).await;
    let client = OmdbClient::new(&omdb.base_url, "test-key").unwrap();

    let outcome = client.fetch("Broken").await;

    assert_eq!(outcome, FetchOutcome::UnexpectedStatus(503));
    assert_eq!(outcome.fields().plot, Marker::Unavailable.as_str());
}

#[tokio::test]
async fn test_unauthorized_is_unexpected_status() {
    let omdb = FakeOmdb::start(vec![("Locked", FakeResponse::Status(401))]).await;
    let client = OmdbClient::new(&omdb.base_url, "bad-key").unwrap();

    assert_eq!(client.fetch("Locked").await, FetchOutcome::UnexpectedStatus(401));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let omdb = FakeOmdb::start(vec![(
        "Slow",
        FakeResponse::Delayed(Duration::from_secs(3)),
    )])
    .await;
    let client =
        OmdbClient::with_timeout(&omdb.base_url, "test-key", Duration::from_millis(200)).unwrap();

    let outcome = client.fetch("Slow").await;

    assert!(matches!(outcome, FetchOutcome::TransportError(_)));
    assert_eq!(outcome.fields().box_office, Marker::ApiError.as_str());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error_not_not_found() {
    let base_url = closed_port_url().await;
    let client = OmdbClient::new(&base_url, "secret-key").unwrap();

    let outcome = client.fetch("Toy Story (1995)").await;

    match outcome {
        FetchOutcome::TransportError(cause) => {
            assert!(!cause.contains("secret-key"), "API key leaked: {}", cause);
        }
        other => panic!("expected TransportError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_transport_error() {
    let omdb = FakeOmdb::start(vec![(
        "Garbled",
        FakeResponse::Raw("<html>not json</html>".to_string()),
    )])
    .await;
    let client = OmdbClient::new(&omdb.base_url, "test-key").unwrap();

    assert!(matches!(
        client.fetch("Garbled").await,
        FetchOutcome::TransportError(_)
    ));
}
