// ABOUTME: HTTP-level tests for the Google News RSS client against a mock server.
// ABOUTME: Verifies URL routing by topic/location/query and feed item mapping.

use std::fs;
use std::time::Duration;

use httpmock::prelude::*;
use newsdesk_sources::{GoogleNewsClient, GoogleNewsQuery, SourceError};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path, e))
}

fn client(server: &MockServer) -> GoogleNewsClient {
    GoogleNewsClient::new(Duration::from_secs(5))
        .unwrap()
        .base_url(&server.base_url())
        .unwrap()
}

#[tokio::test]
async fn search_returns_clean_items() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rss/search")
            .query_param("q", "nvidia")
            .query_param("hl", "en-US")
            .query_param("gl", "US")
            .query_param("ceid", "US:en");
        then.status(200)
            .header("content-type", "application/xml")
            .body(fixture("google_news.xml"));
    });

    let items = client(&server)
        .search(&GoogleNewsQuery::search("nvidia"))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0].title,
        "Nvidia tops estimates as AI demand surges - Reuters"
    );
    assert_eq!(items[0].link, "https://news.google.com/rss/articles/CBMiAAA?oc=5");
    assert_eq!(
        items[0].summary,
        "Nvidia tops estimates as AI demand surges Reuters"
    );
    assert!(items[0].published.is_some());
    assert_eq!(items[2].summary, "Analysis");
}

#[tokio::test]
async fn topic_route_and_result_cap() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rss/headlines/section/topic/BUSINESS")
            .query_param("ceid", "KR:ko");
        then.status(200).body(fixture("google_news.xml"));
    });

    let query = GoogleNewsQuery {
        hl: "ko".to_string(),
        gl: "KR".to_string(),
        max_results: 1,
        ..GoogleNewsQuery::topic("business")
    };
    let items = client(&server).search(&query).await.unwrap();
    mock.assert();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn server_error_is_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rss/headlines/section/geo/Seoul");
        then.status(500).body("oops");
    });

    let err = client(&server)
        .search(&GoogleNewsQuery::location("Seoul"))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 500, .. }));
}

#[tokio::test]
async fn empty_lookup_never_hits_the_network() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let err = client(&server)
        .search(&GoogleNewsQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Invalid(_)));
    mock.assert_hits(0);
}
