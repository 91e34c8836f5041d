//! Router-level tests for the index endpoints
//!
//! The search index is mocked with wiremock; the database pool is created
//! lazily and never touched by these endpoints.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dlp_server::config::Config;
use dlp_server::features::{self, FeatureState};
use dlp_server::index::SolrClient;
use dlp_server::tasks::TaskQueue;

async fn test_app(index_url: &str) -> axum::Router {
    let db = sqlx::PgPool::connect_lazy("postgresql://localhost/dlp_test")
        .expect("lazy pool creation cannot fail");
    let queue = TaskQueue::new(&db);
    let index = SolrClient::with_base_url(index_url).expect("client builds");

    let state = FeatureState {
        db,
        index,
        queue,
        config: Arc::new(Config::default()),
    };

    axum::Router::new().nest("/api/v1", features::router(state))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn query_returns_requested_count_of_documents() {
    let solr = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "numFound": 3,
                "docs": [
                    {"PI": "PPN1", "LABEL": "First"},
                    {"PI": "PPN2", "LABEL": "Second"},
                    {"PI": "PPN3", "LABEL": "Third"},
                ]
            }
        })))
        .mount(&solr)
        .await;

    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/index/query",
            json!({
                "query": "ISWORK:true",
                "count": 3,
                "sortFields": ["DATECREATED"],
                "sortOrder": "desc"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let docs = body.as_array().expect("response is a JSON array");
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0]["PI"], "PPN1");
}

#[tokio::test]
async fn query_with_malformed_sort_field_is_rejected() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/index/query",
            json!({
                "query": "ISWORK:true",
                "sortFields": ["DATECREATED; DROP TABLE"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid sort field"));

    // the index was never consulted
    assert!(solr.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn query_with_empty_query_is_rejected() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json("/api/v1/index/query", json!({"query": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_reports_record_count() {
    let solr = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"numFound": 42, "docs": []}
        })))
        .mount(&solr)
        .await;

    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/index/statistics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 42);
}

#[tokio::test]
async fn unreachable_index_maps_to_bad_gateway() {
    // point the client at a mock that simulates a broken index
    let solr = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/select"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index down"))
        .mount(&solr)
        .await;

    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json("/api/v1/index/query", json!({"query": "ISWORK:true"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn delete_record_with_child_volumes_is_forbidden() {
    let solr = MockServer::start().await;
    // the volume check finds attached volumes
    Mock::given(method("POST"))
        .and(path("/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"numFound": 3, "docs": []}
        })))
        .mount(&solr)
        .await;

    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/index/records/delete",
            json!({"pi": "PPN123456789"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("child volumes"));
}

#[tokio::test]
async fn delete_record_with_invalid_pi_is_rejected() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/index/records/delete",
            json!({"pi": "../etc/passwd"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // the index was never consulted
    assert!(solr.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn download_request_with_invalid_pi_is_rejected() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/downloads/pdf",
            json!({"pi": "has spaces", "email": "me@he.re"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_request_with_invalid_email_is_rejected() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/downloads/pdf",
            json!({"pi": "PPN123456789", "email": "not-an-address"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let solr = MockServer::start().await;
    let app = test_app(&solr.uri()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
