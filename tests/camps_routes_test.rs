// ABOUTME: Integration tests for the camps REST API routes
// ABOUTME: Drives the real router over an in-memory SQLite database

use axum::{body::Body, Router};
use codecamp_api::{
    config::ServerConfig,
    database::SqliteCampRepository,
    server::{CodecampServer, ServerResources},
};
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> Router {
    let repository = SqliteCampRepository::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    repository.migrate().await.expect("migrations");

    let resources = Arc::new(ServerResources::new(
        Arc::new(repository),
        ServerConfig::default(),
    ));
    CodecampServer::router(resources)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn atlanta_camp() -> Value {
    json!({
        "moniker": "ATL2018",
        "name": "Atlanta Code Camp",
        "location": "Atlanta, GA",
        "eventDate": "2018-03-10"
    })
}

#[tokio::test]
async fn test_camp_lifecycle() {
    let app = test_app().await;

    // Create
    let response = app
        .clone()
        .oneshot(post_json("/api/camps", &atlanta_camp()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_owned();
    assert_eq!(location, "/api/camps/ATL2018");
    let body = body_json(response).await;
    assert_eq!(body["moniker"], "ATL2018");
    assert_eq!(body["eventDate"], "2018-03-10");

    // Second identical create is rejected without mutating the store
    let response = app
        .clone()
        .oneshot(post_json("/api/camps", &atlanta_camp()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "MONIKER_IN_USE");

    // Get
    let response = app.clone().oneshot(get(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["moniker"], "ATL2018");
    assert_eq!(body["name"], "Atlanta Code Camp");

    // Delete
    let response = app.clone().oneshot(delete(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete is effectful and final
    let response = app.clone().oneshot(get(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_moniker_is_not_found() {
    let app = test_app().await;

    let response = app.oneshot(get("/api/camps/NOPE2099")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("NOPE2099"));
}

#[tokio::test]
async fn test_delete_unknown_moniker_is_not_found() {
    let app = test_app().await;

    let response = app.oneshot(delete("/api/camps/NOPE2099")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_moniker() {
    let app = test_app().await;

    let camp = json!({
        "moniker": "   ",
        "name": "No Moniker Camp",
        "eventDate": "2020-01-01"
    });
    let response = app.oneshot(post_json("/api/camps", &camp)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_conflicting_create_does_not_mutate_store() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/camps", &atlanta_camp()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Conflict with a different name must leave the original untouched
    let conflicting = json!({
        "moniker": "ATL2018",
        "name": "Imposter Camp",
        "eventDate": "2019-01-01"
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/camps", &conflicting))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/camps/ATL2018")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["name"], "Atlanta Code Camp");
    assert_eq!(body["eventDate"], "2018-03-10");
}

#[tokio::test]
async fn test_list_include_talks_only_changes_sub_collection() {
    let app = test_app().await;

    let with_talks = json!({
        "moniker": "SEA2019",
        "name": "Seattle Code Camp",
        "location": "Seattle, WA",
        "eventDate": "2019-09-14",
        "talks": [
            {"title": "Ownership in Practice", "abstract": "Borrow checker patterns", "level": "intermediate"},
            {"title": "Async from Scratch", "abstract": "Futures and executors", "level": "advanced"}
        ]
    });
    for camp in [&atlanta_camp(), &with_talks] {
        let response = app
            .clone()
            .oneshot(post_json("/api/camps", camp))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.clone().oneshot(get("/api/camps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let without = body_json(response).await;

    let response = app
        .clone()
        .oneshot(get("/api/camps?includeTalks=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let with = body_json(response).await;

    let monikers = |camps: &Value| -> Vec<String> {
        camps
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["moniker"].as_str().unwrap().to_owned())
            .collect()
    };
    assert_eq!(monikers(&without), monikers(&with));
    assert_eq!(monikers(&with), vec!["ATL2018", "SEA2019"]);

    // Only the talks sub-collection differs
    assert!(without.as_array().unwrap().iter().all(|c| c["talks"].is_null()));
    let seattle = &with.as_array().unwrap()[1];
    assert_eq!(seattle["talks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_by_date() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/camps", &atlanta_camp()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Matching date
    let response = app
        .clone()
        .oneshot(get("/api/camps/search?theDate=2018-03-10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["moniker"], "ATL2018");

    // Empty result set is a 404
    let response = app
        .clone()
        .oneshot(get("/api/camps/search?theDate=2018-03-11"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // theDate is required; the rejection uses the standard error envelope
    let response = app
        .clone()
        .oneshot(get("/api/camps/search?includeTalks=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    // So does a date that does not parse
    let response = app
        .clone()
        .oneshot(get("/api/camps/search?theDate=soon"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_interleaved_creates_both_succeed() {
    let app = test_app().await;

    let seattle = json!({
        "moniker": "SEA2019",
        "name": "Seattle Code Camp",
        "location": "Seattle, WA",
        "eventDate": "2019-09-14"
    });

    // Two creates racing through the same router must each persist exactly
    // their own camp, with neither reporting a failed commit
    let (first, second) = tokio::join!(
        app.clone().oneshot(post_json("/api/camps", &atlanta_camp())),
        app.clone().oneshot(post_json("/api/camps", &seattle)),
    );
    assert_eq!(first.unwrap().status(), StatusCode::CREATED);
    assert_eq!(second.unwrap().status(), StatusCode::CREATED);

    for moniker in ["ATL2018", "SEA2019"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/camps/{moniker}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}
