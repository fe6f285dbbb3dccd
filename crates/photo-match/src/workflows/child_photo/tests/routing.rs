use super::common::*;
use crate::workflows::child_photo::router::child_photo_router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn event_route_writes_and_reports_match() {
    let source = Arc::new(MemorySource::with(&[
        "Children Images/Jane Doe.jpg",
        "Children Images/unrelated.png",
    ]));
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source, sink.clone())));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/events",
            json!({ "childId": "kid-1", "after": { "displayName": "Jane Doe" } }),
        ))
        .await
        .expect("request handled");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["action"]["kind"], "write_photo_url");
    assert_eq!(body["action"]["candidate_id"], "Children Images/Jane Doe.jpg");

    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0.to_string(), "kid-1");
    assert_eq!(
        writes[0].1,
        "https://firebasestorage.googleapis.com/v0/b/manjano-bus.appspot.com/o/Children%20Images%2FJane%20Doe.jpg?alt=media"
    );
}

#[tokio::test]
async fn event_route_reports_weak_match_without_writing() {
    let source = Arc::new(MemorySource::with(&["Children Images/al.jpg"]));
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source, sink.clone())));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/events",
            json!({ "childId": "kid-1", "after": { "displayName": "Al Lee" } }),
        ))
        .await
        .expect("request handled");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["action"]["kind"], "no_match");
    assert!(sink.writes().is_empty());
}

#[tokio::test]
async fn event_route_reports_failures_with_ok_status() {
    let source = Arc::new(MemorySource::failing());
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source, sink)));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/events",
            json!({ "childId": "kid-2", "after": { "displayName": "Jane Doe" } }),
        ))
        .await
        .expect("request handled");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("listing offline"));
}

#[tokio::test]
async fn event_route_skips_records_without_names() {
    let source = Arc::new(MemorySource::with(&["janedoe.jpg"]));
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source.clone(), sink)));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/events",
            json!({ "childId": "kid-3", "after": { "class": "P1" } }),
        ))
        .await
        .expect("request handled");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"]["kind"], "skip");
    assert_eq!(body["action"]["reason"], "missing_display_name");
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn preview_route_scores_without_writing() {
    let source = Arc::new(MemorySource::default());
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source.clone(), sink.clone())));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/match-preview",
            json!({
                "displayName": "Jane Doe",
                "candidates": ["unrelated.png", "janedoe_photo.jpg", "2024/"]
            }),
        ))
        .await
        .expect("request handled");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalized"]["combined"], "janedoe");
    assert_eq!(body["result"]["candidate_id"], "janedoe_photo.jpg");
    assert_eq!(body["scores"].as_array().expect("scores listed").len(), 2);
    assert_eq!(body["scores"][0]["id"], "janedoe_photo.jpg");
    assert_eq!(body["result"]["score"], body["scores"][0]["score"]);
    assert_eq!(source.calls(), 0);
    assert!(sink.writes().is_empty());
}

#[tokio::test]
async fn malformed_event_is_rejected() {
    let source = Arc::new(MemorySource::default());
    let sink = Arc::new(MemorySink::default());
    let app = child_photo_router(Arc::new(service(source, sink)));

    let response = app
        .oneshot(json_request(
            "/api/v1/children/events",
            json!({ "after": { "displayName": "Jane Doe" } }),
        ))
        .await
        .expect("request handled");

    assert!(response.status().is_client_error());
}
