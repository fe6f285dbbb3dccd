use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::ChildWriteEvent;
use super::gateway::{CandidateSource, PhotoUrlSink};
use super::service::ChildPhotoService;
use crate::matching::{
    best_match, normalize, score_candidates, Candidate, MatchResult, NormalizedName,
    ScoredCandidate,
};

/// Router exposing the record-write webhook and a read-only match preview.
pub fn child_photo_router<S, W>(service: Arc<ChildPhotoService<S, W>>) -> Router
where
    S: CandidateSource + 'static,
    W: PhotoUrlSink + 'static,
{
    Router::new()
        .route("/api/v1/children/events", post(child_written_handler::<S, W>))
        .route(
            "/api/v1/children/match-preview",
            post(match_preview_handler::<S, W>),
        )
        .with_state(service)
}

/// Always answers 200: failures are part of the outcome body so the trigger
/// never redelivers.
pub(crate) async fn child_written_handler<S, W>(
    State(service): State<Arc<ChildPhotoService<S, W>>>,
    Json(event): Json<ChildWriteEvent>,
) -> Response
where
    S: CandidateSource + 'static,
    W: PhotoUrlSink + 'static,
{
    let outcome = service.handle(&event).await;
    (StatusCode::OK, Json(outcome)).into_response()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPreviewRequest {
    pub display_name: String,
    #[serde(default)]
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchPreviewResponse {
    pub normalized: NormalizedName,
    pub result: MatchResult,
    pub scores: Vec<ScoredCandidate>,
}

pub(crate) async fn match_preview_handler<S, W>(
    State(service): State<Arc<ChildPhotoService<S, W>>>,
    Json(request): Json<MatchPreviewRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    W: PhotoUrlSink + 'static,
{
    let MatchPreviewRequest {
        display_name,
        mut candidates,
    } = request;
    candidates.sort();

    let normalized = normalize(&display_name);
    let pool: Vec<Candidate> = candidates
        .iter()
        .filter_map(|id| Candidate::new(id.as_str()))
        .collect();
    let scores = score_candidates(&normalized, &pool);
    let result = best_match(&normalized, &pool, service.settings());

    let body = MatchPreviewResponse {
        normalized,
        result,
        scores,
    };
    (StatusCode::OK, Json(body)).into_response()
}
