use std::sync::Arc;

use tracing::{error, info};

use super::domain::{ChildId, ChildWriteEvent, EventOutcome, PhotoAction, SkipReason};
use super::gateway::{CandidateSource, GatewayError, PhotoUrlSink};
use crate::matching::{best_match, normalize, Candidate, MatchResult, MatchSettings};

/// Decides what a display name should do to a record given the candidate
/// object names, without touching any external system.
pub fn plan(
    child_id: &ChildId,
    display_name: &str,
    candidates: &[String],
    settings: &MatchSettings,
) -> PhotoAction {
    let result = evaluate(display_name, candidates, settings);

    match result {
        MatchResult {
            score,
            candidate_id: Some(candidate_id),
            locator: Some(photo_url),
        } => PhotoAction::WritePhotoUrl {
            child_id: child_id.clone(),
            candidate_id,
            photo_url,
            score,
        },
        MatchResult { score, .. } => PhotoAction::NoMatch { best_score: score },
    }
}

/// Normalizes the name, drops candidates without letters, and runs the
/// best-match scan in the order given.
pub fn evaluate(
    display_name: &str,
    candidates: &[String],
    settings: &MatchSettings,
) -> MatchResult {
    let name = normalize(display_name);
    let pool: Vec<Candidate> = candidates
        .iter()
        .filter_map(|id| Candidate::new(id.as_str()))
        .collect();

    best_match(&name, &pool, settings)
}

/// Service wiring the matcher to the candidate listing and the record store.
pub struct ChildPhotoService<S, W> {
    source: Arc<S>,
    sink: Arc<W>,
    settings: MatchSettings,
    prefix: String,
}

impl<S, W> ChildPhotoService<S, W>
where
    S: CandidateSource + 'static,
    W: PhotoUrlSink + 'static,
{
    pub fn new(
        source: Arc<S>,
        sink: Arc<W>,
        settings: MatchSettings,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            source,
            sink,
            settings,
            prefix: prefix.into(),
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Handles a record write end to end. Errors are logged and reported as
    /// [`EventOutcome::Failed`]; nothing is retried.
    pub async fn handle(&self, event: &ChildWriteEvent) -> EventOutcome {
        match self.process(event).await {
            Ok(action) => EventOutcome::Completed { action },
            Err(err) => {
                error!(child_id = %event.child_id, error = %err, "photo matching failed");
                EventOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Lists candidates, plans the action, and performs the write when a match
    /// is accepted.
    pub async fn process(&self, event: &ChildWriteEvent) -> Result<PhotoAction, ChildPhotoError> {
        let display_name = match (event.skip_reason(), event.display_name()) {
            (None, Some(name)) => name,
            (reason, _) => {
                let reason = reason.unwrap_or(SkipReason::MissingDisplayName);
                info!(
                    child_id = %event.child_id,
                    reason = reason.label(),
                    "skipped photo matching"
                );
                return Ok(PhotoAction::Skip { reason });
            }
        };

        let mut candidates = self
            .source
            .list_candidates(&self.prefix)
            .await
            .map_err(ChildPhotoError::Listing)?;
        candidates.sort();

        let action = plan(&event.child_id, display_name, &candidates, &self.settings);

        match &action {
            PhotoAction::WritePhotoUrl {
                child_id,
                candidate_id,
                photo_url,
                score,
            } => {
                self.sink
                    .write_photo_url(child_id, photo_url)
                    .await
                    .map_err(ChildPhotoError::Write)?;
                info!(
                    child_id = %child_id,
                    display_name,
                    candidate = %candidate_id,
                    score = %format!("{score:.2}"),
                    "matched child photo"
                );
            }
            PhotoAction::NoMatch { best_score } => {
                info!(
                    child_id = %event.child_id,
                    display_name,
                    best_score = %format!("{best_score:.2}"),
                    candidates = candidates.len(),
                    "no good photo match"
                );
            }
            PhotoAction::Skip { .. } => {}
        }

        Ok(action)
    }
}

/// Error raised while processing a record write.
#[derive(Debug, thiserror::Error)]
pub enum ChildPhotoError {
    #[error("failed to list photo candidates: {0}")]
    Listing(#[source] GatewayError),
    #[error("failed to write photoUrl: {0}")]
    Write(#[source] GatewayError),
}
