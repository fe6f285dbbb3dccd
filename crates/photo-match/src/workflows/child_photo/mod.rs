//! Child record photo matching.
//!
//! A write to a child record triggers [`ChildPhotoService::handle`], which lists
//! candidate photos, picks the best match for the record's display name, and
//! writes the photo URL back onto the record. Storage listing and record writes
//! sit behind the [`CandidateSource`] and [`PhotoUrlSink`] traits so the
//! workflow can run against Firebase or in-memory fakes.

pub mod domain;
pub mod firebase;
pub mod gateway;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ChildId, ChildRecord, ChildWriteEvent, EventOutcome, PhotoAction, SkipReason};
pub use firebase::{CloudStorageClient, RealtimeDatabaseClient};
pub use gateway::{CandidateSource, GatewayError, PhotoUrlSink};
pub use router::child_photo_router;
pub use router::{MatchPreviewRequest, MatchPreviewResponse};
pub use service::{evaluate, plan, ChildPhotoError, ChildPhotoService};
