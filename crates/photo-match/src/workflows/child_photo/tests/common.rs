use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::matching::{MatchSettings, StorageLocation, DEFAULT_THRESHOLD};
use crate::workflows::child_photo::domain::ChildId;
use crate::workflows::child_photo::gateway::{CandidateSource, GatewayError, PhotoUrlSink};
use crate::workflows::child_photo::ChildPhotoService;

pub(super) const PREFIX: &str = "Children Images/";

pub(super) fn settings() -> MatchSettings {
    MatchSettings {
        threshold: DEFAULT_THRESHOLD,
        location: StorageLocation::new("firebasestorage.googleapis.com", "manjano-bus.appspot.com"),
    }
}

#[derive(Default)]
pub(super) struct MemorySource {
    names: Vec<String>,
    fail: bool,
    calls: AtomicUsize,
    prefixes: Mutex<Vec<String>>,
}

impl MemorySource {
    pub(super) fn with(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prefixes(&self) -> Vec<String> {
        self.prefixes.lock().expect("prefix mutex poisoned").clone()
    }
}

#[async_trait]
impl CandidateSource for MemorySource {
    async fn list_candidates(&self, prefix: &str) -> Result<Vec<String>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prefixes
            .lock()
            .expect("prefix mutex poisoned")
            .push(prefix.to_string());
        if self.fail {
            return Err(GatewayError::Unavailable("listing offline".to_string()));
        }
        Ok(self.names.clone())
    }
}

#[derive(Default)]
pub(super) struct MemorySink {
    writes: Mutex<Vec<(ChildId, String)>>,
    fail: bool,
}

impl MemorySink {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn writes(&self) -> Vec<(ChildId, String)> {
        self.writes.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl PhotoUrlSink for MemorySink {
    async fn write_photo_url(
        &self,
        child_id: &ChildId,
        photo_url: &str,
    ) -> Result<(), GatewayError> {
        if self.fail {
            return Err(GatewayError::Status {
                url: "https://example.firebaseio.com".to_string(),
                status: 401,
                body: "Permission denied".to_string(),
            });
        }
        self.writes
            .lock()
            .expect("sink mutex poisoned")
            .push((child_id.clone(), photo_url.to_string()));
        Ok(())
    }
}

pub(super) fn service(
    source: Arc<MemorySource>,
    sink: Arc<MemorySink>,
) -> ChildPhotoService<MemorySource, MemorySink> {
    ChildPhotoService::new(source, sink, settings(), PREFIX)
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("body is json");
    (status, value)
}
