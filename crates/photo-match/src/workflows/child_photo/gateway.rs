use async_trait::async_trait;

use super::domain::ChildId;

/// Lists the object names that may hold a child's photo.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn list_candidates(&self, prefix: &str) -> Result<Vec<String>, GatewayError>;
}

/// Persists the matched photo URL onto a child record.
#[async_trait]
pub trait PhotoUrlSink: Send + Sync {
    async fn write_photo_url(&self, child_id: &ChildId, photo_url: &str)
        -> Result<(), GatewayError>;
}

/// Failure talking to the storage listing or the record store.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}
