use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, info};

use super::domain::ChildId;
use super::gateway::{CandidateSource, GatewayError, PhotoUrlSink};
use crate::config::{FirebaseConfig, MatcherConfig};
use crate::matching::encode_uri_component;

fn http_client(timeout_seconds: u64) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|err| GatewayError::Unavailable(format!("failed to create HTTP client: {err}")))
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response, GatewayError> {
    let response = request.send().await.map_err(|err| GatewayError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    })?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectListPage {
    #[serde(default)]
    items: Vec<ObjectEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
}

/// Lists bucket objects through the Cloud Storage JSON API.
#[derive(Debug, Clone)]
pub struct CloudStorageClient {
    client: Client,
    api_url: String,
    bucket: String,
    access_token: Option<String>,
}

impl CloudStorageClient {
    pub fn new(
        api_url: impl Into<String>,
        bucket: impl Into<String>,
        access_token: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, GatewayError> {
        let client = http_client(timeout_seconds)?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let bucket = bucket.into();

        info!(api_url = %api_url, bucket = %bucket, "cloud storage listing configured");

        Ok(Self {
            client,
            api_url,
            bucket,
            access_token,
        })
    }

    pub fn from_config(
        firebase: &FirebaseConfig,
        matcher: &MatcherConfig,
    ) -> Result<Self, GatewayError> {
        Self::new(
            firebase.storage_api_url.clone(),
            matcher.bucket.clone(),
            firebase.access_token.clone(),
            firebase.timeout_seconds,
        )
    }

    fn objects_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o",
            self.api_url,
            encode_uri_component(&self.bucket)
        )
    }
}

#[async_trait]
impl CandidateSource for CloudStorageClient {
    async fn list_candidates(&self, prefix: &str) -> Result<Vec<String>, GatewayError> {
        let url = self.objects_url();
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("prefix", prefix), ("fields", "items(name),nextPageToken")]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }
            let request = with_token(request, self.access_token.as_deref());

            let page: ObjectListPage = send(request, &url)
                .await?
                .json()
                .await
                .map_err(|err| GatewayError::Decode {
                    url: url.clone(),
                    message: err.to_string(),
                })?;

            names.extend(page.items.into_iter().map(|entry| entry.name));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(prefix, count = names.len(), "listed photo candidates");
        Ok(names)
    }
}

/// Writes `photoUrl` onto child records through the Realtime Database REST API.
#[derive(Debug, Clone)]
pub struct RealtimeDatabaseClient {
    client: Client,
    database_url: String,
    records_path: String,
    access_token: Option<String>,
}

impl RealtimeDatabaseClient {
    pub fn new(
        database_url: impl Into<String>,
        records_path: impl Into<String>,
        access_token: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, GatewayError> {
        let client = http_client(timeout_seconds)?;
        let database_url = database_url.into().trim_end_matches('/').to_string();
        let records_path = records_path.into().trim_matches('/').to_string();

        info!(
            database_url = %database_url,
            records_path = %records_path,
            "record store configured"
        );

        Ok(Self {
            client,
            database_url,
            records_path,
            access_token,
        })
    }

    pub fn from_config(
        firebase: &FirebaseConfig,
        database_url: &str,
    ) -> Result<Self, GatewayError> {
        Self::new(
            database_url,
            firebase.records_path.clone(),
            firebase.access_token.clone(),
            firebase.timeout_seconds,
        )
    }

    fn photo_url_field(&self, child_id: &ChildId) -> String {
        format!(
            "{}/{}/{}/photoUrl.json",
            self.database_url,
            self.records_path,
            encode_uri_component(&child_id.0)
        )
    }
}

#[async_trait]
impl PhotoUrlSink for RealtimeDatabaseClient {
    async fn write_photo_url(
        &self,
        child_id: &ChildId,
        photo_url: &str,
    ) -> Result<(), GatewayError> {
        let url = self.photo_url_field(child_id);
        let request = with_token(
            self.client.put(&url).json(&photo_url),
            self.access_token.as_deref(),
        );

        send(request, &url).await?;
        debug!(child_id = %child_id, "photoUrl written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_encoded_record_paths() {
        let client = RealtimeDatabaseClient::new(
            "https://example.firebaseio.com/",
            "/children/",
            None,
            5,
        )
        .expect("client builds");

        assert_eq!(
            client.photo_url_field(&ChildId("a b/c".to_string())),
            "https://example.firebaseio.com/children/a%20b%2Fc/photoUrl.json"
        );
    }

    #[test]
    fn builds_objects_url_for_bucket() {
        let client =
            CloudStorageClient::new("https://storage.googleapis.com/", "demo.appspot.com", None, 5)
                .expect("client builds");

        assert_eq!(
            client.objects_url(),
            "https://storage.googleapis.com/storage/v1/b/demo.appspot.com/o"
        );
    }
}
