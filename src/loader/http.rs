//! HTTP artifact loader
//!
//! Fetches a URL with `reqwest` and decodes it as JSON when the response
//! says so, or as an HTML page with embedded JSON-LD otherwise.

use super::{decode_document, decode_json, ArtifactLoader};
use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::schema::ArArtifact;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Loads artifacts over HTTP(S)
pub struct HttpArtifactLoader {
    client: reqwest::Client,
}

impl HttpArtifactLoader {
    /// Create a loader from configuration
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Create a loader around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactLoader for HttpArtifactLoader {
    async fn from_url(&self, url: &Url) -> Result<Vec<ArArtifact>> {
        tracing::debug!(url = %url, "Fetching artifacts");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Load(format!("{} returned {}", url, status)));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("json"))
            .unwrap_or(false);
        // Decode relative URLs against the final location after redirects
        let base = response.url().clone();
        let body = response.text().await?;

        let artifacts = if is_json {
            decode_json(&body, &base)?
        } else {
            decode_document(&body, &base)
        };
        tracing::debug!(url = %base, count = artifacts.len(), "Fetched artifacts");
        Ok(artifacts)
    }
}
