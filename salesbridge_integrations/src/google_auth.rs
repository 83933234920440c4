//! Access-token source for Google Cloud REST calls.
//!
//! Inside GCP the metadata server issues service-account tokens; local runs
//! can override with `GOOGLE_ACCESS_TOKEN`. Tokens are fetched per call and
//! never cached across invocations.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("google access token fetch failed: {0}")]
    Fetch(String),
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Shared by the Secret Manager provider and the BigQuery sink.
#[derive(Clone)]
pub struct GoogleTokenSource {
    client: Client,
    override_token: Option<String>,
    metadata_url: String,
}

impl GoogleTokenSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            client,
            override_token: std::env::var("GOOGLE_ACCESS_TOKEN").ok(),
            metadata_url: METADATA_TOKEN_URL.to_string(),
        }
    }

    pub fn with_override_token(mut self, token: impl Into<String>) -> Self {
        self.override_token = Some(token.into());
        self
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn token(&self) -> Result<String, TokenError> {
        if let Some(token) = &self.override_token {
            return Ok(token.clone());
        }
        let resp = self
            .client
            .get(&self.metadata_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| TokenError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TokenError::Fetch(format!(
                "metadata server status {}",
                resp.status()
            )));
        }
        let token: MetadataToken = resp
            .json()
            .await
            .map_err(|e| TokenError::Fetch(e.to_string()))?;
        Ok(token.access_token)
    }
}

impl Default for GoogleTokenSource {
    fn default() -> Self {
        Self::new()
    }
}
