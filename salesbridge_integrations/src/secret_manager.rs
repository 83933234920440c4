//! Google Secret Manager provider.
//!
//! Resolves the latest version of each named secret
//! (`projects/{p}/secrets/{name}/versions/latest:access`).

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use salesbridge_core::error::SecretError;
use salesbridge_core::traits::SecretProvider;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::google_auth::GoogleTokenSource;

#[derive(Debug, Deserialize)]
struct AccessSecretResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

#[derive(Clone)]
pub struct SecretManagerProvider {
    client: Client,
    tokens: GoogleTokenSource,
    project_id: String,
    api_base: String,
}

impl SecretManagerProvider {
    pub fn new(project_id: impl Into<String>, tokens: GoogleTokenSource) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            client,
            tokens,
            project_id: project_id.into(),
            api_base: "https://secretmanager.googleapis.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

#[async_trait]
impl SecretProvider for SecretManagerProvider {
    #[instrument(level = "debug", skip(self))]
    async fn access(&self, name: &str) -> Result<String, SecretError> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| SecretError::StoreUnreachable(e.to_string()))?;
        let url = format!(
            "{}/v1/projects/{}/secrets/{}/versions/latest:access",
            self.api_base, self.project_id, name
        );
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| SecretError::StoreUnreachable(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SecretError::Missing(name.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SecretError::StoreUnreachable(format!(
                "access {name}: status={status} body={body}"
            )));
        }
        let body: AccessSecretResponse = resp
            .json()
            .await
            .map_err(|e| SecretError::StoreUnreachable(e.to_string()))?;
        decode_payload(name, &body.payload.data)
    }
}

fn decode_payload(name: &str, data: &str) -> Result<String, SecretError> {
    let bytes = BASE64
        .decode(data.as_bytes())
        .map_err(|e| SecretError::StoreUnreachable(format!("{name} payload decode: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| SecretError::StoreUnreachable(format!("{name} payload utf8: {e}")))
}
