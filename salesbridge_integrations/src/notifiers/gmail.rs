//! Gmail notifier (OAuth-delegated mailbox).
//!
//! The long-lived refresh token comes from the one-time `gmail-token`
//! bootstrap flow; each send exchanges it for a short-lived access token,
//! then submits a base64url-encoded RFC 822 message.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use salesbridge_core::credentials::NotifierCredentials;
use salesbridge_core::error::SendError;
use salesbridge_core::message::NotificationMessage;
use salesbridge_core::traits::{MessageId, Notifier};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    id: String,
}

pub struct GmailNotifier {
    client: Client,
    from_email: String,
    token_url: String,
    api_base: String,
}

impl GmailNotifier {
    pub fn new(from_email: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            client,
            from_email: from_email.into(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_base: "https://gmail.googleapis.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    #[instrument(level = "debug", skip_all)]
    async fn exchange_refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<String, SendError> {
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let resp = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let text = resp.text().await.unwrap_or_default();
            return Err(SendError::Auth(format!(
                "refresh token exchange rejected: {}",
                text.chars().take(500).collect::<String>()
            )));
        }
        if !status.is_success() {
            return Err(SendError::Transport(format!(
                "token exchange status={status}"
            )));
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(token.access_token)
    }
}

/// Base64url-encoded RFC 822 message with a single HTML part.
fn build_raw_message(from: &str, message: &NotificationMessage) -> String {
    let mime = format!(
        "From: {from}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=\"UTF-8\"\r\n\r\n{}",
        message.recipients.join(", "),
        message.subject,
        message.html_body,
    );
    URL_SAFE_NO_PAD.encode(mime.as_bytes())
}

#[async_trait]
impl Notifier for GmailNotifier {
    async fn id(&self) -> &'static str {
        "gmail"
    }

    #[instrument(level = "info", skip_all)]
    async fn send(
        &self,
        message: &NotificationMessage,
        creds: &NotifierCredentials,
    ) -> Result<MessageId, SendError> {
        let NotifierCredentials::Gmail {
            client_id,
            client_secret,
            refresh_token,
        } = creds
        else {
            return Err(SendError::Auth(
                "gmail notifier given non-gmail credentials".to_string(),
            ));
        };
        let access_token = self
            .exchange_refresh_token(client_id, client_secret, refresh_token)
            .await?;
        let raw = build_raw_message(&self.from_email, message);
        let url = format!("{}/gmail/v1/users/me/messages/send", self.api_base);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&access_token)
            .json(&SendMessageRequest { raw })
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SendError::Auth(format!(
                "gmail rejected the access token: status={status}"
            )));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SendError::Transport(format!(
                "messages/send status={status} body={}",
                text.chars().take(500).collect::<String>()
            )));
        }
        let sent: SendMessageResponse = resp
            .json()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        tracing::info!(message_id = %sent.id, "gmail accepted the message");
        Ok(sent.id)
    }
}
