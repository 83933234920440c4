//! SendGrid notifier (direct transactional-email API).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use salesbridge_core::credentials::NotifierCredentials;
use salesbridge_core::error::SendError;
use salesbridge_core::message::NotificationMessage;
use salesbridge_core::traits::{MessageId, Notifier};
use serde::Serialize;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct MailSendRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<MailContent>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
struct MailContent {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

pub struct SendGridNotifier {
    client: Client,
    from_email: String,
    api_base: String,
}

impl SendGridNotifier {
    pub fn new(from_email: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            client,
            from_email: from_email.into(),
            api_base: "https://api.sendgrid.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

fn mail_request(from_email: &str, message: &NotificationMessage) -> MailSendRequest {
    MailSendRequest {
        personalizations: vec![Personalization {
            to: message
                .recipients
                .iter()
                .map(|r| EmailAddress { email: r.clone() })
                .collect(),
        }],
        from: EmailAddress {
            email: from_email.to_string(),
        },
        subject: message.subject.clone(),
        content: vec![MailContent {
            kind: "text/html",
            value: message.html_body.clone(),
        }],
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn id(&self) -> &'static str {
        "sendgrid"
    }

    #[instrument(level = "info", skip_all)]
    async fn send(
        &self,
        message: &NotificationMessage,
        creds: &NotifierCredentials,
    ) -> Result<MessageId, SendError> {
        let NotifierCredentials::SendGrid { api_key } = creds else {
            return Err(SendError::Auth(
                "sendgrid notifier given non-sendgrid credentials".to_string(),
            ));
        };
        let body = mail_request(&self.from_email, message);
        let resp = self
            .client
            .post(format!("{}/v3/mail/send", self.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SendError::Auth(format!(
                "sendgrid rejected the api key: status={status}"
            )));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SendError::Transport(format!(
                "mail/send status={status} body={}",
                text.chars().take(500).collect::<String>()
            )));
        }
        let message_id = resp
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::info!(message_id = %message_id, "sendgrid accepted the message");
        Ok(message_id)
    }
}
