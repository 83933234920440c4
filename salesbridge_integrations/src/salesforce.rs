//! Salesforce record fetcher.
//!
//! Authenticates with the SOAP partner login (username + password with the
//! security token appended) and reads one sObject through the REST API.
//! No retry on any failure; a transient fault surfaces immediately.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use salesbridge_core::credentials::CrmCredentials;
use salesbridge_core::error::CrmError;
use salesbridge_core::record::CrmRecord;
use salesbridge_core::traits::RecordFetcher;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

const API_VERSION: &str = "59.0";
const DEFAULT_OBJECT: &str = "Account";

pub struct SalesforceFetcher {
    client: Client,
    object: String,
}

impl SalesforceFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            client,
            object: DEFAULT_OBJECT.to_string(),
        }
    }

    /// Override the sObject type (defaults to `Account`).
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = object.into();
        self
    }

    /// SOAP partner login; returns the session id used as a bearer token.
    #[instrument(level = "debug", skip_all)]
    async fn login(&self, creds: &CrmCredentials) -> Result<String, CrmError> {
        let url = format!(
            "{}/services/Soap/u/{API_VERSION}",
            creds.instance_url.trim_end_matches('/')
        );
        let envelope = login_envelope(
            &creds.username,
            &format!("{}{}", creds.password, creds.security_token),
        );
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(envelope)
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || body.contains("INVALID_LOGIN") {
                return Err(CrmError::Auth(
                    "invalid username, password, or security token".to_string(),
                ));
            }
            return Err(CrmError::Transport(format!(
                "login status={status} body={}",
                truncate(&body)
            )));
        }
        extract_tag(&body, "sessionId")
            .ok_or_else(|| CrmError::Auth("login response missing sessionId".to_string()))
    }
}

impl Default for SalesforceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordFetcher for SalesforceFetcher {
    #[instrument(level = "info", skip(self, creds))]
    async fn fetch(
        &self,
        creds: &CrmCredentials,
        record_id: &str,
    ) -> Result<CrmRecord, CrmError> {
        let session_id = self.login(creds).await?;
        let url = format!(
            "{}/services/data/v{API_VERSION}/sobjects/{}/{record_id}",
            creds.instance_url.trim_end_matches('/'),
            self.object,
        );
        let resp = self
            .client
            .get(url)
            .bearer_auth(&session_id)
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;
        let status = resp.status();
        match status {
            StatusCode::NOT_FOUND => return Err(CrmError::NotFound(record_id.to_string())),
            StatusCode::UNAUTHORIZED => {
                return Err(CrmError::Auth("session rejected".to_string()))
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(CrmError::RateLimited),
            StatusCode::FORBIDDEN => {
                let body = resp.text().await.unwrap_or_default();
                if body.contains("REQUEST_LIMIT_EXCEEDED") {
                    return Err(CrmError::RateLimited);
                }
                return Err(CrmError::Auth(format!("forbidden: {}", truncate(&body))));
            }
            s if !s.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(CrmError::Transport(format!(
                    "status={s} body={}",
                    truncate(&body)
                )));
            }
            _ => {}
        }
        let value: Value = resp
            .json()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(CrmError::Transport(
                "record response is not a JSON object".to_string(),
            ));
        };
        tracing::debug!(record_id = %record_id, fields = fields.len(), "fetched crm record");
        Ok(CrmRecord::new(fields))
    }
}

fn login_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:urn="urn:partner.soap.sforce.com">
  <soapenv:Body>
    <urn:login>
      <urn:username>{}</urn:username>
      <urn:password>{}</urn:password>
    </urn:login>
  </soapenv:Body>
</soapenv:Envelope>"#,
        xml_escape(username),
        xml_escape(password),
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Text content of the first `<tag>…</tag>` pair. The login response nests
/// `sessionId` without a namespace prefix, so plain tag matching is enough.
fn extract_tag(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].to_string())
}

fn truncate(s: &str) -> String {
    s.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <loginResponse>
      <result>
        <serverUrl>https://example.my.salesforce.com/services/Soap/u/59.0</serverUrl>
        <sessionId>00Dxx0000001gPL!AQsAQP0dE3</sessionId>
        <userId>005xx000001Sv2xAAC</userId>
      </result>
    </loginResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

    #[test]
    fn session_id_extracts_from_the_login_response() {
        assert_eq!(
            extract_tag(LOGIN_RESPONSE, "sessionId").as_deref(),
            Some("00Dxx0000001gPL!AQsAQP0dE3")
        );
    }

    #[test]
    fn missing_tag_extracts_to_none() {
        assert!(extract_tag(LOGIN_RESPONSE, "faultcode").is_none());
        assert!(extract_tag("", "sessionId").is_none());
    }

    #[test]
    fn unclosed_tag_extracts_to_none() {
        assert!(extract_tag("<sessionId>abc", "sessionId").is_none());
    }

    #[test]
    fn envelope_escapes_credential_characters() {
        let envelope = login_envelope("ops@example.com", "p<w&d>tok");
        assert!(envelope.contains("<urn:username>ops@example.com</urn:username>"));
        assert!(envelope.contains("<urn:password>p&lt;w&amp;d&gt;tok</urn:password>"));
    }
}
