use std::str::FromStr;

use crate::error::ConfigError;

/// Which email backend sends the confirmation message. Fixed by deployment
/// configuration, never chosen per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierBackend {
    SendGrid,
    Gmail,
}

impl FromStr for NotifierBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sendgrid" => Ok(Self::SendGrid),
            "gmail" => Ok(Self::Gmail),
            other => Err(ConfigError::Invalid(format!(
                "unknown notifier backend: {other} (expected sendgrid or gmail)"
            ))),
        }
    }
}

/// Deployment configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Cloud project that owns the secret store and the warehouse.
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    /// Sender address for confirmation emails.
    pub from_email: String,
    /// Recipient addresses, order preserved.
    pub recipients: Vec<String>,
    pub notifier_backend: NotifierBackend,
}

impl PipelineConfig {
    /// Read the recognized environment options and validate the result.
    #[tracing::instrument(level = "debug")]
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = Self {
            project_id: require("GCP_PROJECT")?,
            dataset_id: require("BIGQUERY_DATASET")?,
            table_id: require("BIGQUERY_TABLE")?,
            from_email: require("FROM_EMAIL")?,
            recipients: parse_recipients(&std::env::var("TO_EMAILS").unwrap_or_default()),
            notifier_backend: require("NOTIFIER_BACKEND")?.parse()?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument(level = "debug")]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Invalid("project_id is empty".to_string()));
        }
        if self.dataset_id.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset_id is empty".to_string()));
        }
        if self.table_id.trim().is_empty() {
            return Err(ConfigError::Invalid("table_id is empty".to_string()));
        }
        if self.from_email.trim().is_empty() {
            return Err(ConfigError::Invalid("from_email is empty".to_string()));
        }
        if self.recipients.is_empty() {
            return Err(ConfigError::Invalid(
                "recipient list is empty (set TO_EMAILS)".to_string(),
            ));
        }
        Ok(())
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Comma-separated recipient list, order preserved, blanks dropped.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
