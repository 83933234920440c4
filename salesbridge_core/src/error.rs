use thiserror::Error;

/// Trigger payload could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed trigger payload: {0}")]
    MalformedPayload(String),

    #[error("trigger payload missing field: {0}")]
    MissingField(&'static str),
}

/// Secret resolution failed. Always fatal: a partial credential set is never
/// handed to later stages.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret store unreachable: {0}")]
    StoreUnreachable(String),

    #[error("secret not found: {0}")]
    Missing(String),
}

/// CRM authentication or record retrieval failed. None of these are retried;
/// a transient fault surfaces as the invocation's terminal failure.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("crm authentication failed: {0}")]
    Auth(String),

    #[error("crm record not found: {0}")]
    NotFound(String),

    #[error("crm rate limit exceeded")]
    RateLimited,

    #[error("crm transport error: {0}")]
    Transport(String),
}

/// Warehouse insert failed. `RowErrors` carries the warehouse's per-row
/// messages; `Request` classifies transport and auth faults at the stage
/// boundary.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("warehouse rejected rows: {}", .0.join("; "))]
    RowErrors(Vec<String>),

    #[error("warehouse request failed: {0}")]
    Request(String),
}

/// Notification send failed.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("notifier authentication failed: {0}")]
    Auth(String),

    #[error("notifier transport error: {0}")]
    Transport(String),
}

/// Deployment configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Terminal pipeline failures.
///
/// Only the first three stages abort the invocation. Insert and send
/// failures never appear here; the orchestrator records them in the
/// [`PipelineReport`](crate::pipeline::PipelineReport) and the run still
/// reports success.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("secrets: {0}")]
    Secrets(#[from] SecretError),

    #[error("fetch {record_id}: {source}")]
    Fetch {
        record_id: String,
        #[source]
        source: CrmError,
    },
}
