use async_trait::async_trait;

use crate::credentials::{CrmCredentials, NotifierCredentials};
use crate::error::{CrmError, InsertError, SecretError, SendError};
use crate::message::NotificationMessage;
use crate::record::CrmRecord;

/// Backend-assigned identifier of a sent message.
pub type MessageId = String;

/// Resolves named secrets from the deployment's secret store.
///
/// Implementations live in `salesbridge_integrations` or test code.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the latest version of one named secret.
    async fn access(&self, name: &str) -> Result<String, SecretError>;
}

/// Fetches one full record from the CRM by identifier.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self, creds: &CrmCredentials, record_id: &str)
        -> Result<CrmRecord, CrmError>;
}

/// Appends one denormalized record copy to the analytics table.
///
/// Append-only: the sink never creates or alters schema, and re-sending the
/// same record produces a second row.
#[async_trait]
pub trait WarehouseSink: Send + Sync {
    async fn insert(&self, record: &CrmRecord) -> Result<(), InsertError>;
}

/// Sends a rendered confirmation message.
///
/// The two implementations differ only in the email backend they
/// authenticate against; rendering is shared.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Backend identifier (stable, used in logs and configuration).
    async fn id(&self) -> &'static str;

    async fn send(
        &self,
        message: &NotificationMessage,
        creds: &NotifierCredentials,
    ) -> Result<MessageId, SendError>;
}
