//! Salesbridge core: stage traits, error taxonomy, and the sync pipeline.
//!
//! Concrete clients for the external systems live in
//! `salesbridge_integrations`; the HTTP runtime lives in
//! `salesbridge_server`. Nothing in this crate touches the network.

pub mod config;
pub mod credentials;
pub mod error;
pub mod message;
pub mod notification;
pub mod pipeline;
pub mod record;
pub mod traits;

pub use config::{NotifierBackend, PipelineConfig};
pub use credentials::{secret_names, CredentialBundle, CrmCredentials, NotifierCredentials};
pub use error::{
    ConfigError, CrmError, InsertError, ParseError, PipelineError, SecretError, SendError,
};
pub use message::{render_message, NotificationMessage};
pub use notification::InboundNotification;
pub use pipeline::{Pipeline, PipelineReport};
pub use record::CrmRecord;
pub use traits::{MessageId, Notifier, RecordFetcher, SecretProvider, WarehouseSink};
