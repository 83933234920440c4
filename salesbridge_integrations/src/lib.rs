//! Concrete clients for the salesbridge pipeline stages.
//!
//! Each integration is a thin reqwest client implementing one core trait;
//! construction happens once at startup, credentials arrive per invocation.

pub mod bigquery;
pub mod google_auth;
pub mod notifiers;
pub mod salesforce;
pub mod secret_manager;

pub use bigquery::BigQuerySink;
pub use google_auth::GoogleTokenSource;
pub use notifiers::gmail::GmailNotifier;
pub use notifiers::sendgrid::SendGridNotifier;
pub use salesforce::SalesforceFetcher;
pub use secret_manager::SecretManagerProvider;
