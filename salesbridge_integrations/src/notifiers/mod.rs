//! Notifier backends implementing the core `Notifier` trait.
//!
//! Both variants are compiled in; deployment configuration picks one at
//! startup.

pub mod gmail;
pub mod sendgrid;
