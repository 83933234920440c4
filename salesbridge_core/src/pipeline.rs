use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::credentials::CredentialBundle;
use crate::error::{InsertError, PipelineError, SendError};
use crate::message::render_message;
use crate::notification::InboundNotification;
use crate::traits::{MessageId, Notifier, RecordFetcher, SecretProvider, WarehouseSink};

/// Outcome of one invocation that ran to completion.
///
/// Warehouse and notifier failures do not fail the run; they are recorded
/// here after being logged. Parse, secret, and fetch failures abort with a
/// [`PipelineError`] instead.
#[derive(Debug)]
pub struct PipelineReport {
    pub record_id: String,
    pub record_name: Option<String>,
    pub message_id: Option<MessageId>,
    pub insert_error: Option<InsertError>,
    pub send_error: Option<SendError>,
}

/// The five-stage sync pipeline: parse, resolve secrets, fetch record,
/// insert row, notify.
///
/// Strictly linear; each stage's output is required input to the next, so
/// the network calls are issued in sequence, never concurrently. One
/// invocation handles exactly one notification end-to-end.
pub struct Pipeline {
    secrets: Arc<dyn SecretProvider>,
    fetcher: Arc<dyn RecordFetcher>,
    sink: Arc<dyn WarehouseSink>,
    notifier: Arc<dyn Notifier>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        secrets: Arc<dyn SecretProvider>,
        fetcher: Arc<dyn RecordFetcher>,
        sink: Arc<dyn WarehouseSink>,
        notifier: Arc<dyn Notifier>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            secrets,
            fetcher,
            sink,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one invocation end-to-end over a raw trigger body.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn run(&self, body: &[u8]) -> Result<PipelineReport, PipelineError> {
        let notification = InboundNotification::parse(body)?;
        let record_id = notification.record_id;
        tracing::info!(record_id = %record_id, "processing change notification");

        let bundle =
            CredentialBundle::resolve(self.secrets.as_ref(), self.config.notifier_backend).await?;

        let record = self
            .fetcher
            .fetch(&bundle.crm, &record_id)
            .await
            .map_err(|source| PipelineError::Fetch {
                record_id: record_id.clone(),
                source,
            })?;

        let mut report = PipelineReport {
            record_id,
            record_name: record.name(),
            message_id: None,
            insert_error: None,
            send_error: None,
        };

        // Sink and notifier failures are recorded, not propagated: the
        // invocation still reports overall success.
        if let Err(err) = self.sink.insert(&record).await {
            tracing::error!(error = %err, "warehouse insert failed");
            report.insert_error = Some(err);
        }

        let message = render_message(&record, &self.config.recipients);
        match self.notifier.send(&message, &bundle.notifier).await {
            Ok(message_id) => {
                let notifier_id = self.notifier.id().await;
                tracing::info!(
                    notifier = notifier_id,
                    message_id = %message_id,
                    "notification sent"
                );
                report.message_id = Some(message_id);
            }
            Err(err) => {
                tracing::error!(error = %err, "notification send failed");
                report.send_error = Some(err);
            }
        }

        Ok(report)
    }
}
