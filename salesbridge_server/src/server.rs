use axum::routing::{get, post};
use axum::{Extension, Router};
use salesbridge_core::config::{NotifierBackend, PipelineConfig};
use salesbridge_core::pipeline::Pipeline;
use salesbridge_core::traits::{Notifier, RecordFetcher, SecretProvider, WarehouseSink};
use salesbridge_integrations::{
    BigQuerySink, GmailNotifier, GoogleTokenSource, SalesforceFetcher, SecretManagerProvider,
    SendGridNotifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::routes;

pub struct AppState {
    pub pipeline: Pipeline,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
        }
    }

    /// Wire the production integrations for `config`. Clients are built once
    /// here and shared across invocations; credentials are resolved per
    /// invocation inside the pipeline.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_config(config: PipelineConfig) -> Self {
        let tokens = GoogleTokenSource::new();
        let secrets: Arc<dyn SecretProvider> = Arc::new(SecretManagerProvider::new(
            config.project_id.clone(),
            tokens.clone(),
        ));
        let fetcher: Arc<dyn RecordFetcher> = Arc::new(SalesforceFetcher::new());
        let sink: Arc<dyn WarehouseSink> = Arc::new(BigQuerySink::new(
            config.project_id.clone(),
            config.dataset_id.clone(),
            config.table_id.clone(),
            tokens,
        ));
        let notifier: Arc<dyn Notifier> = match config.notifier_backend {
            NotifierBackend::SendGrid => Arc::new(SendGridNotifier::new(config.from_email.clone())),
            NotifierBackend::Gmail => Arc::new(GmailNotifier::new(config.from_email.clone())),
        };
        Self::new(Pipeline::new(secrets, fetcher, sink, notifier, config))
    }
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(routes::trigger))
        .route("/health", get(routes::health))
        .layer(Extension(state))
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "salesbridge trigger endpoint listening");
    axum::serve(listener, app).await?;
    Ok(())
}
