use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{failure_response, SUCCESS_BODY};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_ms: u128,
}

#[tracing::instrument(level = "debug", skip_all)]
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_ms: state.started_at.elapsed().as_millis(),
    })
}

/// Trigger endpoint: one pipeline invocation per request.
///
/// The body is taken raw rather than through the `Json` extractor so that
/// malformed payloads reach the parser stage and come back classified.
#[tracing::instrument(level = "info", skip_all)]
pub async fn trigger(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    match state.pipeline.run(&body).await {
        Ok(report) => {
            tracing::info!(
                record_id = %report.record_id,
                insert_failed = report.insert_error.is_some(),
                send_failed = report.send_error.is_some(),
                "pipeline invocation finished"
            );
            (StatusCode::OK, SUCCESS_BODY.to_string())
        }
        Err(err) => {
            tracing::error!(error = %err, "pipeline invocation failed");
            failure_response(&err)
        }
    }
}
