//! BigQuery warehouse sink (`tabledata.insertAll`).
//!
//! The target table must already exist with a schema accepting the record's
//! business fields; the sink never creates or alters schema. Rows carry no
//! `insertId`, so a retried webhook delivery appends a distinct row.

use async_trait::async_trait;
use reqwest::Client;
use salesbridge_core::error::InsertError;
use salesbridge_core::record::CrmRecord;
use salesbridge_core::traits::WarehouseSink;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::instrument;

use crate::google_auth::GoogleTokenSource;

#[derive(Debug, Serialize)]
struct InsertAllRequest {
    kind: &'static str,
    rows: Vec<InsertRow>,
}

#[derive(Debug, Serialize)]
struct InsertRow {
    json: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct InsertAllResponse {
    #[serde(rename = "insertErrors", default)]
    insert_errors: Vec<RowInsertError>,
}

#[derive(Debug, Deserialize)]
struct RowInsertError {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    errors: Vec<RowErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct RowErrorDetail {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

pub struct BigQuerySink {
    client: Client,
    tokens: GoogleTokenSource,
    project_id: String,
    dataset_id: String,
    table_id: String,
    api_base: String,
}

impl BigQuerySink {
    pub fn new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
        tokens: GoogleTokenSource,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            client,
            tokens,
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
            api_base: "https://bigquery.googleapis.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

#[async_trait]
impl WarehouseSink for BigQuerySink {
    #[instrument(level = "info", skip(self, record))]
    async fn insert(&self, record: &CrmRecord) -> Result<(), InsertError> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| InsertError::Request(e.to_string()))?;
        let url = format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.api_base, self.project_id, self.dataset_id, self.table_id
        );
        let body = InsertAllRequest {
            kind: "bigquery#tableDataInsertAllRequest",
            rows: vec![InsertRow {
                json: record.business_fields(),
            }],
        };
        let resp = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| InsertError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(InsertError::Request(format!(
                "insertAll status={status} body={}",
                text.chars().take(500).collect::<String>()
            )));
        }
        let parsed: InsertAllResponse = resp
            .json()
            .await
            .map_err(|e| InsertError::Request(e.to_string()))?;
        let messages = row_error_messages(&parsed);
        if !messages.is_empty() {
            return Err(InsertError::RowErrors(messages));
        }
        tracing::info!(
            dataset = %self.dataset_id,
            table = %self.table_id,
            "row appended to warehouse table"
        );
        Ok(())
    }
}

fn row_error_messages(resp: &InsertAllResponse) -> Vec<String> {
    resp.insert_errors
        .iter()
        .flat_map(|row| {
            row.errors
                .iter()
                .map(move |e| format!("row {}: {} ({})", row.index, e.message, e.reason))
        })
        .collect()
}
