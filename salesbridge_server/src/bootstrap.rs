//! One-time Gmail OAuth bootstrap.
//!
//! Runs the installed-app loopback consent flow and returns the refresh
//! token the operator must store as the `gmail-refresh-token` secret. This
//! never runs inside a pipeline invocation.

use axum::extract::Query;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    refresh_token: Option<String>,
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn run_gmail_consent_flow(
    client_id: &str,
    client_secret: &str,
    port: u16,
) -> anyhow::Result<String> {
    let redirect_uri = format!("http://127.0.0.1:{port}");
    let consent_url = reqwest::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )?;

    println!("Open this URL in your browser and approve access:\n\n{consent_url}\n");

    let code = wait_for_code(port).await?;

    let client = reqwest::Client::new();
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", code.as_str()),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri.as_str()),
    ];
    let resp = client.post(TOKEN_URL).form(&params).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("authorization code exchange failed: status={status} body={body}");
    }
    let token: TokenResponse = resp.json().await?;
    token.refresh_token.ok_or_else(|| {
        anyhow::anyhow!("token response carried no refresh_token (re-run and approve consent)")
    })
}

/// Serve the loopback redirect until Google delivers the authorization code.
async fn wait_for_code(port: u16) -> anyhow::Result<String> {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(1);

    let app = Router::new().route(
        "/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let tx = tx.clone();
            async move {
                match params.get("code") {
                    Some(code) => {
                        let _ = tx.send(code.clone()).await;
                        "Authorization received. You can close this tab."
                    }
                    None => "Authorization response carried no `code` parameter.",
                }
            }
        }),
    );

    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let code = rx
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("loopback listener closed before receiving a code"))?;
    server.abort();
    Ok(code)
}
