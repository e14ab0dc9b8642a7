//! Relay service: accepts one JSON-described HTTP request on `POST /send`,
//! executes it upstream, and returns the outcome as `{status, size, body}`.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use url::{Host, Url};

/// Upstream response bodies are truncated past this many bytes.
const MAX_CAPTURED_BODY: usize = 200_000;
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_REDIRECTS: usize = 3;

/// One request to execute, as posted by a dispatch client.
///
/// Mirrors `volley_core::RelayPayload` on the wire; the two types are kept
/// separate so each side owns its schema, and the end-to-end tests catch
/// drift between them.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub method: String,
    pub url: String,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<String>,

    // Accepted for wire compatibility; result forwarding is not supported.
    pub user_mongo_uri: Option<String>,
    pub user_db: Option<String>,
    pub user_collection: Option<String>,
}

impl SendRequest {
    fn wants_persistence(&self) -> bool {
        self.user_mongo_uri.is_some() || self.user_db.is_some() || self.user_collection.is_some()
    }
}

/// Outcome of the upstream exchange, returned verbatim to the caller.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: u16,
    pub size: u64,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Permit requests whose target is this machine. Off by default; test
    /// rigs that spin up local origin servers turn it on.
    pub allow_local_targets: bool,
}

#[derive(Clone)]
struct RelayState {
    client: reqwest::Client,
    config: RelayConfig,
}

pub fn app(config: RelayConfig) -> anyhow::Result<Router> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .context("failed to build upstream client")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/send", post(send))
        .with_state(RelayState { client, config })
        .layer(cors))
}

pub async fn run(listener: TcpListener, config: RelayConfig) -> anyhow::Result<()> {
    axum::serve(listener, app(config)?).await?;
    Ok(())
}

async fn send(
    State(state): State<RelayState>,
    Json(payload): Json<SendRequest>,
) -> Result<Json<SendResponse>, (StatusCode, String)> {
    let parsed = Url::parse(&payload.url)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid target URL".to_string()))?;

    if !state.config.allow_local_targets && targets_local_host(&parsed) {
        return Err((
            StatusCode::FORBIDDEN,
            "Requests to local/private hosts are not allowed".to_string(),
        ));
    }

    let method = payload.method.to_uppercase();
    let mut req = match method.as_str() {
        "GET" => state.client.get(parsed.as_str()),
        "POST" => state.client.post(parsed.as_str()),
        "PUT" => state.client.put(parsed.as_str()),
        "DELETE" => state.client.delete(parsed.as_str()),
        "PATCH" => state.client.patch(parsed.as_str()),
        _ => return Err((StatusCode::BAD_REQUEST, "Invalid method".to_string())),
    };

    if let Some(headers) = &payload.headers {
        for (k, v) in headers {
            // header validation left to reqwest
            req = req.header(k, v);
        }
    }

    if let Some(b) = &payload.body {
        req = req.body(b.clone());
    }

    if payload.wants_persistence() {
        println!("ignoring persistence fields: result forwarding is not supported");
    }

    let upstream = req
        .send()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("Upstream error: {e}")))?;

    let status = upstream.status().as_u16();
    let size = upstream.content_length().unwrap_or(0);
    let body = match upstream.text().await {
        Ok(text) => cap_body(text),
        Err(_) => String::new(),
    };

    Ok(Json(SendResponse { status, size, body }))
}

/// True for targets that trivially resolve to this machine: loopback and
/// unspecified addresses, `localhost`, and mDNS `.local` names.
fn targets_local_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let d = domain.to_lowercase();
            d == "localhost" || d.ends_with(".local")
        }
        Some(Host::Ipv4(addr)) => addr.is_loopback() || addr.is_unspecified(),
        Some(Host::Ipv6(addr)) => addr.is_loopback() || addr.is_unspecified(),
        None => false,
    }
}

/// Truncate to `MAX_CAPTURED_BODY` bytes without splitting a UTF-8 character.
fn cap_body(mut text: String) -> String {
    if text.len() > MAX_CAPTURED_BODY {
        let mut end = MAX_CAPTURED_BODY;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
