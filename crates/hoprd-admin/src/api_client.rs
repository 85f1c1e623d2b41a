//! HTTP client for the node API.
//!
//! Non-2xx responses are decoded from the `{status, error}` body and
//! surfaced as [`HoprdError::ApiError`]; connection failures as
//! [`HoprdError::NetworkError`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use hoprd_network::{PingReply, Pinger};
use hoprd_types::{HoprdError, PeerId, Result};

const API_PREFIX: &str = "/api/v3";
const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Deserialize)]
struct ErrorBody {
    status: String,
    error: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PingBody {
    latency: Option<i64>,
    #[serde(default)]
    timed_out: bool,
}

/// Thin wrapper over `reqwest` bound to one node.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(endpoint: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HoprdError::ConfigError {
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base: format!("{}{API_PREFIX}", endpoint.trim_end_matches('/')),
            token,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(|e| HoprdError::NetworkError {
            reason: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<ErrorBody>().await {
                Ok(body) => format!("{} ({})", body.error, body.status),
                Err(_) => format!("unexpected status {status}"),
            };
            return Err(HoprdError::ApiError { reason });
        }

        response.json::<T>().await.map_err(|e| HoprdError::ApiError {
            reason: format!("malformed response from {url}: {e}"),
        })
    }

    pub async fn balances(&self) -> Result<serde_json::Value> {
        self.get("/account/balances").await
    }

    pub async fn node_info(&self) -> Result<serde_json::Value> {
        self.get("/node/info").await
    }

    pub async fn aliases(&self) -> Result<BTreeMap<String, String>> {
        self.get("/aliases").await
    }
}

// ---------------------------------------------------------------------------
// HttpPinger
// ---------------------------------------------------------------------------

/// [`Pinger`] that asks the node to ping on the operator's behalf.
pub struct HttpPinger {
    client: ApiClient,
}

impl HttpPinger {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Pinger for HttpPinger {
    async fn ping(&self, peer: &PeerId) -> Result<PingReply> {
        let body: PingBody = self.client.get(&format!("/peers/{peer}/ping")).await?;
        match body.latency {
            Some(latency_ms) => Ok(PingReply::Pong { latency_ms }),
            None if body.timed_out => Ok(PingReply::TimedOut),
            None => Err(HoprdError::ApiError {
                reason: "ping response carries neither latency nor timeout".into(),
            }),
        }
    }
}
