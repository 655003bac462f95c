use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{CoreError, RpcError};

use super::{Method, Transport};

/// URL fragment of the explorer API that rejects a JSON `Content-Type`.
const TZSCAN_V3_PATTERN: &str = "tzscan.io/v3";

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpTransportConfig {
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. `None` waits for the node indefinitely.
    pub timeout_secs: Option<u64>,
    /// URL substrings for which no `Content-Type` header is sent.
    pub plain_hosts: Vec<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: None,
            plain_hosts: vec![TZSCAN_V3_PATTERN.to_owned()],
        }
    }
}

/// JSON-over-HTTP(S) transport backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    plain_hosts: Vec<String>,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_config(HttpTransportConfig::default())
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_nodelay(true);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(RpcError::Transport)?;

        Ok(Self {
            client,
            plain_hosts: config.plain_hosts,
            next_id: AtomicU64::new(1),
        })
    }

    fn sends_content_type(&self, url: &str) -> bool {
        !self
            .plain_hosts
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        url: &str,
        body: Option<&Value>,
        method: Method,
    ) -> Result<Value, CoreError> {
        let parsed = parse_request_url(url)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(http.id = id, http.method = %method, http.url = url, "transport request");

        let mut builder = match method {
            Method::Get => self.client.get(parsed),
            Method::Post => self.client.post(parsed),
        };
        if self.sends_content_type(url) {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        match (method, body) {
            (Method::Post, Some(body)) => {
                let encoded = serde_json::to_string(body).map_err(RpcError::InvalidRequest)?;
                builder = builder.body(encoded);
            }
            (Method::Get, Some(_)) => {
                trace!(http.id = id, "GET payload ignored");
            }
            (_, None) => {}
        }

        let response = builder.send().await.map_err(RpcError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(RpcError::Transport)?;
        debug!(http.id = id, %status, body_len = text.len(), "transport response");
        trace!(http.id = id, body = %text, "transport response body");

        if !status.is_success() {
            return Err(RpcError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(
                http.id = id,
                http.url = url,
                error = %e,
                body = %text,
                "RPC result JSON parse error"
            );
            RpcError::InvalidResponse(format!("decode JSON response: {e}; body={text}")).into()
        })
    }
}

fn parse_request_url(url: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(url).map_err(|e| RpcError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(RpcError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme `{other}`; expected http or https"),
        }
        .into()),
    }
}
