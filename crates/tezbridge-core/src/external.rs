//! Read-only helpers against the tzscan v3 block explorer API.
//!
//! These calls use absolute URLs (no node host prefix) and GET only. The
//! explorer rejects a JSON `Content-Type`, which [`crate::transport::HttpTransport`]
//! omits for `tzscan.io/v3` URLs by default.

use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;

use crate::error::{CoreError, RpcError};
use crate::network::NetworkKind;
use crate::transport::{Method, Transport};

const MAINNET_BASE: &str = "https://api6.tzscan.io/v3";
const ALPHANET_BASE: &str = "https://api.alphanet.tzscan.io/v3";

#[derive(Clone)]
pub struct External {
    transport: Arc<dyn Transport>,
    network: NetworkKind,
}

impl External {
    pub fn new(transport: Arc<dyn Transport>, network: NetworkKind) -> Self {
        Self { transport, network }
    }

    pub fn network(&self) -> NetworkKind {
        self.network
    }

    pub fn base_url(&self) -> &'static str {
        match self.network {
            NetworkKind::Mainnet => MAINNET_BASE,
            NetworkKind::Alphanet => ALPHANET_BASE,
        }
    }

    /// Explorer URL for `segments` below the base path, with `query` pairs.
    /// Segments and values are percent-encoded.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, CoreError> {
        let base = self.base_url();
        let invalid = |reason: String| RpcError::InvalidUrl {
            url: base.to_owned(),
            reason,
        };
        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("base URL cannot take path segments".to_owned()))?
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Value, CoreError> {
        self.transport.request(url.as_str(), None, Method::Get).await
    }

    pub async fn head(&self) -> Result<Value, CoreError> {
        self.get(self.url(&["head"], &[])?).await
    }

    /// One page of `account`'s operations of `kind` (e.g. `Transaction`).
    pub async fn operations(
        &self,
        account: &str,
        kind: &str,
        page: u32,
        number: u32,
    ) -> Result<Value, CoreError> {
        let page = page.to_string();
        let number = number.to_string();
        let url = self.url(
            &["operations", account],
            &[("type", kind), ("p", &page), ("number", &number)],
        )?;
        self.get(url).await
    }

    pub async fn number_operations(&self, account: &str, kind: &str) -> Result<Value, CoreError> {
        let url = self.url(&["number_operations", account], &[("type", kind)])?;
        self.get(url).await
    }
}

impl std::fmt::Debug for External {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("External")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
