use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::external::External;
use crate::network::NetworkKind;
use crate::protocol::{Capabilities, FetchApi, MixedApi, Protocol, SubmitApi};
use crate::transport::{HostCall, Method, Transport};

/// Construction parameters for [`Bridge`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    /// Node base URL; paths are appended verbatim.
    pub host: String,
    /// Protocol id. Defaults to [`Protocol::DEFAULT`].
    #[serde(default)]
    pub protocol: Option<String>,
}

impl BridgeConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            protocol: None,
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }
}

/// Façade over one Tezos node.
///
/// Holds the host, the network kind derived from it, the injected transport
/// and the active protocol's capability groups. Accessors hand out `Arc`
/// snapshots: a group obtained before [`Bridge::switch_protocol`] keeps
/// talking the old protocol.
#[derive(Clone)]
pub struct Bridge {
    host: Arc<str>,
    network: NetworkKind,
    transport: Arc<dyn Transport>,
    active: Capabilities,
    external: External,
}

impl Bridge {
    pub fn new(config: BridgeConfig, transport: Arc<dyn Transport>) -> Result<Self, CoreError> {
        if config.host.is_empty() {
            return Err(CoreError::MissingHost);
        }
        let protocol = match config.protocol.as_deref() {
            Some(name) => name.parse::<Protocol>()?,
            None => Protocol::DEFAULT,
        };

        let host: Arc<str> = Arc::from(config.host);
        let network = NetworkKind::from_host(&host);
        let active = bind(&transport, &host, protocol);
        let external = External::new(Arc::clone(&transport), network);
        debug!(%host, %network, %protocol, "bridge constructed");

        Ok(Self {
            host,
            network,
            transport,
            active,
            external,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn network(&self) -> NetworkKind {
        self.network
    }

    pub fn protocol(&self) -> Protocol {
        self.active.protocol
    }

    pub fn capabilities(&self) -> Capabilities {
        self.active.clone()
    }

    pub fn fetch(&self) -> Arc<dyn FetchApi> {
        Arc::clone(&self.active.fetch)
    }

    pub fn submit(&self) -> Arc<dyn SubmitApi> {
        Arc::clone(&self.active.submit)
    }

    pub fn mixed(&self) -> Arc<dyn MixedApi> {
        Arc::clone(&self.active.mixed)
    }

    pub fn external(&self) -> &External {
        &self.external
    }

    pub async fn get(&self, path: &str, data: Option<&Value>) -> Result<Value, CoreError> {
        self.host_call(Method::Get).call(path, data).await
    }

    pub async fn post(&self, path: &str, data: &Value) -> Result<Value, CoreError> {
        self.host_call(Method::Post).call(path, Some(data)).await
    }

    /// Replace all three capability groups with those of `name`.
    ///
    /// An unknown name fails before anything is replaced.
    pub fn switch_protocol(&mut self, name: &str) -> Result<(), CoreError> {
        let protocol: Protocol = name.parse()?;
        self.active = bind(&self.transport, &self.host, protocol);
        info!(host = %self.host, %protocol, "switched protocol");
        Ok(())
    }

    /// A bridge on `name`, leaving `self` untouched.
    pub fn with_protocol(&self, name: &str) -> Result<Self, CoreError> {
        let mut next = self.clone();
        next.switch_protocol(name)?;
        Ok(next)
    }

    fn host_call(&self, method: Method) -> HostCall {
        HostCall::new(Arc::clone(&self.transport), Arc::clone(&self.host), method)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("host", &self.host)
            .field("network", &self.network)
            .field("protocol", &self.active.protocol)
            .finish_non_exhaustive()
    }
}

fn bind(transport: &Arc<dyn Transport>, host: &Arc<str>, protocol: Protocol) -> Capabilities {
    protocol.bind(
        HostCall::new(Arc::clone(transport), Arc::clone(host), Method::Get),
        HostCall::new(Arc::clone(transport), Arc::clone(host), Method::Post),
    )
}
