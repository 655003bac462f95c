//! Protocol registry and capability-group interfaces.
//!
//! Every protocol the bridge can speak is a [`Protocol`] variant. Each variant
//! maps, through an exhaustive `match`, to three factories that build its
//! read ([`FetchApi`]), write ([`SubmitApi`]) and mixed ([`MixedApi`])
//! capability groups. Mixed groups are built from the read/write groups and
//! never touch the transport directly.

pub mod psddfki3;
pub mod types;

pub use types::{BlockProtocols, ForgedOperation, OperationHeader};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;
use crate::transport::HostCall;

// ==============================================================================
// Capability Groups
// ==============================================================================

/// Read calls (GET).
#[async_trait]
pub trait FetchApi: Send + Sync {
    async fn head(&self) -> Result<Value, CoreError>;

    async fn head_hash(&self) -> Result<String, CoreError>;

    async fn header(&self) -> Result<Value, CoreError>;

    async fn protocols(&self) -> Result<BlockProtocols, CoreError>;

    async fn constants(&self) -> Result<Value, CoreError>;

    async fn contract(&self, contract: &str) -> Result<Value, CoreError>;

    /// Balance in mutez.
    async fn balance(&self, contract: &str) -> Result<u64, CoreError>;

    async fn counter(&self, contract: &str) -> Result<u64, CoreError>;

    async fn manager_key(&self, contract: &str) -> Result<Value, CoreError>;

    async fn storage(&self, contract: &str) -> Result<Value, CoreError>;
}

/// Write calls (POST).
#[async_trait]
pub trait SubmitApi: Send + Sync {
    /// Returns the forged bytes, hex encoded.
    async fn forge_operation(&self, operation: &Value) -> Result<String, CoreError>;

    async fn run_operation(&self, operation: &Value) -> Result<Value, CoreError>;

    async fn preapply_operations(&self, operations: &Value) -> Result<Value, CoreError>;

    async fn pack_data(&self, data: &Value, ty: &Value) -> Result<Value, CoreError>;

    /// Injects signed bytes and returns the operation hash.
    async fn inject_operation(&self, signed_bytes: &str) -> Result<String, CoreError>;
}

/// Calls composed from reads and writes.
#[async_trait]
pub trait MixedApi: Send + Sync {
    async fn operation_header(&self, source: &str) -> Result<OperationHeader, CoreError>;

    async fn forge(
        &self,
        source: &str,
        contents: Vec<Value>,
    ) -> Result<ForgedOperation, CoreError>;

    async fn inject(
        &self,
        forged: &ForgedOperation,
        signature: &str,
        signed_bytes: &str,
    ) -> Result<String, CoreError>;
}

/// The three capability groups of one protocol, bound to one host.
#[derive(Clone)]
pub struct Capabilities {
    pub protocol: Protocol,
    pub fetch: Arc<dyn FetchApi>,
    pub submit: Arc<dyn SubmitApi>,
    pub mixed: Arc<dyn MixedApi>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

// ==============================================================================
// Registry
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    PsddFKi3,
}

/// Constructors for one protocol's capability groups.
#[derive(Clone, Copy)]
pub struct ProtocolFactories {
    pub gets: fn(HostCall) -> Arc<dyn FetchApi>,
    pub posts: fn(HostCall) -> Arc<dyn SubmitApi>,
    pub mixed: fn(Arc<dyn FetchApi>, Arc<dyn SubmitApi>) -> Arc<dyn MixedApi>,
}

impl Protocol {
    pub const DEFAULT: Protocol = Protocol::PsddFKi3;

    pub const ALL: &'static [Protocol] = &[Protocol::PsddFKi3];

    pub fn id(self) -> &'static str {
        match self {
            Self::PsddFKi3 => "PsddFKi3",
        }
    }

    pub fn factories(self) -> ProtocolFactories {
        match self {
            Self::PsddFKi3 => ProtocolFactories {
                gets: psddfki3::gets,
                posts: psddfki3::posts,
                mixed: psddfki3::mixed,
            },
        }
    }

    /// Build this protocol's capability groups from bound GET/POST calls.
    pub fn bind(self, gets: HostCall, posts: HostCall) -> Capabilities {
        let factories = self.factories();
        let fetch = (factories.gets)(gets);
        let submit = (factories.posts)(posts);
        let mixed = (factories.mixed)(Arc::clone(&fetch), Arc::clone(&submit));
        Capabilities {
            protocol: self,
            fetch,
            submit,
            mixed,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Protocol {
    type Err = CoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|protocol| protocol.id() == name)
            .ok_or_else(|| CoreError::UnknownProtocol(name.to_owned()))
    }
}

// ==============================================================================
// Response Parsing
// ==============================================================================

/// Parse a numeric value the node encodes as a JSON string (mutez, counters).
pub(crate) fn parse_string_u64(value: &Value, field: &str) -> Result<u64, CoreError> {
    let text = value
        .as_str()
        .ok_or_else(|| CoreError::InvalidData(format!("{field}: expected a string, got {value}")))?;
    text.parse()
        .map_err(|e| CoreError::InvalidData(format!("{field}: invalid number `{text}`: {e}")))
}

pub(crate) fn parse_string(value: Value, field: &str) -> Result<String, CoreError> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(CoreError::InvalidData(format!(
            "{field}: expected a string, got {other}"
        ))),
    }
}
