//! HTTP transport abstraction.
//!
//! Defines the [`Transport`] trait and provides a `reqwest` implementation
//! ([`HttpTransport`]) plus a test mock (`mock::MockTransport`). The bridge
//! never picks a transport itself; the host application injects one.

mod http;
#[cfg(test)]
pub mod mock;

pub use http::{HttpTransport, HttpTransportConfig};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;

/// HTTP verbs the node API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP round trip returning parsed JSON.
///
/// Implementations must settle every request: a body that is not valid JSON
/// is an error, never a silent hang.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        url: &str,
        body: Option<&Value>,
        method: Method,
    ) -> Result<Value, CoreError>;
}

/// A transport bound to a host prefix and a method.
///
/// This is the call function capability groups are constructed from: they
/// only supply a path and an optional payload.
#[derive(Clone)]
pub struct HostCall {
    transport: Arc<dyn Transport>,
    host: Arc<str>,
    method: Method,
}

impl HostCall {
    pub fn new(transport: Arc<dyn Transport>, host: Arc<str>, method: Method) -> Self {
        Self {
            transport,
            host,
            method,
        }
    }

    /// Issue `method` against `host + path`. The path is not validated.
    pub async fn call(&self, path: &str, body: Option<&Value>) -> Result<Value, CoreError> {
        let url = format!("{}{}", self.host, path);
        self.transport.request(&url, body, self.method).await
    }
}

impl fmt::Debug for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCall")
            .field("host", &self.host)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
