//! Capability groups for protocol `PsddFKi3` (Tezos protocol 003).

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join3;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::transport::HostCall;

use super::types::{BlockProtocols, ForgedOperation, OperationHeader};
use super::{parse_string, parse_string_u64, FetchApi, MixedApi, SubmitApi};

const HEAD: &str = "/chains/main/blocks/head";

pub fn gets(call: HostCall) -> Arc<dyn FetchApi> {
    Arc::new(Gets::new(call))
}

pub fn posts(call: HostCall) -> Arc<dyn SubmitApi> {
    Arc::new(Posts::new(call))
}

pub fn mixed(fetch: Arc<dyn FetchApi>, submit: Arc<dyn SubmitApi>) -> Arc<dyn MixedApi> {
    Arc::new(Mixed::new(fetch, submit))
}

fn contract_path(contract: &str, suffix: &str) -> String {
    format!("{HEAD}/context/contracts/{contract}{suffix}")
}

// ==============================================================================
// Gets
// ==============================================================================

pub struct Gets {
    call: HostCall,
}

impl Gets {
    pub fn new(call: HostCall) -> Self {
        Self { call }
    }

    async fn get(&self, path: &str) -> Result<Value, CoreError> {
        self.call.call(path, None).await
    }
}

#[async_trait]
impl FetchApi for Gets {
    async fn head(&self) -> Result<Value, CoreError> {
        self.get(HEAD).await
    }

    async fn head_hash(&self) -> Result<String, CoreError> {
        let raw = self.get(&format!("{HEAD}/hash")).await?;
        parse_string(raw, "head hash")
    }

    async fn header(&self) -> Result<Value, CoreError> {
        self.get(&format!("{HEAD}/header")).await
    }

    async fn protocols(&self) -> Result<BlockProtocols, CoreError> {
        let raw = self.get(&format!("{HEAD}/protocols")).await?;
        serde_json::from_value(raw)
            .map_err(|e| CoreError::InvalidData(format!("invalid protocols result: {e}")))
    }

    async fn constants(&self) -> Result<Value, CoreError> {
        self.get(&format!("{HEAD}/context/constants")).await
    }

    async fn contract(&self, contract: &str) -> Result<Value, CoreError> {
        self.get(&contract_path(contract, "")).await
    }

    async fn balance(&self, contract: &str) -> Result<u64, CoreError> {
        let raw = self.get(&contract_path(contract, "/balance")).await?;
        parse_string_u64(&raw, "balance")
    }

    async fn counter(&self, contract: &str) -> Result<u64, CoreError> {
        let raw = self.get(&contract_path(contract, "/counter")).await?;
        parse_string_u64(&raw, "counter")
    }

    async fn manager_key(&self, contract: &str) -> Result<Value, CoreError> {
        self.get(&contract_path(contract, "/manager_key")).await
    }

    async fn storage(&self, contract: &str) -> Result<Value, CoreError> {
        self.get(&contract_path(contract, "/storage")).await
    }
}

// ==============================================================================
// Posts
// ==============================================================================

pub struct Posts {
    call: HostCall,
}

impl Posts {
    pub fn new(call: HostCall) -> Self {
        Self { call }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CoreError> {
        self.call.call(path, Some(body)).await
    }
}

#[async_trait]
impl SubmitApi for Posts {
    async fn forge_operation(&self, operation: &Value) -> Result<String, CoreError> {
        let raw = self
            .post(&format!("{HEAD}/helpers/forge/operations"), operation)
            .await?;
        parse_string(raw, "forged operation")
    }

    async fn run_operation(&self, operation: &Value) -> Result<Value, CoreError> {
        self.post(&format!("{HEAD}/helpers/scripts/run_operation"), operation)
            .await
    }

    async fn preapply_operations(&self, operations: &Value) -> Result<Value, CoreError> {
        self.post(&format!("{HEAD}/helpers/preapply/operations"), operations)
            .await
    }

    async fn pack_data(&self, data: &Value, ty: &Value) -> Result<Value, CoreError> {
        let body = json!({ "data": data, "type": ty });
        self.post(&format!("{HEAD}/helpers/scripts/pack_data"), &body)
            .await
    }

    async fn inject_operation(&self, signed_bytes: &str) -> Result<String, CoreError> {
        let raw = self
            .post("/injection/operation", &Value::String(signed_bytes.to_owned()))
            .await?;
        parse_string(raw, "operation hash")
    }
}

// ==============================================================================
// Mixed
// ==============================================================================

pub struct Mixed {
    fetch: Arc<dyn FetchApi>,
    submit: Arc<dyn SubmitApi>,
}

impl Mixed {
    pub fn new(fetch: Arc<dyn FetchApi>, submit: Arc<dyn SubmitApi>) -> Self {
        Self { fetch, submit }
    }
}

#[async_trait]
impl MixedApi for Mixed {
    async fn operation_header(&self, source: &str) -> Result<OperationHeader, CoreError> {
        let (branch, protocols, counter) = try_join3(
            self.fetch.head_hash(),
            self.fetch.protocols(),
            self.fetch.counter(source),
        )
        .await?;

        Ok(OperationHeader {
            branch,
            protocol: protocols.next_protocol,
            counter,
        })
    }

    async fn forge(
        &self,
        source: &str,
        contents: Vec<Value>,
    ) -> Result<ForgedOperation, CoreError> {
        let header = self.operation_header(source).await?;
        let contents = assign_counters(contents, header.counter)?;
        debug!(
            source,
            branch = %header.branch,
            operations = contents.len(),
            "forging operation"
        );

        let bytes = self
            .submit
            .forge_operation(&json!({ "branch": header.branch, "contents": contents }))
            .await?;

        Ok(ForgedOperation {
            branch: header.branch,
            protocol: header.protocol,
            contents,
            bytes,
        })
    }

    async fn inject(
        &self,
        forged: &ForgedOperation,
        signature: &str,
        signed_bytes: &str,
    ) -> Result<String, CoreError> {
        let preapply = json!([{
            "protocol": forged.protocol,
            "branch": forged.branch,
            "contents": forged.contents,
            "signature": signature,
        }]);
        self.submit.preapply_operations(&preapply).await?;
        self.submit.inject_operation(signed_bytes).await
    }
}

/// Give every manager operation (one with a `source`) lacking a counter the
/// next counter after `current`, in order.
fn assign_counters(mut contents: Vec<Value>, current: u64) -> Result<Vec<Value>, CoreError> {
    let mut next = current;
    for (index, content) in contents.iter_mut().enumerate() {
        let object = content.as_object_mut().ok_or_else(|| {
            CoreError::InvalidData(format!("operation content #{index} is not an object"))
        })?;
        if !object.contains_key("source") || object.contains_key("counter") {
            continue;
        }
        next = next.checked_add(1).ok_or_else(|| {
            CoreError::InvalidData(format!("counter overflow after {current}"))
        })?;
        object.insert("counter".to_owned(), Value::String(next.to_string()));
    }
    Ok(contents)
}
