//! Typed results of capability-group calls.
//!
//! Most node responses are passed through as `serde_json::Value`; this module
//! only defines the shapes that mixed calls need to reason about.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==============================================================================
// Reads
// ==============================================================================

/// Result of `/chains/main/blocks/head/protocols`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockProtocols {
    pub protocol: String,
    pub next_protocol: String,
}

// ==============================================================================
// Mixed
// ==============================================================================

/// Everything a manager operation needs from the chain before forging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationHeader {
    /// Head block hash, used as the operation branch.
    pub branch: String,
    /// Protocol the operation will be applied under.
    pub protocol: String,
    /// Current counter of the source account.
    pub counter: u64,
}

/// An operation forged by the node but not yet signed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForgedOperation {
    pub branch: String,
    pub protocol: String,
    /// Contents as sent to the forge call, counters included.
    pub contents: Vec<Value>,
    /// Forged bytes, hex encoded.
    pub bytes: String,
}
