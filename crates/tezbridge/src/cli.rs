use clap::{Parser, Subcommand};

/// tezbridge: issue JSON RPC calls against a Tezos node.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node base URL; request paths are appended to it verbatim.
    #[arg(long, env = "TEZBRIDGE_HOST")]
    pub host: String,

    /// Protocol whose call definitions to use.
    #[arg(long, env = "TEZBRIDGE_PROTOCOL")]
    pub protocol: Option<String>,

    /// Whole-request timeout in seconds (no timeout if omitted).
    #[arg(long, env = "TEZBRIDGE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// GET a raw path, e.g. `/chains/main/blocks/head/header`.
    Get { path: String },

    /// POST a JSON payload to a raw path.
    Post { path: String, json: String },

    /// Current head block.
    Head,

    /// Balance of a contract, in mutez.
    Balance { contract: String },

    /// Counter of a contract.
    Counter { contract: String },

    /// Network kind and protocol the bridge resolves for this host.
    Network,
}
