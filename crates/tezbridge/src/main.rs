mod cli;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::{json, Value};

use tezbridge_core::{Bridge, BridgeConfig, HttpTransport, HttpTransportConfig};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let transport = HttpTransport::with_config(HttpTransportConfig {
        timeout_secs: args.timeout_secs,
        ..HttpTransportConfig::default()
    })
    .wrap_err("build HTTP transport")?;

    let config = BridgeConfig {
        host: args.host.clone(),
        protocol: args.protocol.clone(),
    };
    let bridge = Bridge::new(config, Arc::new(transport)).wrap_err("configure bridge")?;
    tracing::debug!(?bridge, "bridge ready");

    let output = run(&bridge, args.command)
        .await
        .wrap_err_with(|| format!("while calling `{}`", args.host))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(bridge: &Bridge, command: Command) -> eyre::Result<Value> {
    let output = match command {
        Command::Get { path } => bridge.get(&path, None).await?,
        Command::Post { path, json } => {
            let payload: Value = serde_json::from_str(&json)
                .map_err(|e| eyre!("payload is not valid JSON: {e}"))?;
            bridge.post(&path, &payload).await?
        }
        Command::Head => bridge.fetch().head().await?,
        Command::Balance { contract } => json!(bridge.fetch().balance(&contract).await?),
        Command::Counter { contract } => json!(bridge.fetch().counter(&contract).await?),
        Command::Network => json!({
            "host": bridge.host(),
            "network": bridge.network(),
            "protocol": bridge.protocol().id(),
        }),
    };
    Ok(output)
}
