mod api;
mod config;
mod constants;

use anyhow::Context;
use chain_core::chain::{Chain, Genesis};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let chain = Chain::in_memory();
    if args.genesis_on_start {
        if let Genesis::Created(block) = chain.ensure_genesis()? {
            info!(hash = %block.hash(), "genesis created at startup");
        }
    }

    let state = AppState {
        name: args.name.clone(),
        chain,
    };
    let app = api::router(state);

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("{} listening on http://{addr}", args.name);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown signal received");
}
