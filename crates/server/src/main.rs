mod config;
mod dataset;
mod rpc;
mod tools;
mod validate;

use std::sync::Arc;

use chrono::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackside::cache::SystemClock;
use trackside::query::QueryEngine;

use config::Config;
use dataset::FileDatasetProvider;
use tools::ToolHandler;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Stdout carries the RPC stream, so all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(data_dir = %config.data_dir.display(), ttl_hours = config.cache_ttl_hours, "starting");

    let provider = Arc::new(FileDatasetProvider::new(config.data_dir.clone()));
    let engine = QueryEngine::new(
        provider,
        Arc::new(SystemClock),
        Duration::hours(config.cache_ttl_hours),
    );

    rpc::serve(ToolHandler::new(engine, config.bounds)).await
}
