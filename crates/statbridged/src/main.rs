//! statbridged — the statbridge daemon.
//!
//! Serves `/metrics` by scraping a runtime stats endpoint on every
//! request, plus its own stats on `/api/stats`.
//!
//! # Usage
//!
//! ```text
//! statbridged --listen :9696 --api-endpoint http://localhost:9696/api/stats
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use statbridge_fetch::StatsFetcher;
use statbridge_metrics::{Registry, StatsCollector};

#[derive(Parser, Debug)]
#[command(name = "statbridged", about = "Republish a runtime stats endpoint as Prometheus metrics")]
struct Cli {
    /// The address to listen on for HTTP requests (`:9696`, `127.0.0.1:9696` or `9696`).
    #[arg(long, visible_alias = "port", default_value = ":9696", value_parser = parse_listen_addr)]
    listen: SocketAddr,

    /// Stats endpoint fetched on every scrape.
    #[arg(long, alias = "apiendpoint", default_value = "http://localhost:9696/api/stats")]
    api_endpoint: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,statbridged=debug,statbridge=debug")
            }),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("statbridge daemon starting");

    // ── Initialize subsystems ──────────────────────────────────

    let fetcher = StatsFetcher::new(&cli.api_endpoint).context("invalid --api-endpoint")?;
    info!(source = %fetcher.url(), "stats fetcher initialized");

    let mut registry = Registry::new();
    registry
        .register(StatsCollector::new(fetcher))
        .context("failed to register stats collector")?;
    let router = statbridge_api::build_router(Arc::new(registry));

    // ── Start API server ───────────────────────────────────────

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;

    info!(addr = %cli.listen, "access to http://{}/metrics", cli.listen);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("statbridge daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Parse a listen address. A bare `:port` or `port` binds every interface.
fn parse_listen_addr(s: &str) -> Result<SocketAddr, String> {
    let s = s.trim();
    let port_only = s.strip_prefix(':').unwrap_or(s);
    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    s.parse::<SocketAddr>()
        .map_err(|e| format!("invalid listen address {s:?}: {e}"))
}
