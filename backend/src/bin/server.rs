//! Capacity planner HTTP server binary.
//!
//! # Usage
//!
//! ```bash
//! JIRA_BASE_URL=https://example.atlassian.net \
//! JIRA_USER=bot@example.com JIRA_API_TOKEN=... \
//!   cargo run --bin capacity-server
//!
//! # or with a TOML file
//! CAPACITY_CONFIG=capacity.toml cargo run --bin capacity-server
//! ```
//!
//! See [`capacity_planner::config`] for every setting. `RUST_LOG` sets the
//! log level (default: info).

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use capacity_planner::config::AppConfig;
use capacity_planner::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting capacity planner v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        "Issue source: {}, baseline directory: {}",
        config.jira.base_url.as_deref().unwrap_or("in-memory"),
        config.storage.baseline_dir.display()
    );

    let state = AppState::from_config(&config).context("Failed to create issue source client")?;
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
