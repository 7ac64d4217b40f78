//! Storefront API server entry point.
//!
//! # Responsibility
//! - Wire configuration, logging, storage and the ranking gateway into a
//!   running axum server.
//!
//! # Invariants
//! - The gateway's blocking HTTP client is constructed before the async
//!   runtime starts; handlers only touch it through blocking threads.

use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use vitrine_api::{build_router, ApiConfig, AppState, SharedState};
use vitrine_core::db::open_db;
use vitrine_core::{default_log_level, init_logging, HttpRecommendationGateway};

fn main() {
    let config = ApiConfig::parse();
    if let Err(message) = run(config) {
        eprintln!("vitrine_api: {message}");
        std::process::exit(1);
    }
}

fn run(config: ApiConfig) -> Result<(), String> {
    let log_dir = config
        .absolute_log_dir()
        .map_err(|err| format!("cannot resolve log directory: {err}"))?;
    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, &log_dir.to_string_lossy())?;

    let conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.db_path.display()
        )
    })?;

    let gateway = HttpRecommendationGateway::new(
        config.recommender_url.clone(),
        Duration::from_millis(config.recommender_timeout_ms),
    )
    .map_err(|err| format!("failed to build recommendation gateway: {err}"))?;

    let state = Arc::new(AppState::new(conn, gateway));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| format!("failed to start async runtime: {err}"))?;
    runtime.block_on(serve(config.bind_addr, state))
}

async fn serve(addr: SocketAddr, state: SharedState) -> Result<(), String> {
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    let actual_addr = listener
        .local_addr()
        .map_err(|err| format!("failed to read bound address: {err}"))?;

    info!("event=api_start module=api status=ok bind={actual_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    info!("event=api_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    // Serve until interrupted; shutdown finishes in-flight requests.
    let _ = tokio::signal::ctrl_c().await;
}
