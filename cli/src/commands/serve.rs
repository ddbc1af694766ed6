use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cvm_proxy_common::clock::Clock;
use cvm_proxy_common::config::Config;
use cvm_proxy_core::rate_limit::RateLimiter;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::server::{AppState, build_router};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

pub async fn serve(cfg: Config) -> anyhow::Result<()> {
    let state: AppState = AppState::from_config(&cfg)?;
    spawn_sweeper(state.limiter.clone(), state.clock.clone());

    let router = build_router(state, &cfg.public_dir);

    let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener: TcpListener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(port = cfg.port, "server listening");

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Drops expired rate-limit windows once per window length.
fn spawn_sweeper(limiter: Arc<RateLimiter>, clock: Arc<dyn Clock>) {
    let period: Duration = limiter.window().max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed: usize = limiter.sweep(clock.now_millis());
            if removed > 0 {
                debug!(removed, remaining = limiter.tracked_keys(), "swept rate limit windows");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
