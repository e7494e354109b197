//! Axum API server binary.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobboard_api::{
    create_document_router, create_relational_router, metrics, ApiConfig, DocumentState, RelationalState, Variant,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting jobboard-api");

    let config = ApiConfig::from_env();
    info!(
        host = %config.host,
        port = config.port,
        variant = %config.variant,
        duplicates = ?config.duplicate_policy,
        "API config loaded"
    );
    if config.is_production() && config.uses_default_secret() {
        warn!("SECRET_KEY is unset in production; tokens are signed with the default secret");
    }

    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Failed to install metrics recorder, continuing without /metrics");
                None
            }
        }
    } else {
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;

    let app = build_app(config, metrics_handle).await?;

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jobboard=debug,sqlx=warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}

async fn build_app(
    config: ApiConfig,
    metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<Router> {
    let seed = config.seed_admin.clone();

    let app = match config.variant {
        Variant::Document => {
            let state = DocumentState::new(config)
                .await
                .context("failed to open document store")?;
            if let Some(seed) = seed {
                state
                    .seed_admin(&seed.email, &seed.password)
                    .await
                    .context("failed to seed admin")?;
            }
            create_document_router(state, metrics_handle)
        }
        Variant::Relational => {
            let state = RelationalState::new(config)
                .await
                .context("failed to open relational store")?;
            if let Some(seed) = seed {
                state
                    .seed_admin(&seed.email, &seed.password)
                    .await
                    .context("failed to seed admin")?;
            }
            create_relational_router(state, metrics_handle)
        }
    };
    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
