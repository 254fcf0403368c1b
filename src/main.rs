use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use squares_api::auth::AuthMode;
use squares_api::cli::ServeArgs;
use squares_api::config::AppConfig;
use squares_api::database::{connect_pool, PgSquareStore};
use squares_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_*, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let mut config = AppConfig::from_env();
    ServeArgs::parse().apply(&mut config);
    tracing::info!("Starting squares-api in {:?} mode", config.environment);

    let auth = AuthMode::from_config(&config.security)
        .context("invalid authentication settings (JWT_SECRET, SECURITY_JWT_EXPIRY_HOURS)")?;
    if auth.is_enabled() {
        tracing::warn!("POST /login is a placeholder: it issues tokens without checking credentials");
    } else {
        tracing::warn!("Authentication disabled: square writes are open to every caller");
    }

    let pool = connect_pool(&config.database).context("invalid database configuration")?;
    let store = PgSquareStore::new(pool.clone(), &config.database);
    let state = AppState::new(Arc::new(store), auth);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Server is running on http://{}", bind_addr);

    axum::serve(listener, app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Closed database pool");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
