use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_history::config::HistoryConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "folio_api=debug,folio_history=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let history = HistoryConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        enable_post_history = history.enable_post_history,
        "Loaded server configuration"
    );

    // --- Storage ---
    let state = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = folio_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            folio_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            folio_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            AppState::postgres(config.clone(), history, pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            AppState::in_memory(config.clone(), history)
        }
    };
    let pool = state.pool.clone();

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Once a signal arrives, in-flight requests get `shutdown_timeout_secs`
    // to finish before the server task is aborted.
    let shutdown = Arc::new(Notify::new());
    let trigger = Arc::clone(&shutdown);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        trigger.notify_one();
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut server => log_server_exit(result),
        () = shutdown.notified() => {
            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => log_server_exit(result),
                Err(_) => {
                    tracing::warn!(
                        drain_secs = config.shutdown_timeout_secs,
                        "Connections still open after drain timeout, aborting"
                    );
                    server.abort();
                }
            }
        }
    }

    // --- Post-shutdown cleanup ---
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

fn log_server_exit(result: Result<std::io::Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("Server stopped accepting connections"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
