//! Food API server.
//!
//! Main entry point that loads configuration, wires the crates together,
//! and serves HTTP until a shutdown signal arrives.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use foodapi_api::{AppState, build_router};
use foodapi_auth::{JwtDecoder, JwtEncoder, PasswordHasher, SessionManager, TokenSessions};
use foodapi_cache::SessionBackend;
use foodapi_core::config::AppConfig;
use foodapi_core::error::AppError;
use foodapi_core::traits::{Clock, SystemClock, UserRepository};
use foodapi_database::{DatabasePool, PgUserRepository};

#[tokio::main]
async fn main() {
    let env = std::env::var("FOODAPI_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Food API v{}", env!("CARGO_PKG_VERSION"));

    if !config.auth.has_secrets() {
        tracing::warn!("Token secrets are not configured; login and token verification will fail");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Session store ────────────────────────────────────────────
    tracing::info!(provider = %config.session_store.provider, "Initializing session store");
    let session_store = SessionBackend::new(&config.session_store).await?.store();

    // ── Database ─────────────────────────────────────────────────
    let db_pool = DatabasePool::connect_lazy(&config.database)?;
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db_pool.pool().clone()));

    // ── Auth ─────────────────────────────────────────────────────
    let session_manager = SessionManager::new(
        Arc::new(JwtEncoder::new(&config.auth, Arc::clone(&clock))?),
        Arc::new(JwtDecoder::new(&config.auth)),
        TokenSessions::new(Arc::clone(&session_store), clock),
        Arc::clone(&users),
        PasswordHasher::new(),
    );

    let state = AppState {
        session_manager: Arc::new(session_manager),
        session_store,
        users,
    };
    let app = build_router(state, &config.server);

    // ── Serve ────────────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Food API listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        finished = &mut server => {
            finished
                .map_err(|e| AppError::internal(format!("Server task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = shutdown_rx.changed() => {
            let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
            match tokio::time::timeout(grace, server).await {
                Ok(finished) => {
                    finished
                        .map_err(|e| AppError::internal(format!("Server task failed: {e}")))?
                        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;
                }
                Err(_) => {
                    tracing::warn!(
                        grace_seconds = config.server.shutdown_grace_seconds,
                        "Grace period elapsed with requests still in flight"
                    );
                }
            }
        }
    }

    db_pool.close().await;
    tracing::info!("Food API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
