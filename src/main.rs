//! credential-gate server
//!
//! Registration and login API backed by PostgreSQL (or an in-memory store for
//! local runs), issuing signed session tokens.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use credential_gate::auth::{AuthService, PasswordHasher, TokenIssuer};
use credential_gate::config::{Config, StoreBackend};
use credential_gate::store::{InMemoryUserStore, PgUserStore, UserStore};
use credential_gate::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting credential-gate");

    let store = connect_store(&config).await?;

    let hasher = PasswordHasher::new(config.bcrypt_cost).context("Failed to initialize hasher")?;
    let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_seconds);
    let auth_service = Arc::new(AuthService::new(store.clone(), hasher, tokens));

    let config = Arc::new(config);
    let app = build_router(AppState::new(auth_service, config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/api/health", addr);
    tracing::info!("Frontend origin: {}", config.frontend_url);

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgUserStore::connect(config)
                .await
                .context("Failed to connect to database")?;
            store
                .run_migrations()
                .await
                .context("Failed to run migrations")?;
            let store: Arc<dyn UserStore> = Arc::new(store);
            Ok(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory credential store; accounts are lost on restart");
            let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
            Ok(store)
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
