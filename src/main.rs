//! Fleetdesk Server — authentication and trust core
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use fleetdesk_core::config::AppConfig;
use fleetdesk_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("FLEETDESK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Fleetdesk v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = fleetdesk_database::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    fleetdesk_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    tracing::info!("Initializing cache (provider: {})...", config.cache.provider);
    let cache = Arc::new(fleetdesk_cache::provider::CacheManager::new(&config.cache).await?);
    tracing::info!("Cache initialized");

    let directory: Arc<dyn fleetdesk_core::traits::directory::AccountDirectory> = Arc::new(
        fleetdesk_database::repositories::account::PgAccountDirectory::new(db.pool().clone()),
    );

    let config = Arc::new(config);
    let state = fleetdesk_api::state::AppState::build(
        Arc::clone(&config),
        Some(db),
        cache,
        directory,
    );

    // Maintenance scheduler shares the verifier's nonce store, so the
    // sweep acts on the same map the middleware records into.
    let mut scheduler = if config.worker.enabled {
        tracing::info!("Starting maintenance scheduler...");
        let scheduler = fleetdesk_worker::MaintenanceScheduler::new(
            state.signature_verifier.nonce_store().clone(),
            config.signature.clone(),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Maintenance scheduler disabled");
        None
    };

    let app = fleetdesk_api::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Fleetdesk server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("Fleetdesk server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
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
