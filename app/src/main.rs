mod auth;
mod config;
mod error;
mod farm;
mod logging;
mod models;
mod rest;
mod store;

use auth::TokenIssuer;
use config::Config;
use farm::FarmService;
use std::sync::Arc;
use store::PgStore;
use tracing::{error, info};

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Could not listen for SIGINT: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Could not listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init().map_err(|e| -> Box<dyn std::error::Error> { e })?;

    let config = Config::from_env()?;
    let pool = models::establish_db_connection(&config).await?;
    models::run_migrations(&pool).await?;
    info!(
        max_connections = config.db_max_connections(),
        "Database ready"
    );

    let store = Arc::new(PgStore::new(pool.clone()));
    let tokens = TokenIssuer::new(config.jwt_secret(), config.token_ttl_hours());
    let farm = FarmService::new(store.clone(), store, tokens);

    let served = rest::dispatch_server(farm, config.server_port(), shutdown_signal()).await;
    pool.close().await;
    info!("Database pool closed");
    served?;
    Ok(())
}
