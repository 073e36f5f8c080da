//! Tic-tac-toe arena - server binary

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tictac_arena::{
    AppState, ArenaConfig, GameStore, InMemoryGameStore, MoveCoordinator, SqliteGameStore,
    StorageKind, router,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            memory,
        } => {
            let config = load_config(config, host, port, db_path, memory)?;
            run_server(config).await
        }
        Command::Migrate { db_path } => run_migrations(db_path),
    }
}

/// Loads the config file (if any) and applies command-line overrides.
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
    memory: bool,
) -> Result<ArenaConfig> {
    let mut config = match path {
        Some(path) => ArenaConfig::from_file(path)?,
        None => {
            info!("No config file given, using defaults");
            ArenaConfig::default()
        }
    };

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(db_path) = db_path {
        config = config.with_db_path(db_path);
    }
    if memory {
        config = config.with_storage(StorageKind::Memory);
    }

    config.validate()?;
    Ok(config)
}

/// Opens the configured store.
#[instrument(skip(config), fields(storage = %config.storage()))]
fn open_store(config: &ArenaConfig) -> Result<Arc<dyn GameStore>> {
    let store: Arc<dyn GameStore> = match config.storage() {
        StorageKind::Memory => Arc::new(InMemoryGameStore::new()),
        StorageKind::Sqlite => Arc::new(SqliteGameStore::open(config.db_path().clone())?),
    };
    Ok(store)
}

/// Run the HTTP game server
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
async fn run_server(config: ArenaConfig) -> Result<()> {
    info!("Starting tictac_arena HTTP server");

    let coordinator = MoveCoordinator::new(open_store(&config)?)
        .with_retry_policy(config.retry_policy())
        .with_page_limits(config.page_limits());
    let app = router(AppState::new(coordinator));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/api/v1/games",
        config.host(),
        config.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply migrations and exit
#[instrument]
fn run_migrations(db_path: String) -> Result<()> {
    let store = SqliteGameStore::open(db_path)?;
    info!(path = %store.db_path(), "Database is up to date");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
