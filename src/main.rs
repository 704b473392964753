#![forbid(unsafe_code)]

//! `todont` server binary.
//!
//! Loads configuration, opens the configured store, and serves the JSON
//! API until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use todont::clock::{Clock, SystemClock};
use todont::config::{GlobalConfig, StorageKind};
use todont::http::{self, AppState};
use todont::persistence;
use todont::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum StorageArg {
    Sqlite,
    Memory,
}

impl From<StorageArg> for StorageKind {
    fn from(value: StorageArg) -> Self {
        match value {
            StorageArg::Sqlite => Self::Sqlite,
            StorageArg::Memory => Self::Memory,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "todont", about = "Shareable todont list server", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the HTTP port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the storage backend.
    #[arg(long, value_enum)]
    storage: Option<StorageArg>,

    /// Override the `SQLite` database path.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("todont server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

fn load_config(args: &Cli) -> Result<GlobalConfig> {
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };

    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(storage) = args.storage {
        config.storage = storage.into();
    }
    if let Some(db_path) = &args.db_path {
        config.db_path.clone_from(db_path);
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: Cli) -> Result<()> {
    let config = load_config(&args)?;
    info!(storage = ?config.storage, bind = %config.bind_address(), "configuration loaded");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = persistence::open_store(&config, Arc::clone(&clock)).await?;
    let state = AppState::new(config, Arc::clone(&store), clock);

    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    let mut server = tokio::spawn(async move { http::serve(state, server_ct).await });

    let joined = tokio::select! {
        () = shutdown_signal() => {
            info!("shutdown signal received");
            ct.cancel();
            (&mut server).await
        }
        joined = &mut server => joined,
    };

    let outcome = joined.map_err(|err| AppError::Io(format!("server task failed: {err}")))?;
    store.close().await;
    info!("todont shut down");
    outcome
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
