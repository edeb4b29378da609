//! agt-web - Audio Gear Tracker web service
//!
//! Serves the brand and equipment pages plus the quick-search JSON
//! endpoint over a local SQLite catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agt_common::config::{AppConfig, Overrides};
use agt_common::db::init_database;
use agt_web::{build_router, AppState};

/// Command-line arguments for agt-web
#[derive(Parser, Debug)]
#[command(name = "agt-web")]
#[command(about = "Audio Gear Tracker web service")]
#[command(version)]
struct Args {
    /// SQLite database file
    #[arg(short, long, env = "AGT_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "AGT_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AGT_PORT")]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "AGT_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Self {
            database_path: args.database,
            bind_address: args.bind,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::resolve(args.into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("agt_web={0},agt_common={0},tower_http={0}", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Audio Gear Tracker (agt-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(path) = &config.config_file {
        info!("Config file: {}", path.display());
    }
    if let Some(warning) = &config.config_warning {
        warn!("{}", warning);
    }
    info!("Database path: {}", config.database_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::from_pool(pool));

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("agt-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
