//! mrkt - Admin API for marketplace user accounts

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use mrkt_api::{AppState, create_router};
use mrkt_auth::TokenCodec;
use mrkt_db::Database;

/// mrkt - Admin API for marketplace user accounts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "MRKT_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "MRKT_PORT")]
    port: Option<u16>,

    /// Secret for standard-user tokens
    #[arg(long, env = "MRKT_USER_SECRET", hide_env_values = true)]
    user_secret: Option<String>,

    /// Secret for admin tokens
    #[arg(long, env = "MRKT_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.user_secret {
        config.auth.user_secret = secret;
    }
    if let Some(secret) = args.admin_secret {
        config.auth.admin_secret = secret;
    }

    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting mrkt v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Initialize database
    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    let tokens = Arc::new(TokenCodec::new(
        &config.auth.user_secret,
        &config.auth.admin_secret,
        config.auth.token_expiry_hours,
    ));

    let state = AppState::new(db, tokens);

    let metrics = if config.metrics.enabled {
        Some(Arc::new(PrometheusBuilder::new().install_recorder()?))
    } else {
        None
    };

    let app = create_router(state, metrics).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
