// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::indexing_slicing
    )
)]

use clap::Parser;
use color_eyre::eyre::Result;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use streams_server::config::{load_config, load_config_from};
use streams_server::cors::{build_cors_layer, parse_origins, DEFAULT_CORS_ORIGINS};
use streams_server::logging::{
    default_log_dir, init_logging, parse_rotation, LogConfig, LOG_FILENAME,
};
use streams_server::utils::format_duration;
use streams_server::{build_router, AppState, Database};
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Streams server - assets, streams and drops over a JSON API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "STREAMS_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// SQLite database file (created if missing)
    #[arg(long, env = "STREAMS_DATABASE", default_value = "streams.db")]
    database: PathBuf,

    /// Server config file (default: ~/.streams/config.toml)
    #[arg(long, env = "STREAMS_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(long, env = "STREAMS_CORS_ORIGINS", default_value = DEFAULT_CORS_ORIGINS)]
    cors_origins: String,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "STREAMS_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "STREAMS_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.streams/logs)
    #[arg(long, env = "STREAMS_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn report_bind_error(addr: SocketAddr, log_file: &Path, e: &std::io::Error) {
    eprintln!();
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of streams-server may already be running.");
        eprintln!("Use a different port: streams-server --addr 127.0.0.1:8081");
    } else {
        eprintln!("Error: Failed to start server: {e}");
    }
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Received shutdown signal, stopping server...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_dir = args.log_dir.unwrap_or_else(default_log_dir);
    let log_file = log_dir.join(LOG_FILENAME);

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    let config = match args.config.as_deref() {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let db = Database::open(&args.database)?;
    info!(path = %args.database.display(), "Database opened");

    let state = AppState::new(db, config)?;
    info!("Session lifetime: {}", format_duration(state.session_ttl));

    let cors_origins = parse_origins(&args.cors_origins);
    info!("CORS origins: {}", cors_origins.join(", "));
    let app = build_router(state).layer(build_cors_layer(cors_origins));

    let addr: SocketAddr = args.addr.parse()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            report_bind_error(addr, &log_file, &e);
            return Err(e.into());
        }
    };

    info!("Starting streams server on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Streams server stopped");
    Ok(())
}
