// Main entrypoint for the subscription proxy.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use subproxy::app::App;
use subproxy::config::Config;
use subproxy::metrics;
use subproxy::shutdown::{GracefulShutdown, DEFAULT_GRACEFUL_TIMEOUT};

const CONFIG_PATH: &str = "config.yaml";
const CONFIG_PATH_LOCAL: &str = "config.local.yaml";

/// subproxy - access-controlled caching proxy for subscription documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok((cfg, PathBuf::from(CONFIG_PATH_LOCAL))),
        Err(_) => {
            let cfg = Config::load(CONFIG_PATH)
                .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
            Ok((cfg, PathBuf::from(CONFIG_PATH)))
        }
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level()));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (cfg, cfg_path) = load_cfg(args.cfg)?;

    // Logger needs the loaded config, so config loading itself is reported here.
    configure_logger(&cfg);
    info!(
        component = "config",
        event = "load_success",
        path = ?cfg_path,
        "config loaded"
    );

    if let Err(e) = metrics::init_prometheus_exporter() {
        warn!(
            component = "main",
            event = "metrics_init_failed",
            error = %e,
            "metrics endpoint will be empty"
        );
    }

    let shutdown_token = CancellationToken::new();
    let app = App::new(shutdown_token.clone(), cfg)?;

    let serve_token = shutdown_token.clone();
    let server = tokio::spawn(async move {
        let result = app.listen_and_serve().await;
        if let Err(e) = &result {
            error!(
                component = "main",
                scope = "app",
                event = "serve_failed",
                error = %e,
                "failed to serve"
            );
        }
        // A server that stops on its own takes the process down with it.
        serve_token.cancel();
        result
    });

    let graceful_shutdown = GracefulShutdown::new(shutdown_token, DEFAULT_GRACEFUL_TIMEOUT);
    if let Err(e) = graceful_shutdown.await_shutdown(vec![server]).await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
