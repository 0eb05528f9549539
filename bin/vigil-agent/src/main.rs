//! vigil-agent – entry point.
//!
//! Loads the agent config, starts one worker per capture kind and waits for
//! Ctrl-C / SIGTERM, then stops the workers within the shutdown timeout.
//! Captures still stuck after that are abandoned when the runtime is dropped.

mod capture;
mod config;
mod delivery;
mod error;
mod worker;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vigil_types::CaptureKind;

use crate::capture::{ScreenCapturer, WebcamCapturer};
use crate::config::AgentConfig;
use crate::delivery::HttpUploader;
use crate::worker::{block_on_bounded, Workers};

#[derive(Parser, Debug)]
#[command(name = "vigil-agent", version, about = "Periodic screen and webcam capture agent")]
struct Cli {
    /// Path to the TOML config file; created with defaults when missing.
    #[arg(long, short = 'c', default_value = "vigil-agent.toml")]
    config: PathBuf,

    /// Tracing filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let cfg = match AgentConfig::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(path = %cli.config.display(), error = %e, "cannot start agent");
            return Err(e.into());
        }
    };

    // Captures stuck in device I/O get `grace` after the workers are joined.
    let grace = cfg.shutdown_timeout();
    block_on_bounded(run(cfg), grace)??;
    info!("vigil-agent stopped");
    Ok(())
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        employee_id = %cfg.employee_id,
        server_url = %cfg.server_url,
        "vigil-agent starting"
    );

    let uploader = Arc::new(HttpUploader::new(&cfg.server_url, cfg.request_timeout())?);
    let mut workers = Workers::new(CancellationToken::new());
    workers.spawn(
        cfg.worker_spec(CaptureKind::Screenshot),
        Arc::new(ScreenCapturer::new()),
        Arc::clone(&uploader),
    );
    workers.spawn(
        cfg.worker_spec(CaptureKind::Frame),
        Arc::new(WebcamCapturer::new(cfg.webcam_device.clone())),
        Arc::clone(&uploader),
    );

    shutdown_signal().await;

    for (kind, stats) in workers.shutdown(cfg.shutdown_timeout()).await {
        match stats {
            Some(stats) => info!(%kind, ?stats, "worker finished"),
            None => warn!(%kind, "worker abandoned"),
        }
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cli.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: --log-level '{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cli.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Resolves on SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("stop requested; shutting down workers");
}
