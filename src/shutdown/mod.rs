// Package shutdown provides graceful shutdown functionality.

use anyhow::Result;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const DEFAULT_GRACEFUL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
#[error("graceful shutdown timeout exceeded")]
pub struct TimeoutError;

/// Cancels the shared token on SIGINT/SIGTERM and waits for serving tasks to drain.
#[derive(Clone)]
pub struct GracefulShutdown {
    shutdown_token: CancellationToken,
    timeout: Duration,
}

impl GracefulShutdown {
    pub fn new(shutdown_token: CancellationToken, timeout: Duration) -> Self {
        Self {
            shutdown_token,
            timeout,
        }
    }

    /// Waits for an OS signal or an earlier cancellation, then cancels the
    /// token and gives `tasks` the graceful timeout to finish.
    pub async fn await_shutdown(&self, tasks: Vec<JoinHandle<Result<()>>>) -> Result<()> {
        tokio::select! {
            signal = os_signal() => {
                info!(
                    component = "graceful-shutdown",
                    event = "os_signal",
                    signal = signal,
                    "cancellation started"
                );
            }
            _ = self.shutdown_token.cancelled() => {
                info!(
                    component = "graceful-shutdown",
                    event = "ctx_done",
                    "cancellation started"
                );
            }
        }

        self.shutdown_token.cancel();

        match timeout(self.timeout, drain(tasks)).await {
            Ok(()) => {
                info!(
                    component = "graceful-shutdown",
                    event = "shutdown_success",
                    "service was gracefully shut down"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    component = "graceful-shutdown",
                    event = "shutdown_timeout",
                    timeout_secs = self.timeout.as_secs(),
                    "not all tasks were closed within timeout"
                );
                Err(TimeoutError.into())
            }
        }
    }
}

async fn drain(tasks: Vec<JoinHandle<Result<()>>>) {
    for task in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(
                component = "graceful-shutdown",
                event = "task_failed",
                error = %e,
                "task finished with error"
            ),
            Err(e) => error!(
                component = "graceful-shutdown",
                event = "task_panicked",
                error = %e,
                "task did not complete"
            ),
        }
    }
}

#[cfg(unix)]
async fn os_signal() -> &'static str {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    match unix_signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = signal::ctrl_c() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        },
        Err(e) => {
            warn!(
                component = "graceful-shutdown",
                event = "sigterm_unavailable",
                error = %e,
                "listening for SIGINT only"
            );
            let _ = signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn os_signal() -> &'static str {
    let _ = signal::ctrl_c().await;
    "SIGINT"
}
